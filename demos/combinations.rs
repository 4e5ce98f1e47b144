use byte_bitmap::{Bitmap, Result};

fn combinations(
    idx: usize,
    bitmap: &mut Bitmap,
    picks: usize,
    seen: &mut Vec<String>,
) -> Result<()> {
    if idx == picks {
        seen.push(bitmap.to_hex_string());
        let chosen: Vec<usize> = bitmap.iter_ones().collect();
        println!("{bitmap} {chosen:?}");
        return Ok(());
    }
    if !bitmap.is_set(idx)? {
        bitmap.set(idx)?;
        combinations(idx + 1, bitmap, picks, seen)?;
        bitmap.unset(idx)?;
    }
    combinations(idx + 1, bitmap, picks, seen)
}

fn main() -> Result<()> {
    const PICKS: usize = 4;
    let mut bitmap = Bitmap::new(PICKS);
    let mut seen = Vec::new();
    combinations(0, &mut bitmap, PICKS, &mut seen)?;
    println!("{} subsets, hex snapshots: {}", seen.len(), seen.join(" "));

    // every snapshot decodes back to a bitmap with the same bits
    for hex in &seen {
        let restored = Bitmap::from_hex_str(hex)?;
        assert_eq!(&restored.to_hex_string(), hex);
    }
    Ok(())
}
