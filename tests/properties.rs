use byte_bitmap::{Bitmap, Error};
use proptest::prelude::*;

/// Binary strings whose length is a whole number of bytes.
fn byte_aligned_bitstring() -> impl Strategy<Value = String> {
    (0usize..8).prop_flat_map(|bytes| {
        proptest::string::string_regex(&format!("[01]{{{}}}", bytes * 8)).unwrap()
    })
}

/// A bitmap with an arbitrary capacity and set of bits.
fn arb_bitmap() -> impl Strategy<Value = Bitmap> {
    (0usize..200).prop_flat_map(|capacity| {
        let len = capacity.div_ceil(8) * 8;
        proptest::collection::vec(any::<bool>(), len).prop_map(move |bits| {
            let mut bitmap = Bitmap::new(capacity);
            for (idx, bit) in bits.into_iter().enumerate() {
                bitmap.assign(idx, bit).unwrap();
            }
            bitmap
        })
    })
}

proptest! {
    #[test]
    fn binary_round_trip(s in byte_aligned_bitstring()) {
        let bitmap = Bitmap::from_binary_str(&s).unwrap();
        prop_assert_eq!(bitmap.to_binary_string(), s);
    }

    #[test]
    fn short_binary_strings_are_left_padded(s in "[01]{0,40}") {
        let bitmap = Bitmap::from_binary_str(&s).unwrap();
        let rendered = bitmap.to_binary_string();
        prop_assert_eq!(rendered.len(), s.len().div_ceil(8) * 8);
        prop_assert!(rendered.ends_with(&s));
        prop_assert!(rendered[..rendered.len() - s.len()].bytes().all(|b| b == b'0'));
    }

    #[test]
    fn hex_round_trip_preserves_value(h in "([0-9a-f]{2}){0,12}") {
        let bitmap = Bitmap::from_hex_str(&h).unwrap();
        prop_assert_eq!(bitmap.to_hex_string(), h);
    }

    #[test]
    fn odd_hex_strings_gain_one_leading_zero(h in "[0-9a-fA-F]([0-9a-fA-F]{2}){0,8}") {
        let bitmap = Bitmap::from_hex_str(&h).unwrap();
        prop_assert_eq!(bitmap.len(), (h.len() * 4).div_ceil(8) * 8);
        prop_assert_eq!(bitmap.to_hex_string(), format!("0{}", h.to_lowercase()));
    }

    #[test]
    fn hex_and_binary_encode_the_same_bits(bitmap in arb_bitmap()) {
        let from_hex = Bitmap::from_hex_str(&bitmap.to_hex_string()).unwrap();
        let from_binary = Bitmap::from_binary_str(&bitmap.to_binary_string()).unwrap();
        prop_assert_eq!(&from_hex, &bitmap);
        prop_assert_eq!(&from_binary, &bitmap);
    }

    #[test]
    fn popcount_matches_iter_ones(bitmap in arb_bitmap()) {
        prop_assert_eq!(bitmap.popcount(), bitmap.iter_ones().count());
        prop_assert_eq!(bitmap.popcount(), bitmap.iter_ones().len());
        prop_assert_eq!(bitmap.len() - bitmap.popcount(), bitmap.iter_zeros().len());
        prop_assert_eq!(bitmap.popcount() + bitmap.iter_zeros().count(), bitmap.len());
    }

    #[test]
    fn iter_ones_is_ascending_and_set(bitmap in arb_bitmap()) {
        let ones: Vec<usize> = bitmap.iter_ones().collect();
        prop_assert!(ones.windows(2).all(|pair| pair[0] < pair[1]));
        for idx in 0..bitmap.len() {
            prop_assert_eq!(bitmap.is_set(idx).unwrap(), ones.contains(&idx));
        }
    }

    #[test]
    fn predicates_are_exact(bitmap in arb_bitmap()) {
        let every_bit_set = (0..bitmap.len()).all(|idx| bitmap.is_set(idx).unwrap());
        prop_assert_eq!(bitmap.all(), every_bit_set);
        prop_assert_eq!(bitmap.none(), bitmap.popcount() == 0);
        prop_assert_eq!(bitmap.any(), !bitmap.none());
    }

    #[test]
    fn set_unset_toggle(mut bitmap in arb_bitmap(), seed in any::<usize>()) {
        prop_assume!(!bitmap.is_empty());
        let idx = seed % bitmap.len();

        let before = bitmap.is_set(idx).unwrap();
        prop_assert_eq!(bitmap.toggle(idx).unwrap(), !before);
        prop_assert_eq!(bitmap.is_set(idx).unwrap(), !before);

        bitmap.set(idx).unwrap();
        prop_assert!(bitmap.is_set(idx).unwrap());
        bitmap.unset(idx).unwrap();
        prop_assert!(!bitmap.is_set(idx).unwrap());
    }

    #[test]
    fn out_of_range_indices_are_rejected(mut bitmap in arb_bitmap(), offset in 0usize..1000) {
        let idx = bitmap.len() + offset;
        let expected = Error::IndexOutOfRange { index: idx, len: bitmap.len() };
        let snapshot = bitmap.clone();
        prop_assert_eq!(bitmap.set(idx), Err(expected.clone()));
        prop_assert_eq!(bitmap.unset(idx), Err(expected.clone()));
        prop_assert_eq!(bitmap.toggle(idx), Err(expected.clone()));
        prop_assert_eq!(bitmap.is_set(idx), Err(expected));
        prop_assert_eq!(bitmap, snapshot);
    }

    #[test]
    fn invalid_binary_characters_are_rejected(
        prefix in "[01]{0,10}",
        bad in "[2-9a-z ]",
        suffix in "[01]{0,10}"
    ) {
        let input = format!("{prefix}{bad}{suffix}");
        let is_invalid_encoding = matches!(
            Bitmap::from_binary_str(&input),
            Err(Error::InvalidEncoding { pos, .. }) if pos == prefix.len()
        );
        prop_assert!(is_invalid_encoding);
    }
}
