use byte_bitmap::Bitmap;
use std::sync::{Arc, Mutex};
use std::thread;

fn assert_send_sync<T: Send + Sync>() {}

fn main() {
    assert_send_sync::<Bitmap>();

    let bitmap = Arc::new(Mutex::new(Bitmap::new(64)));
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let bitmap = Arc::clone(&bitmap);
            thread::spawn(move || {
                let mut guard = bitmap.lock().unwrap();
                for idx in (worker..64).step_by(8) {
                    guard.set(idx).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let bitmap = bitmap.lock().unwrap();
    assert!(bitmap.all());
    assert_eq!(bitmap.to_hex_string(), "ffffffffffffffff");
}
