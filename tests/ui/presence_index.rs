use byte_bitmap::{Bitmap, Encoding, Error};

/// Tracks which slots of a fixed table are occupied.
struct PresenceIndex {
    slots: Bitmap,
}

impl PresenceIndex {
    fn restore(hex: &str) -> Result<Self, Error> {
        Ok(Self {
            slots: Bitmap::from_hex_str(hex)?,
        })
    }

    fn occupy(&mut self, slot: usize) -> Result<(), Error> {
        self.slots.set(slot)
    }

    fn release(&mut self, slot: usize) -> Result<(), Error> {
        self.slots.unset(slot)
    }

    fn free_slot(&self) -> Option<usize> {
        self.slots.iter_zeros().next()
    }

    fn snapshot(&self) -> String {
        self.slots.to_hex_string()
    }
}

fn main() {
    let mut index = PresenceIndex::restore("00ff").unwrap();
    assert_eq!(index.free_slot(), Some(8));
    index.occupy(8).unwrap();
    index.release(0).unwrap();
    assert_eq!(index.free_slot(), Some(0));
    assert_eq!(index.snapshot(), "01fe");

    let restored = PresenceIndex::restore(&index.snapshot()).unwrap();
    assert_eq!(restored.slots, index.slots);

    match PresenceIndex::restore("01zz") {
        Err(Error::InvalidEncoding {
            encoding: Encoding::Hex,
            ch: 'z',
            pos: 2,
        }) => {}
        other => panic!("unexpected result: {:?}", other.map(|index| index.snapshot())),
    }
}
