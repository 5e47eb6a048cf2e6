//! Iterators for sequential access to every record of a region.
//!
//! The design is layered:
//!
//! 1. [`RecordIterator`] - `(slot, decompressed bytes)` for each present slot
//! 2. [`ValueIterator`] - `(slot, decoded value tree)`
//!
//! Empty slots are skipped. A failing slot yields an `Err` item and iteration
//! continues with the next slot, so callers decide whether to stop or skip.
//!
//! # Example
//! ```no_run
//! # use anvil_reader::RegionReader;
//! # let reader = RegionReader::open("r.0.0.mca").unwrap();
//! for result in reader.iter_values() {
//!     let (slot, value) = result.unwrap();
//!     println!("{}: {} top-level tags", slot, value.as_compound().map_or(0, |c| c.len()));
//! }
//! ```

use super::reader::RegionReader;
use super::types::error::Result;
use super::types::models::{SLOT_COUNT, SlotIndex};
use super::types::value::Value;

/// Iterator over the decompressed bytes of every present record.
///
/// Created by [`RegionReader::iter_records()`].
pub struct RecordIterator<'a> {
    reader: &'a RegionReader,
    next_index: usize,
}

impl<'a> RecordIterator<'a> {
    pub(super) fn new(reader: &'a RegionReader) -> Self {
        Self {
            reader,
            next_index: 0,
        }
    }

    /// Transforms this iterator to decode each record into a value tree.
    pub fn with_values(self) -> ValueIterator<'a> {
        ValueIterator {
            reader: self.reader,
            records: self,
        }
    }
}

impl<'a> Iterator for RecordIterator<'a> {
    type Item = Result<(SlotIndex, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_index < SLOT_COUNT {
            let slot = match SlotIndex::from_linear(self.next_index) {
                Ok(slot) => slot,
                Err(e) => return Some(Err(e)),
            };
            self.next_index += 1;

            match self.reader.read_slot_record(slot) {
                Ok(Some(bytes)) => return Some(Ok((slot, bytes))),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Iterator over the decoded value tree of every present record.
///
/// Created by [`RecordIterator::with_values()`].
pub struct ValueIterator<'a> {
    records: RecordIterator<'a>,
    reader: &'a RegionReader,
}

impl<'a> Iterator for ValueIterator<'a> {
    type Item = Result<(SlotIndex, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (slot, bytes) = match self.records.next()? {
            Ok(pair) => pair,
            Err(e) => return Some(Err(e)),
        };
        Some(self.reader.decode_value(&bytes).map(|value| (slot, value)))
    }
}
