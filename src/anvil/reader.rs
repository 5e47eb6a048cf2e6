use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use super::format::{nbt, region};
use super::iter::{RecordIterator, ValueIterator};
use super::types::error::Result;
use super::types::models::{DIRECTORY_LEN, DecodeOptions, RecordLocation, SlotIndex};
use super::types::value::Value;

/// The main reader for region archive files.
///
/// Holds the whole archive in memory, immutably. Lookups borrow it and return
/// fresh, independently owned results, so one reader can be shared across
/// threads and different slots decoded concurrently.
#[derive(Debug, Clone)]
pub struct RegionReader {
    data: Arc<[u8]>,
    options: DecodeOptions,
    path: Option<PathBuf>,
}

impl RegionReader {
    /// Reads a region archive (`r.X.Z.mca`) from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read. Structural problems are
    /// reported later, by the lookups that hit them.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening region file: {}", path.display());
        let data = fs::read(path)?;
        let mut reader = Self::from_bytes(data);
        reader.path = Some(path.to_path_buf());
        Ok(reader)
    }

    /// Wraps an archive already held in memory.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        let data: Vec<u8> = data.into();
        if data.len() < DIRECTORY_LEN {
            debug!(
                "Archive is {} bytes, shorter than its {}-byte directory",
                data.len(),
                DIRECTORY_LEN
            );
        }
        Self {
            data: Arc::from(data),
            options: DecodeOptions::default(),
            path: None,
        }
    }

    /// Replaces the options used when decoding record payloads.
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// The path this archive was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The raw archive bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Finds the byte location of the record in slot `(x, z)`.
    ///
    /// Returns `Ok(None)` for an empty slot.
    pub fn locate(&self, x: i32, z: i32) -> Result<Option<RecordLocation>> {
        region::locate(&self.data, x, z)
    }

    /// Reads and decompresses the record in slot `(x, z)`.
    pub fn read_record(&self, x: i32, z: i32) -> Result<Option<Vec<u8>>> {
        region::decode(&self.data, x, z)
    }

    /// Reads, decompresses and decodes the record in slot `(x, z)`.
    ///
    /// This is the primary method for random-access lookups.
    pub fn read_value(&self, x: i32, z: i32) -> Result<Option<Value>> {
        self.read_slot_value(SlotIndex::new(x, z)?)
    }

    /// Same as [`read_value`](Self::read_value) for an already validated slot.
    pub fn read_slot_value(&self, slot: SlotIndex) -> Result<Option<Value>> {
        match self.read_slot_record(slot)? {
            Some(bytes) => self.decode_value(&bytes).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn read_slot_record(&self, slot: SlotIndex) -> Result<Option<Vec<u8>>> {
        region::decode_slot(&self.data, slot)
    }

    /// Decodes raw record bytes with this reader's options.
    pub fn decode_value(&self, bytes: &[u8]) -> Result<Value> {
        nbt::decode_with(bytes, &self.options)
    }

    /// The last-modified timestamp stored for slot `(x, z)`.
    pub fn timestamp(&self, x: i32, z: i32) -> Result<u32> {
        region::timestamp(&self.data, x, z)
    }

    /// Slots with a non-empty directory entry, in directory order.
    pub fn present_slots(&self) -> Result<Vec<SlotIndex>> {
        region::present_slots(&self.data)
    }

    /// Returns an iterator over the raw bytes of every present record.
    ///
    /// Chain with `.with_values()` to decode each record.
    pub fn iter_records(&self) -> RecordIterator<'_> {
        RecordIterator::new(self)
    }

    /// Shortcut for `reader.iter_records().with_values()`.
    pub fn iter_values(&self) -> ValueIterator<'_> {
        self.iter_records().with_values()
    }
}
