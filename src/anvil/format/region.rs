//! Region archive directory lookup and record extraction.
//!
//! # Archive Structure
//! ```text
//! [0, 4096)     1024 location entries, 4 bytes each, ordered by x + 32 * z
//!               [3 bytes] sector offset (big-endian), [1 byte] sector count
//! [4096, 8192)  1024 big-endian u32 timestamps, same order
//! [n * 4096..]  records:
//!               [4 bytes] length L (big-endian, counts the method byte)
//!               [1 byte]  compression method
//!               [L-1 bytes] compressed payload
//! ```
//!
//! All functions here borrow the archive immutably and never retain it.

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};

use crate::anvil::codec::compression;
use crate::anvil::types::error::{AnvilError, Result};
use crate::anvil::types::models::{
    CompressionType, DIRECTORY_LEN, RecordLocation, SECTOR_SIZE, SLOT_COUNT, SlotIndex,
};
use crate::anvil::utils;

/// Size of the per-record header: 4-byte length plus 1-byte method.
const RECORD_HEADER_LEN: u64 = 5;

/// Finds where the record for slot `(x, z)` is stored.
///
/// Returns `Ok(None)` when the slot is empty (offset and sector count both 0).
///
/// # Errors
/// - `OutOfRange` if `x` or `z` is outside `0..32`
/// - `TruncatedArchive` if the directory entry or the record offset lies
///   past the end of the archive
pub fn locate(archive: &[u8], x: i32, z: i32) -> Result<Option<RecordLocation>> {
    let slot = SlotIndex::new(x, z)?;
    locate_slot(archive, slot)
}

/// Same as [`locate`] for an already validated slot.
pub fn locate_slot(archive: &[u8], slot: SlotIndex) -> Result<Option<RecordLocation>> {
    let entry = slice_at(archive, slot.directory_offset() as u64, 4)?;
    let offset = u64::from(utils::read_u24(&entry[0..3])) * SECTOR_SIZE;
    let max_len = u64::from(entry[3]) * SECTOR_SIZE;

    if offset == 0 && max_len == 0 {
        return Ok(None);
    }

    if offset > archive.len() as u64 {
        return Err(AnvilError::TruncatedArchive {
            offset,
            needed: RECORD_HEADER_LEN,
            archive_len: archive.len() as u64,
        });
    }

    trace!("Slot {}: record at offset {} (max {} bytes)", slot, offset, max_len);
    Ok(Some(RecordLocation { offset, max_len }))
}

/// Locates and decompresses the record for slot `(x, z)`.
///
/// Returns `Ok(None)` for an empty slot. The returned bytes are the raw
/// tagged-value stream, ready for [`nbt::decode`](super::nbt::decode).
pub fn decode(archive: &[u8], x: i32, z: i32) -> Result<Option<Vec<u8>>> {
    let slot = SlotIndex::new(x, z)?;
    decode_slot(archive, slot)
}

/// Same as [`decode`] for an already validated slot.
pub fn decode_slot(archive: &[u8], slot: SlotIndex) -> Result<Option<Vec<u8>>> {
    match locate_slot(archive, slot)? {
        Some(location) => read_record_at(archive, location).map(Some),
        None => Ok(None),
    }
}

/// Reads the record header at `location` and decompresses its payload.
pub fn read_record_at(archive: &[u8], location: RecordLocation) -> Result<Vec<u8>> {
    let header = slice_at(archive, location.offset, RECORD_HEADER_LEN)?;
    let length = u64::from(BigEndian::read_u32(&header[0..4]));
    let compression_type = CompressionType::from(header[4]);

    if compression_type != CompressionType::Zlib {
        return Err(AnvilError::UnsupportedCompression(compression_type.code()));
    }
    if length == 0 {
        return Err(AnvilError::InvalidFormat(format!(
            "Record at offset {} declares zero length",
            location.offset
        )));
    }
    if length + 4 > location.max_len {
        debug!(
            "Record at offset {} is {} bytes, larger than its {} reserved bytes",
            location.offset,
            length + 4,
            location.max_len
        );
    }

    let payload = slice_at(archive, location.offset + RECORD_HEADER_LEN, length - 1)?;
    let decompressed = compression::decompress_record(compression_type, payload)?;
    trace!(
        "Record at offset {}: {} compressed -> {} bytes",
        location.offset,
        payload.len(),
        decompressed.len()
    );
    Ok(decompressed)
}

/// Reads the last-modified timestamp stored for slot `(x, z)`.
pub fn timestamp(archive: &[u8], x: i32, z: i32) -> Result<u32> {
    let slot = SlotIndex::new(x, z)?;
    timestamp_slot(archive, slot)
}

/// Same as [`timestamp`] for an already validated slot.
pub fn timestamp_slot(archive: &[u8], slot: SlotIndex) -> Result<u32> {
    let entry = slice_at(archive, slot.timestamp_offset() as u64, 4)?;
    Ok(BigEndian::read_u32(entry))
}

/// Lists every slot whose directory entry is non-empty, in directory order.
pub fn present_slots(archive: &[u8]) -> Result<Vec<SlotIndex>> {
    let directory = slice_at(archive, 0, DIRECTORY_LEN as u64)?;
    directory
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, entry)| entry.iter().any(|&b| b != 0))
        .map(|(index, _)| SlotIndex::from_linear(index))
        .collect::<Result<Vec<_>>>()
        .map(|slots| {
            debug!("{} of {} slots present", slots.len(), SLOT_COUNT);
            slots
        })
}

/// Borrows `len` bytes at `offset`, or reports how far the archive falls short.
fn slice_at(archive: &[u8], offset: u64, len: u64) -> Result<&[u8]> {
    let truncated = || AnvilError::TruncatedArchive {
        offset,
        needed: len,
        archive_len: archive.len() as u64,
    };
    let end = offset.checked_add(len).ok_or_else(truncated)?;
    if end > archive.len() as u64 {
        return Err(truncated());
    }
    Ok(&archive[offset as usize..end as usize])
}
