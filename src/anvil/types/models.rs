//! Core data structures for region file components.
//!
//! This module defines the small fixed-layout types used throughout the library:
//! - Slot addressing and record locations within a region archive
//! - Compression method and tag kind enumerations
//! - Decoder configuration

use std::fmt;

use super::error::{AnvilError, Result};

/// Size of one archive sector in bytes.
pub const SECTOR_SIZE: u64 = 4096;

/// Number of slots along each axis of a region.
pub const REGION_WIDTH: u8 = 32;

/// Total number of record slots in a region archive.
pub const SLOT_COUNT: usize = 1024;

/// Byte length of the location directory at the start of the archive.
pub const DIRECTORY_LEN: usize = 4096;

/// Byte offset of the timestamp table, which directly follows the directory.
pub const TIMESTAMP_TABLE_OFFSET: usize = 4096;

/// Default cap on compound/list nesting for the tag decoder.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A validated `(x, z)` slot coordinate within a region, both in `0..32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex {
    x: u8,
    z: u8,
}

impl SlotIndex {
    /// Validates raw coordinates, rejecting anything outside `0..32`.
    pub fn new(x: i32, z: i32) -> Result<Self> {
        let width = i32::from(REGION_WIDTH);
        if !(0..width).contains(&x) || !(0..width).contains(&z) {
            return Err(AnvilError::OutOfRange { x, z });
        }
        Ok(Self {
            x: x as u8,
            z: z as u8,
        })
    }

    /// Builds the slot for a directory position `x + 32 * z`.
    pub fn from_linear(index: usize) -> Result<Self> {
        if index >= SLOT_COUNT {
            return Err(AnvilError::InvalidFormat(format!(
                "Slot index {} exceeds directory size {}",
                index, SLOT_COUNT
            )));
        }
        Ok(Self {
            x: (index % REGION_WIDTH as usize) as u8,
            z: (index / REGION_WIDTH as usize) as u8,
        })
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn z(&self) -> u8 {
        self.z
    }

    /// Position of this slot in directory order (x fastest, then z).
    pub fn linear(&self) -> usize {
        self.x as usize + self.z as usize * REGION_WIDTH as usize
    }

    /// Byte offset of this slot's 4-byte location entry.
    pub fn directory_offset(&self) -> usize {
        4 * self.linear()
    }

    /// Byte offset of this slot's 4-byte timestamp entry.
    pub fn timestamp_offset(&self) -> usize {
        TIMESTAMP_TABLE_OFFSET + self.directory_offset()
    }

    /// Iterates all 1024 slots in directory order.
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..REGION_WIDTH).flat_map(|z| (0..REGION_WIDTH).map(move |x| SlotIndex { x, z }))
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Where a record's compressed payload lives inside the archive.
///
/// Derived from a 4-byte directory entry: a 3-byte sector offset and a 1-byte
/// sector count, both scaled by [`SECTOR_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLocation {
    /// Absolute byte offset of the record header.
    pub offset: u64,
    /// Upper bound on the record's on-disk size (sector count * 4096).
    pub max_len: u64,
}

impl RecordLocation {
    /// Returns the byte range the directory reserves for this record.
    pub fn byte_range(&self) -> std::ops::Range<u64> {
        self.offset..self.offset + self.max_len
    }
}

/// Compression method byte stored in each record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// GZip (RFC1952), method 1. Recognised but not supported.
    Gzip,
    /// Zlib/deflate, method 2.
    Zlib,
    Unknown(u8),
}

impl CompressionType {
    pub fn code(&self) -> u8 {
        match self {
            CompressionType::Gzip => 1,
            CompressionType::Zlib => 2,
            CompressionType::Unknown(code) => *code,
        }
    }
}

impl From<u8> for CompressionType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Gzip,
            2 => Self::Zlib,
            other => Self::Unknown(other),
        }
    }
}

/// The thirteen tag kind codes of the tagged-value format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for TagKind {
    type Error = AnvilError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::End),
            1 => Ok(Self::Byte),
            2 => Ok(Self::Short),
            3 => Ok(Self::Int),
            4 => Ok(Self::Long),
            5 => Ok(Self::Float),
            6 => Ok(Self::Double),
            7 => Ok(Self::ByteArray),
            8 => Ok(Self::String),
            9 => Ok(Self::List),
            10 => Ok(Self::Compound),
            11 => Ok(Self::IntArray),
            12 => Ok(Self::LongArray),
            _ => Err(AnvilError::InvalidTagKind(value)),
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TagKind::End => "end",
            TagKind::Byte => "byte",
            TagKind::Short => "short",
            TagKind::Int => "int",
            TagKind::Long => "long",
            TagKind::Float => "float",
            TagKind::Double => "double",
            TagKind::ByteArray => "byte array",
            TagKind::String => "string",
            TagKind::List => "list",
            TagKind::Compound => "compound",
            TagKind::IntArray => "int array",
            TagKind::LongArray => "long array",
        };
        f.write_str(name)
    }
}

/// Tunables for decoding record payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum compound/list nesting depth, counting the root compound as 1.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
