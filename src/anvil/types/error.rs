//! Custom error types for the anvil-reader crate.

use thiserror::Error;

use super::models::TagKind;

/// The primary error type for all operations in this crate.
///
/// An empty region slot is not an error: lookups report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum AnvilError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// Slot coordinates fall outside the 32x32 region grid.
    #[error("Slot coordinates out of range 0-31: x={x}, z={z}")]
    OutOfRange { x: i32, z: i32 },

    /// A directory entry or record points past the end of the archive.
    #[error("Archive truncated: need {needed} bytes at offset {offset}, archive is {archive_len} bytes")]
    TruncatedArchive {
        offset: u64,
        needed: u64,
        archive_len: u64,
    },

    /// The record uses a compression method other than zlib/deflate (2).
    #[error("Unsupported record compression method: {0}")]
    UnsupportedCompression(u8),

    /// An error occurred while inflating a record payload.
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    /// The tag stream does not start with an anonymous root compound.
    #[error("Tag stream does not begin with an unnamed compound tag")]
    InvalidRoot,

    /// A tag kind byte outside the twelve known kinds.
    #[error("Invalid tag kind: {0:#04x}")]
    InvalidTagKind(u8),

    /// A read ran past the end of the tag stream.
    #[error("Unexpected end of data: need {needed} bytes at offset {offset}")]
    UnexpectedEnd { offset: usize, needed: usize },

    /// Compound/list nesting exceeded the configured depth limit.
    #[error("Tag nesting exceeds the maximum depth of {0}")]
    NestingTooDeep(usize),

    /// A string payload is not valid UTF-8.
    #[error("Invalid UTF-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// An array or list declared a negative element count.
    #[error("Negative {context} length: {length}")]
    NegativeLength { context: &'static str, length: i32 },

    /// A compound contains the same name twice.
    #[error("Duplicate tag name in compound: {0:?}")]
    DuplicateName(String),

    /// A palette with no entries cannot address any cell.
    #[error("Palette is empty")]
    EmptyPalette,

    /// A packed index resolved past the end of the palette.
    #[error("Palette index {index} out of range for palette of {len} entries")]
    PaletteIndexOutOfRange { index: u64, len: usize },

    /// The packed index array holds fewer words than the grid requires.
    #[error("Packed index array too short: expected at least {expected} words, found {found}")]
    PackedArrayTooShort { expected: usize, found: usize },

    /// A bit width outside 1..=32.
    #[error("Invalid packed index bit width: {0}")]
    InvalidBitWidth(u32),

    /// Cell coordinates outside the 16x16x16 grid.
    #[error("Cell coordinates out of range 0-15: ({bx}, {by}, {bz})")]
    CellOutOfRange { bx: u32, by: u32, bz: u32 },

    /// A linear cell index past the end of a section.
    #[error("Cell offset {0} out of range 0-4095")]
    CellOffsetOutOfRange(usize),

    /// The file is structurally invalid.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A required field is absent from a decoded record.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A field is present but holds a different tag kind.
    #[error("Field {field} has kind {found}, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: TagKind,
        found: TagKind,
    },

    /// A record declares a position that does not match where it was stored.
    #[error("Record declares chunk ({declared_x}, {declared_z}) but was read from slot ({slot_x}, {slot_z})")]
    CoordinateMismatch {
        declared_x: i32,
        declared_z: i32,
        slot_x: u8,
        slot_z: u8,
    },

    /// No section with the requested Y carries a palette and block states.
    #[error("Section Y={0} not present in chunk")]
    SectionNotFound(i8),

    /// No record with the requested position is held by the world index.
    #[error("Chunk ({x}, {z}) is not loaded")]
    ChunkNotLoaded { x: i32, z: i32 },
}

/// A convenience `Result` type alias using the crate's `AnvilError` type.
pub type Result<T> = std::result::Result<T, AnvilError>;
