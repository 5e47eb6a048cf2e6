//! File format parsing layer for region archives.
//!
//! This module provides the decoding layers that sit between raw archive
//! bytes and the high-level [`RegionReader`](crate::anvil::reader::RegionReader).
//!
//! # Module Organization
//!
//! - [`region`]: Locates and decompresses records through the sector directory
//! - [`nbt`]: Decodes a record's tagged-value stream into a [`Value`](crate::Value) tree
//! - [`palette`]: Unpacks bit-packed palette indices for a 16x16x16 section
//! - [`chunk`]: Typed view over the `Level` / `Sections` fields of a record
//!
//! # Architecture
//!
//! ```text
//! Archive bytes
//! ┌─────────────────┐
//! │  Directory      │ ← region::locate()
//! ├─────────────────┤
//! │  Timestamps     │ ← region::timestamp()
//! ├─────────────────┤
//! │  Records        │ ← region::decode()      → raw tag stream
//! │  (zlib)         │ ← nbt::decode()         → Value tree
//! │                 │ ← palette::unpack()     → 4096 palette entries
//! └─────────────────┘
//! ```

pub mod chunk;
pub mod nbt;
pub mod palette;
pub mod region;
