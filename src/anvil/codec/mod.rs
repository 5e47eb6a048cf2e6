//! Codec layer for record payload transforms.
//!
//! # Submodules
//!
//! - [`compression`][]: Record decompression (zlib/deflate)

pub mod compression;
