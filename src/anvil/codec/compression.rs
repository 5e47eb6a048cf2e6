//! Decompression algorithms for region records.
//!
//! Each record names its compression method in a single byte:
//! - GZip (1): recognised, not supported
//! - Zlib (2): a deflate stream, optionally preceded by the 2-byte zlib header
//!
//! Any other method is rejected.

use std::io::Read;

use flate2::read::DeflateDecoder;
use log::trace;

use crate::anvil::types::error::{AnvilError, Result};
use crate::anvil::types::models::CompressionType;

/// Decompresses one record payload according to its method byte.
///
/// # Errors
/// `UnsupportedCompression` for any method other than zlib, and
/// `DecompressionError` when the deflate stream is corrupt.
pub fn decompress_record(compression_type: CompressionType, payload: &[u8]) -> Result<Vec<u8>> {
    match compression_type {
        CompressionType::Zlib => {
            let body = strip_zlib_header(payload);
            trace!(
                "Inflating record: {} bytes ({} header bytes skipped)",
                payload.len(),
                payload.len() - body.len()
            );
            let mut output = Vec::with_capacity(body.len() * 4);
            let mut decoder = DeflateDecoder::new(body);
            decoder.read_to_end(&mut output).map_err(|e| {
                AnvilError::DecompressionError(format!("Deflate decompression failed: {}", e))
            })?;
            Ok(output)
        }
        CompressionType::Gzip | CompressionType::Unknown(_) => {
            Err(AnvilError::UnsupportedCompression(compression_type.code()))
        }
    }
}

/// Skips the 2-byte zlib header when the payload starts with one.
///
/// A valid header has compression method 8 in the low nibble of the first
/// byte, a window size of at most 32K, no preset dictionary, and the two
/// bytes together are a multiple of 31. The adler32 trailer is left for the
/// deflate decoder to ignore.
fn strip_zlib_header(payload: &[u8]) -> &[u8] {
    match payload {
        [cmf, flg, rest @ ..]
            if cmf & 0x0F == 8
                && cmf >> 4 <= 7
                && flg & 0x20 == 0
                && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0 =>
        {
            rest
        }
        _ => payload,
    }
}
