//! In-memory index of decoded chunk records across region files.
//!
//! Loading is batch tolerant: a record or file that fails to decode is
//! logged and skipped, and the rest of the world still loads. Records are
//! keyed by the absolute position they declare in `Level.xPos` / `Level.zPos`.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};
use rayon::prelude::*;

use super::format::chunk::{BlockState, Chunk, Section};
use super::format::nbt;
use super::reader::RegionReader;
use super::types::error::{AnvilError, Result};
use super::types::models::{DecodeOptions, SlotIndex};
use super::types::value::Value;

/// Decoded chunk records indexed by absolute chunk position.
#[derive(Debug, Default)]
pub struct World {
    options: DecodeOptions,
    chunks: HashMap<(i32, i32), Value>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty world whose loads decode with `options`.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            options,
            chunks: HashMap::new(),
        }
    }

    /// Loads every region file in `paths`, returning how many loaded.
    ///
    /// A file that cannot be read or whose directory is truncated is skipped
    /// with a warning; it does not count as loaded.
    pub fn load_files<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) -> usize {
        let mut loaded = 0;
        for path in paths {
            let path = path.as_ref();
            match self.load_file(path) {
                Ok(count) => {
                    info!("Loaded {} chunks from {}", count, path.display());
                    loaded += 1;
                }
                Err(e) => warn!("Skipping region file {}: {}", path.display(), e),
            }
        }
        loaded
    }

    /// Loads one region file, returning how many chunks were indexed.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let reader = RegionReader::open(path)?;
        self.load_region(&reader)
    }

    /// Decodes every present slot of `reader` and indexes the results.
    ///
    /// Records are decoded with this world's options, not the reader's.
    /// Slots are independent, so they are decoded in parallel. A slot whose
    /// record fails to decode, lacks a position, or declares a position that
    /// does not match its slot is skipped with a warning.
    pub fn load_region(&mut self, reader: &RegionReader) -> Result<usize> {
        let slots = reader.present_slots()?;
        let options = self.options;
        let decoded: Vec<(SlotIndex, Result<Option<Value>>)> = slots
            .par_iter()
            .map(|&slot| {
                let value = match reader.read_slot_record(slot) {
                    Ok(Some(bytes)) => nbt::decode_with(&bytes, &options).map(Some),
                    Ok(None) => Ok(None),
                    Err(e) => Err(e),
                };
                (slot, value)
            })
            .collect();

        let mut indexed = 0;
        for (slot, result) in decoded {
            let value = match result {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping chunk in slot {}: {}", slot, e);
                    continue;
                }
            };
            match declared_position(&value, slot) {
                Ok(position) => {
                    if self.chunks.insert(position, value).is_some() {
                        debug!("Chunk {:?} replaced by slot {}", position, slot);
                    }
                    indexed += 1;
                }
                Err(e) => warn!("Skipping chunk in slot {}: {}", slot, e),
            }
        }
        Ok(indexed)
    }

    /// The decoded record for absolute chunk `(x, z)`, if loaded.
    pub fn chunk(&self, x: i32, z: i32) -> Option<&Value> {
        self.chunks.get(&(x, z))
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Positions of all indexed chunks, sorted by (x, z).
    pub fn positions(&self) -> Vec<(i32, i32)> {
        let mut positions: Vec<_> = self.chunks.keys().copied().collect();
        positions.sort_unstable();
        positions
    }

    /// The section at height `y` of chunk `(x, z)`.
    pub fn section(&self, x: i32, y: i8, z: i32) -> Result<Section<'_>> {
        let value = self
            .chunk(x, z)
            .ok_or(AnvilError::ChunkNotLoaded { x, z })?;
        Chunk::from_root(value)?.section(y)
    }

    /// The block state of every cell of section `y` in chunk `(x, z)`.
    ///
    /// The result is in cell order: entry `i` is the cell whose
    /// [`cell_offset`](crate::anvil::format::palette::cell_offset) is `i`.
    pub fn blocks(&self, x: i32, y: i8, z: i32) -> Result<Vec<BlockState>> {
        let section = self.section(x, y, z)?;
        let palette = section.palette()?;
        let grid = section.blocks(&palette)?;
        Ok(grid.cells().iter().map(|&state| state.clone()).collect())
    }
}

/// Reads `Level.xPos` / `Level.zPos` and checks them against the slot.
fn declared_position(value: &Value, slot: SlotIndex) -> Result<(i32, i32)> {
    let chunk = Chunk::from_root(value)?;
    chunk.verify_slot(slot)?;
    Ok((chunk.x_pos()?, chunk.z_pos()?))
}
