//! # anvil-reader
//!
//! A reader for Anvil region files (`r.X.Z.mca`).
//!
//! Decoding runs in three layers, each feeding the next:
//! 1. the region directory locates and inflates one record per chunk slot,
//! 2. the NBT decoder turns a record into a [`Value`] tree,
//! 3. the palette unpacker resolves a section's packed block-state indices.
//!
//! Writing or editing archives is not supported.
pub mod anvil;

// Re-export the main types for convenience
pub use anvil::{
    command::setblock_commands,
    format::{
        chunk::{BlockState, Chunk, Section},
        nbt,
        palette::{self, Grid},
        region,
    },
    reader::RegionReader,
    types::{
        error::{AnvilError, Result},
        models::{DecodeOptions, RecordLocation, SlotIndex, TagKind},
        value::{Compound, List, Value},
    },
    world::World,
};
