//! Typed read-only view over a decoded chunk record.
//!
//! A chunk root looks like:
//! ```text
//! {
//!   Level: {
//!     xPos: int, zPos: int,
//!     Sections: [ { Y: byte, Palette: [ {Name, Properties?} ], BlockStates: long[] } ]
//!   }
//! }
//! ```

use indexmap::IndexMap;
use log::trace;

use super::palette::{self, Grid};
use crate::anvil::types::error::{AnvilError, Result};
use crate::anvil::types::models::{REGION_WIDTH, SlotIndex, TagKind};
use crate::anvil::types::value::{Compound, List, Value};

/// One palette entry: a block name and its ordered state properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    pub name: String,
    pub properties: IndexMap<String, String>,
}

impl BlockState {
    /// Converts a palette compound (`Name` plus optional `Properties`).
    pub fn from_compound(compound: &Compound) -> Result<Self> {
        let name = get_str(compound, "Name")?.to_string();
        let properties = match compound.get("Properties") {
            None => IndexMap::new(),
            Some(value) => {
                let props = expect_compound(value, "Properties")?;
                props
                    .iter()
                    .map(|(key, value)| {
                        let text = value.as_str().ok_or_else(|| AnvilError::TypeMismatch {
                            field: format!("Properties.{}", key),
                            expected: TagKind::String,
                            found: value.kind(),
                        })?;
                        Ok((key.clone(), text.to_string()))
                    })
                    .collect::<Result<IndexMap<_, _>>>()?
            }
        };
        Ok(Self { name, properties })
    }

    pub fn is_air(&self) -> bool {
        self.name == "minecraft:air"
    }
}

/// Borrowed view of the `Level` compound of a chunk record.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    level: &'a Compound,
}

impl<'a> Chunk<'a> {
    /// Borrows the `Level` compound from a decoded record root.
    pub fn from_root(root: &'a Value) -> Result<Self> {
        let root = expect_compound(root, "root")?;
        let level = root
            .get("Level")
            .ok_or_else(|| AnvilError::MissingField("Level".to_string()))?;
        Ok(Self {
            level: expect_compound(level, "Level")?,
        })
    }

    pub fn level(&self) -> &'a Compound {
        self.level
    }

    /// Declared absolute chunk X coordinate.
    pub fn x_pos(&self) -> Result<i32> {
        get_int(self.level, "xPos")
    }

    /// Declared absolute chunk Z coordinate.
    pub fn z_pos(&self) -> Result<i32> {
        get_int(self.level, "zPos")
    }

    /// Checks that the declared position belongs in `slot` of its region.
    pub fn verify_slot(&self, slot: SlotIndex) -> Result<()> {
        let (declared_x, declared_z) = (self.x_pos()?, self.z_pos()?);
        let width = i32::from(REGION_WIDTH);
        if declared_x.rem_euclid(width) != i32::from(slot.x())
            || declared_z.rem_euclid(width) != i32::from(slot.z())
        {
            return Err(AnvilError::CoordinateMismatch {
                declared_x,
                declared_z,
                slot_x: slot.x(),
                slot_z: slot.z(),
            });
        }
        Ok(())
    }

    /// Sections that carry `Y`, `Palette` and `BlockStates`; others are skipped.
    pub fn sections(&self) -> Result<Vec<Section<'a>>> {
        let sections = match self.level.get("Sections") {
            Some(value) => expect_list(value, "Sections")?,
            None => return Err(AnvilError::MissingField("Sections".to_string())),
        };
        let mut result = Vec::new();
        for compound in sections.compounds() {
            if let Some(section) = Section::from_compound(compound)? {
                result.push(section);
            }
        }
        trace!("{} of {} sections carry block data", result.len(), sections.len());
        Ok(result)
    }

    /// The section at height `y`.
    ///
    /// If several sections carry the same `Y`, the last one wins.
    pub fn section(&self, y: i8) -> Result<Section<'a>> {
        self.sections()?
            .into_iter()
            .rev()
            .find(|section| section.y() == y)
            .ok_or(AnvilError::SectionNotFound(y))
    }
}

/// Borrowed view of one 16x16x16 section with block data.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    y: i8,
    palette: &'a List,
    block_states: &'a [i64],
}

impl<'a> Section<'a> {
    fn from_compound(compound: &'a Compound) -> Result<Option<Self>> {
        let (Some(y), Some(palette), Some(block_states)) = (
            compound.get("Y"),
            compound.get("Palette"),
            compound.get("BlockStates"),
        ) else {
            return Ok(None);
        };
        let y = y.as_byte().ok_or_else(|| AnvilError::TypeMismatch {
            field: "Y".to_string(),
            expected: TagKind::Byte,
            found: y.kind(),
        })?;
        let block_states = block_states
            .as_long_array()
            .ok_or_else(|| AnvilError::TypeMismatch {
                field: "BlockStates".to_string(),
                expected: TagKind::LongArray,
                found: block_states.kind(),
            })?;
        Ok(Some(Self {
            y,
            palette: expect_list(palette, "Palette")?,
            block_states,
        }))
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    /// The raw packed index words.
    pub fn block_states(&self) -> &'a [i64] {
        self.block_states
    }

    /// Number of palette entries, which fixes the index bit width.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Converts every palette compound into a [`BlockState`].
    pub fn palette(&self) -> Result<Vec<BlockState>> {
        self.palette
            .iter()
            .map(|entry| BlockState::from_compound(expect_compound(entry, "Palette entry")?))
            .collect()
    }

    /// Unpacks the block states against the untyped palette compounds.
    pub fn raw_blocks(&self) -> Result<Grid<'a, Value>> {
        palette::unpack(self.palette.as_slice(), self.block_states, None)
    }

    /// Unpacks the block states against an already converted palette.
    ///
    /// `palette` is normally the result of [`Section::palette`].
    pub fn blocks<'p>(&self, palette: &'p [BlockState]) -> Result<Grid<'p, BlockState>> {
        if palette.len() != self.palette.len() {
            return Err(AnvilError::InvalidFormat(format!(
                "Palette has {} entries but section {} declares {}",
                palette.len(),
                self.y,
                self.palette.len()
            )));
        }
        palette::unpack(palette, self.block_states, None)
    }
}

fn expect_compound<'a>(value: &'a Value, field: &str) -> Result<&'a Compound> {
    value.as_compound().ok_or_else(|| AnvilError::TypeMismatch {
        field: field.to_string(),
        expected: TagKind::Compound,
        found: value.kind(),
    })
}

fn expect_list<'a>(value: &'a Value, field: &str) -> Result<&'a List> {
    value.as_list().ok_or_else(|| AnvilError::TypeMismatch {
        field: field.to_string(),
        expected: TagKind::List,
        found: value.kind(),
    })
}

fn get_int(compound: &Compound, field: &str) -> Result<i32> {
    let value = compound
        .get(field)
        .ok_or_else(|| AnvilError::MissingField(field.to_string()))?;
    value.as_int().ok_or_else(|| AnvilError::TypeMismatch {
        field: field.to_string(),
        expected: TagKind::Int,
        found: value.kind(),
    })
}

fn get_str<'a>(compound: &'a Compound, field: &str) -> Result<&'a str> {
    let value = compound
        .get(field)
        .ok_or_else(|| AnvilError::MissingField(field.to_string()))?;
    value.as_str().ok_or_else(|| AnvilError::TypeMismatch {
        field: field.to_string(),
        expected: TagKind::String,
        found: value.kind(),
    })
}
