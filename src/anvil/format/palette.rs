//! Packed palette index unpacking for 16x16x16 sections.
//!
//! A section stores one palette index per cell, each `b` bits wide, packed
//! back to back into 64-bit words least-significant bit first. An index may
//! straddle two adjacent words.
//!
//! ```text
//! word 0: |..idx2..|..idx1..|..idx0..|      bit 0 is the rightmost
//! word 1: ...|..idx3 high..|           idx3 low bits end word 0
//! ```
//!
//! Cells are ordered `y * 256 + z * 16 + x` (x varies fastest).

use log::trace;

use crate::anvil::types::error::{AnvilError, Result};

/// Cells along each axis of a section.
pub const SECTION_WIDTH: u32 = 16;

/// Cells in one section.
pub const CELLS_PER_SECTION: usize = 4096;

const WORD_BITS: u32 = 64;

/// Linear index of cell `(bx, by, bz)` within a section.
///
/// # Errors
/// `CellOutOfRange` if any coordinate is 16 or more.
pub fn cell_offset(bx: u32, by: u32, bz: u32) -> Result<u32> {
    if bx >= SECTION_WIDTH || by >= SECTION_WIDTH || bz >= SECTION_WIDTH {
        return Err(AnvilError::CellOutOfRange { bx, by, bz });
    }
    Ok(by * 256 + bz * 16 + bx)
}

/// Inverse of [`cell_offset`]: the `(bx, by, bz)` coordinates of a cell.
///
/// # Errors
/// `CellOffsetOutOfRange` if `offset` is 4096 or more.
pub fn cell_position(offset: usize) -> Result<(u32, u32, u32)> {
    if offset >= CELLS_PER_SECTION {
        return Err(AnvilError::CellOffsetOutOfRange(offset));
    }
    Ok(split_offset(offset as u32))
}

/// Splits an offset already known to be below 4096.
pub(crate) fn split_offset(offset: u32) -> (u32, u32, u32) {
    (offset % 16, offset / 256, (offset / 16) % 16)
}

/// Bits per index for a palette of `palette_len` entries.
///
/// This is the bit length of `palette_len` itself, `floor(log2(n)) + 1`,
/// which for exact powers of two is one more than the largest index needs.
/// Archives written this way must be read back the same way, so the formula
/// is kept as is and no minimum width is applied.
///
/// # Errors
/// `EmptyPalette` when `palette_len` is 0.
pub fn bit_width_for(palette_len: usize) -> Result<u32> {
    if palette_len == 0 {
        return Err(AnvilError::EmptyPalette);
    }
    Ok(usize::BITS - palette_len.leading_zeros())
}

/// Number of 64-bit words needed to hold 4096 indices of `bit_width` bits.
pub fn words_required(bit_width: u32) -> usize {
    (CELLS_PER_SECTION * bit_width as usize).div_ceil(WORD_BITS as usize)
}

/// Extracts the raw index stored for every cell.
///
/// Words are reinterpreted as unsigned, so negative stored longs unpack the
/// same as their bit patterns.
///
/// # Errors
/// - `InvalidBitWidth` unless `1 <= bit_width <= 32`
/// - `PackedArrayTooShort` if `words` cannot hold 4096 indices
pub fn unpack_indices(words: &[i64], bit_width: u32) -> Result<Vec<u32>> {
    if !(1..=32).contains(&bit_width) {
        return Err(AnvilError::InvalidBitWidth(bit_width));
    }
    let expected = words_required(bit_width);
    if words.len() < expected {
        return Err(AnvilError::PackedArrayTooShort {
            expected,
            found: words.len(),
        });
    }

    let mask: u64 = (1u64 << bit_width) - 1;
    let indices = (0..CELLS_PER_SECTION)
        .map(|cell| {
            let start_bit = cell as u64 * u64::from(bit_width);
            let word = (start_bit / u64::from(WORD_BITS)) as usize;
            let shift = (start_bit % u64::from(WORD_BITS)) as u32;

            let mut value = (words[word] as u64 >> shift) & mask;
            if shift + bit_width > WORD_BITS {
                let remaining = WORD_BITS - shift;
                let high_mask = (1u64 << (bit_width - remaining)) - 1;
                value += (words[word + 1] as u64 & high_mask) << remaining;
                value &= mask;
            }
            value as u32
        })
        .collect();
    Ok(indices)
}

/// A fully resolved section: one palette entry per cell.
///
/// Borrows the palette; unpacking allocates only the 4096 cell references.
#[derive(Debug, Clone)]
pub struct Grid<'p, D> {
    cells: Vec<&'p D>,
}

impl<'p, D> Grid<'p, D> {
    /// The entry at cell `(bx, by, bz)`.
    pub fn get(&self, bx: u32, by: u32, bz: u32) -> Result<&'p D> {
        let offset = cell_offset(bx, by, bz)?;
        Ok(self.cells[offset as usize])
    }

    /// Entries in cell order (y, then z, then x).
    pub fn cells(&self) -> &[&'p D] {
        &self.cells
    }

    /// Iterates `((bx, by, bz), entry)` in cell order.
    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32, u32), &'p D)> + '_ {
        (0u32..)
            .zip(&self.cells)
            .map(|(offset, entry)| (split_offset(offset), *entry))
    }
}

/// Resolves every cell of a section to its palette entry.
///
/// `bit_width` defaults to [`bit_width_for`] of the palette length.
///
/// # Errors
/// - `EmptyPalette` for an empty palette
/// - `PackedArrayTooShort` / `InvalidBitWidth` as for [`unpack_indices`]
/// - `PaletteIndexOutOfRange` if any cell's index is past the palette end
pub fn unpack<'p, D>(
    palette: &'p [D],
    packed_words: &[i64],
    bit_width: Option<u32>,
) -> Result<Grid<'p, D>> {
    let natural_width = bit_width_for(palette.len())?;
    let bit_width = bit_width.unwrap_or(natural_width);
    trace!(
        "Unpacking section: palette={} entries, {} bits per index, {} words",
        palette.len(),
        bit_width,
        packed_words.len()
    );

    let cells = unpack_indices(packed_words, bit_width)?
        .into_iter()
        .map(|index| {
            palette
                .get(index as usize)
                .ok_or(AnvilError::PaletteIndexOutOfRange {
                    index: u64::from(index),
                    len: palette.len(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Grid { cells })
}
