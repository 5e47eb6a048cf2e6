//! Rendering decoded sections as `setblock` commands.

use super::format::chunk::BlockState;
use super::format::palette::{CELLS_PER_SECTION, split_offset};

/// Formats the block argument: `name` or `name[key=value,...]`.
pub fn block_argument(state: &BlockState) -> String {
    if state.properties.is_empty() {
        return state.name.clone();
    }
    let properties: Vec<String> = state
        .properties
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    format!("{}[{}]", state.name, properties.join(","))
}

/// Renders one relative `setblock` line per cell, in cell order.
///
/// `cells` must be in cell order (y, then z, then x). Cells with an empty
/// block name are omitted, as are air cells when `skip_air` is set.
pub fn setblock_commands<'a>(
    cells: impl IntoIterator<Item = &'a BlockState>,
    skip_air: bool,
) -> Vec<String> {
    (0u32..)
        .zip(cells.into_iter().take(CELLS_PER_SECTION))
        .filter(|(_, state)| !state.name.is_empty() && !(skip_air && state.is_air()))
        .map(|(offset, state)| {
            let (bx, by, bz) = split_offset(offset);
            format!("setblock ~{} ~{} ~{} {}", bx, by, bz, block_argument(state))
        })
        .collect()
}
