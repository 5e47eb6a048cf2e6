mod common;

use anvil_reader::AnvilError;
use anvil_reader::palette::{
    self, CELLS_PER_SECTION, bit_width_for, cell_offset, cell_position, unpack, unpack_indices,
    words_required,
};
use common::*;

#[test]
fn cell_offsets_are_y_major_then_z_then_x() {
    assert_eq!(cell_offset(0, 0, 0).unwrap(), 0);
    assert_eq!(cell_offset(1, 0, 0).unwrap(), 1);
    assert_eq!(cell_offset(0, 0, 1).unwrap(), 16);
    assert_eq!(cell_offset(0, 1, 0).unwrap(), 256);
    assert_eq!(cell_offset(15, 15, 15).unwrap(), 4095);
    assert_eq!(cell_offset(6, 0, 2).unwrap(), 38);
}

#[test]
fn cell_offsets_reject_out_of_range_coordinates() {
    for (bx, by, bz) in [(16, 0, 0), (0, 16, 0), (0, 0, 16), (100, 100, 100)] {
        let err = cell_offset(bx, by, bz).unwrap_err();
        assert!(matches!(err, AnvilError::CellOutOfRange { .. }), "{err:?}");
    }
}

#[test]
fn cell_position_inverts_cell_offset() {
    for offset in [0usize, 1, 15, 16, 255, 256, 1234, 4095] {
        let (bx, by, bz) = cell_position(offset).unwrap();
        assert_eq!(cell_offset(bx, by, bz).unwrap() as usize, offset);
    }
}

#[test]
fn cell_position_rejects_offsets_past_the_section() {
    for offset in [4096usize, 4097, 65536, usize::MAX] {
        let err = cell_position(offset).unwrap_err();
        assert!(
            matches!(err, AnvilError::CellOffsetOutOfRange(o) if o == offset),
            "{err:?}"
        );
    }
}

#[test]
fn bit_width_is_bit_length_of_palette_size() {
    let table = [
        (1, 1),
        (2, 2),
        (3, 2),
        (4, 3),
        (5, 3),
        (8, 4),
        (15, 4),
        (16, 5),
        (17, 5),
        (255, 8),
        (256, 9),
    ];
    for (len, width) in table {
        assert_eq!(bit_width_for(len).unwrap(), width, "palette of {len}");
    }
}

#[test]
fn empty_palette_is_rejected() {
    assert!(matches!(bit_width_for(0), Err(AnvilError::EmptyPalette)));
    let palette: [u8; 0] = [];
    let err = unpack(&palette, &[0; 64], None).unwrap_err();
    assert!(matches!(err, AnvilError::EmptyPalette), "{err:?}");
}

#[test]
fn words_required_rounds_up() {
    assert_eq!(words_required(1), 64);
    assert_eq!(words_required(4), 256);
    assert_eq!(words_required(5), 320);
    assert_eq!(words_required(7), 448);
    assert_eq!(words_required(13), 832);
}

#[test]
fn unpacking_inverts_the_reference_packer() {
    for (seed, n) in [1u32, 2, 3, 4, 5, 16, 17, 33, 300, 4096].into_iter().enumerate() {
        let bit_width = bit_width_for(n as usize).unwrap();
        let indices = pseudo_random_indices(n, seed as u64 + 11);
        let words = pack(&indices, bit_width);
        assert_eq!(words.len(), words_required(bit_width));
        assert_eq!(
            unpack_indices(&words, bit_width).unwrap(),
            indices,
            "palette of {n} at {bit_width} bits"
        );
    }
}

#[test]
fn unpack_resolves_every_cell_to_its_palette_entry() {
    let palette: Vec<String> = (0..17).map(|i| format!("block_{i}")).collect();
    let indices = pseudo_random_indices(17, 99);
    let words = pack(&indices, 5);

    let grid = unpack(&palette, &words, None).unwrap();
    assert_eq!(grid.cells().len(), CELLS_PER_SECTION);
    for (offset, &index) in indices.iter().enumerate() {
        let (bx, by, bz) = cell_position(offset).unwrap();
        assert_eq!(grid.get(bx, by, bz).unwrap(), &palette[index as usize]);
    }
    let ((bx, by, bz), first) = grid.iter().next().unwrap();
    assert_eq!((bx, by, bz), (0, 0, 0));
    assert_eq!(first, &palette[indices[0] as usize]);
}

#[test]
fn index_spanning_two_words() {
    // Palette of 20 gives 5-bit indices. Cell 38 starts at bit 190: two low
    // bits at the top of word 2, three high bits at the bottom of word 3.
    let palette: Vec<u32> = (0..20).collect();
    let mut words = vec![0i64; words_required(5)];
    words[2] = (0b11u64 << 62) as i64;
    words[3] = 0b100;

    let grid = unpack(&palette, &words, None).unwrap();
    assert_eq!(*grid.get(6, 0, 2).unwrap(), 19);
    assert_eq!(*grid.get(5, 0, 2).unwrap(), 0);
    assert_eq!(*grid.get(7, 0, 2).unwrap(), 0);
}

#[test]
fn negative_words_unpack_as_bit_patterns() {
    let words = vec![-1i64; words_required(4)];
    let indices = unpack_indices(&words, 4).unwrap();
    assert!(indices.iter().all(|&index| index == 15));
}

#[test]
fn short_packed_array_is_rejected() {
    let words = vec![0i64; 255];
    let err = unpack_indices(&words, 4).unwrap_err();
    assert!(
        matches!(err, AnvilError::PackedArrayTooShort { expected: 256, found: 255 }),
        "{err:?}"
    );

    let palette = ["a", "b", "c", "d", "e"];
    let err = unpack(&palette, &[], None).unwrap_err();
    assert!(
        matches!(err, AnvilError::PackedArrayTooShort { expected: 192, found: 0 }),
        "{err:?}"
    );
}

#[test]
fn extra_words_are_ignored() {
    let indices = pseudo_random_indices(3, 5);
    let mut words = pack(&indices, 2);
    words.extend([-1, -1, -1]);
    assert_eq!(unpack_indices(&words, 2).unwrap(), indices);
}

#[test]
fn index_past_palette_end_is_rejected() {
    let palette = ["minecraft:air", "minecraft:stone", "minecraft:dirt"];
    let mut indices = vec![0u32; CELLS_PER_SECTION];
    indices[700] = 3;
    let words = pack(&indices, 2);

    let err = unpack(&palette, &words, None).unwrap_err();
    assert!(
        matches!(err, AnvilError::PaletteIndexOutOfRange { index: 3, len: 3 }),
        "{err:?}"
    );
}

#[test]
fn explicit_bit_width_overrides_palette_size() {
    let palette = ["a", "b"];
    let mut indices = vec![0u32; CELLS_PER_SECTION];
    indices[4095] = 1;
    let words = pack(&indices, 8);

    let grid = unpack(&palette, &words, Some(8)).unwrap();
    assert_eq!(*grid.get(15, 15, 15).unwrap(), "b");
    assert_eq!(*grid.get(14, 15, 15).unwrap(), "a");
}

#[test]
fn unsupported_bit_widths_are_rejected() {
    let words = vec![0i64; 4096];
    for width in [0, 33, 64] {
        let err = palette::unpack_indices(&words, width).unwrap_err();
        assert!(matches!(err, AnvilError::InvalidBitWidth(w) if w == width), "{err:?}");
    }
}

#[test]
fn grid_lookup_rejects_out_of_range_cells() {
    let palette = [0u8];
    let grid = unpack(&palette, &vec![0; words_required(1)], None).unwrap();
    assert!(matches!(
        grid.get(0, 16, 0),
        Err(AnvilError::CellOutOfRange { bx: 0, by: 16, bz: 0 })
    ));
}
