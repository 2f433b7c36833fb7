//! Formation layouts and rotation.
//!
//! Each layout maps the 7 logical slots of a team to grid cells and the
//! position painted on that cell. Grid cell 6 is always the libero cell; the
//! other six cells form the rotation ring `0 → 1 → 2 → 5 → 4 → 3 → 0`.

use crate::catalog::Position;
use serde::Serialize;

pub const SLOT_COUNT: usize = 7;
pub const LAYOUT_COUNT: usize = 4;
pub const LIBERO_GRID_INDEX: usize = 6;

/// Grid cells visited by one rotation step, in order
pub const ROTATION_RING: [usize; 6] = [0, 1, 2, 5, 4, 3];

/// One logical slot of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotConfig {
    pub grid_index: usize,
    pub position: Position,
}

const fn slot(grid_index: usize, position: Position) -> SlotConfig {
    SlotConfig { grid_index, position }
}

use Position::{L, MB, OP, S, WS};

/// Layouts already rotated so the painted positions follow the real rotation
pub const FORMATION_LAYOUTS: [[SlotConfig; SLOT_COUNT]; LAYOUT_COUNT] = [
    [slot(0, OP), slot(1, MB), slot(2, WS), slot(3, WS), slot(4, MB), slot(5, S), slot(6, L)],
    [slot(0, WS), slot(1, OP), slot(2, MB), slot(3, MB), slot(4, S), slot(5, WS), slot(6, L)],
    [slot(0, MB), slot(1, WS), slot(2, OP), slot(3, S), slot(4, WS), slot(5, MB), slot(6, L)],
    [slot(0, S), slot(1, MB), slot(2, WS), slot(3, WS), slot(4, MB), slot(5, OP), slot(6, L)],
];

/// Layout for `layout_index`, wrapping out-of-range indexes.
pub fn layout(layout_index: usize) -> &'static [SlotConfig; SLOT_COUNT] {
    &FORMATION_LAYOUTS[layout_index % LAYOUT_COUNT]
}

/// Position painted on a logical slot
pub fn slot_position(layout_index: usize, slot_index: usize) -> Option<Position> {
    layout(layout_index).get(slot_index).map(|s| s.position)
}

/// Logical slot holding the libero cell
pub fn libero_slot(layout_index: usize) -> usize {
    layout(layout_index)
        .iter()
        .position(|s| s.grid_index == LIBERO_GRID_INDEX)
        .unwrap_or(SLOT_COUNT - 1)
}

pub fn is_libero_slot(layout_index: usize, slot_index: usize) -> bool {
    libero_slot(layout_index) == slot_index
}

pub fn next_layout_index(layout_index: usize) -> usize {
    (layout_index + 1) % LAYOUT_COUNT
}

/// Rotates slot contents one step.
///
/// Occupants move one cell along [`ROTATION_RING`]; the libero cell keeps its
/// occupant. The result is laid out in the next layout's logical slot order
/// and returned with the next layout index.
pub fn rotate<T: Clone>(
    layout_index: usize,
    slots: &[Option<T>; SLOT_COUNT],
) -> (usize, [Option<T>; SLOT_COUNT]) {
    let prev = layout(layout_index);
    let next_index = next_layout_index(layout_index);
    let next = layout(next_index);

    let mut grid: [Option<T>; SLOT_COUNT] = Default::default();
    for (logical, conf) in prev.iter().enumerate() {
        grid[conf.grid_index] = slots[logical].clone();
    }

    let mut rotated = grid.clone();
    let n = ROTATION_RING.len();
    for i in 0..n {
        let dst = ROTATION_RING[i];
        let src = ROTATION_RING[(i + n - 1) % n];
        rotated[dst] = grid[src].clone();
    }

    let mut out: [Option<T>; SLOT_COUNT] = Default::default();
    for (logical, conf) in next.iter().enumerate() {
        out[logical] = rotated[conf.grid_index].take();
    }
    (next_index, out)
}
