// Formation layouts (7 slots, 4 rotations)

pub mod layout;

pub use layout::{
    is_libero_slot, layout, libero_slot, next_layout_index, rotate, slot_position, SlotConfig,
    FORMATION_LAYOUTS, LAYOUT_COUNT, LIBERO_GRID_INDEX, ROTATION_RING, SLOT_COUNT,
};
