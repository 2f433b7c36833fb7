// Character catalog: identity resolution, indexes and picker search

pub mod character;
pub mod index;
pub mod resolver;
pub mod search;

pub use character::{CharacterVariant, Position, Rarity};
pub use index::CatalogIndex;
pub use resolver::{make_variant_id, normalize_school_id, resolve_entry, RawCharacterEntry, RawTags};
pub use search::{CatalogQuery, PositionGroup};
