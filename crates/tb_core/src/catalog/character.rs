// Character variant records
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// On-court position code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    /// Opposite
    OP,
    /// Wing spiker
    WS,
    /// Middle blocker
    MB,
    /// Setter
    S,
    /// Libero
    L,
}

static ROLE_TABLE: Lazy<HashMap<&'static str, Position>> = Lazy::new(|| {
    HashMap::from([
        ("Opposite", Position::OP),
        ("Wing Spiker", Position::WS),
        ("Middle Blocker", Position::MB),
        ("Setter", Position::S),
        ("Libero", Position::L),
        ("OP", Position::OP),
        ("WS", Position::WS),
        ("MB", Position::MB),
        ("S", Position::S),
        ("L", Position::L),
    ])
});

impl Position {
    /// Display order used by roster listings.
    pub const ALL: [Position; 5] =
        [Position::OP, Position::WS, Position::MB, Position::S, Position::L];

    /// Maps a raw catalog role string to a position code.
    pub fn from_role(role: &str) -> Option<Position> {
        ROLE_TABLE.get(role.trim()).copied()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::OP => "OP",
            Position::WS => "WS",
            Position::MB => "MB",
            Position::S => "S",
            Position::L => "L",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::OP => "Opposite",
            Position::WS => "Wing Spiker",
            Position::MB => "Middle Blocker",
            Position::S => "Setter",
            Position::L => "Libero",
        }
    }

    pub fn is_libero(&self) -> bool {
        matches!(self, Position::L)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Release rarity, lowest to highest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    N,
    R,
    SR,
    #[default]
    SSR,
    UR,
    SP,
}

impl Rarity {
    pub const ALL: [Rarity; 6] =
        [Rarity::N, Rarity::R, Rarity::SR, Rarity::SSR, Rarity::UR, Rarity::SP];

    /// Parses a rarity code case-insensitively.
    pub fn from_code(code: &str) -> Option<Rarity> {
        let upper = code.trim().to_uppercase();
        Rarity::ALL.into_iter().find(|r| r.code() == upper)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Rarity::N => "N",
            Rarity::R => "R",
            Rarity::SR => "SR",
            Rarity::SSR => "SSR",
            Rarity::UR => "UR",
            Rarity::SP => "SP",
        }
    }

    /// Sort rank (SP highest).
    pub fn rank(&self) -> u8 {
        match self {
            Rarity::N => 1,
            Rarity::R => 2,
            Rarity::SR => 3,
            Rarity::SSR => 4,
            Rarity::UR => 5,
            Rarity::SP => 6,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A specific-rarity release of a base character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterVariant {
    /// Identity shared by every release of the character
    pub base_id: String,
    /// Identity of this release
    pub variant_id: String,
    pub display_name: String,
    /// Alternate names (English, Japanese) used by search
    #[serde(default)]
    pub alias_names: Vec<String>,
    /// Normalized school id
    pub school: String,
    pub position: Position,
    pub rarity: Rarity,
    #[serde(default)]
    pub avatar_path: String,
    /// Tag strings as they appear in the catalog
    #[serde(default)]
    pub raw_tags: Vec<String>,
    /// Canonical specialty tag keys, filled by the tag normalizer
    #[serde(default)]
    pub canonical_specialty_tags: Vec<String>,
}

impl CharacterVariant {
    pub fn is_libero(&self) -> bool {
        self.position.is_libero()
    }

    pub fn has_tag(&self, tag_key: &str) -> bool {
        self.canonical_specialty_tags.iter().any(|t| t == tag_key)
    }

    /// One-line summary for listings
    pub fn summary(&self) -> String {
        format!("{} [{}] ({})", self.display_name, self.position, self.rarity)
    }
}
