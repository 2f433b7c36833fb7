// Identity resolution: raw catalog entries -> canonical variants
use super::character::{CharacterVariant, Position, Rarity};
use crate::text::slugify;
use serde::{Deserialize, Serialize};

/// Tag field as found in catalog files: a list, or one comma-separated string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    List(Vec<String>),
    Csv(String),
}

impl RawTags {
    fn into_vec(self) -> Vec<String> {
        let items = match self {
            RawTags::List(list) => list,
            RawTags::Csv(s) => s.split(',').map(str::to_string).collect(),
        };
        items.into_iter().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect()
    }
}

/// One character entry as it appears in `characters.json`.
///
/// Field names follow both the English and the Spanish catalog revisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCharacterEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "baseId")]
    pub base_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default, rename = "nameEN")]
    pub name_en: Option<String>,
    #[serde(default, rename = "nameJP")]
    pub name_jp: Option<String>,
    #[serde(default, rename = "nombreEN")]
    pub nombre_en: Option<String>,
    #[serde(default, rename = "nombreJP")]
    pub nombre_jp: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub posicion: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub rareza: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub escuela: Option<String>,
    #[serde(default, rename = "schoolId")]
    pub school_id: Option<String>,
    #[serde(default, rename = "escuelaId")]
    pub escuela_id: Option<String>,
    #[serde(default)]
    pub tags: Option<RawTags>,
    #[serde(default, rename = "variantId")]
    pub variant_id: Option<String>,
    #[serde(default, rename = "varianteId")]
    pub variante_id: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, rename = "avatarPath")]
    pub avatar_path: Option<String>,
}

impl RawCharacterEntry {
    /// Parses records one at a time; a malformed record is logged and
    /// skipped instead of failing the whole table.
    pub fn from_values(values: Vec<serde_json::Value>) -> Vec<Self> {
        values
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping malformed catalog record #{}: {}", i, e);
                    None
                }
            })
            .collect()
    }
}

/// First candidate that is present and not blank
fn first_filled<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates.iter().filter_map(|c| c.as_deref()).map(str::trim).find(|s| !s.is_empty())
}

/// Variant id: explicit when non-blank, else `{base_id}__{rarity}`.
pub fn make_variant_id(base_id: &str, rarity: Rarity, explicit: Option<&str>) -> String {
    match explicit.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("{}__{}", base_id, rarity.code().to_lowercase()),
    }
}

/// School id with the `_high_school` / `_hs` suffixes removed
pub fn normalize_school_id(raw: &str) -> String {
    raw.replace("_high_school", "").replace("_hs", "")
}

/// Resolves one catalog entry.
///
/// Returns `None` when neither an id nor a name is available to derive the
/// base id from.
pub fn resolve_entry(entry: RawCharacterEntry) -> Option<CharacterVariant> {
    let name = first_filled(&[&entry.nombre, &entry.name]).map(str::to_string);

    let base_id = match first_filled(&[&entry.base_id, &entry.id]) {
        Some(id) => id.to_string(),
        None => slugify(name.as_deref().unwrap_or_default()),
    };
    if base_id.is_empty() {
        log::warn!("Skipping catalog entry without id or name");
        return None;
    }

    let position = [&entry.role, &entry.posicion]
        .iter()
        .filter_map(|r| r.as_deref())
        .find_map(Position::from_role)
        .unwrap_or(Position::WS);

    let rarity = match first_filled(&[&entry.rarity, &entry.rareza]) {
        Some(code) => Rarity::from_code(code).unwrap_or_else(|| {
            log::warn!("Unknown rarity '{}' for {}, using {}", code, base_id, Rarity::default());
            Rarity::default()
        }),
        None => Rarity::default(),
    };

    let variant_id =
        make_variant_id(&base_id, rarity, first_filled(&[&entry.variant_id, &entry.variante_id]));

    let school = match first_filled(&[&entry.school_id, &entry.escuela_id]) {
        Some(id) => id.to_string(),
        None => slugify(first_filled(&[&entry.school, &entry.escuela]).unwrap_or_default()),
    };

    let alias_names = [&entry.name_en, &entry.name_jp, &entry.nombre_jp, &entry.nombre_en]
        .iter()
        .filter_map(|n| n.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();

    let avatar_path = first_filled(&[&entry.avatar, &entry.avatar_path])
        .map(str::to_string)
        .unwrap_or_else(|| format!("assets/characters/{}.png", variant_id));

    Some(CharacterVariant {
        display_name: name.unwrap_or_else(|| base_id.clone()),
        base_id,
        variant_id,
        alias_names,
        school: normalize_school_id(&school),
        position,
        rarity,
        avatar_path,
        raw_tags: entry.tags.map(RawTags::into_vec).unwrap_or_default(),
        canonical_specialty_tags: Vec::new(),
    })
}
