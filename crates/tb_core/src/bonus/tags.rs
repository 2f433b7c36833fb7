//! Specialty tag alias index.
//!
//! Catalog tags are free text ("Ataque Rápido", "quick attack", ...). The
//! index maps every folded alias to the canonical tag key so bonus counting
//! works on keys only.

use crate::text::fold;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the tag alias table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyTagDefinition {
    pub tag_key: String,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    #[serde(default, alias = "synonyms")]
    pub aliases: Vec<String>,
}

/// Folded alias -> canonical tag key
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    aliases: HashMap<String, String>,
    definitions: Vec<SpecialtyTagDefinition>,
}

impl TagIndex {
    pub fn new(definitions: Vec<SpecialtyTagDefinition>) -> Self {
        let mut aliases = HashMap::new();
        let mut kept = Vec::with_capacity(definitions.len());

        for mut def in definitions {
            let key = def.tag_key.trim().to_string();
            if key.is_empty() {
                continue;
            }
            def.tag_key = key.clone();

            let names = def
                .aliases
                .iter()
                .chain(def.display_name.iter())
                .chain(std::iter::once(&key));
            for name in names {
                let norm = fold(name);
                if !norm.is_empty() {
                    aliases.insert(norm, key.clone());
                }
            }
            kept.push(def);
        }

        log::debug!("Tag index built: {} aliases for {} tags", aliases.len(), kept.len());
        Self { aliases, definitions: kept }
    }

    /// Canonical key for one raw tag
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.aliases.get(&fold(raw)).map(String::as_str)
    }

    /// Maps raw tags to canonical keys, dropping unknown tags and duplicates.
    pub fn canonicalize(&self, raw_tags: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for raw in raw_tags {
            if let Some(key) = self.resolve(raw) {
                if !out.iter().any(|k| k == key) {
                    out.push(key.to_string());
                }
            }
        }
        out
    }

    pub fn definition(&self, tag_key: &str) -> Option<&SpecialtyTagDefinition> {
        self.definitions.iter().find(|d| d.tag_key == tag_key)
    }

    /// Display name for a tag key, falling back to the key itself
    pub fn display_name<'a>(&'a self, tag_key: &'a str) -> &'a str {
        self.definition(tag_key).and_then(|d| d.display_name.as_deref()).unwrap_or(tag_key)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
