//! School-group and named-link bonuses.
//!
//! Both are recomputed from the on-field roster after every change. Link
//! payouts depend on the player's per-link level selection ([`LinkLevels`]).

pub mod link;
pub mod school;
pub mod stat;

pub use link::{
    evaluate_links, sort_by_priority, Link, LinkBonusLine, LinkLevel, LinkLevels, LinkRequirement, LinkStatus,
    RawLink, RawLinkTable, RequirementKey, RosterKeys,
};
pub use school::{evaluate_schools, RawSchool, School, SchoolStatus, DEFAULT_SCHOOL_THRESHOLD};
pub use stat::{BonusDescriptor, ModifierType, StatKey, StatTotal, StatTotals};

use crate::catalog::CharacterVariant;
use serde::Serialize;

/// School and link tables, links kept in priority order
#[derive(Debug, Clone, Default)]
pub struct SynergyTables {
    pub schools: Vec<School>,
    pub links: Vec<Link>,
}

impl SynergyTables {
    pub fn new(schools: Vec<School>, mut links: Vec<Link>) -> Self {
        sort_by_priority(&mut links);
        Self { schools, links }
    }

    pub fn from_raw(schools: Vec<RawSchool>, links: Vec<RawLink>) -> Self {
        let schools = schools.into_iter().map(School::from).filter(|s| !s.id.is_empty()).collect();
        let links = links.into_iter().filter_map(Link::from_raw).collect();
        Self::new(schools, links)
    }

    pub fn link(&self, link_id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == link_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyReport {
    pub schools: Vec<SchoolStatus>,
    pub links: Vec<LinkStatus>,
    /// Totals over active links, keyed by (stat, modifier)
    pub link_totals: Vec<StatTotal>,
}

impl SynergyReport {
    pub fn active_links(&self) -> impl Iterator<Item = &LinkStatus> {
        self.links.iter().filter(|l| l.active)
    }
}

pub fn compute_synergies(
    on_field: &[&CharacterVariant],
    tables: &SynergyTables,
    selections: &LinkLevels,
    default_threshold: u32,
) -> SynergyReport {
    let schools = evaluate_schools(on_field, &tables.schools, default_threshold);
    let (links, totals) = evaluate_links(on_field, &tables.links, selections);
    SynergyReport { schools, links, link_totals: totals.into_vec() }
}
