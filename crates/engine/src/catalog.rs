use std::collections::{BTreeMap, BTreeSet};

use crate::{Equipment, Fingerprint};

/// One entry of the external exercise catalog. The engine only reads these;
/// loading them from the asset file is the host's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub equipment: Option<Equipment>,
    pub primary_muscle: String,
    pub secondary_muscles: Vec<String>,
}

impl CatalogEntry {
    /// Builds an entry from the catalog's source form, where secondary muscles
    /// are comma-joined and may carry a "None" sentinel. The sentinel is kept
    /// as-is; it is filtered out at attribution time.
    #[must_use]
    pub fn new(name: &str, primary_muscle: &str, secondary_muscles: &str) -> Self {
        Self {
            name: name.to_string(),
            equipment: Equipment::extract(name),
            primary_muscle: primary_muscle.to_string(),
            secondary_muscles: secondary_muscles
                .split(',')
                .map(str::trim)
                .filter(|muscle| !muscle.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Read-only lookup structure derived from a catalog snapshot. Immutable
/// after construction; rebuilding is the caller's job when the catalog
/// reference changes (see [`crate::Resolver`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogIndex {
    /// Exact fingerprint to canonical name. First writer wins on duplicate
    /// fingerprints, in catalog order.
    pub(crate) exact: BTreeMap<Fingerprint, String>,
    /// Equipment-agnostic fingerprint to all variant names sharing it, in
    /// catalog order.
    pub(crate) equipment_agnostic: BTreeMap<Fingerprint, Vec<String>>,
    /// Token set per catalog name, for fuzzy scoring.
    pub(crate) token_sets: Vec<(String, BTreeSet<String>)>,
}

impl CatalogIndex {
    #[must_use]
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut exact = BTreeMap::new();
        let mut equipment_agnostic: BTreeMap<Fingerprint, Vec<String>> = BTreeMap::new();
        let mut token_sets = Vec::new();

        for name in names {
            let fingerprint = Fingerprint::of(name);
            if fingerprint.is_empty() {
                continue;
            }

            exact
                .entry(fingerprint.clone())
                .or_insert_with(|| name.to_string());

            let agnostic = Fingerprint::equipment_agnostic(name);
            if !agnostic.is_empty() {
                equipment_agnostic
                    .entry(agnostic)
                    .or_default()
                    .push(name.to_string());
            }

            token_sets.push((
                name.to_string(),
                fingerprint
                    .token_set()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ));
        }

        Self {
            exact,
            equipment_agnostic,
            token_sets,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.token_sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.token_sets.is_empty()
    }
}
