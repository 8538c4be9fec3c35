use derive_more::Display;
use log::debug;

use crate::{CatalogIndex, Equipment, Fingerprint};

/// Words naming the characteristic action of an exercise. Sharing one of
/// these between query and candidate boosts the fuzzy score.
static ACTION_WORDS: [&str; 15] = [
    "curl",
    "press",
    "row",
    "squat",
    "deadlift",
    "raise",
    "fly",
    "extension",
    "pulldown",
    "pushdown",
    "pullup",
    "chinup",
    "lunge",
    "crunch",
    "plank",
];

const EQUIPMENT_MATCH_CONFIDENCE: f32 = 0.95;
const EQUIPMENT_FALLBACK_CONFIDENCE: f32 = 0.85;
const FUZZY_THRESHOLD: f32 = 0.4;
const FUZZY_MAX_CONFIDENCE: f32 = 0.8;
const FUZZY_ACTION_BOOST: f32 = 1.2;

/// The tier of the waterfall that produced a match.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum MatchMethod {
    #[display("exact")]
    Exact,
    #[display("subset")]
    Subset,
    #[display("equipment agnostic")]
    EquipmentAgnostic,
    #[display("fuzzy")]
    Fuzzy,
    #[default]
    #[display("none")]
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub name: String,
    pub method: MatchMethod,
    pub confidence: f32,
}

impl MatchResult {
    /// The terminal "no match" result. Not an error: callers skip attribution
    /// for the record but keep it for raw-volume totals.
    #[must_use]
    pub fn none() -> Self {
        Self {
            name: String::new(),
            method: MatchMethod::None,
            confidence: 0.0,
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.method != MatchMethod::None
    }
}

/// Resolves a raw query name against a catalog index, trying the four tiers
/// in order and stopping at the first that yields a candidate.
#[must_use]
pub fn resolve(query: &str, index: &CatalogIndex) -> MatchResult {
    let query_fingerprint = Fingerprint::of(query);
    if query_fingerprint.is_empty() {
        return MatchResult::none();
    }

    if let Some(name) = index.exact.get(&query_fingerprint) {
        return MatchResult {
            name: name.clone(),
            method: MatchMethod::Exact,
            confidence: 1.0,
        };
    }

    if let Some(result) = subset_match(&query_fingerprint, index) {
        return result;
    }

    if let Some(result) = equipment_agnostic_match(query, index) {
        return result;
    }

    if let Some(result) = fuzzy_match(&query_fingerprint, index) {
        return result;
    }

    debug!("no match for {query:?}");
    MatchResult::none()
}

/// A catalog fingerprint whose token set contains the query's, or vice versa.
/// Scored by how close the token counts are; ties broken by shortest catalog
/// name, then lexicographic name order.
fn subset_match(query_fingerprint: &Fingerprint, index: &CatalogIndex) -> Option<MatchResult> {
    let query_tokens = query_fingerprint.token_set();
    let query_len = query_tokens.len();

    let mut best: Option<(f32, &String)> = None;

    for (fingerprint, name) in &index.exact {
        let tokens = fingerprint.token_set();
        if !(tokens.is_subset(&query_tokens) || query_tokens.is_subset(&tokens)) {
            continue;
        }

        #[allow(clippy::cast_precision_loss)]
        let score =
            1.0 - tokens.len().abs_diff(query_len) as f32 / tokens.len().max(query_len) as f32;

        let better = match best {
            None => true,
            Some((best_score, best_name)) => {
                score > best_score
                    || ((score - best_score).abs() < f32::EPSILON
                        && (name.len() < best_name.len()
                            || (name.len() == best_name.len() && name < best_name)))
            }
        };
        if better {
            best = Some((score, name));
        }
    }

    best.map(|(score, name)| MatchResult {
        name: name.clone(),
        method: MatchMethod::Subset,
        confidence: score,
    })
}

/// Same movement, different (or unspecified) equipment. A variant matching
/// the query's equipment exactly ranks above the equipment priority fallback.
fn equipment_agnostic_match(query: &str, index: &CatalogIndex) -> Option<MatchResult> {
    let agnostic = Fingerprint::equipment_agnostic(query);
    if agnostic.is_empty() {
        return None;
    }
    let variants = index.equipment_agnostic.get(&agnostic)?;

    if let Some(equipment) = Equipment::extract(query) {
        if let Some(name) = variants
            .iter()
            .find(|variant| Equipment::extract(variant) == Some(equipment))
        {
            return Some(MatchResult {
                name: name.clone(),
                method: MatchMethod::EquipmentAgnostic,
                confidence: EQUIPMENT_MATCH_CONFIDENCE,
            });
        }
    }

    let mut best = variants.first()?;
    for variant in variants.iter().skip(1) {
        if variant_priority(variant) > variant_priority(best) {
            best = variant;
        }
    }

    Some(MatchResult {
        name: best.clone(),
        method: MatchMethod::EquipmentAgnostic,
        confidence: EQUIPMENT_FALLBACK_CONFIDENCE,
    })
}

fn variant_priority(name: &str) -> u8 {
    Equipment::extract(name).map_or(0, Equipment::priority)
}

/// Word-overlap (Jaccard) scoring over token sets, boosted when query and
/// candidate share an action word. Only accepted above a fixed threshold.
fn fuzzy_match(query_fingerprint: &Fingerprint, index: &CatalogIndex) -> Option<MatchResult> {
    let query_tokens = query_fingerprint.token_set();

    let mut best: Option<(f32, &String)> = None;

    for (name, tokens) in &index.token_sets {
        let intersection = query_tokens
            .iter()
            .filter(|token| tokens.contains(**token))
            .count();
        if intersection == 0 {
            continue;
        }
        let union = query_tokens.len() + tokens.len() - intersection;

        #[allow(clippy::cast_precision_loss)]
        let mut score = intersection as f32 / union as f32;
        if ACTION_WORDS
            .iter()
            .any(|word| query_tokens.contains(word) && tokens.contains(*word))
        {
            score *= FUZZY_ACTION_BOOST;
        }

        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, name));
        }
    }

    best.filter(|(score, _)| *score > FUZZY_THRESHOLD)
        .map(|(score, name)| MatchResult {
            name: name.clone(),
            method: MatchMethod::Fuzzy,
            confidence: score.min(FUZZY_MAX_CONFIDENCE),
        })
}
