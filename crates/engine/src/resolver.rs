use std::sync::Arc;

use log::{debug, warn};

use crate::{
    AttributedSet, CatalogEntry, CatalogIndex, GapTolerance, Granularity, MatchResult, Period,
    SetRecord, VolumeEntry, aggregate, attribute, matcher,
};

/// Resolves exercise names against a catalog, memoizing the built index.
///
/// The cache is a single slot keyed by catalog identity (`Arc::ptr_eq`), not
/// content: passing a different `Arc` rebuilds the index and discards the old
/// one. The `&mut self` receivers make the single-writer policy explicit; a
/// built [`CatalogIndex`] is immutable and may be shared freely.
#[derive(Default)]
pub struct Resolver {
    cache: Option<(Arc<[CatalogEntry]>, CatalogIndex)>,
}

impl Resolver {
    #[must_use]
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Resolves a raw exercise name to its best catalog match.
    pub fn resolve(&mut self, raw: &str, catalog: &Arc<[CatalogEntry]>) -> MatchResult {
        matcher::resolve(raw, self.index(catalog))
    }

    /// Resolves and attributes each record, then buckets the contributions
    /// into the requested period. Records that resolve to nothing, to a
    /// cardio exercise or to an entry without muscle data are skipped; the
    /// caller keeps them for raw-volume totals.
    pub fn attribute_and_aggregate(
        &mut self,
        records: &[SetRecord],
        catalog: &Arc<[CatalogEntry]>,
        period: Period,
        granularity: Granularity,
        gap_tolerance: GapTolerance,
    ) -> Vec<VolumeEntry> {
        let mut attributed = Vec::with_capacity(records.len());

        for record in records {
            let result = self.resolve(&record.exercise_name, catalog);
            if !result.is_match() {
                debug!("skipping unmatched exercise {:?}", record.exercise_name);
                continue;
            }

            let Some(entry) = catalog.iter().find(|entry| entry.name == result.name) else {
                warn!("match {:?} missing from catalog", result.name);
                continue;
            };

            let contributions = attribute(entry, granularity);
            if contributions.is_empty() {
                continue;
            }

            attributed.push(AttributedSet {
                date: record.date,
                contributions,
            });
        }

        aggregate(&attributed, period, gap_tolerance)
    }

    fn index(&mut self, catalog: &Arc<[CatalogEntry]>) -> &CatalogIndex {
        let cached = self
            .cache
            .as_ref()
            .is_some_and(|(cached, _)| Arc::ptr_eq(cached, catalog));
        if !cached {
            debug!("building catalog index for {} entries", catalog.len());
            self.cache = None;
        }

        let (_, index) = self.cache.get_or_insert_with(|| {
            (
                Arc::clone(catalog),
                CatalogIndex::build(catalog.iter().map(|entry| entry.name.as_str())),
            )
        });
        index
    }
}

/// One-shot resolution without a reusable cache.
#[must_use]
pub fn resolve_exercise_name(raw: &str, catalog: &Arc<[CatalogEntry]>) -> MatchResult {
    Resolver::new().resolve(raw, catalog)
}

/// One-shot attribution and aggregation without a reusable cache.
#[must_use]
pub fn attribute_and_aggregate(
    records: &[SetRecord],
    catalog: &Arc<[CatalogEntry]>,
    period: Period,
    granularity: Granularity,
    gap_tolerance: GapTolerance,
) -> Vec<VolumeEntry> {
    Resolver::new().attribute_and_aggregate(records, catalog, period, granularity, gap_tolerance)
}
