use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use derive_more::{Display, Into};

use crate::MuscleContribution;

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        if (value * 10.0 % 1.0).abs() > f32::EPSILON {
            return Err(WeightError::InvalidResolution);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a multiple of 0.1 kg")]
    InvalidResolution,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// One logged set from an external source, already parsed by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct SetRecord {
    pub exercise_name: String,
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
    pub date: NaiveDate,
}

impl SetRecord {
    /// Raw weight×reps volume. Kept by callers for records that do not
    /// resolve to a catalog entry and therefore receive no attribution.
    /// Bodyweight sets without a weight count their reps.
    #[must_use]
    pub fn load(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        match (self.reps, self.weight) {
            (Some(reps), Some(weight)) => u32::from(reps) as f32 * f32::from(weight),
            (Some(reps), None) => u32::from(reps) as f32,
            _ => 0.0,
        }
    }
}

/// A set with its resolved muscle contributions, ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedSet {
    pub date: NaiveDate,
    pub contributions: Vec<MuscleContribution>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Largest number of days between two training days that still counts as
/// continuous training. Longer gaps split a period into separate spans for
/// the average-weekly-volume denominator.
#[derive(Debug, Clone, Copy, Display, Into, PartialEq, Eq)]
pub struct GapTolerance(u32);

impl GapTolerance {
    pub fn new(days: u32) -> Result<Self, GapToleranceError> {
        if days == 0 {
            return Err(GapToleranceError::Zero);
        }

        Ok(Self(days))
    }

    fn days(self) -> i64 {
        i64::from(self.0)
    }
}

impl Default for GapTolerance {
    fn default() -> Self {
        Self(7)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GapToleranceError {
    #[error("Gap tolerance must be at least one day")]
    Zero,
}

/// One bucket of the aggregated series, keyed by its first day and carrying
/// a human-readable label.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeEntry {
    pub date: NaiveDate,
    pub label: String,
    pub volumes: BTreeMap<String, f32>,
}

/// Buckets attributed sets into the requested period.
///
/// Daily entries are plain per-day sums. Weekly entries are trailing 7-day
/// rolling sums anchored at each day with activity, not calendar-week
/// buckets. Monthly and yearly entries carry the average weekly volume
/// within the period, with gaps longer than the tolerance excluded from the
/// week-count denominator.
#[must_use]
pub fn aggregate(
    sets: &[AttributedSet],
    period: Period,
    gap_tolerance: GapTolerance,
) -> Vec<VolumeEntry> {
    match period {
        Period::Daily => daily(sets),
        Period::Weekly => rolling_weekly(sets),
        Period::Monthly | Period::Yearly => periodic_average(sets, period, gap_tolerance),
    }
}

fn day_volumes(sets: &[AttributedSet]) -> BTreeMap<NaiveDate, BTreeMap<String, f32>> {
    let mut days: BTreeMap<NaiveDate, BTreeMap<String, f32>> = BTreeMap::new();

    for set in sets {
        let volumes = days.entry(set.date).or_default();
        for contribution in &set.contributions {
            *volumes.entry(contribution.muscle.clone()).or_default() +=
                f32::from(contribution.sets);
        }
    }

    days
}

fn daily(sets: &[AttributedSet]) -> Vec<VolumeEntry> {
    day_volumes(sets)
        .into_iter()
        .map(|(date, volumes)| VolumeEntry {
            date,
            label: date.format("%Y-%m-%d").to_string(),
            volumes,
        })
        .collect()
}

fn rolling_weekly(sets: &[AttributedSet]) -> Vec<VolumeEntry> {
    let days = day_volumes(sets);

    days.keys()
        .map(|&week_start| {
            let week_end = week_start + Duration::days(6);
            let mut volumes: BTreeMap<String, f32> = BTreeMap::new();
            for (_, day) in days.range(week_start..=week_end) {
                for (muscle, sets) in day {
                    *volumes.entry(muscle.clone()).or_default() += sets;
                }
            }
            VolumeEntry {
                date: week_start,
                label: format!("Week of {}", week_start.format("%Y-%m-%d")),
                volumes,
            }
        })
        .collect()
}

fn periodic_average(
    sets: &[AttributedSet],
    period: Period,
    gap_tolerance: GapTolerance,
) -> Vec<VolumeEntry> {
    let mut buckets: BTreeMap<NaiveDate, (BTreeMap<String, f32>, BTreeSet<NaiveDate>)> =
        BTreeMap::new();

    for (date, day) in day_volumes(sets) {
        let key = match period {
            Period::Monthly => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
            _ => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        }
        .unwrap_or(date);

        let (totals, days) = buckets.entry(key).or_default();
        for (muscle, volume) in day {
            *totals.entry(muscle).or_default() += volume;
        }
        days.insert(date);
    }

    buckets
        .into_iter()
        .map(|(date, (totals, days))| {
            #[allow(clippy::cast_precision_loss)]
            let weeks = active_weeks(&days, gap_tolerance) as f32;
            VolumeEntry {
                date,
                label: match period {
                    Period::Monthly => date.format("%Y-%m").to_string(),
                    _ => date.format("%Y").to_string(),
                },
                volumes: totals
                    .into_iter()
                    .map(|(muscle, volume)| (muscle, volume / weeks))
                    .collect(),
            }
        })
        .collect()
}

/// Number of training weeks covered by the given training days. Consecutive
/// days further apart than the tolerance start a new span; each span counts
/// one week per started 7-day stretch, so layoffs do not depress the average.
fn active_weeks(days: &BTreeSet<NaiveDate>, gap_tolerance: GapTolerance) -> u32 {
    let mut weeks = 0;
    let mut span_start: Option<NaiveDate> = None;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        match (span_start, previous) {
            (Some(start), Some(previous)) if (day - previous).num_days() > gap_tolerance.days() => {
                weeks += span_weeks(start, previous);
                span_start = Some(day);
            }
            (None, _) => span_start = Some(day),
            _ => {}
        }
        previous = Some(day);
    }

    if let (Some(start), Some(previous)) = (span_start, previous) {
        weeks += span_weeks(start, previous);
    }

    weeks.max(1)
}

fn span_weeks(first: NaiveDate, last: NaiveDate) -> u32 {
    let days = (last - first).num_days() + 1;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (days as u64).div_ceil(7) as u32
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::Sets;

    use super::*;

    #[rstest]
    #[case(0, Ok(Reps(0)))]
    #[case(999, Ok(Reps(999)))]
    #[case(1000, Err(RepsError::OutOfRange))]
    fn test_reps_new(#[case] input: u32, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::new(input), expected);
    }

    #[rstest]
    #[case("8", Ok(Reps(8)))]
    #[case("1000", Err(RepsError::OutOfRange))]
    #[case("4.", Err(RepsError::ParseError))]
    #[case("", Err(RepsError::ParseError))]
    fn test_reps_from_str(#[case] input: &str, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::try_from(input), expected);
    }

    #[rstest]
    #[case(0.0, Ok(Weight(0.0)))]
    #[case(999.9, Ok(Weight(999.9)))]
    #[case(1000.0, Err(WeightError::OutOfRange))]
    #[case(1.23, Err(WeightError::InvalidResolution))]
    fn test_weight_new(#[case] input: f32, #[case] expected: Result<Weight, WeightError>) {
        assert_eq!(Weight::new(input), expected);
    }

    #[rstest]
    #[case("2.0", Ok(Weight(2.0)))]
    #[case("8", Ok(Weight(8.0)))]
    #[case("1000", Err(WeightError::OutOfRange))]
    #[case("", Err(WeightError::ParseError))]
    fn test_weight_from_str(#[case] input: &str, #[case] expected: Result<Weight, WeightError>) {
        assert_eq!(Weight::try_from(input), expected);
    }

    #[rstest]
    #[case::weighted(Some(Reps(10)), Some(Weight(30.0)), 300.0)]
    #[case::bodyweight(Some(Reps(12)), None, 12.0)]
    #[case::no_reps(None, Some(Weight(30.0)), 0.0)]
    fn test_set_record_load(
        #[case] reps: Option<Reps>,
        #[case] weight: Option<Weight>,
        #[case] expected: f32,
    ) {
        let record = SetRecord {
            exercise_name: "Bench Press".to_string(),
            reps,
            weight,
            date: date(2024, 1, 1),
        };

        assert_approx_eq!(record.load(), expected);
    }

    #[test]
    fn test_gap_tolerance() {
        assert_eq!(GapTolerance::new(0), Err(GapToleranceError::Zero));
        assert_eq!(GapTolerance::new(10), Ok(GapTolerance(10)));
        assert_eq!(GapTolerance::default(), GapTolerance(7));
    }

    #[test]
    fn test_aggregate_daily() {
        let entries = aggregate(
            &[
                chest_set(date(2024, 1, 2)),
                chest_set(date(2024, 1, 1)),
                chest_set(date(2024, 1, 1)),
            ],
            Period::Daily,
            GapTolerance::default(),
        );

        assert_eq!(
            entries,
            vec![
                VolumeEntry {
                    date: date(2024, 1, 1),
                    label: "2024-01-01".to_string(),
                    volumes: BTreeMap::from([
                        ("Chest".to_string(), 2.0),
                        ("Arms".to_string(), 1.0),
                    ]),
                },
                VolumeEntry {
                    date: date(2024, 1, 2),
                    label: "2024-01-02".to_string(),
                    volumes: BTreeMap::from([
                        ("Chest".to_string(), 1.0),
                        ("Arms".to_string(), 0.5),
                    ]),
                },
            ]
        );
    }

    #[test]
    fn test_aggregate_rolling_weekly() {
        // Activity on days 1, 5 and 10: the windows anchored at days 1 and 5
        // overlap, the one at day 10 stands alone.
        let entries = aggregate(
            &[
                chest_set(date(2024, 1, 1)),
                chest_set(date(2024, 1, 5)),
                chest_set(date(2024, 1, 10)),
            ],
            Period::Weekly,
            GapTolerance::default(),
        );

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].date, date(2024, 1, 1));
        assert_eq!(entries[0].label, "Week of 2024-01-01");
        assert_approx_eq!(entries[0].volumes["Chest"], 2.0);
        assert_approx_eq!(entries[1].volumes["Chest"], 2.0);
        assert_approx_eq!(entries[2].volumes["Chest"], 1.0);
    }

    #[test]
    fn test_aggregate_monthly_continuous() {
        // Training on 14 consecutive days, exactly two active weeks.
        let sets = (1..=14)
            .map(|day| chest_set(date(2024, 3, day)))
            .collect::<Vec<_>>();

        let entries = aggregate(&sets, Period::Monthly, GapTolerance::default());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, date(2024, 3, 1));
        assert_eq!(entries[0].label, "2024-03");
        // 14 sets over exactly 2 active weeks.
        assert_approx_eq!(entries[0].volumes["Chest"], 7.0);
    }

    #[test]
    fn test_aggregate_monthly_break_exclusion() {
        // Training on day 1 and day 40 only: each month contains a single
        // one-day span, so each average is over one week, not the whole
        // calendar month.
        let entries = aggregate(
            &[chest_set(date(2024, 1, 1)), chest_set(date(2024, 2, 9))],
            Period::Monthly,
            GapTolerance::default(),
        );

        assert_eq!(entries.len(), 2);
        assert_approx_eq!(entries[0].volumes["Chest"], 1.0);
        assert_approx_eq!(entries[1].volumes["Chest"], 1.0);
    }

    #[test]
    fn test_aggregate_monthly_gap_within_month() {
        // Days 1 and 20 of the same month: the 19-day gap splits the month
        // into two one-day spans, so the denominator is two weeks.
        let entries = aggregate(
            &[
                chest_set(date(2024, 5, 1)),
                chest_set(date(2024, 5, 1)),
                chest_set(date(2024, 5, 20)),
                chest_set(date(2024, 5, 20)),
            ],
            Period::Monthly,
            GapTolerance::default(),
        );

        assert_eq!(entries.len(), 1);
        assert_approx_eq!(entries[0].volumes["Chest"], 2.0);
    }

    #[test]
    fn test_aggregate_yearly() {
        let entries = aggregate(
            &[
                chest_set(date(2023, 12, 31)),
                chest_set(date(2024, 1, 1)),
                chest_set(date(2024, 1, 4)),
            ],
            Period::Yearly,
            GapTolerance::default(),
        );

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, date(2023, 1, 1));
        assert_eq!(entries[0].label, "2023");
        assert_approx_eq!(entries[0].volumes["Chest"], 1.0);
        // Days 1 and 4 form one 4-day span, a single week.
        assert_approx_eq!(entries[1].volumes["Chest"], 2.0);
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(
            aggregate(&[], Period::Weekly, GapTolerance::default()),
            vec![]
        );
    }

    #[rstest]
    #[case::single_day(&[1], 1)]
    #[case::one_week(&[1, 3, 5, 7], 1)]
    #[case::two_weeks(&[1, 3, 8, 14], 2)]
    #[case::gap_splits_spans(&[1, 20], 2)]
    #[case::gap_at_tolerance(&[1, 8], 2)]
    fn test_active_weeks(#[case] days: &[u32], #[case] expected: u32) {
        let days = days
            .iter()
            .map(|&day| date(2024, 1, day))
            .collect::<BTreeSet<_>>();

        assert_eq!(active_weeks(&days, GapTolerance::default()), expected);
    }

    fn chest_set(date: NaiveDate) -> AttributedSet {
        AttributedSet {
            date,
            contributions: vec![
                MuscleContribution {
                    muscle: "Chest".to_string(),
                    sets: Sets::PRIMARY,
                },
                MuscleContribution {
                    muscle: "Arms".to_string(),
                    sets: Sets::SECONDARY,
                },
            ],
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }
}
