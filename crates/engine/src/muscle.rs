use std::{
    iter::Sum,
    ops::{Add, AddAssign},
    slice::Iter,
};

use derive_more::{Display, Into};

use crate::CatalogEntry;

/// Weighted set count attributed to a muscle: a full set for the primary
/// muscle, half a set for each secondary muscle.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Sets(f32);

impl Sets {
    pub const PRIMARY: Sets = Sets(1.0);
    pub const SECONDARY: Sets = Sets(0.5);
    pub const NONE: Sets = Sets(0.0);
}

impl Add for Sets {
    type Output = Sets;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Sets {
    fn add_assign(&mut self, rhs: Self) {
        *self = Self(self.0 + rhs.0);
    }
}

impl Sum for Sets {
    fn sum<I: Iterator<Item = Sets>>(iter: I) -> Self {
        iter.fold(Sets::NONE, Add::add)
    }
}

/// The six macro groups a "Full Body" exercise is distributed across and that
/// grouped-mode attribution maps fine-grained muscle names onto.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
}

impl MuscleGroup {
    pub fn iter() -> Iter<'static, MuscleGroup> {
        static GROUPS: [MuscleGroup; 6] = [
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Legs,
            MuscleGroup::Shoulders,
            MuscleGroup::Arms,
            MuscleGroup::Core,
        ];
        GROUPS.iter()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Core => "Core",
        }
    }

    /// Maps a fine-grained muscle name from the catalog to its macro group.
    #[must_use]
    pub fn of(muscle: &str) -> Option<MuscleGroup> {
        match muscle.trim().to_lowercase().as_str() {
            "chest" | "pecs" | "pectorals" | "upper chest" | "lower chest" => {
                Some(MuscleGroup::Chest)
            }
            "back" | "lats" | "traps" | "upper back" | "middle back" | "lower back"
            | "rhomboids" | "erector spinae" => Some(MuscleGroup::Back),
            "legs" | "quads" | "quadriceps" | "hamstrings" | "glutes" | "calves" | "adductors"
            | "abductors" | "hips" | "hip flexors" => Some(MuscleGroup::Legs),
            "shoulders" | "delts" | "deltoids" | "front delts" | "side delts" | "rear delts" => {
                Some(MuscleGroup::Shoulders)
            }
            "arms" | "biceps" | "triceps" | "forearms" | "brachialis" => Some(MuscleGroup::Arms),
            "core" | "abs" | "abdominals" | "obliques" => Some(MuscleGroup::Core),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MuscleContribution {
    pub muscle: String,
    pub sets: Sets,
}

/// Whether attribution reports the catalog's fine-grained muscle names or
/// their macro groups.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Granularity {
    Fine,
    #[default]
    Grouped,
}

/// Maps a resolved exercise to its weighted muscle contributions.
///
/// Cardio exercises and entries without a primary muscle contribute nothing.
/// "Full Body" exercises distribute a full set to each macro group. All
/// others contribute a full set to the primary muscle and half a set per
/// valid secondary muscle, so the total is `1.0 + 0.5 * k`.
#[must_use]
pub fn attribute(entry: &CatalogEntry, granularity: Granularity) -> Vec<MuscleContribution> {
    let primary = entry.primary_muscle.trim();
    if primary.is_empty() || is_cardio(primary) {
        return vec![];
    }

    if is_full_body(primary) {
        return MuscleGroup::iter()
            .map(|group| MuscleContribution {
                muscle: group.name().to_string(),
                sets: Sets::PRIMARY,
            })
            .collect();
    }

    let mut contributions = vec![MuscleContribution {
        muscle: output_name(primary, granularity),
        sets: Sets::PRIMARY,
    }];

    for muscle in &entry.secondary_muscles {
        let muscle = muscle.trim();
        if muscle.is_empty()
            || muscle.eq_ignore_ascii_case("none")
            || is_cardio(muscle)
            || is_full_body(muscle)
        {
            continue;
        }
        contributions.push(MuscleContribution {
            muscle: output_name(muscle, granularity),
            sets: Sets::SECONDARY,
        });
    }

    contributions
}

fn output_name(muscle: &str, granularity: Granularity) -> String {
    match granularity {
        Granularity::Fine => muscle.to_string(),
        Granularity::Grouped => MuscleGroup::of(muscle)
            .map_or_else(|| muscle.to_string(), |group| group.name().to_string()),
    }
}

fn is_cardio(muscle: &str) -> bool {
    muscle.to_lowercase().contains("cardio")
}

fn is_full_body(muscle: &str) -> bool {
    muscle.to_lowercase().contains("full body")
}
