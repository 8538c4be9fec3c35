use std::{collections::BTreeSet, slice::Iter};

use derive_more::{AsRef, Display};

use crate::name::normalize;

/// Order-invariant, synonym-normalized signature of an exercise name: the
/// normalized tokens, sorted alphabetically and rejoined with single spaces.
///
/// Two names with the same word multiset after synonym canonicalization
/// produce the same fingerprint, independent of word order.
#[derive(AsRef, Debug, Display, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[must_use]
    pub fn of(raw: &str) -> Self {
        let normalized = normalize(raw);
        let mut tokens = normalized.split_whitespace().collect::<Vec<_>>();
        tokens.sort_unstable();
        Self(tokens.join(" "))
    }

    /// Like [`Fingerprint::of`], but with equipment words removed, so that
    /// equipment variants of the same movement collapse onto one signature.
    #[must_use]
    pub fn equipment_agnostic(raw: &str) -> Self {
        let normalized = normalize(raw);
        let mut tokens = normalized
            .split_whitespace()
            .filter(|token| Equipment::from_token(token).is_none())
            .collect::<Vec<_>>();
        tokens.sort_unstable();
        Self(tokens.join(" "))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        self.token_set().len()
    }

    pub(crate) fn token_set(&self) -> BTreeSet<&str> {
        self.0.split_whitespace().collect()
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Equipment {
    Barbell,
    Bodyweight,
    Cable,
    Dumbbell,
    EzBar,
    Kettlebell,
    Machine,
    ResistanceBand,
    SmithMachine,
    TrapBar,
}

impl Equipment {
    pub fn iter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 10] = [
            Equipment::Barbell,
            Equipment::Bodyweight,
            Equipment::Cable,
            Equipment::Dumbbell,
            Equipment::EzBar,
            Equipment::Kettlebell,
            Equipment::Machine,
            Equipment::ResistanceBand,
            Equipment::SmithMachine,
            Equipment::TrapBar,
        ];
        EQUIPMENT.iter()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Equipment::Barbell => "Barbell",
            Equipment::Bodyweight => "Bodyweight",
            Equipment::Cable => "Cable",
            Equipment::Dumbbell => "Dumbbell",
            Equipment::EzBar => "EZ Bar",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::Machine => "Machine",
            Equipment::ResistanceBand => "Resistance Band",
            Equipment::SmithMachine => "Smith Machine",
            Equipment::TrapBar => "Trap Bar",
        }
    }

    /// Preference order used by the equipment-agnostic matching tier when the
    /// query does not name equipment. Variants without equipment rank below
    /// all of these.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            Equipment::Dumbbell => 4,
            Equipment::Barbell => 3,
            Equipment::Machine | Equipment::Cable => 2,
            _ => 1,
        }
    }

    /// First equipment word in the name, normalized to its canonical tag.
    /// Parenthetical suffixes survive normalization as ordinary tokens.
    #[must_use]
    pub fn extract(raw: &str) -> Option<Equipment> {
        normalize(raw)
            .split_whitespace()
            .find_map(Equipment::from_token)
    }

    pub(crate) fn from_token(token: &str) -> Option<Equipment> {
        match token {
            "barbell" => Some(Equipment::Barbell),
            "bodyweight" => Some(Equipment::Bodyweight),
            "cable" => Some(Equipment::Cable),
            "dumbbell" => Some(Equipment::Dumbbell),
            "ezbar" => Some(Equipment::EzBar),
            "kettlebell" => Some(Equipment::Kettlebell),
            "machine" => Some(Equipment::Machine),
            "band" => Some(Equipment::ResistanceBand),
            "smith" => Some(Equipment::SmithMachine),
            "trapbar" => Some(Equipment::TrapBar),
            _ => None,
        }
    }
}
