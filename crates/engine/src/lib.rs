#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod catalog;
mod fingerprint;
mod matcher;
mod muscle;
mod name;
mod resolver;
mod volume;

pub use catalog::{CatalogEntry, CatalogIndex};
pub use fingerprint::{Equipment, Fingerprint};
pub use matcher::{MatchMethod, MatchResult, resolve};
pub use muscle::{Granularity, MuscleContribution, MuscleGroup, Sets, attribute};
pub use name::normalize;
pub use resolver::{Resolver, attribute_and_aggregate, resolve_exercise_name};
pub use volume::{
    AttributedSet, GapTolerance, GapToleranceError, Period, Reps, RepsError, SetRecord,
    VolumeEntry, Weight, WeightError, aggregate,
};
