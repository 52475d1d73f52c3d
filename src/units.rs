//src/units.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::Set;

pub const KG_TO_LBS: f64 = 2.20462;
pub const LBS_TO_KG: f64 = 1.0 / KG_TO_LBS;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kg => write!(f, "kg"),
            Self::Lbs => write!(f, "lbs"),
        }
    }
}

/// Converts a weight between units. Identity when `from == to`.
/// No rounding is applied; display layers round for presentation.
#[must_use]
pub fn convert_weight(weight: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    if from == to {
        return weight;
    }
    match from {
        WeightUnit::Kg => weight * KG_TO_LBS,
        WeightUnit::Lbs => weight * LBS_TO_KG,
    }
}

/// Volume of a single set (reps x weight), expressed in `target_unit`.
#[must_use]
pub fn set_volume(reps: u32, weight: f64, set_unit: WeightUnit, target_unit: WeightUnit) -> f64 {
    convert_weight(weight, set_unit, target_unit) * f64::from(reps)
}

/// Sums set volumes, converting each set individually before adding.
/// Per-set conversion is the contract; summing first would change results
/// if rounding were ever introduced.
#[must_use]
pub fn total_volume_for_sets(sets: &[Set], target_unit: WeightUnit) -> f64 {
    sets.iter()
        .map(|s| set_volume(s.reps, s.weight, s.unit, target_unit))
        .sum()
}

/// Quick-add plate increments for the given unit. Fixed lookup, not derived.
#[must_use]
pub const fn quick_increments(unit: WeightUnit) -> [f64; 4] {
    match unit {
        WeightUnit::Kg => [2.5, 5.0, 10.0, 20.0],
        WeightUnit::Lbs => [5.0, 10.0, 25.0, 45.0],
    }
}

/// Single-step weight increment for the given unit.
#[must_use]
pub const fn weight_increment(unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Kg => 2.5,
        WeightUnit::Lbs => 5.0,
    }
}
