use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::tuning::IntRange;
use crate::models::{Position, StatKind};

/// Per-position contribution of each stat to overall. Rows sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatWeights {
    pub pace: f64,
    pub shooting: f64,
    pub passing: f64,
    pub defending: f64,
    pub physical: f64,
}

impl StatWeights {
    pub fn weight(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Pace => self.pace,
            StatKind::Shooting => self.shooting,
            StatKind::Passing => self.passing,
            StatKind::Defending => self.defending,
            StatKind::Physical => self.physical,
        }
    }

    pub fn sum(&self) -> f64 {
        self.pace + self.shooting + self.passing + self.defending + self.physical
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionProfile {
    /// Display name ("Striker")
    pub name: String,
    pub weights: StatWeights,
    pub goal_modifier: f64,
    pub assist_modifier: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionTable(pub BTreeMap<Position, PositionProfile>);

impl PositionTable {
    pub fn get(&self, position: Position) -> Option<&PositionProfile> {
        self.0.get(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, &PositionProfile)> {
        self.0.iter()
    }
}

/// Generation range of each stat for a new player.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatRangeTable(pub BTreeMap<Position, BTreeMap<StatKind, IntRange>>);

impl StatRangeTable {
    pub fn get(&self, position: Position, kind: StatKind) -> Option<IntRange> {
        self.0.get(&position).and_then(|ranges| ranges.get(&kind)).copied()
    }

    pub fn has_position(&self, position: Position) -> bool {
        self.0.contains_key(&position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_weights_sum_to_one() {
        let table: PositionTable =
            serde_yaml::from_str(include_str!("../../../../data/positions.yaml")).unwrap();
        for position in Position::ALL {
            let profile = table.get(position).unwrap();
            assert!((profile.weights.sum() - 1.0).abs() < 1e-9, "{}", position);
        }
        assert_eq!(table.get(Position::ST).unwrap().name, "Striker");
    }

    #[test]
    fn test_stat_range_lookup() {
        let table: StatRangeTable =
            serde_yaml::from_str(include_str!("../../../../data/stat_ranges.yaml")).unwrap();
        let pace = table.get(Position::ST, StatKind::Pace).unwrap();
        assert_eq!((pace.min, pace.max), (60, 75));
        for position in Position::ALL {
            assert!(table.has_position(position));
        }
    }
}
