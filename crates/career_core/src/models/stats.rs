use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Global stat ceiling
pub const MAX_STAT: u8 = 99;
/// Global stat floor
pub const MIN_STAT: u8 = 1;

/// The five rated attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Pace,
    Shooting,
    Passing,
    Defending,
    Physical,
}

impl StatKind {
    pub const ALL: [StatKind; 5] = [
        StatKind::Pace,
        StatKind::Shooting,
        StatKind::Passing,
        StatKind::Defending,
        StatKind::Physical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatKind::Pace => "pace",
            StatKind::Shooting => "shooting",
            StatKind::Passing => "passing",
            StatKind::Defending => "defending",
            StatKind::Physical => "physical",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown stat: {}", s))
    }
}

/// Player attribute block (each 1-99).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub pace: u8,
    pub shooting: u8,
    pub passing: u8,
    pub defending: u8,
    pub physical: u8,
}

impl Stats {
    pub fn new(pace: u8, shooting: u8, passing: u8, defending: u8, physical: u8) -> Self {
        Self { pace, shooting, passing, defending, physical }
    }

    pub fn get(&self, kind: StatKind) -> u8 {
        match kind {
            StatKind::Pace => self.pace,
            StatKind::Shooting => self.shooting,
            StatKind::Passing => self.passing,
            StatKind::Defending => self.defending,
            StatKind::Physical => self.physical,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: u8) {
        match kind {
            StatKind::Pace => self.pace = value,
            StatKind::Shooting => self.shooting = value,
            StatKind::Passing => self.passing = value,
            StatKind::Defending => self.defending = value,
            StatKind::Physical => self.physical = value,
        }
    }

    /// Raise a stat, saturating at [`MAX_STAT`]. Returns the new value.
    pub fn raise(&mut self, kind: StatKind, amount: u8) -> u8 {
        let value = self.get(kind).saturating_add(amount).min(MAX_STAT);
        self.set(kind, value);
        value
    }

    /// Lower a stat, saturating at [`MIN_STAT`]. Returns the new value.
    pub fn lower(&mut self, kind: StatKind, amount: u8) -> u8 {
        let value = self.get(kind).saturating_sub(amount).max(MIN_STAT);
        self.set(kind, value);
        value
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, u8)> + '_ {
        StatKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_and_lower_saturate() {
        let mut stats = Stats::new(98, 2, 50, 50, 50);
        assert_eq!(stats.raise(StatKind::Pace, 5), MAX_STAT);
        assert_eq!(stats.lower(StatKind::Shooting, 10), MIN_STAT);
        assert_eq!(stats.raise(StatKind::Passing, 1), 51);
    }

    #[test]
    fn test_stat_kind_parse() {
        assert_eq!("Physical".parse::<StatKind>(), Ok(StatKind::Physical));
        assert!("stamina".parse::<StatKind>().is_err());
    }

    #[test]
    fn test_iter_order_matches_all() {
        let stats = Stats::new(1, 2, 3, 4, 5);
        let values: Vec<u8> = stats.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }
}
