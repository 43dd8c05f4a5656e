use serde::{Deserialize, Serialize};

/// One division of the pyramid. Tier 1 is the lowest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub tier: u8,
    pub teams_per_league: u32,
    pub promotion_spots: u32,
    pub relegation_spots: u32,
}

/// All leagues, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeagueTable {
    pub leagues: Vec<League>,
}

impl LeagueTable {
    pub fn get(&self, id: &str) -> Option<&League> {
        self.leagues.iter().find(|league| league.id == id)
    }

    pub fn by_tier(&self, tier: u8) -> Option<&League> {
        self.leagues.iter().find(|league| league.tier == tier)
    }

    /// Where new careers start
    pub fn lowest(&self) -> Option<&League> {
        self.leagues.iter().min_by_key(|league| league.tier)
    }

    pub fn tier_of(&self, id: &str) -> Option<u8> {
        self.get(id).map(|league| league.tier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &League> {
        self.leagues.iter()
    }

    pub fn len(&self) -> usize {
        self.leagues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty()
    }
}
