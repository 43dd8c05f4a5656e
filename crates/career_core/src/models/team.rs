use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// League member. `squad` holds player ids only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    /// League id
    pub league: String,
    pub rating: u8,
    pub facilities: u8,
    pub budget: f64,
    pub squad: BTreeSet<String>,
    pub standings: Standings,
}

impl Team {
    pub fn goal_difference(&self) -> i64 {
        self.standings.goal_difference()
    }
}

/// League table aggregates. Non-decreasing within a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standings {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    pub matches_played: u32,
}

impl Standings {
    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }

    /// `points == 3 * wins + draws`
    pub fn points_consistent(&self) -> bool {
        self.points == self.wins * 3 + self.draws
    }
}
