use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::offer::Offer;
use crate::models::position::Position;
use crate::models::stats::{StatKind, Stats};

/// Current schema version of persisted player records
pub const PLAYER_SCHEMA_VERSION: u32 = 1;

/// The player's persistent career state.
///
/// `overall` is derived from `stats` + `position` and must be recomputed
/// after every stat change (see [`crate::engine::progression::refresh_overall`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub schema_version: u32,

    // ========== Identity ==========
    pub user_id: String,
    pub name: String,
    pub position: Position,

    // ========== Ratings ==========
    pub overall: u8,
    pub potential: u8,
    pub stats: Stats,

    // ========== Dynamic state ==========
    pub age: u8,
    pub form: i32,
    pub stamina: u8,
    pub market_value: f64,
    pub injury: Option<Injury>,

    // ========== Affiliation ==========
    pub current_team: Option<String>,
    pub contract: Option<Contract>,
    pub pending_offers: Vec<Offer>,

    // ========== Career counters ==========
    pub matches_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub season: SeasonProgress,
    pub career_stats: CareerStats,
}

impl Player {
    /// Injured players with matches left to sit out
    pub fn is_injured(&self) -> bool {
        self.injury.as_ref().is_some_and(|injury| injury.matches_remaining > 0)
    }

    pub fn find_offer(&self, offer_id: &str) -> Option<&Offer> {
        self.pending_offers.iter().find(|offer| offer.id == offer_id)
    }

    pub fn has_offer_from(&self, team_id: &str) -> bool {
        self.pending_offers.iter().any(|offer| offer.team_id == team_id)
    }

    pub fn is_on_team(&self, team_id: &str) -> bool {
        self.current_team.as_deref() == Some(team_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjurySeverity {
    Minor,
    Moderate,
    Severe,
}

impl InjurySeverity {
    pub fn label(&self) -> &'static str {
        match self {
            InjurySeverity::Minor => "Minor",
            InjurySeverity::Moderate => "Moderate",
            InjurySeverity::Severe => "Severe",
        }
    }
}

impl fmt::Display for InjurySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Active injury. The stat decrease has already been applied to `stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Injury {
    pub severity: InjurySeverity,
    pub matches_remaining: u8,
    pub stat: StatKind,
    pub stat_decrease: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub team_id: String,
    pub salary: f64,
    #[serde(rename = "length")]
    pub length_years: u8,
    #[serde(rename = "startDate")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "expiryDate")]
    pub expires_at: DateTime<Utc>,
    pub release_clause: f64,
}

impl Contract {
    /// Contract running `length_years` from `starts_at`.
    pub fn new(
        team_id: &str,
        salary: f64,
        length_years: u8,
        release_clause: f64,
        starts_at: DateTime<Utc>,
    ) -> Self {
        Self {
            team_id: team_id.to_string(),
            salary,
            length_years,
            starts_at,
            expires_at: add_years(starts_at, length_years),
            release_clause,
        }
    }
}

/// Calendar years (Feb 29 clamps to Feb 28).
pub fn add_years(at: DateTime<Utc>, years: u8) -> DateTime<Utc> {
    at.checked_add_months(Months::new(12 * years as u32))
        .unwrap_or_else(|| at + Duration::days(365 * years as i64))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonProgress {
    pub number: u32,
    pub matches_played: u32,
}

impl Default for SeasonProgress {
    fn default() -> Self {
        Self { number: 1, matches_played: 0 }
    }
}

/// 경력 통계. `trophies` is reserved; no rule awards trophies yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerStats {
    pub big_game_performances: u32,
    pub trophies: Vec<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Striker with the reference stat line used across tests (overall 60).
    pub fn striker() -> Player {
        Player {
            schema_version: PLAYER_SCHEMA_VERSION,
            user_id: "user-1".to_string(),
            name: "Test Striker".to_string(),
            position: Position::ST,
            overall: 60,
            potential: 80,
            stats: Stats::new(70, 65, 50, 25, 55),
            age: 18,
            form: 0,
            stamina: 100,
            market_value: 5.0,
            injury: None,
            current_team: None,
            contract: None,
            pending_offers: Vec::new(),
            matches_played: 0,
            goals: 0,
            assists: 0,
            season: SeasonProgress::default(),
            career_stats: CareerStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::striker;
    use super::*;

    #[test]
    fn test_injury_flag_requires_remaining_matches() {
        let mut player = striker();
        assert!(!player.is_injured());

        player.injury = Some(Injury {
            severity: InjurySeverity::Minor,
            matches_remaining: 0,
            stat: StatKind::Pace,
            stat_decrease: 1,
        });
        assert!(!player.is_injured());

        if let Some(injury) = player.injury.as_mut() {
            injury.matches_remaining = 2;
        }
        assert!(player.is_injured());
    }

    #[test]
    fn test_contract_runs_whole_years() {
        use chrono::TimeZone;
        let start = Utc.with_ymd_and_hms(2024, 8, 1, 9, 0, 0).unwrap();
        let contract = Contract::new("LEAGUE_3_7", 3.1, 3, 28.0, start);
        assert_eq!(contract.expires_at, Utc.with_ymd_and_hms(2027, 8, 1, 9, 0, 0).unwrap());

        let json = serde_json::to_value(&contract).unwrap();
        assert_eq!(json["length"], 3);
        assert!(json.get("startDate").is_some());
        assert!(json.get("releaseClause").is_some());
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(striker()).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("pendingOffers").is_some());
        assert_eq!(value["season"]["matchesPlayed"], 0);
        assert_eq!(value["careerStats"]["bigGamePerformances"], 0);
    }
}
