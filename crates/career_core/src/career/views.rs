//! Read models returned by the career service.

use crate::config::League;
use crate::engine::progression::AgeUp;
use crate::engine::MatchReport;
use crate::models::{Offer, Player, SeasonProgress, Team};

/// Player state after an action, plus what the action did.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult<T> {
    pub player: Player,
    pub report: T,
}

/// Result of `play_match`.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDay {
    /// Still injured; only the counter moved
    Sidelined { matches_remaining: u8 },
    Played(Box<MatchSummary>),
}

impl MatchDay {
    pub fn summary(&self) -> Option<&MatchSummary> {
        match self {
            MatchDay::Played(summary) => Some(summary.as_ref()),
            MatchDay::Sidelined { .. } => None,
        }
    }
}

/// Match report plus the post-match progression steps.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub report: MatchReport,
    pub age_up: Option<AgeUp>,
    pub form_decay: i32,
    pub new_offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCard {
    pub player: Player,
    pub team: Option<Team>,
    pub league: Option<League>,
}

/// Teams of one league, strongest first.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueTeams {
    pub league: League,
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableZone {
    Promotion,
    Relegation,
    Safe,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow {
    /// 1-based
    pub position: usize,
    pub team: Team,
    pub zone: TableZone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueStandings {
    pub league: League,
    /// The viewing player's team
    pub team_id: String,
    pub season: SeasonProgress,
    pub season_length: u32,
    pub rows: Vec<StandingRow>,
}

impl LeagueStandings {
    pub fn row_of(&self, team_id: &str) -> Option<&StandingRow> {
        self.rows.iter().find(|row| row.team.id == team_id)
    }
}

pub fn table_zone(position: usize, team_count: usize, league: &League) -> TableZone {
    let promotion = league.promotion_spots as usize;
    let relegation = league.relegation_spots as usize;
    if promotion > 0 && position <= promotion {
        TableZone::Promotion
    } else if relegation > 0 && position + relegation > team_count {
        TableZone::Relegation
    } else {
        TableZone::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_table_zones() {
        let leagues = &GameConfig::builtin().leagues;
        let league_3 = leagues.get("LEAGUE_3").unwrap();
        let top = leagues.get("PREMIER_LEAGUE").unwrap();

        assert_eq!(table_zone(1, 20, league_3), TableZone::Promotion);
        assert_eq!(table_zone(3, 20, league_3), TableZone::Promotion);
        assert_eq!(table_zone(4, 20, league_3), TableZone::Safe);
        assert_eq!(table_zone(20, 20, league_3), TableZone::Relegation);

        assert_eq!(table_zone(1, 20, top), TableZone::Safe);
        assert_eq!(table_zone(18, 20, top), TableZone::Relegation);
        assert_eq!(table_zone(17, 20, top), TableZone::Safe);
    }
}
