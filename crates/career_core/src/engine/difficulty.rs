//! Match difficulty, opponent strength and high-pressure classification.

use std::cmp::Ordering;

use crate::config::tuning::{DifficultyConfig, SeasonConfig};
use crate::config::League;
use crate::models::{Player, Team};

/// Career stage by age. Later stages face tougher opposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareerStage {
    Early,
    Mid,
    Late,
}

pub fn career_stage(age: u8, cfg: &DifficultyConfig) -> CareerStage {
    if age < cfg.mid_stage_age {
        CareerStage::Early
    } else if age < cfg.late_stage_age {
        CareerStage::Mid
    } else {
        CareerStage::Late
    }
}

/// Difficulty modifier (>= 0). `tier` is the player's league tier, `None`
/// for a free agent.
pub fn compute_difficulty(player: &Player, tier: Option<u8>, cfg: &DifficultyConfig) -> f64 {
    let mut difficulty = cfg.base + player.overall as f64 * cfg.overall_multiplier;

    if let Some(tier) = tier {
        difficulty += tier as f64 * cfg.tier_multiplier;
    }

    difficulty += match career_stage(player.age, cfg) {
        CareerStage::Early => 0.0,
        CareerStage::Mid => cfg.career_stage_multiplier,
        CareerStage::Late => cfg.career_stage_multiplier * cfg.late_stage_factor,
    };

    difficulty.max(0.0)
}

pub fn opponent_rating(overall: u8, difficulty: f64) -> u8 {
    (overall as f64 + difficulty).round().clamp(50.0, 99.0) as u8
}

/// League table order: points, goal difference, goals for (all
/// descending), then team id.
pub fn table_order(a: &Team, b: &Team) -> Ordering {
    b.standings
        .points
        .cmp(&a.standings.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.standings.goals_for.cmp(&a.standings.goals_for))
        .then_with(|| a.id.cmp(&b.id))
}

/// Teams sorted into table order.
pub fn sorted_table(teams: &[Team]) -> Vec<&Team> {
    let mut table: Vec<&Team> = teams.iter().collect();
    table.sort_by(|a, b| table_order(a, b));
    table
}

/// 1-based table position of `team_id`, `None` if it is not in `teams`.
pub fn table_position(team_id: &str, teams: &[Team]) -> Option<usize> {
    sorted_table(teams).iter().position(|team| team.id == team_id).map(|idx| idx + 1)
}

/// High pressure when the season is in its final stretch, or the team sits
/// within `zone_margin` places of a promotion or relegation cutoff.
pub fn is_high_pressure(
    player: &Player,
    team: &Team,
    league: &League,
    league_teams: &[Team],
    season: &SeasonConfig,
) -> bool {
    if player.season.matches_played >= season.length.saturating_sub(season.final_stretch) {
        return true;
    }

    let Some(position) = table_position(&team.id, league_teams) else {
        return false;
    };
    let team_count = league_teams.len();
    let promotion = league.promotion_spots as usize;
    let relegation = league.relegation_spots as usize;

    if promotion > 0 && position <= promotion + season.zone_margin {
        return true;
    }
    if relegation > 0 && position + relegation + season.zone_margin > team_count {
        return true;
    }
    false
}
