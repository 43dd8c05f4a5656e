use std::collections::BTreeSet;

use crate::config::{League, LeagueTable};
use crate::models::{Standings, Team};
use crate::random::RandomSource;

const CITIES: [&str; 20] = [
    "Manchester",
    "Liverpool",
    "London",
    "Birmingham",
    "Leeds",
    "Sheffield",
    "Bristol",
    "Newcastle",
    "Leicester",
    "Nottingham",
    "Derby",
    "Southampton",
    "Portsmouth",
    "Brighton",
    "Norwich",
    "Cardiff",
    "Swansea",
    "Reading",
    "Watford",
    "Burnley",
];

const SUFFIXES: [&str; 9] =
    ["United", "City", "FC", "Wanderers", "Athletic", "Rovers", "Town", "Albion", "Rangers"];

/// "City Suffix", both picked uniformly. Names may repeat across teams.
pub fn team_name(rng: &mut impl RandomSource) -> String {
    let city = rng.pick(&CITIES).copied().unwrap_or("Northfield");
    let suffix = rng.pick(&SUFFIXES).copied().unwrap_or("FC");
    format!("{} {}", city, suffix)
}

/// Rating in `[50 + (tier-1)*10, min(95, 70 + (tier-1)*10)]`.
pub fn team_rating(tier: u8, rng: &mut impl RandomSource) -> u8 {
    let step = (tier.max(1) as i32 - 1) * 10;
    let min = 50 + step;
    let max = (70 + step).min(95);
    rng.roll_int(min.min(max), max) as u8
}

pub fn facilities_for(rating: u8) -> u8 {
    match rating {
        85..=u8::MAX => 5,
        75..=84 => 4,
        65..=74 => 3,
        55..=64 => 2,
        _ => 1,
    }
}

/// Budget in millions, never below 5.
pub fn team_budget(rating: u8, tier: u8, rng: &mut impl RandomSource) -> f64 {
    let base = rating as f64 * 0.5 + tier as f64 * 5.0;
    (base + rng.roll_int(-10, 20) as f64).max(5.0)
}

/// Team number `n` (1-based) of `league`.
pub fn create_team(league: &League, n: u32, rng: &mut impl RandomSource) -> Team {
    let rating = team_rating(league.tier, rng);
    Team {
        id: format!("{}_{}", league.id, n),
        name: team_name(rng),
        league: league.id.clone(),
        rating,
        facilities: facilities_for(rating),
        budget: team_budget(rating, league.tier, rng),
        squad: BTreeSet::new(),
        standings: Standings::default(),
    }
}

/// Every team of every league.
pub fn generate_all_teams(leagues: &LeagueTable, rng: &mut impl RandomSource) -> Vec<Team> {
    let mut teams = Vec::new();
    for league in leagues.iter() {
        for n in 1..=league.teams_per_league {
            teams.push(create_team(league, n, rng));
        }
    }
    log::info!("Generated {} teams across {} leagues", teams.len(), leagues.len());
    teams
}

/// Random team from the bottom half (by rating) of the lowest league.
pub fn starting_team<'a>(
    teams: &'a [Team],
    leagues: &LeagueTable,
    rng: &mut impl RandomSource,
) -> Option<&'a Team> {
    let lowest = leagues.lowest()?;
    let mut candidates: Vec<&Team> = teams.iter().filter(|team| team.league == lowest.id).collect();
    candidates.sort_by(|a, b| a.rating.cmp(&b.rating).then_with(|| a.id.cmp(&b.id)));
    let bottom_half = (candidates.len() / 2).max(1).min(candidates.len());
    rng.pick(&candidates[..bottom_half]).copied()
}
