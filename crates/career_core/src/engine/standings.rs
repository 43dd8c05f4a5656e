//! Simulated team result for the match the player just played.

use crate::config::tuning::StandingsConfig;
use crate::models::Team;
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    pub fn points(&self) -> u32 {
        match self {
            MatchResult::Win => 3,
            MatchResult::Draw => 1,
            MatchResult::Loss => 0,
        }
    }
}

/// One simulated team fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamResult {
    pub result: MatchResult,
    pub goals_for: u32,
    pub goals_against: u32,
}

/// Team win probability from the player's match rating.
pub fn win_chance(rating: f64) -> f64 {
    if rating >= 8.0 {
        0.7
    } else if rating >= 7.0 {
        0.5
    } else if rating >= 6.0 {
        0.4
    } else if rating < 5.0 {
        0.2
    } else {
        0.3
    }
}

/// Roll a result. `r < win` wins, `win <= r < win + draw_band` draws, the
/// rest lose; the bands are not renormalized.
pub fn simulate_team_result(
    player_goals: u32,
    rating: f64,
    cfg: &StandingsConfig,
    rng: &mut impl RandomSource,
) -> TeamResult {
    let win = win_chance(rating);
    let roll = rng.roll_unit();
    let mut goals_for = player_goals + cfg.goals_for_padding.sample(rng).max(0) as u32;
    let mut goals_against = cfg.goals_against.sample(rng).max(0) as u32;

    let result = if roll < win {
        goals_for = goals_for.max(goals_against + 1);
        MatchResult::Win
    } else if roll < win + cfg.draw_band {
        goals_against = goals_for;
        MatchResult::Draw
    } else {
        goals_against = goals_against.max(goals_for + 1);
        MatchResult::Loss
    };

    TeamResult { result, goals_for, goals_against }
}

/// Fold a result into the team's table aggregates.
pub fn apply_result(team: &mut Team, outcome: &TeamResult) {
    let standings = &mut team.standings;
    match outcome.result {
        MatchResult::Win => standings.wins += 1,
        MatchResult::Draw => standings.draws += 1,
        MatchResult::Loss => standings.losses += 1,
    }
    standings.points += outcome.result.points();
    standings.goals_for += outcome.goals_for;
    standings.goals_against += outcome.goals_against;
    standings.matches_played += 1;
}

/// Simulate and apply in one step.
pub fn update_standings(
    team: &mut Team,
    player_goals: u32,
    rating: f64,
    cfg: &StandingsConfig,
    rng: &mut impl RandomSource,
) -> TeamResult {
    let outcome = simulate_team_result(player_goals, rating, cfg, rng);
    apply_result(team, &outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Standings;
    use crate::random::seeded;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn team() -> Team {
        Team {
            id: "LEAGUE_3_1".into(),
            name: "Bristol United".into(),
            league: "LEAGUE_3".into(),
            rating: 58,
            facilities: 2,
            budget: 30.0,
            squad: BTreeSet::new(),
            standings: Standings::default(),
        }
    }

    #[test]
    fn test_win_chance_tiers() {
        assert_eq!(win_chance(8.0), 0.7);
        assert_eq!(win_chance(7.2), 0.5);
        assert_eq!(win_chance(6.0), 0.4);
        assert_eq!(win_chance(5.5), 0.3);
        assert_eq!(win_chance(4.9), 0.2);
    }

    #[test]
    fn test_result_scores_are_consistent() {
        let cfg = StandingsConfig::default();
        let mut rng = seeded(11);
        for rating in [3.0, 5.5, 6.5, 7.5, 9.0] {
            for goals in 0..=3 {
                let outcome = simulate_team_result(goals, rating, &cfg, &mut rng);
                match outcome.result {
                    MatchResult::Win => assert!(outcome.goals_for > outcome.goals_against),
                    MatchResult::Draw => assert_eq!(outcome.goals_for, outcome.goals_against),
                    MatchResult::Loss => assert!(outcome.goals_against > outcome.goals_for),
                }
                assert!(outcome.goals_for >= goals);
            }
        }
    }

    #[test]
    fn test_apply_result_accumulates() {
        let mut team = team();
        apply_result(&mut team, &TeamResult { result: MatchResult::Win, goals_for: 2, goals_against: 0 });
        apply_result(&mut team, &TeamResult { result: MatchResult::Draw, goals_for: 1, goals_against: 1 });
        apply_result(&mut team, &TeamResult { result: MatchResult::Loss, goals_for: 0, goals_against: 3 });

        let s = team.standings;
        assert_eq!((s.wins, s.draws, s.losses), (1, 1, 1));
        assert_eq!(s.points, 4);
        assert_eq!((s.goals_for, s.goals_against), (3, 4));
        assert_eq!(s.matches_played, 3);
    }

    proptest! {
        #[test]
        fn prop_points_identity_holds(seed in any::<u64>(), matches in 1usize..60) {
            let cfg = StandingsConfig::default();
            let mut rng = seeded(seed);
            let mut team = team();
            for i in 0..matches {
                let rating = 1.0 + (i % 10) as f64;
                update_standings(&mut team, (i % 3) as u32, rating, &cfg, &mut rng);
                prop_assert!(team.standings.points_consistent());
            }
            prop_assert_eq!(team.standings.matches_played as usize, matches);
        }
    }
}
