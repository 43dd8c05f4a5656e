use chrono::{DateTime, Utc};

use crate::config::{ConfigError, GameConfig, StatRangeTable};
use crate::engine::progression::{enforce_potential_cap, refresh_overall};
use crate::engine::valuation::{round_money, update_market_value};
use crate::models::player::PLAYER_SCHEMA_VERSION;
use crate::models::{CareerStats, Contract, Player, Position, SeasonProgress, StatKind, Stats, Team};
use crate::random::RandomSource;

/// Stats drawn uniformly from the position's generation ranges.
pub fn generate_stats(
    position: Position,
    ranges: &StatRangeTable,
    rng: &mut impl RandomSource,
) -> Result<Stats, ConfigError> {
    let mut stats = Stats::new(1, 1, 1, 1, 1);
    for kind in StatKind::ALL {
        let range = ranges
            .get(position, kind)
            .ok_or_else(|| ConfigError::Invalid(format!("no {} range for {}", kind, position)))?;
        stats.set(kind, range.sample(rng).clamp(1, 99) as u8);
    }
    Ok(stats)
}

/// A fresh 18-year-old without a club.
pub fn new_player(
    user_id: &str,
    name: &str,
    position: Position,
    config: &GameConfig,
    rng: &mut impl RandomSource,
) -> Result<Player, ConfigError> {
    let tuning = &config.tuning;
    let profile = config.profile(position)?;
    let stats = generate_stats(position, &config.stat_ranges, rng)?;
    let potential = tuning.creation.potential.sample(rng).clamp(1, 99) as u8;

    let mut player = Player {
        schema_version: PLAYER_SCHEMA_VERSION,
        user_id: user_id.to_string(),
        name: name.to_string(),
        position,
        overall: 0,
        potential,
        stats,
        age: tuning.creation.starting_age,
        form: 0,
        stamina: tuning.stamina.max,
        market_value: 0.0,
        injury: None,
        current_team: None,
        contract: None,
        pending_offers: Vec::new(),
        matches_played: 0,
        goals: 0,
        assists: 0,
        season: SeasonProgress::default(),
        career_stats: CareerStats::default(),
    };
    enforce_potential_cap(&mut player);
    refresh_overall(&mut player, &profile.weights);
    update_market_value(&mut player, &tuning.value);
    Ok(player)
}

/// First contract at the starting club.
pub fn initial_contract(
    player: &Player,
    team_id: &str,
    now: DateTime<Utc>,
    config: &GameConfig,
    rng: &mut impl RandomSource,
) -> Contract {
    let creation = &config.tuning.creation;
    let length = creation.contract_years.sample(rng).clamp(1, u8::MAX as i32) as u8;
    let salary = round_money(
        (player.overall as f64 * creation.salary_per_overall + creation.salary_jitter.sample(rng))
            .max(creation.min_salary),
    );
    let release_clause =
        round_money(player.market_value * config.tuning.offer.release_clause_multiplier);
    Contract::new(team_id, salary, length, release_clause, now)
}

/// Put the player on `team` with a starting contract.
pub fn sign_with_starting_team(
    player: &mut Player,
    team: &mut Team,
    now: DateTime<Utc>,
    config: &GameConfig,
    rng: &mut impl RandomSource,
) -> Contract {
    let contract = initial_contract(player, &team.id, now, config, rng);
    player.current_team = Some(team.id.clone());
    player.contract = Some(contract.clone());
    team.squad.insert(player.user_id.clone());
    log::info!("{} signed with starting club {} ({})", player.user_id, team.id, team.name);
    contract
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::progression::compute_overall;
    use crate::engine::valuation::compute_market_value;
    use crate::models::Standings;
    use crate::random::seeded;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    #[test]
    fn test_new_player_within_ranges() {
        let config = GameConfig::builtin();
        let mut rng = seeded(10);

        for position in Position::ALL {
            let player = new_player("u", "Name", position, config, &mut rng).unwrap();
            assert_eq!(player.age, 18);
            assert_eq!(player.stamina, 100);
            assert_eq!(player.form, 0);
            assert!((65..=90).contains(&player.potential));
            for (kind, value) in player.stats.iter() {
                let range = config.stat_ranges.get(position, kind).unwrap();
                assert!(value as i32 >= range.min.min(player.potential as i32));
                assert!(value <= player.potential);
                assert!(value as i32 <= range.max);
            }
            let weights = config.profile(position).unwrap().weights;
            assert_eq!(player.overall, compute_overall(&weights, &player.stats));
            assert_eq!(
                player.market_value,
                compute_market_value(player.overall, player.potential, 18, 0, &config.tuning.value)
            );
            assert!(player.current_team.is_none());
        }
    }

    #[test]
    fn test_signing_sets_contract_and_squad() {
        let config = GameConfig::builtin();
        let mut rng = seeded(12);
        let mut player = new_player("u-1", "Name", Position::CM, config, &mut rng).unwrap();
        let mut team = Team {
            id: "LEAGUE_3_4".into(),
            name: "Derby Town".into(),
            league: "LEAGUE_3".into(),
            rating: 55,
            facilities: 2,
            budget: 30.0,
            squad: BTreeSet::new(),
            standings: Standings::default(),
        };
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();

        let contract = sign_with_starting_team(&mut player, &mut team, now, config, &mut rng);

        assert_eq!(player.current_team.as_deref(), Some("LEAGUE_3_4"));
        assert!(team.squad.contains("u-1"));
        assert!((2..=4).contains(&contract.length_years));
        assert!(contract.salary >= 0.1);
        assert_eq!(contract.release_clause, round_money(player.market_value * 2.0));
        assert_eq!(contract.starts_at, now);
    }
}
