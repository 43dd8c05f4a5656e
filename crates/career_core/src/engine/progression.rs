//! Progression rules: overall, potential cap, aging, form decay.
//!
//! Every function here either reads a snapshot or mutates exactly the
//! player passed in; nothing touches storage.

use crate::config::tuning::{AgingConfig, FormConfig};
use crate::config::StatWeights;
use crate::models::{Player, StatKind, Stats, MAX_STAT, MIN_STAT};

/// Weighted sum of the five stats, rounded to nearest and kept in 1..=99.
pub fn compute_overall(weights: &StatWeights, stats: &Stats) -> u8 {
    let total: f64 = stats.iter().map(|(kind, value)| value as f64 * weights.weight(kind)).sum();
    (total.round() as i64).clamp(MIN_STAT as i64, MAX_STAT as i64) as u8
}

/// Recompute `player.overall` from its stats. Call after every stat change.
pub fn refresh_overall(player: &mut Player, weights: &StatWeights) {
    player.overall = compute_overall(weights, &player.stats);
}

/// Clamp every stat to `[MIN_STAT, min(potential, MAX_STAT)]`.
pub fn enforce_potential_cap(player: &mut Player) {
    let cap = player.potential.clamp(MIN_STAT, MAX_STAT);
    for kind in StatKind::ALL {
        let value = player.stats.get(kind).clamp(MIN_STAT, cap);
        player.stats.set(kind, value);
    }
}

/// Convert a fractional form delta to whole points (half away from zero).
pub fn round_form_delta(delta: f64) -> i32 {
    delta.round() as i32
}

/// Birthday that `maybe_age_up` applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeUp {
    pub new_age: u8,
    /// Physical points actually lost (0 before the decline age)
    pub physical_decrease: u8,
}

/// Age the player by one year every `matches_per_age_increase` career
/// matches; from `start_age` on, each birthday costs physical.
pub fn maybe_age_up(player: &mut Player, weights: &StatWeights, aging: &AgingConfig) -> Option<AgeUp> {
    if player.matches_played == 0 || player.matches_played % aging.matches_per_age_increase != 0 {
        return None;
    }

    player.age = player.age.saturating_add(1);

    let mut physical_decrease = 0;
    if player.age >= aging.start_age {
        let mut amount = aging.physical_decrease_per_year;
        if aging.scale_by_years_over {
            let years = player.age - aging.start_age;
            amount = amount.saturating_mul(years);
        }
        let before = player.stats.physical;
        let after = player.stats.lower(StatKind::Physical, amount);
        physical_decrease = before - after;
        refresh_overall(player, weights);
    }

    log::info!("{} turned {} (physical -{})", player.user_id, player.age, physical_decrease);
    Some(AgeUp { new_age: player.age, physical_decrease })
}

/// Multiplier applied to training gains.
pub fn training_effectiveness(age: u8) -> f64 {
    match age {
        0..=24 => 1.0,
        25..=29 => 0.9,
        30..=34 => 0.7,
        _ => 0.5,
    }
}

/// Multiplier applied to training stamina cost.
pub fn stamina_cost_modifier(age: u8) -> f64 {
    match age {
        0..=24 => 1.0,
        25..=29 => 1.1,
        30..=34 => 1.2,
        _ => 1.4,
    }
}

/// Per-match form decay for a player whose team plays in `tier`.
/// Returns the points removed.
pub fn apply_form_decay(player: &mut Player, tier: u8, form: &FormConfig) -> i32 {
    let rate = form.decay_rate_base + tier as f64 * form.decay_rate_tier_multiplier;
    let before = player.form;
    player.form = (player.form - round_form_delta(rate)).max(form.min);
    before - player.form
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::models::player::fixtures::striker;
    use crate::models::Position;
    use proptest::prelude::*;

    fn st_weights() -> StatWeights {
        GameConfig::builtin().profile(Position::ST).unwrap().weights
    }

    #[test]
    fn test_reference_striker_overall() {
        let stats = Stats::new(70, 65, 50, 25, 55);
        assert_eq!(compute_overall(&st_weights(), &stats), 60);
    }

    #[test]
    fn test_potential_cap() {
        let mut player = striker();
        player.potential = 68;
        player.stats.pace = 75;
        enforce_potential_cap(&mut player);
        assert_eq!(player.stats.pace, 68);
        assert_eq!(player.stats.shooting, 65);
    }

    #[test]
    fn test_age_up_only_on_multiples() {
        let aging = AgingConfig::default();
        let mut player = striker();

        player.matches_played = 37;
        assert!(maybe_age_up(&mut player, &st_weights(), &aging).is_none());

        player.matches_played = 38;
        let age_up = maybe_age_up(&mut player, &st_weights(), &aging).unwrap();
        assert_eq!(age_up, AgeUp { new_age: 19, physical_decrease: 0 });
        assert_eq!(player.stats.physical, 55);
    }

    #[test]
    fn test_flat_physical_decline_after_thirty() {
        let aging = AgingConfig::default();
        let mut player = striker();
        player.age = 32;
        player.matches_played = 76;

        let age_up = maybe_age_up(&mut player, &st_weights(), &aging).unwrap();
        // 33 is three years past the decline age; the loss stays flat
        assert_eq!(age_up.physical_decrease, 2);
        assert_eq!(player.stats.physical, 53);
        assert_eq!(player.overall, compute_overall(&st_weights(), &player.stats));
    }

    #[test]
    fn test_scaled_physical_decline_when_enabled() {
        let aging = AgingConfig { scale_by_years_over: true, ..AgingConfig::default() };
        let mut player = striker();
        player.age = 32;
        player.matches_played = 38;

        let age_up = maybe_age_up(&mut player, &st_weights(), &aging).unwrap();
        // three years past 30
        assert_eq!(age_up.physical_decrease, 6);
        assert_eq!(player.stats.physical, 49);
    }

    #[test]
    fn test_scaled_decline_spares_the_first_birthday() {
        let aging = AgingConfig { scale_by_years_over: true, ..AgingConfig::default() };
        let mut player = striker();
        player.age = 29;
        player.matches_played = 38;

        let age_up = maybe_age_up(&mut player, &st_weights(), &aging).unwrap();
        assert_eq!(age_up.new_age, 30);
        assert_eq!(age_up.physical_decrease, 0);
        assert_eq!(player.stats.physical, striker().stats.physical);
    }

    #[test]
    fn test_age_curves() {
        assert_eq!(training_effectiveness(18), 1.0);
        assert_eq!(training_effectiveness(29), 0.9);
        assert_eq!(training_effectiveness(34), 0.7);
        assert_eq!(training_effectiveness(35), 0.5);
        assert_eq!(stamina_cost_modifier(24), 1.0);
        assert_eq!(stamina_cost_modifier(25), 1.1);
        assert_eq!(stamina_cost_modifier(30), 1.2);
        assert_eq!(stamina_cost_modifier(40), 1.4);
    }

    #[test]
    fn test_form_decay_by_tier() {
        let form = FormConfig::default();
        let mut player = striker();

        player.form = 5;
        assert_eq!(apply_form_decay(&mut player, 1, &form), 1);
        assert_eq!(player.form, 4);

        // 0.5 + 4 * 0.25 = 1.5 rounds to 2
        assert_eq!(apply_form_decay(&mut player, 4, &form), 2);
        assert_eq!(player.form, 2);

        player.form = -10;
        assert_eq!(apply_form_decay(&mut player, 4, &form), 0);
        assert_eq!(player.form, -10);
    }

    #[test]
    fn test_round_form_delta_half_away_from_zero() {
        assert_eq!(round_form_delta(1.5), 2);
        assert_eq!(round_form_delta(-1.5), -2);
        assert_eq!(round_form_delta(0.4), 0);
    }

    proptest! {
        #[test]
        fn prop_overall_is_pure_and_marginal(
            pace in 1u8..=99, shooting in 1u8..=99, passing in 1u8..=99,
            defending in 1u8..=99, physical in 1u8..=99, bump in 1u8..=10,
        ) {
            let weights = st_weights();
            let stats = Stats::new(pace, shooting, passing, defending, physical);
            let first = compute_overall(&weights, &stats);
            prop_assert_eq!(first, compute_overall(&weights, &stats));

            let mut raised = stats;
            let after = raised.raise(StatKind::Shooting, bump);
            let delta = (after - shooting) as f64 * weights.shooting;
            let change = compute_overall(&weights, &raised) as f64 - first as f64;
            prop_assert!((change - delta).abs() <= 1.0);
        }

        #[test]
        fn prop_cap_keeps_stats_in_bounds(
            potential in 65u8..=90, pace in 1u8..=99, physical in 1u8..=99,
        ) {
            let mut player = striker();
            player.potential = potential;
            player.stats.pace = pace;
            player.stats.physical = physical;
            enforce_potential_cap(&mut player);
            for (_, value) in player.stats.iter() {
                prop_assert!(value >= MIN_STAT && value <= potential);
            }
        }
    }
}
