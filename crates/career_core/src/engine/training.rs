//! Training and rest sessions.

use crate::config::tuning::TuningConfig;
use crate::config::StatWeights;
use crate::engine::progression::{
    enforce_potential_cap, refresh_overall, stamina_cost_modifier, training_effectiveness,
};
use crate::models::{Player, StatKind};
use crate::random::RandomSource;

/// Knock from a training session. Applied immediately, never kept as an
/// active injury.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingKnock {
    pub stat: StatKind,
    pub stat_decrease: u8,
    pub form_penalty: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Trained stats with the points they actually gained (0 when capped)
    pub improvements: Vec<(StatKind, u8)>,
    pub stamina_cost: u8,
    pub form_change: i32,
    pub knock: Option<TrainingKnock>,
    pub effectiveness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestReport {
    pub stamina_recovered: u8,
    pub form_change: i32,
}

/// One training session.
pub fn train(
    player: &mut Player,
    weights: &StatWeights,
    tuning: &TuningConfig,
    rng: &mut impl RandomSource,
) -> TrainingReport {
    let cfg = &tuning.training;
    let effectiveness = training_effectiveness(player.age);

    // 훈련할 능력치 선택 (중복 없음)
    let count = cfg.stats_to_improve.sample(rng).clamp(1, StatKind::ALL.len() as i32) as usize;
    let mut pool = StatKind::ALL;
    rng.shuffle_slice(&mut pool);

    let mut improvements = Vec::with_capacity(count);
    for &kind in pool.iter().take(count) {
        let rolled = cfg.stat_increase.sample(rng).max(0) as f64;
        let mut increase = (rolled * effectiveness).floor() as u8;
        if increase == 0 && rng.chance(effectiveness * 100.0) {
            increase = 1;
        }

        let before = player.stats.get(kind);
        player.stats.raise(kind, increase);
        enforce_potential_cap(player);
        improvements.push((kind, player.stats.get(kind).saturating_sub(before)));
    }
    refresh_overall(player, weights);

    let raw_cost = cfg.stamina_cost.sample(rng).max(0) as f64;
    let cost = (raw_cost * stamina_cost_modifier(player.age)).ceil().min(u8::MAX as f64) as u8;
    let stamina_before = player.stamina;
    player.stamina = player.stamina.saturating_sub(cost);

    let form_before = player.form;
    player.form = tuning.form.clamp(player.form + cfg.form_increase.sample(rng));

    let knock = if rng.chance(cfg.injury_chance) {
        rng.pick(&StatKind::ALL).copied().map(|stat| {
            let amount = cfg.injury_stat_decrease.sample(rng).clamp(0, u8::MAX as i32) as u8;
            let before = player.stats.get(stat);
            let after = player.stats.lower(stat, amount);
            player.form = (player.form - cfg.injury_form_penalty).max(tuning.form.min);
            refresh_overall(player, weights);
            log::info!("{} picked up a knock in training: {} -{}", player.user_id, stat, before - after);
            TrainingKnock { stat, stat_decrease: before - after, form_penalty: cfg.injury_form_penalty }
        })
    } else {
        None
    };

    TrainingReport {
        improvements,
        stamina_cost: stamina_before - player.stamina,
        form_change: player.form - form_before,
        knock,
        effectiveness,
    }
}

/// Recover stamina and a little form.
pub fn rest(player: &mut Player, tuning: &TuningConfig, rng: &mut impl RandomSource) -> RestReport {
    let cfg = &tuning.rest;
    let recovery = cfg.stamina_recovery.sample(rng).clamp(0, u8::MAX as i32) as u8;
    let stamina_before = player.stamina;
    player.stamina = player.stamina.saturating_add(recovery).min(tuning.stamina.max);

    let form_before = player.form;
    player.form = tuning.form.clamp(player.form + cfg.form_increase.sample(rng));

    RestReport {
        stamina_recovered: player.stamina - stamina_before,
        form_change: player.form - form_before,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::engine::progression::compute_overall;
    use crate::models::player::fixtures::striker;
    use crate::models::{Position, MIN_STAT};
    use crate::random::seeded;
    use proptest::prelude::*;

    fn weights() -> StatWeights {
        GameConfig::builtin().profile(Position::ST).unwrap().weights
    }

    #[test]
    fn test_training_improves_distinct_stats() {
        let config = GameConfig::deterministic();
        let mut rng = seeded(21);
        let mut player = striker();
        let before = player.stats;

        let report = train(&mut player, &weights(), &config.tuning, &mut rng);

        assert!(!report.improvements.is_empty() && report.improvements.len() <= 2);
        let mut kinds: Vec<StatKind> = report.improvements.iter().map(|(k, _)| *k).collect();
        kinds.dedup();
        assert_eq!(kinds.len(), report.improvements.len());
        for (kind, gained) in &report.improvements {
            assert_eq!(player.stats.get(*kind), before.get(*kind) + gained);
            // age 18: full effectiveness, 1..=3 per stat
            assert!((1..=3).contains(gained));
        }
        assert!((10..=20).contains(&report.stamina_cost));
        assert_eq!(player.overall, compute_overall(&weights(), &player.stats));
        assert!(report.knock.is_none());
    }

    #[test]
    fn test_training_respects_potential() {
        let config = GameConfig::deterministic();
        let mut rng = seeded(4);
        let mut player = striker();
        player.potential = 65;
        player.stats = crate::models::Stats::new(65, 65, 65, 65, 65);

        let report = train(&mut player, &weights(), &config.tuning, &mut rng);
        assert!(report.improvements.iter().all(|(_, gained)| *gained == 0));
        assert!(player.stats.iter().all(|(_, v)| v == 65));
    }

    #[test]
    fn test_older_players_pay_more_stamina() {
        let config = GameConfig::deterministic();
        let mut player = striker();
        player.age = 36;
        let report = train(&mut player, &weights(), &config.tuning, &mut seeded(9));
        // ceil(10..=20 * 1.4)
        assert!((14..=28).contains(&report.stamina_cost));
    }

    #[test]
    fn test_training_knock_not_stored() {
        let mut config = GameConfig::deterministic();
        config.tuning.training.injury_chance = 100.0;
        let mut player = striker();

        let report = train(&mut player, &weights(), &config.tuning, &mut seeded(13));

        let knock = report.knock.unwrap();
        assert!(player.injury.is_none());
        assert_eq!(knock.form_penalty, 2);
        assert!(player.stats.get(knock.stat) >= MIN_STAT);
    }

    #[test]
    fn test_rest_recovers_and_caps() {
        let config = GameConfig::deterministic();
        let mut player = striker();
        player.stamina = 40;
        let report = rest(&mut player, &config.tuning, &mut seeded(3));
        assert!((25..=40).contains(&report.stamina_recovered));
        assert_eq!(player.stamina, 40 + report.stamina_recovered);

        player.stamina = 90;
        player.form = 10;
        let report = rest(&mut player, &config.tuning, &mut seeded(3));
        assert_eq!(player.stamina, 100);
        assert_eq!(report.stamina_recovered, 10);
        assert_eq!(player.form, 10);
    }

    proptest! {
        #[test]
        fn prop_training_keeps_bounds(seed in any::<u64>(), age in 18u8..=38, stamina in 0u8..=100) {
            let mut config = GameConfig::builtin().clone();
            config.tuning.training.injury_chance = 40.0;
            let mut rng = seeded(seed);
            let mut player = striker();
            player.age = age;
            player.stamina = stamina;

            for _ in 0..10 {
                train(&mut player, &weights(), &config.tuning, &mut rng);
                rest(&mut player, &config.tuning, &mut rng);
                prop_assert!((-10..=10).contains(&player.form));
                prop_assert!(player.stamina <= 100);
                for (_, value) in player.stats.iter() {
                    prop_assert!(value >= MIN_STAT && value <= player.potential);
                }
            }
        }
    }
}
