use crate::config::tuning::ValueConfig;
use crate::models::Player;

/// Market value in millions, rounded to 2 dp and never below `cfg.floor`.
pub fn compute_market_value(overall: u8, potential: u8, age: u8, form: i32, cfg: &ValueConfig) -> f64 {
    let base = (overall as f64 + potential as f64) * cfg.base_multiplier;

    let age_modifier = if age < cfg.young_age {
        cfg.young_modifier
    } else if age <= cfg.peak_age {
        1.0
    } else {
        let years_past_peak = (age - cfg.peak_age) as f64;
        (1.0 - years_past_peak * cfg.decline_per_year).max(cfg.min_age_modifier)
    };

    let form_modifier = 1.0 + form as f64 * cfg.form_multiplier;

    round_money(base * age_modifier * form_modifier).max(cfg.floor)
}

/// Recompute and store the player's market value. Returns the new value.
pub fn update_market_value(player: &mut Player, cfg: &ValueConfig) -> f64 {
    player.market_value =
        compute_market_value(player.overall, player.potential, player.age, player.form, cfg);
    player.market_value
}

/// Round a money amount to 2 decimal places.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
