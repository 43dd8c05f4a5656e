//! Tuning constants for every rule in the engine.
//!
//! Each section is its own struct with a hand-written `Default`; the shipped
//! `data/tuning.yaml` mirrors these values and any section may be overridden
//! partially from disk.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Inclusive integer range used for uniform rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut impl RandomSource) -> i32 {
        rng.roll_int(self.min, self.max)
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Half-open float range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut impl RandomSource) -> f64 {
        rng.roll_float(self.min, self.max)
    }
}

/// 전체 튜닝 설정
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub form: FormConfig,
    pub stamina: StaminaConfig,
    pub aging: AgingConfig,
    pub creation: CreationConfig,
    pub difficulty: DifficultyConfig,
    pub performance: PerformanceConfig,
    pub rating: RatingConfig,
    pub scoring: ScoringConfig,
    pub match_form: MatchFormConfig,
    pub injury: InjuryConfig,
    pub training: TrainingConfig,
    pub rest: RestConfig,
    pub value: ValueConfig,
    pub offer: OfferConfig,
    pub season: SeasonConfig,
    pub standings: StandingsConfig,
}

// ========== Form ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// 최저 폼 (기본: -10)
    pub min: i32,
    /// 최고 폼 (기본: 10)
    pub max: i32,
    /// Per-match decay before the tier term (기본: 0.5)
    pub decay_rate_base: f64,
    /// Extra decay per league tier (기본: 0.25)
    pub decay_rate_tier_multiplier: f64,
}

impl FormConfig {
    pub fn clamp(&self, form: i32) -> i32 {
        form.clamp(self.min, self.max)
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self { min: -10, max: 10, decay_rate_base: 0.5, decay_rate_tier_multiplier: 0.25 }
    }
}

// ========== Stamina ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    pub max: u8,
    /// Minimum stamina to play a match
    pub match_threshold: u8,
    /// Minimum stamina to train
    pub train_threshold: u8,
    pub match_decrease: IntRange,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            max: 100,
            match_threshold: 30,
            train_threshold: 20,
            match_decrease: IntRange::new(15, 25),
        }
    }
}

// ========== Aging ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgingConfig {
    /// Matches per birthday (기본: 38 = one season)
    pub matches_per_age_increase: u32,
    /// Physical decline starts at this age
    pub start_age: u8,
    pub physical_decrease_per_year: u8,
    /// Multiply the decrease by `age - start_age` (nothing at `start_age` itself).
    /// Off by default: the decline is a flat amount per birthday.
    pub scale_by_years_over: bool,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            matches_per_age_increase: 38,
            start_age: 30,
            physical_decrease_per_year: 2,
            scale_by_years_over: false,
        }
    }
}

// ========== Player creation ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreationConfig {
    pub starting_age: u8,
    pub potential: IntRange,
    pub contract_years: IntRange,
    /// Starting salary = overall x this + salary jitter
    pub salary_per_overall: f64,
    pub salary_jitter: FloatRange,
    pub min_salary: f64,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            starting_age: 18,
            potential: IntRange::new(65, 90),
            contract_years: IntRange::new(2, 4),
            salary_per_overall: 0.05,
            salary_jitter: FloatRange::new(-0.05, 0.1),
            min_salary: 0.1,
        }
    }
}

// ========== Difficulty ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub base: f64,
    pub overall_multiplier: f64,
    pub tier_multiplier: f64,
    /// Bonus for the mid career stage; the late stage gets 1.5x
    pub career_stage_multiplier: f64,
    pub mid_stage_age: u8,
    pub late_stage_age: u8,
    pub late_stage_factor: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            base: 0.0,
            overall_multiplier: 0.05,
            tier_multiplier: 2.0,
            career_stage_multiplier: 1.0,
            mid_stage_age: 22,
            late_stage_age: 28,
            late_stage_factor: 1.5,
        }
    }
}

// ========== Match performance ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub overall_weight: f64,
    pub form_weight: f64,
    pub stamina_divisor: f64,
    pub random: IntRange,
    pub difficulty_weight: f64,
    /// Extra swing in high-pressure matches
    pub pressure_random: IntRange,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            overall_weight: 0.1,
            form_weight: 0.3,
            stamina_divisor: 20.0,
            random: IntRange::new(-2, 3),
            difficulty_weight: 0.5,
            pressure_random: IntRange::new(-3, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub base: f64,
    pub performance_multiplier: f64,
    pub goal_bonus: f64,
    pub assist_bonus: f64,
    pub min: f64,
    pub max: f64,
    /// Rating for the deterministic goal/assist stat bump
    pub excellent: f64,
    /// Rating for the random stat bump roll
    pub good: f64,
    /// Percentage chance of the random stat bump
    pub good_stat_bump_chance: f64,
    /// Below this the match counts as poor
    pub poor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            base: 4.0,
            performance_multiplier: 0.3,
            goal_bonus: 0.5,
            assist_bonus: 0.3,
            min: 1.0,
            max: 10.0,
            excellent: 8.0,
            good: 7.0,
            good_stat_bump_chance: 30.0,
            poor: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub goal_base_chance: f64,
    pub goal_performance_multiplier: f64,
    pub goal_difficulty_penalty: f64,
    pub max_goals: u32,
    pub assist_base_chance: f64,
    pub assist_performance_multiplier: f64,
    pub assist_difficulty_penalty: f64,
    pub max_assists: u32,
    pub min_chance: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            goal_base_chance: 0.15,
            goal_performance_multiplier: 0.01,
            goal_difficulty_penalty: 0.01,
            max_goals: 3,
            assist_base_chance: 0.12,
            assist_performance_multiplier: 0.008,
            assist_difficulty_penalty: 0.008,
            max_assists: 2,
            min_chance: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchFormConfig {
    pub base_decrease: f64,
    pub goal_bonus: f64,
    pub assist_bonus: f64,
    /// Per rating point above 7
    pub rating_bonus: f64,
    pub pressure_swing: f64,
}

impl Default for MatchFormConfig {
    fn default() -> Self {
        Self {
            base_decrease: 1.0,
            goal_bonus: 2.0,
            assist_bonus: 1.0,
            rating_bonus: 1.0,
            pressure_swing: 2.0,
        }
    }
}

// ========== Injury ==========

/// Consequences of one injury severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityBand {
    pub matches_out: IntRange,
    pub stat_decrease: IntRange,
    pub form_penalty: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjuryConfig {
    /// Percentage per simulated match
    pub match_chance: f64,
    pub high_pressure_multiplier: f64,
    /// Severity roll 1..=100: <= minor is minor
    pub minor_threshold: i32,
    /// <= minor + moderate is moderate, the rest severe
    pub moderate_threshold: i32,
    pub minor: SeverityBand,
    pub moderate: SeverityBand,
    pub severe: SeverityBand,
}

impl Default for InjuryConfig {
    fn default() -> Self {
        Self {
            match_chance: 5.0,
            high_pressure_multiplier: 1.5,
            minor_threshold: 60,
            moderate_threshold: 30,
            minor: SeverityBand {
                matches_out: IntRange::new(1, 2),
                stat_decrease: IntRange::new(1, 2),
                form_penalty: 2,
            },
            moderate: SeverityBand {
                matches_out: IntRange::new(3, 5),
                stat_decrease: IntRange::new(3, 5),
                form_penalty: 3,
            },
            severe: SeverityBand {
                matches_out: IntRange::new(6, 10),
                stat_decrease: IntRange::new(6, 10),
                form_penalty: 5,
            },
        }
    }
}

// ========== Training / rest ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub stats_to_improve: IntRange,
    pub stat_increase: IntRange,
    pub stamina_cost: IntRange,
    pub form_increase: IntRange,
    /// Percentage per session
    pub injury_chance: f64,
    pub injury_stat_decrease: IntRange,
    pub injury_form_penalty: i32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            stats_to_improve: IntRange::new(1, 2),
            stat_increase: IntRange::new(1, 3),
            stamina_cost: IntRange::new(10, 20),
            form_increase: IntRange::new(0, 1),
            injury_chance: 3.0,
            injury_stat_decrease: IntRange::new(1, 3),
            injury_form_penalty: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    pub stamina_recovery: IntRange,
    pub form_increase: IntRange,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self { stamina_recovery: IntRange::new(25, 40), form_increase: IntRange::new(0, 1) }
    }
}

// ========== Market value ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueConfig {
    pub base_multiplier: f64,
    pub peak_age: u8,
    pub decline_per_year: f64,
    pub form_multiplier: f64,
    /// Players younger than this get `young_modifier`
    pub young_age: u8,
    pub young_modifier: f64,
    pub min_age_modifier: f64,
    pub floor: f64,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            base_multiplier: 0.1,
            peak_age: 28,
            decline_per_year: 0.08,
            form_multiplier: 0.02,
            young_age: 22,
            young_modifier: 0.9,
            min_age_modifier: 0.5,
            floor: 0.5,
        }
    }
}

// ========== Transfers ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferConfig {
    /// Salary = 0.1 x market value x multiplier
    pub salary_market_share: f64,
    pub salary_multiplier: FloatRange,
    pub min_salary: f64,
    pub contract_years: IntRange,
    pub signing_bonus_multiplier: f64,
    pub expiry_days: i64,
    /// Percentage gate for after-match offers
    pub generation_chance: f64,
    pub after_match_rating_threshold: f64,
    pub max_after_match_offers: usize,
    /// Percentage chance a team accepts an application
    pub application_accept_chance: f64,
    /// Team budget must cover this share of the market value
    pub budget_ratio: f64,
    pub max_rating_gap: i32,
    pub tier2_min_overall: u8,
    pub tier3_min_overall: u8,
    pub release_clause_multiplier: f64,
    /// Market value multiplier on moving above tier 1
    pub transfer_value_bump: f64,
}

impl Default for OfferConfig {
    fn default() -> Self {
        Self {
            salary_market_share: 0.1,
            salary_multiplier: FloatRange::new(0.8, 1.5),
            min_salary: 0.1,
            contract_years: IntRange::new(1, 4),
            signing_bonus_multiplier: 0.5,
            expiry_days: 7,
            generation_chance: 25.0,
            after_match_rating_threshold: 7.0,
            max_after_match_offers: 2,
            application_accept_chance: 70.0,
            budget_ratio: 0.15,
            max_rating_gap: 20,
            tier2_min_overall: 60,
            tier3_min_overall: 70,
            release_clause_multiplier: 2.0,
            transfer_value_bump: 1.05,
        }
    }
}

// ========== Season / standings ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    pub length: u32,
    /// Final N matches count as high pressure
    pub final_stretch: u32,
    /// Places around a promotion/relegation cutoff that count as high pressure
    pub zone_margin: usize,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self { length: 38, final_stretch: 3, zone_margin: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsConfig {
    /// Probability mass right after the win band that counts as a draw
    pub draw_band: f64,
    pub goals_for_padding: IntRange,
    pub goals_against: IntRange,
}

impl Default for StandingsConfig {
    fn default() -> Self {
        Self {
            draw_band: 0.3,
            goals_for_padding: IntRange::new(0, 2),
            goals_against: IntRange::new(0, 2),
        }
    }
}

impl TuningConfig {
    /// Every range ordered and every percentage within 0..=100.
    pub fn check(&self) -> Result<(), String> {
        let ranges = [
            ("stamina.match_decrease", self.stamina.match_decrease),
            ("creation.potential", self.creation.potential),
            ("creation.contract_years", self.creation.contract_years),
            ("performance.random", self.performance.random),
            ("performance.pressure_random", self.performance.pressure_random),
            ("injury.minor.matches_out", self.injury.minor.matches_out),
            ("injury.moderate.matches_out", self.injury.moderate.matches_out),
            ("injury.severe.matches_out", self.injury.severe.matches_out),
            ("injury.minor.stat_decrease", self.injury.minor.stat_decrease),
            ("injury.moderate.stat_decrease", self.injury.moderate.stat_decrease),
            ("injury.severe.stat_decrease", self.injury.severe.stat_decrease),
            ("training.stats_to_improve", self.training.stats_to_improve),
            ("training.stat_increase", self.training.stat_increase),
            ("training.stamina_cost", self.training.stamina_cost),
            ("training.form_increase", self.training.form_increase),
            ("training.injury_stat_decrease", self.training.injury_stat_decrease),
            ("rest.stamina_recovery", self.rest.stamina_recovery),
            ("rest.form_increase", self.rest.form_increase),
            ("offer.contract_years", self.offer.contract_years),
            ("standings.goals_for_padding", self.standings.goals_for_padding),
            ("standings.goals_against", self.standings.goals_against),
        ];
        for (name, range) in ranges {
            if !range.is_ordered() {
                return Err(format!("{} has min {} > max {}", name, range.min, range.max));
            }
        }

        let percentages = [
            ("injury.match_chance", self.injury.match_chance),
            ("training.injury_chance", self.training.injury_chance),
            ("rating.good_stat_bump_chance", self.rating.good_stat_bump_chance),
            ("offer.generation_chance", self.offer.generation_chance),
            ("offer.application_accept_chance", self.offer.application_accept_chance),
        ];
        for (name, pct) in percentages {
            if !(0.0..=100.0).contains(&pct) {
                return Err(format!("{} must be within 0..=100, got {}", name, pct));
            }
        }

        if self.form.min > self.form.max {
            return Err("form.min must not exceed form.max".to_string());
        }
        if self.injury.minor_threshold + self.injury.moderate_threshold > 100 {
            return Err("injury severity thresholds exceed 100".to_string());
        }
        if self.training.stats_to_improve.min < 1 || self.training.stats_to_improve.max > 5 {
            return Err("training.stats_to_improve must stay within 1..=5".to_string());
        }
        if self.aging.matches_per_age_increase == 0 {
            return Err("aging.matches_per_age_increase must be positive".to_string());
        }
        if self.performance.stamina_divisor <= 0.0 {
            return Err("performance.stamina_divisor must be positive".to_string());
        }
        if self.offer.salary_multiplier.min > self.offer.salary_multiplier.max {
            return Err("offer.salary_multiplier has min > max".to_string());
        }
        Ok(())
    }
}
