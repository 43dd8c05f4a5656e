//! # Match Simulator
//!
//! 한 경기 = Blocked → Simulate → Resolve.
//!
//! - **Blocked**: an active injury eats the match. The counter is decremented;
//!   if it reaches zero the player is fit again and the match is played in
//!   the same call.
//! - **Simulate**: performance, goals, assists, rating.
//! - **Resolve**: stat gains, form, career counters, team standings, stamina
//!   and the post-match injury roll.
//!
//! The simulator mutates only the snapshots it is handed. Persisting them is
//! the caller's job.

use crate::config::tuning::{InjuryConfig, SeverityBand, TuningConfig};
use crate::config::{GameConfig, League, PositionProfile};
use crate::engine::difficulty::{compute_difficulty, is_high_pressure, opponent_rating};
use crate::engine::progression::{enforce_potential_cap, refresh_overall, round_form_delta};
use crate::engine::standings::{update_standings, TeamResult};
use crate::error::Result;
use crate::models::{Injury, InjurySeverity, Player, StatKind, Team};
use crate::random::RandomSource;

/// Where the player's match happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchContext {
    /// League tier of the player's team, `None` for a free agent
    pub tier: Option<u8>,
    pub high_pressure: bool,
}

impl MatchContext {
    pub fn free_agent() -> Self {
        Self { tier: None, high_pressure: false }
    }

    /// Context for a player of `team`, which plays in `league` alongside
    /// `league_teams` (including itself).
    pub fn for_team(
        player: &Player,
        team: &Team,
        league: &League,
        league_teams: &[Team],
        tuning: &TuningConfig,
    ) -> Self {
        Self {
            tier: Some(league.tier),
            high_pressure: is_high_pressure(player, team, league, league_teams, &tuning.season),
        }
    }
}

/// What an injury does to the current invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjuryGate {
    /// No injury: simulate
    Fit,
    /// Last match of the injury: clear it and simulate
    Recovering,
    /// Sit out; the counter drops to `matches_remaining`
    Sidelined { matches_remaining: u8 },
}

/// Classify without mutating.
pub fn injury_gate(player: &Player) -> InjuryGate {
    match player.injury.as_ref() {
        Some(injury) if injury.matches_remaining > 1 => {
            InjuryGate::Sidelined { matches_remaining: injury.matches_remaining - 1 }
        }
        Some(injury) if injury.matches_remaining == 1 => InjuryGate::Recovering,
        _ => InjuryGate::Fit,
    }
}

/// Full match report.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    /// The injury ended with this match
    pub recovered: bool,
    pub difficulty: f64,
    pub opponent_rating: u8,
    pub high_pressure: bool,
    pub performance: f64,
    pub goals: u32,
    pub assists: u32,
    pub rating: f64,
    /// Stat points gained from the performance (after the potential cap)
    pub stat_gains: Vec<(StatKind, u8)>,
    /// Net form change including any injury penalty
    pub form_change: i32,
    pub stamina_lost: u8,
    pub injury: Option<Injury>,
    pub team_result: Option<TeamResult>,
    pub big_game: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Still injured: only the counter changed
    Sidelined { matches_remaining: u8 },
    Played(Box<MatchReport>),
}

impl MatchOutcome {
    pub fn report(&self) -> Option<&MatchReport> {
        match self {
            MatchOutcome::Played(report) => Some(report.as_ref()),
            MatchOutcome::Sidelined { .. } => None,
        }
    }
}

pub struct MatchSimulator<'a> {
    config: &'a GameConfig,
}

impl<'a> MatchSimulator<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }

    /// Run one match for `player`. `team` is the player's team snapshot; its
    /// standings are updated when present.
    pub fn play(
        &self,
        player: &mut Player,
        team: Option<&mut Team>,
        ctx: &MatchContext,
        rng: &mut impl RandomSource,
    ) -> Result<MatchOutcome> {
        let profile = self.config.profile(player.position)?;
        let tuning = &self.config.tuning;

        // ===== Blocked =====
        let recovered = match injury_gate(player) {
            InjuryGate::Sidelined { matches_remaining } => {
                if let Some(injury) = player.injury.as_mut() {
                    injury.matches_remaining = matches_remaining;
                }
                log::debug!("{} sidelined, {} matches remaining", player.user_id, matches_remaining);
                return Ok(MatchOutcome::Sidelined { matches_remaining });
            }
            InjuryGate::Recovering => {
                player.injury = None;
                true
            }
            InjuryGate::Fit => {
                // A zero-count leftover is not an active injury
                player.injury = None;
                false
            }
        };

        // ===== Simulate =====
        let difficulty = compute_difficulty(player, ctx.tier, &tuning.difficulty);
        let opponent = opponent_rating(player.overall, difficulty);
        let performance = compute_performance(player, difficulty, ctx.high_pressure, tuning, rng);
        let (goals, assists) = roll_goals_and_assists(profile, performance, difficulty, tuning, rng);
        let rating = compute_rating(performance, goals, assists, tuning);

        // ===== Resolve =====
        let form_before = player.form;
        let stat_gains = apply_match_stat_gains(player, profile, rating, goals, assists, tuning, rng);

        let form_delta = match_form_change(rating, goals, assists, ctx.high_pressure, tuning);
        player.form = tuning.form.clamp(player.form + form_delta);

        player.matches_played += 1;
        player.goals += goals;
        player.assists += assists;
        player.season.matches_played += 1;

        let big_game = ctx.high_pressure && rating >= tuning.rating.excellent;
        if big_game {
            player.career_stats.big_game_performances += 1;
        }

        let team_result =
            team.map(|team| update_standings(team, goals, rating, &tuning.standings, rng));

        let stamina_lost = tuning.stamina.match_decrease.sample(rng).clamp(0, u8::MAX as i32) as u8;
        let stamina_before = player.stamina;
        player.stamina = player.stamina.saturating_sub(stamina_lost);

        let injury = roll_match_injury(player, profile, ctx.high_pressure, tuning, rng);

        Ok(MatchOutcome::Played(Box::new(MatchReport {
            recovered,
            difficulty,
            opponent_rating: opponent,
            high_pressure: ctx.high_pressure,
            performance,
            goals,
            assists,
            rating,
            stat_gains,
            form_change: player.form - form_before,
            stamina_lost: stamina_before - player.stamina,
            injury,
            team_result,
            big_game,
        })))
    }
}

/// Performance score (>= 0).
pub fn compute_performance(
    player: &Player,
    difficulty: f64,
    high_pressure: bool,
    tuning: &TuningConfig,
    rng: &mut impl RandomSource,
) -> f64 {
    let cfg = &tuning.performance;
    let mut performance = player.overall as f64 * cfg.overall_weight
        + player.form as f64 * cfg.form_weight
        + player.stamina as f64 / cfg.stamina_divisor
        + cfg.random.sample(rng) as f64;

    performance -= difficulty * cfg.difficulty_weight;

    if high_pressure {
        performance += cfg.pressure_random.sample(rng) as f64;
    }

    performance.max(0.0)
}

/// Consecutive Bernoulli successes from trial 1, at most `max_trials`.
pub fn count_successes(chance: f64, max_trials: u32, rng: &mut impl RandomSource) -> u32 {
    let mut successes = 0;
    while successes < max_trials && rng.chance(chance * 100.0) {
        successes += 1;
    }
    successes
}

pub fn goal_chance(profile: &PositionProfile, performance: f64, difficulty: f64, tuning: &TuningConfig) -> f64 {
    let cfg = &tuning.scoring;
    (cfg.goal_base_chance * profile.goal_modifier + performance * cfg.goal_performance_multiplier
        - difficulty * cfg.goal_difficulty_penalty)
        .max(cfg.min_chance)
}

pub fn assist_chance(profile: &PositionProfile, performance: f64, difficulty: f64, tuning: &TuningConfig) -> f64 {
    let cfg = &tuning.scoring;
    (cfg.assist_base_chance * profile.assist_modifier + performance * cfg.assist_performance_multiplier
        - difficulty * cfg.assist_difficulty_penalty)
        .max(cfg.min_chance)
}

fn roll_goals_and_assists(
    profile: &PositionProfile,
    performance: f64,
    difficulty: f64,
    tuning: &TuningConfig,
    rng: &mut impl RandomSource,
) -> (u32, u32) {
    let goals = count_successes(
        goal_chance(profile, performance, difficulty, tuning),
        tuning.scoring.max_goals,
        rng,
    );
    let assists = count_successes(
        assist_chance(profile, performance, difficulty, tuning),
        tuning.scoring.max_assists,
        rng,
    );
    (goals, assists)
}

/// Match rating in `[rating.min, rating.max]`.
pub fn compute_rating(performance: f64, goals: u32, assists: u32, tuning: &TuningConfig) -> f64 {
    let cfg = &tuning.rating;
    let rating = cfg.base
        + performance * cfg.performance_multiplier
        + goals as f64 * cfg.goal_bonus
        + assists as f64 * cfg.assist_bonus;
    rating.clamp(cfg.min, cfg.max)
}

/// Excellent games sharpen the relevant skills; good games sometimes
/// improve a random one.
fn apply_match_stat_gains(
    player: &mut Player,
    profile: &PositionProfile,
    rating: f64,
    goals: u32,
    assists: u32,
    tuning: &TuningConfig,
    rng: &mut impl RandomSource,
) -> Vec<(StatKind, u8)> {
    let before = player.stats;
    let mut bumped = Vec::new();

    if rating >= tuning.rating.excellent {
        if goals > 0 {
            bumped.push(StatKind::Shooting);
        }
        if assists > 0 {
            bumped.push(StatKind::Passing);
        }
    } else if rating >= tuning.rating.good && rng.chance(tuning.rating.good_stat_bump_chance) {
        if let Some(kind) = rng.pick(&StatKind::ALL) {
            bumped.push(*kind);
        }
    }

    for kind in &bumped {
        player.stats.raise(*kind, 1);
    }
    enforce_potential_cap(player);
    refresh_overall(player, &profile.weights);

    bumped
        .into_iter()
        .filter_map(|kind| {
            let gained = player.stats.get(kind).saturating_sub(before.get(kind));
            (gained > 0).then_some((kind, gained))
        })
        .collect()
}

/// Form delta for one match, before clamping.
pub fn match_form_change(rating: f64, goals: u32, assists: u32, high_pressure: bool, tuning: &TuningConfig) -> i32 {
    let cfg = &tuning.match_form;
    let mut change = -cfg.base_decrease + goals as f64 * cfg.goal_bonus + assists as f64 * cfg.assist_bonus;

    if rating > tuning.rating.good {
        change += (rating - tuning.rating.good) * cfg.rating_bonus;
    }

    if high_pressure {
        if rating >= tuning.rating.excellent {
            change += cfg.pressure_swing;
        } else if rating < tuning.rating.poor {
            change -= cfg.pressure_swing;
        }
    }

    round_form_delta(change)
}

pub fn roll_severity(roll: i32, cfg: &InjuryConfig) -> InjurySeverity {
    if roll <= cfg.minor_threshold {
        InjurySeverity::Minor
    } else if roll <= cfg.minor_threshold + cfg.moderate_threshold {
        InjurySeverity::Moderate
    } else {
        InjurySeverity::Severe
    }
}

pub fn severity_band(severity: InjurySeverity, cfg: &InjuryConfig) -> &SeverityBand {
    match severity {
        InjurySeverity::Minor => &cfg.minor,
        InjurySeverity::Moderate => &cfg.moderate,
        InjurySeverity::Severe => &cfg.severe,
    }
}

/// Post-match injury roll. On a hit the stat loss and form penalty are
/// applied and the injury becomes the player's active injury.
fn roll_match_injury(
    player: &mut Player,
    profile: &PositionProfile,
    high_pressure: bool,
    tuning: &TuningConfig,
    rng: &mut impl RandomSource,
) -> Option<Injury> {
    let cfg = &tuning.injury;
    let mut chance = cfg.match_chance;
    if high_pressure {
        chance *= cfg.high_pressure_multiplier;
    }
    if !rng.chance(chance) {
        return None;
    }

    let stat = *rng.pick(&StatKind::ALL)?;
    let severity = roll_severity(rng.roll_int(1, 100), cfg);
    let band = severity_band(severity, cfg);
    let matches_out = band.matches_out.sample(rng).clamp(1, u8::MAX as i32) as u8;
    let rolled_decrease = band.stat_decrease.sample(rng).clamp(0, u8::MAX as i32) as u8;

    let before = player.stats.get(stat);
    let after = player.stats.lower(stat, rolled_decrease);
    player.form = (player.form - band.form_penalty).max(tuning.form.min);
    refresh_overall(player, &profile.weights);

    let injury = Injury {
        severity,
        matches_remaining: matches_out,
        stat,
        stat_decrease: before - after,
    };
    log::info!(
        "{} suffered a {} injury: {} -{}, out for {} matches",
        player.user_id,
        severity,
        stat,
        injury.stat_decrease,
        matches_out
    );
    player.injury = Some(injury.clone());
    Some(injury)
}
