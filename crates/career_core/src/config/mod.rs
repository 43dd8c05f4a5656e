//! # Game Configuration
//!
//! 리그 / 포지션 / 능력치 범위 테이블과 튜닝 상수.
//!
//! The four tables ship inside the binary (`data/*.yaml`, embedded at compile
//! time) and are parsed once. [`GameConfig::load_dir`] lets an operator
//! override any of them from disk.
//!
//! ```rust
//! use career_core::config::GameConfig;
//!
//! let config = GameConfig::builtin();
//! assert_eq!(config.leagues.lowest().map(|l| l.tier), Some(1));
//! ```

mod leagues;
mod positions;
pub mod tuning;

pub use leagues::{League, LeagueTable};
pub use positions::{PositionProfile, PositionTable, StatRangeTable, StatWeights};
pub use tuning::{FloatRange, IntRange, TuningConfig};

use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::{Position, StatKind, MAX_STAT, MIN_STAT};

// =============================================================================
// Embedded YAML Data
// =============================================================================

pub const LEAGUES_YAML: &str = include_str!("../../../../data/leagues.yaml");
pub const POSITIONS_YAML: &str = include_str!("../../../../data/positions.yaml");
pub const STAT_RANGES_YAML: &str = include_str!("../../../../data/stat_ranges.yaml");
pub const TUNING_YAML: &str = include_str!("../../../../data/tuning.yaml");

static BUILTIN: OnceLock<GameConfig> = OnceLock::new();

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {file}: {source}")]
    Yaml {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the rules read besides the entities themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub leagues: LeagueTable,
    pub positions: PositionTable,
    pub stat_ranges: StatRangeTable,
    pub tuning: TuningConfig,
}

impl GameConfig {
    /// Parse the embedded tables.
    pub fn embedded() -> Result<Self, ConfigError> {
        let config = Self {
            leagues: parse("leagues.yaml", LEAGUES_YAML)?,
            positions: parse("positions.yaml", POSITIONS_YAML)?,
            stat_ranges: parse("stat_ranges.yaml", STAT_RANGES_YAML)?,
            tuning: parse("tuning.yaml", TUNING_YAML)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Shared, parsed-once copy of the embedded tables.
    ///
    /// # Panics
    ///
    /// 임베딩된 YAML 파싱 실패 시 패닉 (정상 빌드에서는 발생하지 않음).
    pub fn builtin() -> &'static GameConfig {
        BUILTIN.get_or_init(|| Self::embedded().expect("Failed to load embedded game config"))
    }

    /// Embedded tables, with any of `leagues.yaml`, `positions.yaml`,
    /// `stat_ranges.yaml`, `tuning.yaml` found in `dir` replacing its
    /// embedded counterpart.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let mut config = Self::builtin().clone();

        if let Some(leagues) = read_override(dir, "leagues.yaml")? {
            config.leagues = leagues;
        }
        if let Some(positions) = read_override(dir, "positions.yaml")? {
            config.positions = positions;
        }
        if let Some(stat_ranges) = read_override(dir, "stat_ranges.yaml")? {
            config.stat_ranges = stat_ranges;
        }
        if let Some(tuning) = read_override(dir, "tuning.yaml")? {
            config.tuning = tuning;
        }

        config.validate()?;
        Ok(config)
    }

    /// 테스트용: no injuries, no random after-match offers, applications
    /// always accepted.
    pub fn deterministic() -> Self {
        let mut config = Self::builtin().clone();
        config.tuning.injury.match_chance = 0.0;
        config.tuning.training.injury_chance = 0.0;
        config.tuning.offer.generation_chance = 0.0;
        config.tuning.offer.application_accept_chance = 100.0;
        config
    }

    pub fn profile(&self, position: Position) -> Result<&PositionProfile, ConfigError> {
        self.positions
            .get(position)
            .ok_or_else(|| ConfigError::Invalid(format!("no profile for position {}", position)))
    }

    pub fn league(&self, id: &str) -> Result<&League, ConfigError> {
        self.leagues
            .get(id)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown league {}", id)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Leagues
        if self.leagues.is_empty() {
            return Err(ConfigError::Invalid("no leagues configured".into()));
        }
        let mut tiers = BTreeSet::new();
        let mut ids = BTreeSet::new();
        for league in self.leagues.iter() {
            if !tiers.insert(league.tier) {
                return Err(ConfigError::Invalid(format!("duplicate tier {}", league.tier)));
            }
            if !ids.insert(league.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate league id {}", league.id)));
            }
            if league.tier == 0 {
                return Err(ConfigError::Invalid(format!("{}: tiers start at 1", league.id)));
            }
            if league.teams_per_league == 0 {
                return Err(ConfigError::Invalid(format!("{}: no teams", league.id)));
            }
            if league.promotion_spots + league.relegation_spots > league.teams_per_league {
                return Err(ConfigError::Invalid(format!(
                    "{}: promotion + relegation spots exceed team count",
                    league.id
                )));
            }
        }

        // Positions and stat ranges
        for position in Position::ALL {
            let profile = self.profile(position)?;
            let sum = profile.weights.sum();
            if (sum - 1.0).abs() > 1e-6 {
                return Err(ConfigError::Invalid(format!(
                    "{} weights sum to {:.3}, expected 1.0",
                    position, sum
                )));
            }
            for kind in StatKind::ALL {
                let range = self.stat_ranges.get(position, kind).ok_or_else(|| {
                    ConfigError::Invalid(format!("no {} range for {}", kind, position))
                })?;
                if !range.is_ordered()
                    || range.min < MIN_STAT as i32
                    || range.max > MAX_STAT as i32
                {
                    return Err(ConfigError::Invalid(format!(
                        "{} range for {} must be ordered within {}..={}",
                        kind, position, MIN_STAT, MAX_STAT
                    )));
                }
            }
        }

        self.tuning.check().map_err(ConfigError::Invalid)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn parse<T: DeserializeOwned>(file: &str, text: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml { file: file.to_string(), source })
}

fn read_override<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Option<T>, ConfigError> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let text =
        std::fs::read_to_string(&path).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
    log::info!("Loading {} override from {}", file, path.display());
    parse(file, &text).map(Some)
}

// ========== Tests ==========
