//! # career_core - Football Career Progression Engine
//!
//! Turn-based simulation of a single footballer's career. Every player action
//! (train, rest, play a match, apply to a team, accept an offer) runs one
//! simulator over in-memory snapshots and hands the mutated snapshots back to
//! the orchestration layer for persistence.
//!
//! ## Layout
//! - [`engine`]: pure rules (progression, valuation, difficulty, match,
//!   training, standings, transfers)
//! - [`config`]: league/position/stat-range tables and tuning constants
//! - [`models`]: player, team and offer records
//! - [`save`]: storage traits, JSON file store, schema migration
//! - [`career`]: the action service that ties storage and engine together
//!
//! ## Determinism
//! All randomness flows through [`random::RandomSource`]; the same seed and
//! the same clock produce the same career.

// Simulation APIs pass config, rng and clock explicitly.
#![allow(clippy::too_many_arguments)]

pub mod career;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod models;
pub mod random;
pub mod save;

pub use career::{CareerService, Clock, FixedClock, SystemClock};
pub use config::{GameConfig, TuningConfig};
pub use error::{CareerError, Result};
pub use models::{Contract, Injury, InjurySeverity, League, Offer, Player, Position, StatKind, Stats, Team};
pub use random::{GameRng, RandomSource};
pub use save::{JsonFileStore, MemoryStore, PlayerStore, StoreError, TeamStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
