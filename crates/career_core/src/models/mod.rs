//! Persistent career records.
//!
//! Player and Team are independent aggregates that reference each other only
//! by id (`Player::current_team`, `Team::squad`). Field names serialize in
//! camelCase so legacy JSON records load without renaming.

pub mod offer;
pub mod player;
pub mod position;
pub mod stats;
pub mod team;

pub use offer::Offer;
pub use player::{CareerStats, Contract, Injury, InjurySeverity, Player, SeasonProgress};
pub use position::Position;
pub use stats::{StatKind, Stats, MAX_STAT, MIN_STAT};
pub use team::{Standings, Team};

pub use crate::config::League;
