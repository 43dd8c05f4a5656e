//! # Career Rules Engine
//!
//! 선수 커리어 규칙 (순수 함수).
//!
//! | Module | Rules |
//! |--------|-------|
//! | [`progression`] | overall, potential cap, aging, form decay |
//! | [`valuation`] | market value |
//! | [`difficulty`] | difficulty, opponent rating, high pressure |
//! | [`match_sim`] | one match (Blocked → Simulate → Resolve) |
//! | [`training`] | training and rest sessions |
//! | [`standings`] | simulated team result |
//! | [`transfers`] | offers and the accept protocol |
//!
//! Nothing in here performs I/O. Inputs are snapshots, a
//! [`RandomSource`](crate::random::RandomSource) and an explicit `now`.

pub mod difficulty;
pub mod match_sim;
pub mod progression;
pub mod standings;
pub mod training;
pub mod transfers;
pub mod valuation;

pub use match_sim::{MatchContext, MatchOutcome, MatchReport, MatchSimulator};
pub use standings::{MatchResult, TeamResult};
pub use training::{RestReport, TrainingKnock, TrainingReport};
pub use transfers::{ApplicationOutcome, OfferLookup, TransferReport};
