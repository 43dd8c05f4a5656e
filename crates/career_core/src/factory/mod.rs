//! New players and the league pyramid's teams.

pub mod player_factory;
pub mod team_factory;

pub use player_factory::{generate_stats, initial_contract, new_player, sign_with_starting_team};
pub use team_factory::{create_team, generate_all_teams, starting_team};
