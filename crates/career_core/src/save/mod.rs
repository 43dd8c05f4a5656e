//! # Career Storage
//!
//! | File | Contents |
//! |------|----------|
//! | `players.json` | `{ userId: Player }` (versioned, migrated at load) |
//! | `teams.json` | `{ teamId: Team }` |
//!
//! Writes go to a temp file first and are renamed into place.

pub mod error;
pub mod json_store;
pub mod locks;
pub mod memory;
pub mod migration;
pub mod store;

pub use error::StoreError;
pub use json_store::JsonFileStore;
pub use locks::EntityLocks;
pub use memory::MemoryStore;
pub use migration::migrate_player;
pub use store::{PlayerStore, TeamStore};
