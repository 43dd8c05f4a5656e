//! Per-entity mutexes.
//!
//! Lock order is player first, then teams in ascending id order
//! ([`EntityLocks::teams`] returns them already sorted).

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type EntityLock = Arc<Mutex<()>>;

#[derive(Debug, Default)]
pub struct EntityLocks {
    slots: Mutex<HashMap<String, EntityLock>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, key: String) -> EntityLock {
        let mut slots = acquire(&self.slots);
        slots.entry(key).or_default().clone()
    }

    pub fn player(&self, user_id: &str) -> EntityLock {
        self.handle(format!("player:{}", user_id))
    }

    pub fn team(&self, team_id: &str) -> EntityLock {
        self.handle(format!("team:{}", team_id))
    }

    /// Handles for several teams, deduplicated and in lock order.
    pub fn teams<'a>(&self, team_ids: impl IntoIterator<Item = &'a str>) -> Vec<EntityLock> {
        let ordered: BTreeSet<&str> = team_ids.into_iter().collect();
        ordered.into_iter().map(|id| self.team(id)).collect()
    }
}

/// Lock, ignoring poison.
pub fn acquire<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}
