use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::models::{Player, Team};
use crate::save::error::StoreError;
use crate::save::store::{PlayerStore, TeamStore};

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: RwLock<BTreeMap<String, Player>>,
    teams: RwLock<BTreeMap<String, Team>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teams(teams: impl IntoIterator<Item = Team>) -> Self {
        let store = Self::new();
        {
            let mut map = store.teams.write().unwrap_or_else(PoisonError::into_inner);
            for team in teams {
                map.insert(team.id.clone(), team);
            }
        }
        store
    }

    pub fn player_count(&self) -> usize {
        self.players.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl PlayerStore for MemoryStore {
    fn load_player(&self, user_id: &str) -> Result<Option<Player>, StoreError> {
        let players = self.players.read().unwrap_or_else(PoisonError::into_inner);
        Ok(players.get(user_id).cloned())
    }

    fn save_player(&self, player: &Player) -> Result<(), StoreError> {
        let mut players = self.players.write().unwrap_or_else(PoisonError::into_inner);
        players.insert(player.user_id.clone(), player.clone());
        Ok(())
    }

    fn delete_player(&self, user_id: &str) -> Result<bool, StoreError> {
        let mut players = self.players.write().unwrap_or_else(PoisonError::into_inner);
        Ok(players.remove(user_id).is_some())
    }
}

impl TeamStore for MemoryStore {
    fn load_team(&self, team_id: &str) -> Result<Option<Team>, StoreError> {
        let teams = self.teams.read().unwrap_or_else(PoisonError::into_inner);
        Ok(teams.get(team_id).cloned())
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        self.save_teams(std::slice::from_ref(team))
    }

    fn save_teams(&self, teams: &[Team]) -> Result<(), StoreError> {
        let mut map = self.teams.write().unwrap_or_else(PoisonError::into_inner);
        for team in teams {
            map.insert(team.id.clone(), team.clone());
        }
        Ok(())
    }

    fn list_all_teams(&self) -> Result<Vec<Team>, StoreError> {
        let teams = self.teams.read().unwrap_or_else(PoisonError::into_inner);
        Ok(teams.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::fixtures::striker;

    #[test]
    fn test_roundtrip_and_delete() {
        let store = MemoryStore::new();
        store.save_player(&striker()).unwrap();
        assert_eq!(store.player_count(), 1);
        assert_eq!(store.load_player("user-1").unwrap().unwrap().name, "Test Striker");
        assert!(store.delete_player("user-1").unwrap());
        assert_eq!(store.player_count(), 0);
    }

    #[test]
    fn test_squad_ops_need_team() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.add_player_to_squad("LEAGUE_3_1", "user-1"),
            Err(StoreError::NotFound { .. })
        ));
    }
}
