//! Storage seams used by the career service.

use crate::models::{Player, Team};
use crate::save::error::StoreError;

pub trait PlayerStore: Send + Sync {
    /// `None` when no career exists for `user_id`.
    fn load_player(&self, user_id: &str) -> Result<Option<Player>, StoreError>;

    fn save_player(&self, player: &Player) -> Result<(), StoreError>;

    /// Returns `false` when there was nothing to delete.
    fn delete_player(&self, user_id: &str) -> Result<bool, StoreError>;
}

pub trait TeamStore: Send + Sync {
    fn load_team(&self, team_id: &str) -> Result<Option<Team>, StoreError>;

    fn save_team(&self, team: &Team) -> Result<(), StoreError>;

    /// Writes many teams in one collection rewrite.
    fn save_teams(&self, teams: &[Team]) -> Result<(), StoreError>;

    /// Every team, ordered by id. Empty until teams are generated.
    fn list_all_teams(&self) -> Result<Vec<Team>, StoreError>;

    fn list_teams_by_league(&self, league_id: &str) -> Result<Vec<Team>, StoreError> {
        Ok(self.list_all_teams()?.into_iter().filter(|team| team.league == league_id).collect())
    }

    fn add_player_to_squad(&self, team_id: &str, player_id: &str) -> Result<(), StoreError> {
        let mut team = self.load_team(team_id)?.ok_or_else(|| StoreError::team_not_found(team_id))?;
        if team.squad.insert(player_id.to_string()) {
            self.save_team(&team)?;
        }
        Ok(())
    }

    fn remove_player_from_squad(&self, team_id: &str, player_id: &str) -> Result<(), StoreError> {
        let mut team = self.load_team(team_id)?.ok_or_else(|| StoreError::team_not_found(team_id))?;
        if team.squad.remove(player_id) {
            self.save_team(&team)?;
        }
        Ok(())
    }
}
