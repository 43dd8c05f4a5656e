//! JSON files on disk: `players.json` and `teams.json`, each one object
//! keyed by id. Every write rewrites the whole collection.

use std::collections::BTreeMap;
use std::fs::{rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::{Player, Team};
use crate::save::error::StoreError;
use crate::save::locks::acquire;
use crate::save::migration::migrate_player;
use crate::save::store::{PlayerStore, TeamStore};

pub const PLAYERS_FILE: &str = "players.json";
pub const TEAMS_FILE: &str = "teams.json";

#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    // One writer per file; entity-level ordering is the service's job.
    players: Mutex<()>,
    teams: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        log::debug!("JSON store at {:?}", dir);
        Ok(Self { dir, players: Mutex::new(()), teams: Mutex::new(()) })
    }

    pub fn players_path(&self) -> PathBuf {
        self.dir.join(PLAYERS_FILE)
    }

    pub fn teams_path(&self) -> PathBuf {
        self.dir.join(TEAMS_FILE)
    }
}

/// Missing or blank file reads as an empty collection.
fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<BTreeMap<String, T>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = std::fs::read(path)?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }
    serde_json::from_slice(&data)
        .map_err(|e| StoreError::Corrupted(format!("{}: {}", path.display(), e)))
}

fn write_collection<T: Serialize>(path: &Path, records: &BTreeMap<String, T>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_vec_pretty(records)?;

    // Atomic save: write to temp file, then rename
    let temp_path = path.with_extension("json.tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.flush()?;
        file.sync_all()?;
    }
    rename(&temp_path, path)?;

    log::debug!("Saved {} records ({} bytes) to {:?}", records.len(), data.len(), path);
    Ok(())
}

impl PlayerStore for JsonFileStore {
    fn load_player(&self, user_id: &str) -> Result<Option<Player>, StoreError> {
        let _guard = acquire(&self.players);
        let path = self.players_path();
        // Records stay untyped so one legacy entry doesn't block the others.
        let mut records: BTreeMap<String, Value> = read_collection(&path)?;

        let Some(record) = records.remove(user_id) else {
            return Ok(None);
        };
        let (player, migrated) = migrate_player(record)?;

        if migrated {
            records.insert(user_id.to_string(), serde_json::to_value(&player)?);
            write_collection(&path, &records)?;
        }
        Ok(Some(player))
    }

    fn save_player(&self, player: &Player) -> Result<(), StoreError> {
        let _guard = acquire(&self.players);
        let path = self.players_path();
        let mut records: BTreeMap<String, Value> = read_collection(&path)?;
        records.insert(player.user_id.clone(), serde_json::to_value(player)?);
        write_collection(&path, &records)
    }

    fn delete_player(&self, user_id: &str) -> Result<bool, StoreError> {
        let _guard = acquire(&self.players);
        let path = self.players_path();
        let mut records: BTreeMap<String, Value> = read_collection(&path)?;
        if records.remove(user_id).is_none() {
            return Ok(false);
        }
        write_collection(&path, &records)?;
        Ok(true)
    }
}

impl TeamStore for JsonFileStore {
    fn load_team(&self, team_id: &str) -> Result<Option<Team>, StoreError> {
        let _guard = acquire(&self.teams);
        let mut teams: BTreeMap<String, Team> = read_collection(&self.teams_path())?;
        Ok(teams.remove(team_id))
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        self.save_teams(std::slice::from_ref(team))
    }

    fn save_teams(&self, teams: &[Team]) -> Result<(), StoreError> {
        let _guard = acquire(&self.teams);
        let path = self.teams_path();
        let mut records: BTreeMap<String, Team> = read_collection(&path)?;
        for team in teams {
            records.insert(team.id.clone(), team.clone());
        }
        write_collection(&path, &records)
    }

    fn list_all_teams(&self) -> Result<Vec<Team>, StoreError> {
        let _guard = acquire(&self.teams);
        let teams: BTreeMap<String, Team> = read_collection(&self.teams_path())?;
        Ok(teams.into_values().collect())
    }
}
