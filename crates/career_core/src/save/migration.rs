use serde_json::{json, Map, Value};

use crate::config::tuning::FormConfig;
use crate::engine::progression::round_form_delta;
use crate::models::player::PLAYER_SCHEMA_VERSION;
use crate::models::Player;
use crate::save::error::StoreError;

/// Upgrade one stored player record to the current schema.
///
/// Returns the player and whether the record changed (the caller persists
/// migrated records).
pub fn migrate_player(mut record: Value) -> Result<(Player, bool), StoreError> {
    let found = record_version(&record)?;

    let migrated = match found {
        0 => {
            migrate_v0_to_v1(&mut record)?;
            true
        }
        PLAYER_SCHEMA_VERSION => false,
        v if v > PLAYER_SCHEMA_VERSION => {
            // Future version - might be compatible
            log::warn!("Loading player from future schema {} (current: {})", v, PLAYER_SCHEMA_VERSION);
            false
        }
        _ => {
            return Err(StoreError::VersionMismatch { found, expected: PLAYER_SCHEMA_VERSION });
        }
    };

    let player: Player = serde_json::from_value(record)?;

    if migrated {
        log::info!("Migrated player {} from schema {} to {}", player.user_id, found, PLAYER_SCHEMA_VERSION);
    }
    if player.current_team.is_none() {
        log::warn!("Player {} has no club on record", player.user_id);
    }

    Ok((player, migrated))
}

/// Records written before versioning carry no `schemaVersion`.
fn record_version(record: &Value) -> Result<u32, StoreError> {
    match record.get("schemaVersion") {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| StoreError::Corrupted(format!("bad schemaVersion: {}", value))),
    }
}

/// v0 records predate offers, seasons and career stats.
fn migrate_v0_to_v1(record: &mut Value) -> Result<(), StoreError> {
    let fields = record
        .as_object_mut()
        .ok_or_else(|| StoreError::Corrupted("player record is not an object".to_string()))?;

    fill_missing(fields, "pendingOffers", json!([]));
    fill_missing(fields, "season", json!({ "number": 1, "matchesPlayed": 0 }));
    fill_missing(fields, "careerStats", json!({ "bigGamePerformances": 0, "trophies": [] }));
    fill_missing(fields, "matchesPlayed", json!(0));
    fill_missing(fields, "goals", json!(0));
    fill_missing(fields, "assists", json!(0));
    whole_form(fields)?;
    fill_missing(fields, "form", json!(0));
    fill_missing(fields, "stamina", json!(100));

    fields.insert("schemaVersion".to_string(), json!(1));
    Ok(())
}

/// Legacy form accumulated fractional decay; current records hold whole points.
fn whole_form(fields: &mut Map<String, Value>) -> Result<(), StoreError> {
    let raw = match fields.get("form") {
        None | Some(Value::Null) => return Ok(()),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| StoreError::Corrupted(format!("bad form: {}", value)))?,
    };
    let form = FormConfig::default().clamp(round_form_delta(raw));
    fields.insert("form".to_string(), json!(form));
    Ok(())
}

fn fill_missing(fields: &mut Map<String, Value>, key: &str, default: Value) {
    let missing = fields.get(key).map_or(true, Value::is_null);
    if missing {
        fields.insert(key.to_string(), default);
    }
}
