use thiserror::Error;

use crate::config::ConfigError;
use crate::save::StoreError;

/// Errors surfaced by career actions.
#[derive(Error, Debug)]
pub enum CareerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("Offer {offer_id} has expired")]
    Expired { offer_id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CareerError {
    pub fn player_not_found(id: &str) -> Self {
        CareerError::NotFound { entity: "Player", id: id.to_string() }
    }

    pub fn team_not_found(id: &str) -> Self {
        CareerError::NotFound { entity: "Team", id: id.to_string() }
    }

    pub fn offer_not_found(id: &str) -> Self {
        CareerError::NotFound { entity: "Offer", id: id.to_string() }
    }

    /// Rejections the caller should show to the user as-is. Storage and
    /// configuration failures are operator problems instead.
    pub fn is_user_facing(&self) -> bool {
        match self {
            CareerError::NotFound { .. } => true,
            CareerError::PreconditionFailed(_) => true,
            CareerError::Expired { .. } => true,
            CareerError::InvalidInput(_) => true,
            CareerError::Storage(_) => false,
            CareerError::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CareerError>;
