use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupted data: {0}")]
    Corrupted(String),

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl StoreError {
    pub fn team_not_found(id: &str) -> Self {
        StoreError::NotFound { entity: "Team", id: id.to_string() }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Io(_) => true,
            StoreError::NotFound { .. } => true,
            StoreError::VersionMismatch { .. } => true, // Can try migration
            StoreError::Json(_) => false,
            StoreError::Corrupted(_) => false,
        }
    }
}
