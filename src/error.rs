//! Error types for entity resolution

use thiserror::Error;

use crate::model::{Cardinality, DatabaseType};

/// Result type for entity resolution
pub type Result<T> = std::result::Result<T, EntityError>;

/// Fatal entity resolution errors.
///
/// Irregularities that can be corrected (illegal required flags, the reserved
/// user entity) never surface here; they are recorded as diagnostics instead.
#[derive(Error, Debug)]
pub enum EntityError {
    #[error("Missing input: the {what} is mandatory")]
    MissingInput { what: &'static str },

    #[error("Incompatible storage model: {database} entities can't have relationships ({associations} association(s) declared)")]
    IncompatibleStorageModel {
        database: DatabaseType,
        associations: usize,
    },

    #[error("Invalid {cardinality} association from {from} to {to}: {reason}")]
    InvalidAssociation {
        cardinality: Cardinality,
        from: String,
        to: String,
        reason: String,
    },

    #[error("Unresolved type '{type_id}' for field {field} of {class}")]
    UnresolvedFieldType {
        class: String,
        field: String,
        type_id: String,
    },

    #[error("Unknown {kind} '{id}' referenced by {owner}")]
    UnknownReference {
        kind: &'static str,
        id: String,
        owner: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
