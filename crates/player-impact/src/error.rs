//! Error types for loading, preparing, and scoring player tables.

use crate::{ParsePositionError, Position};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for impact scoring operations.
pub type Result<T> = std::result::Result<T, ImpactError>;

/// Errors that can occur while building or querying the scored table.
#[derive(Debug, Error)]
pub enum ImpactError {
    /// The input file could not be read or parsed
    #[error("Failed to load player table from {}: {source}", path.display())]
    Load {
        /// Path of the input file
        path: PathBuf,
        /// Underlying DataFrame error
        #[source]
        source: polars::error::PolarsError,
    },

    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A profile feature is absent from the prepared table, or not numeric
    #[error("Feature '{feature}' configured for {position} is not a numeric column of the prepared table")]
    ConfigMismatch {
        /// Position whose profile references the feature
        position: Position,
        /// Configured feature name
        feature: String,
    },

    /// A position profile violates its preconditions
    #[error("Invalid {position} profile: {reason}")]
    InvalidProfile {
        /// Position the profile belongs to
        position: Position,
        /// What is wrong with it
        reason: String,
    },

    /// More than one profile was configured for the same position
    #[error("Duplicate profile for position {0}")]
    DuplicateProfile(Position),

    /// The requested player is not part of the selected rows
    #[error("Player not found: '{player}' in {league}")]
    PlayerNotFound {
        /// Requested player name
        player: String,
        /// League the lookup was restricted to
        league: String,
    },

    /// A scored row carries a position label outside the known categories
    #[error("Invalid position in scored rows: {0}")]
    InvalidPosition(#[from] ParsePositionError),

    /// Configuration file or environment could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ImpactError {
    /// Whether the presentation layer should fall back to a placeholder
    /// instead of aborting.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::PlayerNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_player_not_found_is_recoverable() {
        let missing = ImpactError::PlayerNotFound {
            player: "Nobody".to_string(),
            league: "Serie A".to_string(),
        };
        assert!(missing.is_recoverable());
        assert!(!ImpactError::MissingColumn("Joueur".to_string()).is_recoverable());
        assert!(!ImpactError::DuplicateProfile(Position::Defender).is_recoverable());
    }
}
