//! Position categories used to select a scoring profile.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Coarse playing role of a player.
///
/// The display form (`Attacker`, `Midfielder`, `Defender`) is the label
/// stored in the position column of prepared and scored tables.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Forwards and wingers
    Attacker,
    /// Central and wide midfielders
    Midfielder,
    /// Centre-backs and full-backs
    Defender,
}

impl Position {
    /// All positions, in ranking display order.
    pub const ALL: [Self; 3] = [Self::Attacker, Self::Midfielder, Self::Defender];

    /// Label written to the position column.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attacker => "Attacker",
            Self::Midfielder => "Midfielder",
            Self::Defender => "Defender",
        }
    }
}

/// Error returned when a string names no known position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown position '{0}' (expected attacker, midfielder or defender)")]
pub struct ParsePositionError(String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attacker" => Ok(Self::Attacker),
            "midfielder" => Ok(Self::Midfielder),
            "defender" => Ok(Self::Defender),
            _ => Err(ParsePositionError(s.to_string())),
        }
    }
}
