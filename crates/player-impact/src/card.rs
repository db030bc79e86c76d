//! Typed views of scored rows for display.

use crate::Position;
use serde::Serialize;

/// Radial axis range used when plotting standardized features.
pub const RADAR_RANGE: (f64, f64) = (-3.0, 3.0);

/// One profile feature of a player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureValue {
    /// Feature column name
    pub name: String,
    /// Weight of the feature in the impact score
    pub weight: f64,
    /// Value before standardization
    pub raw: Option<f64>,
    /// Standardized value within the player's position
    pub scaled: Option<f64>,
}

/// A scored player as shown in rankings and comparisons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerCard {
    /// Player name
    pub player: String,
    /// Club
    pub team: Option<String>,
    /// League
    pub league: Option<String>,
    /// Position category
    pub position: Position,
    /// Age in years
    pub age: Option<f64>,
    /// Impact score; missing when a feature value was missing
    pub impact_score: Option<f64>,
    /// Profile features, in profile order
    pub features: Vec<FeatureValue>,
}

impl PlayerCard {
    /// Radar-chart series: feature names with standardized values.
    ///
    /// Missing values are plotted at the centre of the scale.
    pub fn radar(&self) -> Vec<(&str, f64)> {
        self.features
            .iter()
            .map(|f| (f.name.as_str(), f.scaled.unwrap_or(0.0)))
            .collect()
    }

    /// Raw value of a profile feature.
    pub fn raw(&self, feature: &str) -> Option<f64> {
        self.features
            .iter()
            .find(|f| f.name == feature)
            .and_then(|f| f.raw)
    }
}

/// One line of the side-by-side comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Statistic name
    pub statistic: String,
    /// Value for the first player
    pub left: Option<f64>,
    /// Value for the second player
    pub right: Option<f64>,
}

/// Head-to-head comparison of two players.
///
/// The detailed table lists the first player's profile features, with the
/// second player's values for the same statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// First selected player
    pub left: PlayerCard,
    /// Second selected player
    pub right: PlayerCard,
    /// Detailed statistics table
    pub rows: Vec<ComparisonRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> PlayerCard {
        PlayerCard {
            player: "Nine".to_string(),
            team: Some("Club".to_string()),
            league: Some("Serie A".to_string()),
            position: Position::Attacker,
            age: Some(25.0),
            impact_score: Some(0.4),
            features: vec![
                FeatureValue {
                    name: "Buts par 90".to_string(),
                    weight: 0.6,
                    raw: Some(0.8),
                    scaled: Some(1.5),
                },
                FeatureValue {
                    name: "Dribbles reussis".to_string(),
                    weight: 0.4,
                    raw: None,
                    scaled: None,
                },
            ],
        }
    }

    #[test]
    fn test_radar_series() {
        let card = card();
        assert_eq!(
            card.radar(),
            vec![("Buts par 90", 1.5), ("Dribbles reussis", 0.0)]
        );
    }

    #[test]
    fn test_raw_lookup() {
        let card = card();
        assert_eq!(card.raw("Buts par 90"), Some(0.8));
        assert_eq!(card.raw("Dribbles reussis"), None);
        assert_eq!(card.raw("Unknown"), None);
    }
}
