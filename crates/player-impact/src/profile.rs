//! Position profiles: the features and weights that define each impact score.
//!
//! A [`ProfileSet`] is the immutable configuration handed to the scoring
//! engine. It groups one [`PositionProfile`] per position and is validated
//! once, at construction.

use crate::{ImpactError, Position, Result};
use serde::{Deserialize, Serialize};

/// Number of features (and weights) every profile carries.
pub const FEATURES_PER_PROFILE: usize = 5;

/// Allowed deviation of a profile's weight sum from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Features and weights used to score one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionProfile {
    position: Position,
    features: Vec<String>,
    weights: Vec<f64>,
}

impl PositionProfile {
    /// Create a validated profile.
    ///
    /// Fails with [`ImpactError::InvalidProfile`] unless there are exactly
    /// [`FEATURES_PER_PROFILE`] distinct features, one finite weight per
    /// feature, and the weights sum to 1.
    pub fn new<S: Into<String>>(
        position: Position,
        features: impl IntoIterator<Item = S>,
        weights: impl IntoIterator<Item = f64>,
    ) -> Result<Self> {
        let profile = Self {
            position,
            features: features.into_iter().map(Into::into).collect(),
            weights: weights.into_iter().collect(),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Position scored by this profile.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Feature column names, in weight order.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Weights, aligned with [`Self::features`].
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterate over `(feature, weight)` pairs.
    pub fn weighted_features(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.features
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }

    /// Check the profile's preconditions.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ImpactError::InvalidProfile {
            position: self.position,
            reason,
        };

        if self.features.len() != FEATURES_PER_PROFILE {
            return Err(invalid(format!(
                "expected {FEATURES_PER_PROFILE} features, got {}",
                self.features.len()
            )));
        }
        if self.weights.len() != self.features.len() {
            return Err(invalid(format!(
                "{} weights for {} features",
                self.weights.len(),
                self.features.len()
            )));
        }
        for (i, feature) in self.features.iter().enumerate() {
            if feature.trim().is_empty() {
                return Err(invalid(format!("feature {i} has an empty name")));
            }
            if self.features[..i].contains(feature) {
                return Err(invalid(format!("feature '{feature}' is listed twice")));
            }
        }
        if let Some(w) = self.weights.iter().find(|w| !w.is_finite()) {
            return Err(invalid(format!("weight {w} is not finite")));
        }

        let sum: f64 = self.weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("weights sum to {sum}, expected 1")));
        }

        Ok(())
    }
}

/// The set of position profiles used by one scoring engine.
///
/// Profiles are kept in [`Position::ALL`] order so that scoring visits
/// positions deterministically.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    profiles: Vec<PositionProfile>,
}

impl ProfileSet {
    /// Build a set from individual profiles.
    ///
    /// Every profile is re-validated; two profiles for the same position
    /// are rejected. Positions without a profile are allowed and simply
    /// produce no scored rows.
    pub fn new(profiles: impl IntoIterator<Item = PositionProfile>) -> Result<Self> {
        let mut profiles: Vec<PositionProfile> = profiles.into_iter().collect();
        for profile in &profiles {
            profile.validate()?;
        }

        profiles.sort_by_key(PositionProfile::position);
        if let Some(pair) = profiles.windows(2).find(|w| w[0].position == w[1].position) {
            return Err(ImpactError::DuplicateProfile(pair[0].position));
        }

        Ok(Self { profiles })
    }

    /// The standard attacker, midfielder and defender profiles.
    pub fn with_defaults() -> Self {
        Self {
            profiles: default_profiles(),
        }
    }

    /// Profile for a position, if configured.
    pub fn get(&self, position: Position) -> Option<&PositionProfile> {
        self.profiles.iter().find(|p| p.position == position)
    }

    /// Iterate over the profiles in position order.
    pub fn iter(&self) -> impl Iterator<Item = &PositionProfile> {
        self.profiles.iter()
    }

    /// Positions that have a profile.
    pub fn positions(&self) -> Vec<Position> {
        self.profiles.iter().map(PositionProfile::position).collect()
    }

    /// Number of configured profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no profile is configured.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Default profiles over the standard column vocabulary.
pub(crate) fn default_profiles() -> Vec<PositionProfile> {
    let profile = |position, features: [&str; 5], weights: [f64; 5]| PositionProfile {
        position,
        features: features.iter().map(|f| f.to_string()).collect(),
        weights: weights.to_vec(),
    };

    vec![
        profile(
            Position::Attacker,
            [
                "Buts par 90",
                "Passes decisives par 90",
                "xG par 90 minutes",
                "Dribbles reussis",
                "Courses progressives par 90",
            ],
            [0.3, 0.25, 0.25, 0.1, 0.1],
        ),
        profile(
            Position::Midfielder,
            [
                "Passes decisives par 90",
                "Passes progressives par 90",
                "Tacles reussis par 90",
                "Interceptions par 90",
                "xG + xAG par 90 minutes",
            ],
            [0.25, 0.25, 0.2, 0.2, 0.1],
        ),
        profile(
            Position::Defender,
            [
                "Tacles reussis par 90",
                "Interceptions par 90",
                "Duels aeriens gagnes par 90",
                "Ballons recuperes par 90",
                "Passes reussies totales par 90",
            ],
            [0.3, 0.3, 0.2, 0.1, 0.1],
        ),
    ]
}
