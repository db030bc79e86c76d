//! The impact scoring engine.
//!
//! Scoring runs independently for every configured position: the position's
//! rows are selected, its five features are standardized within that subset,
//! and the impact score is the weighted sum of the standardized values.

use crate::standardize::{moments, scaled_column, standardize};
use crate::{ImpactError, PositionProfile, ProfileSet, Result};
use polars::prelude::*;

/// Name of the impact score column in scored tables.
pub const IMPACT_SCORE: &str = "Impact Score";

/// Scores prepared tables against a fixed set of position profiles.
///
/// The engine holds no state besides its configuration; scoring the same
/// table twice yields identical output.
#[derive(Debug, Clone)]
pub struct ImpactScorer {
    profiles: ProfileSet,
    position_column: String,
}

impl ImpactScorer {
    /// Create a scorer reading positions from `position_column`.
    pub fn new(profiles: ProfileSet, position_column: impl Into<String>) -> Self {
        Self {
            profiles,
            position_column: position_column.into(),
        }
    }

    /// Profiles this scorer applies.
    pub const fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    /// Column holding the position category.
    pub fn position_column(&self) -> &str {
        &self.position_column
    }

    /// Score every row of a prepared table.
    ///
    /// Returns the rows of all configured positions, positions in profile
    /// order and source order within a position, each extended with
    /// [`IMPACT_SCORE`] and one `Scaled <feature>` column per feature of its
    /// profile. Scaled columns of other positions' profiles are null.
    ///
    /// Every configured feature must be a numeric column of `prepared`,
    /// otherwise [`ImpactError::ConfigMismatch`] is returned before anything
    /// is computed. Rows whose position has no profile are left out.
    pub fn score(&self, prepared: &DataFrame) -> Result<DataFrame> {
        self.check_features(prepared)?;

        let mut frames = Vec::with_capacity(self.profiles.len());
        let mut scored_rows = 0;

        for profile in self.profiles.iter() {
            let subset = prepared
                .clone()
                .lazy()
                .filter(col(self.position_column.as_str()).eq(lit(profile.position().label())))
                .collect()?;

            if subset.height() == 0 {
                tracing::debug!(position = %profile.position(), "no rows to score");
                continue;
            }

            let scored = score_position(&subset, profile)?;
            scored_rows += scored.height();
            frames.push(scored.lazy());
        }

        let unscored = prepared.height() - scored_rows;
        if unscored > 0 {
            tracing::warn!(
                rows = unscored,
                positions = ?self.profiles.positions(),
                "rows without a configured position profile were left out"
            );
        }

        if frames.is_empty() {
            return self.empty_output(prepared);
        }

        let scored = concat_lf_diagonal(frames, UnionArgs::default())?.collect()?;
        Ok(scored)
    }

    fn check_features(&self, prepared: &DataFrame) -> Result<()> {
        for profile in self.profiles.iter() {
            for feature in profile.features() {
                let numeric = prepared
                    .column(feature)
                    .map(|c| c.dtype().is_primitive_numeric())
                    .unwrap_or(false);

                if !numeric {
                    return Err(ImpactError::ConfigMismatch {
                        position: profile.position(),
                        feature: feature.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Prepared schema plus score and scaled columns, with no rows.
    fn empty_output(&self, prepared: &DataFrame) -> Result<DataFrame> {
        let mut names = vec![IMPACT_SCORE.to_string()];
        for feature in self.profiles.iter().flat_map(PositionProfile::features) {
            let name = scaled_column(feature);
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let empty = prepared
            .clear()
            .lazy()
            .with_columns(
                names
                    .into_iter()
                    .map(|name| lit(NULL).cast(DataType::Float64).alias(name))
                    .collect::<Vec<_>>(),
            )
            .collect()?;
        Ok(empty)
    }
}

impl Default for ImpactScorer {
    fn default() -> Self {
        Self::new(ProfileSet::with_defaults(), "Position")
    }
}

/// Standardize one position's features and compute its impact scores.
fn score_position(subset: &DataFrame, profile: &PositionProfile) -> Result<DataFrame> {
    let features: Vec<&str> = profile.features().iter().map(String::as_str).collect();

    for feature in &features {
        if moments(subset, feature)?.is_some_and(|m| m.is_degenerate()) {
            tracing::warn!(
                position = %profile.position(),
                feature = %feature,
                "feature has zero variance, standardized values set to 0"
            );
        }
    }

    let score = profile
        .weighted_features()
        .map(|(feature, weight)| col(scaled_column(feature)) * lit(weight))
        .reduce(|acc, term| acc + term)
        .unwrap_or_else(|| lit(0.0));

    let scored = standardize(subset, &features)?
        .lazy()
        .with_column(score.alias(IMPACT_SCORE))
        .collect()?;

    tracing::debug!(
        position = %profile.position(),
        rows = scored.height(),
        "scored position"
    );
    Ok(scored)
}
