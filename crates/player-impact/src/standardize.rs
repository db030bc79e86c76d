//! Standardization utilities for feature columns.
//!
//! Features are z-scored within a comparison group (one position) so that
//! statistics on different scales contribute comparably to the impact score.

use crate::Result;
use polars::prelude::*;

/// Prefix of the columns holding standardized feature values.
pub const SCALED_PREFIX: &str = "Scaled ";

/// Standard deviations at or below this are treated as zero variance.
pub const ZERO_VARIANCE_EPSILON: f64 = 1e-12;

/// Name of the standardized column for a feature.
pub fn scaled_column(feature: &str) -> String {
    format!("{SCALED_PREFIX}{feature}")
}

/// Population z-score of a column.
///
/// Computes z_i = (x_i - mean(x)) / std(x) with the population standard
/// deviation (ddof = 0). Null values are ignored by the mean and standard
/// deviation and stay null in the output.
///
/// When the column has zero variance every non-null value maps to 0.
pub fn zscore(column: &str) -> Expr {
    let x = values(column);
    let std = population_std(column);

    when(std.clone().gt(lit(ZERO_VARIANCE_EPSILON)))
        .then((x.clone() - x.clone().mean()) / std)
        .otherwise(
            when(x.is_null())
                .then(lit(NULL).cast(DataType::Float64))
                .otherwise(lit(0.0)),
        )
}

fn values(column: &str) -> Expr {
    col(column).cast(DataType::Float64)
}

fn population_std(column: &str) -> Expr {
    values(column).std(0)
}

/// Append a standardized copy of each column.
///
/// # Arguments
///
/// * `df` - DataFrame holding one comparison group
/// * `columns` - Numeric columns to standardize
///
/// # Returns
///
/// DataFrame with one extra `Scaled <column>` column per input column; the
/// original columns are left untouched.
pub fn standardize(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let result = df
        .clone()
        .lazy()
        .with_columns(
            columns
                .iter()
                .map(|c| zscore(c).alias(scaled_column(c)))
                .collect::<Vec<_>>(),
        )
        .collect()?;

    Ok(result)
}

/// Mean and population standard deviation of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Mean of the non-null values
    pub mean: f64,
    /// Population standard deviation of the non-null values
    pub std: f64,
}

impl Moments {
    /// Whether standardizing against these moments collapses to zero.
    pub fn is_degenerate(&self) -> bool {
        self.std <= ZERO_VARIANCE_EPSILON
    }
}

/// Compute [`Moments`] of a column, or `None` if it has no non-null value.
///
/// Uses the same expressions as [`zscore`], so [`Moments::is_degenerate`]
/// agrees with the zero fill applied there.
pub fn moments(df: &DataFrame, column: &str) -> Result<Option<Moments>> {
    let stats = df
        .clone()
        .lazy()
        .select([
            values(column).mean().alias("mean"),
            population_std(column).alias("std"),
        ])
        .collect()?;

    let mean = stats.column("mean")?.f64()?.get(0);
    let std = stats.column("std")?.f64()?.get(0);
    Ok(mean.zip(std).map(|(mean, std)| Moments { mean, std }))
}
