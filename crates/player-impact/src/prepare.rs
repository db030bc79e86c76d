//! Data preparation: qualifying filters, position mapping, per-90 rates.

use crate::{PipelineConfig, Result};
use polars::prelude::*;

/// Minutes in a full match, the basis of per-90 rates.
pub const MINUTES_PER_MATCH: f64 = 90.0;

/// Turn a raw season table into the prepared table.
///
/// In order:
/// 1. keep rows whose minutes-played percentage exceeds
///    [`PipelineConfig::min_minutes_pct`];
/// 2. keep rows from the configured leagues;
/// 3. replace source position labels with their category label and drop
///    rows whose label is not mapped (goalkeepers, missing positions);
/// 4. add a per-90 column for every configured counting statistic.
///
/// A row with zero minutes cannot pass step 1 in consistent data. If one
/// does, its per-90 values are null rather than infinite, so the scoring
/// stage leaves it out of the feature statistics.
pub fn prepare(raw: &DataFrame, config: &PipelineConfig) -> Result<DataFrame> {
    let columns = &config.columns;

    let prepared = raw
        .clone()
        .lazy()
        .filter(col(columns.minutes_pct.as_str()).gt(lit(config.min_minutes_pct)))
        .filter(league_filter(columns.league.as_str(), &config.leagues))
        .with_column(position_mapping(config).alias(columns.position.as_str()))
        .filter(col(columns.position.as_str()).is_not_null())
        .with_columns(per90_columns(config))
        .collect()?;

    tracing::debug!(
        raw_rows = raw.height(),
        prepared_rows = prepared.height(),
        "prepared player table"
    );
    Ok(prepared)
}

fn league_filter(league_column: &str, leagues: &[String]) -> Expr {
    leagues
        .iter()
        .map(|league| col(league_column).eq(lit(league.as_str())))
        .reduce(|acc, e| acc.or(e))
        .unwrap_or_else(|| lit(false))
}

fn position_mapping(config: &PipelineConfig) -> Expr {
    let source = config.columns.position.as_str();
    config
        .position_labels
        .iter()
        .rev()
        .fold(lit(NULL).cast(DataType::String), |otherwise, label| {
            when(col(source).eq(lit(label.source.as_str())))
                .then(lit(label.position.label()))
                .otherwise(otherwise)
        })
}

fn per90_columns(config: &PipelineConfig) -> Vec<Expr> {
    let minutes = col(config.columns.minutes.as_str()).cast(DataType::Float64);

    config
        .per90_stats
        .iter()
        .map(|stat| {
            when(minutes.clone().gt(lit(0.0)))
                .then(
                    col(stat.as_str()).cast(DataType::Float64) / minutes.clone()
                        * lit(MINUTES_PER_MATCH),
                )
                .otherwise(lit(NULL).cast(DataType::Float64))
                .alias(config.per90_column(stat))
        })
        .collect()
}
