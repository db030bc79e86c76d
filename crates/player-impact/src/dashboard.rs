//! Read-only queries over the scored table.
//!
//! [`ImpactDashboard`] owns the prepared table and the scoring engine, and
//! answers the questions a front end asks: the scored rows of a league, the
//! best players of a position, and head-to-head comparisons. The scored
//! table is memoized; every answer is a fresh immutable value.

use crate::card::{Comparison, ComparisonRow, FeatureValue, PlayerCard};
use crate::{
    IMPACT_SCORE, ImpactError, ImpactScorer, PipelineConfig, Position, Result, ScoreCache,
    load_table, prepare, scaled_column,
};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// Number of players shown per position when no count is given.
pub const DEFAULT_TOP_N: usize = 5;

/// Scored rows restricted to one league.
#[derive(Debug, Clone)]
pub struct LeagueTable {
    league: String,
    rows: DataFrame,
}

impl LeagueTable {
    /// League the rows belong to.
    pub fn league(&self) -> &str {
        &self.league
    }

    /// The scored rows.
    pub const fn rows(&self) -> &DataFrame {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.height()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.height() == 0
    }

    fn with_rows(&self, rows: DataFrame) -> Self {
        Self {
            league: self.league.clone(),
            rows,
        }
    }
}

/// Best players of one position.
#[derive(Debug, Clone, Serialize)]
pub struct PositionRanking {
    /// Position ranked
    pub position: Position,
    /// Players, best first
    pub players: Vec<PlayerCard>,
}

/// Entry point of the presentation layer.
#[derive(Debug)]
pub struct ImpactDashboard {
    config: PipelineConfig,
    scorer: ImpactScorer,
    prepared: DataFrame,
    cache: ScoreCache,
}

impl ImpactDashboard {
    /// Load [`PipelineConfig::data_path`] and build the dashboard.
    pub fn open(config: PipelineConfig) -> Result<Self> {
        let raw = load_table(&config.data_path, &config)?;
        Self::from_raw(config, &raw)
    }

    /// Build the dashboard from an already loaded raw table.
    ///
    /// Preparation and a first scoring pass run here, so configuration
    /// errors such as [`ImpactError::ConfigMismatch`] surface before any
    /// query is answered.
    pub fn from_raw(config: PipelineConfig, raw: &DataFrame) -> Result<Self> {
        let scorer = ImpactScorer::new(config.profile_set()?, config.columns.position.clone());
        let prepared = prepare(raw, &config)?;

        let mut dashboard = Self {
            config,
            scorer,
            prepared,
            cache: ScoreCache::new(),
        };
        dashboard.scored()?;

        tracing::info!(
            players = dashboard.prepared.height(),
            leagues = dashboard.config.leagues.len(),
            "impact dashboard ready"
        );
        Ok(dashboard)
    }

    /// Active configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The scoring engine.
    pub const fn scorer(&self) -> &ImpactScorer {
        &self.scorer
    }

    /// The prepared table scoring runs on.
    pub const fn prepared(&self) -> &DataFrame {
        &self.prepared
    }

    /// Leagues available for selection.
    pub fn leagues(&self) -> &[String] {
        &self.config.leagues
    }

    /// Memoization statistics as `(hits, misses)`.
    pub const fn cache_stats(&self) -> (u64, u64) {
        (self.cache.hits(), self.cache.misses())
    }

    /// The full scored table, all leagues.
    pub fn scored(&mut self) -> Result<DataFrame> {
        self.cache
            .get_or_try_insert(&self.prepared, |prepared| self.scorer.score(prepared))
    }

    /// Scored rows of one league.
    pub fn scored_table(&mut self, league: &str) -> Result<LeagueTable> {
        let rows = self
            .scored()?
            .lazy()
            .filter(col(self.config.columns.league.as_str()).eq(lit(league)))
            .collect()?;

        Ok(LeagueTable {
            league: league.to_string(),
            rows,
        })
    }

    /// Rows of one position, best impact score first, at most `n` of them.
    ///
    /// The sort is stable: equal scores keep their row order. Rows without a
    /// score come last.
    pub fn top_n(&self, table: &LeagueTable, position: Position, n: usize) -> Result<LeagueTable> {
        let rows = table
            .rows
            .clone()
            .lazy()
            .filter(col(self.config.columns.position.as_str()).eq(lit(position.label())))
            .sort(
                [IMPACT_SCORE],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_nulls_last(true)
                    .with_maintain_order(true),
            )
            .limit(IdxSize::try_from(n).unwrap_or(IdxSize::MAX))
            .collect()?;

        Ok(table.with_rows(rows))
    }

    /// Top `n` players of every position in a league.
    pub fn top_by_position(&mut self, league: &str, n: usize) -> Result<Vec<PositionRanking>> {
        let table = self.scored_table(league)?;

        Position::ALL
            .into_iter()
            .map(|position| {
                let top = self.top_n(&table, position, n)?;
                Ok(PositionRanking {
                    position,
                    players: self.cards(&top)?,
                })
            })
            .collect()
    }

    /// Distinct player names, in row order.
    pub fn players(&self, table: &LeagueTable) -> Result<Vec<String>> {
        let names = table.rows.column(self.config.columns.player.as_str())?.str()?;

        let mut seen = HashSet::new();
        Ok(names
            .into_iter()
            .flatten()
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect())
    }

    /// Cards for every row of a table, in row order.
    pub fn cards(&self, table: &LeagueTable) -> Result<Vec<PlayerCard>> {
        (0..table.len())
            .map(|row| self.card_at(&table.rows, row))
            .collect()
    }

    /// Card of the first row whose player name matches.
    pub fn card(&self, table: &LeagueTable, player: &str) -> Result<PlayerCard> {
        let row = self.find_player(table, player)?;
        self.card_at(&table.rows, row)
    }

    /// Side-by-side comparison of two players of the same table.
    ///
    /// Fails with [`ImpactError::PlayerNotFound`] if either name is absent.
    pub fn comparison(&self, table: &LeagueTable, left: &str, right: &str) -> Result<Comparison> {
        let left_row = self.find_player(table, left)?;
        let right_row = self.find_player(table, right)?;

        let left = self.card_at(&table.rows, left_row)?;
        let right = self.card_at(&table.rows, right_row)?;

        let rows = left
            .features
            .iter()
            .map(|feature| {
                Ok(ComparisonRow {
                    statistic: feature.name.clone(),
                    left: feature.raw,
                    right: f64_at(&table.rows, &feature.name, right_row)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Comparison { left, right, rows })
    }

    fn find_player(&self, table: &LeagueTable, player: &str) -> Result<usize> {
        let names = table.rows.column(self.config.columns.player.as_str())?.str()?;

        names
            .into_iter()
            .position(|name| name == Some(player))
            .ok_or_else(|| ImpactError::PlayerNotFound {
                player: player.to_string(),
                league: table.league.clone(),
            })
    }

    fn card_at(&self, rows: &DataFrame, row: usize) -> Result<PlayerCard> {
        let columns = &self.config.columns;

        let label = str_at(rows, &columns.position, row)?.unwrap_or_default();
        let position = label.parse::<Position>()?;

        let features = match self.scorer.profiles().get(position) {
            Some(profile) => profile
                .weighted_features()
                .map(|(name, weight)| {
                    Ok(FeatureValue {
                        name: name.to_string(),
                        weight,
                        raw: f64_at(rows, name, row)?,
                        scaled: f64_at(rows, &scaled_column(name), row)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(PlayerCard {
            player: str_at(rows, &columns.player, row)?.unwrap_or_default(),
            team: str_at(rows, &columns.team, row)?,
            league: str_at(rows, &columns.league, row)?,
            position,
            age: f64_at(rows, &columns.age, row)?,
            impact_score: f64_at(rows, IMPACT_SCORE, row)?,
            features,
        })
    }
}

fn str_at(df: &DataFrame, column: &str, row: usize) -> Result<Option<String>> {
    let values = df.column(column)?.cast(&DataType::String)?;
    Ok(values.str()?.get(row).map(str::to_string))
}

fn f64_at(df: &DataFrame, column: &str, row: usize) -> Result<Option<f64>> {
    let values = df.column(column)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.get(row).filter(|v| v.is_finite()))
}
