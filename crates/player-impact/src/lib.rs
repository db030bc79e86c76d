#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod card;
pub mod dashboard;
pub mod error;
pub mod load;
pub mod position;
pub mod prepare;
pub mod profile;
pub mod scoring;
pub mod settings;
pub mod standardize;

// Re-export core types
pub use cache::ScoreCache;
pub use card::{Comparison, ComparisonRow, FeatureValue, PlayerCard, RADAR_RANGE};
pub use dashboard::{DEFAULT_TOP_N, ImpactDashboard, LeagueTable, PositionRanking};
pub use error::{ImpactError, Result};
pub use load::load_table;
pub use position::{ParsePositionError, Position};
pub use prepare::prepare;
pub use profile::{FEATURES_PER_PROFILE, PositionProfile, ProfileSet};
pub use scoring::{IMPACT_SCORE, ImpactScorer};
pub use settings::{ColumnNames, PipelineConfig, PositionLabel};
pub use standardize::{scaled_column, standardize, zscore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
