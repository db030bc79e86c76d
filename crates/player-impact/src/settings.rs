//! Pipeline configuration.
//!
//! Everything the pipeline needs to know about the input vocabulary lives
//! here as data: column names, qualifying leagues, the minutes threshold,
//! the statistics to normalize, and the position profiles. Values are
//! layered from built-in defaults, an optional TOML file, and `IMPACT_*`
//! environment variables.

use crate::profile::{PositionProfile, ProfileSet, default_profiles};
use crate::{Position, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "impact";

/// Prefix of environment variable overrides (`IMPACT_MIN_MINUTES_PCT`, ...).
pub const ENV_PREFIX: &str = "IMPACT";

/// Names of the identity and playing-time columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    /// Player name
    #[serde(default = "default_player")]
    pub player: String,
    /// Club
    #[serde(default = "default_team")]
    pub team: String,
    /// League
    #[serde(default = "default_league")]
    pub league: String,
    /// Position (source vocabulary on input, categories after preparation)
    #[serde(default = "default_position")]
    pub position: String,
    /// Age
    #[serde(default = "default_age")]
    pub age: String,
    /// Share of available minutes played, in percent
    #[serde(default = "default_minutes_pct")]
    pub minutes_pct: String,
    /// Minutes played
    #[serde(default = "default_minutes")]
    pub minutes: String,
}

fn default_player() -> String {
    "Joueur".to_string()
}

fn default_team() -> String {
    "Equipe".to_string()
}

fn default_league() -> String {
    "Ligue".to_string()
}

fn default_position() -> String {
    "Position".to_string()
}

fn default_age() -> String {
    "Age".to_string()
}

fn default_minutes_pct() -> String {
    "Pourcentage de minutes jouees".to_string()
}

fn default_minutes() -> String {
    "Minutes jouees".to_string()
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            player: default_player(),
            team: default_team(),
            league: default_league(),
            position: default_position(),
            age: default_age(),
            minutes_pct: default_minutes_pct(),
            minutes: default_minutes(),
        }
    }
}

/// Mapping of one source position label onto a position category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionLabel {
    /// Label as it appears in the input file
    pub source: String,
    /// Category it maps to
    pub position: Position,
}

/// Full configuration of the loading, preparation and scoring stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input CSV file
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Rows must have a strictly greater minutes-played percentage
    #[serde(default = "default_min_minutes_pct")]
    pub min_minutes_pct: f64,
    /// Qualifying leagues, in selector order
    #[serde(default = "default_leagues")]
    pub leagues: Vec<String>,
    /// Identity and playing-time column names
    #[serde(default)]
    pub columns: ColumnNames,
    /// Counting statistics normalized to per-90 rates
    #[serde(default = "default_per90_stats")]
    pub per90_stats: Vec<String>,
    /// Rate statistics expected in the input as-is
    #[serde(default = "default_rate_stats")]
    pub rate_stats: Vec<String>,
    /// Suffix appended to a counting statistic to name its per-90 column
    #[serde(default = "default_per90_suffix")]
    pub per90_suffix: String,
    /// Source position vocabulary; unlisted labels are dropped
    #[serde(default = "default_position_labels")]
    pub position_labels: Vec<PositionLabel>,
    /// Scoring profiles, one per position
    #[serde(default = "default_profiles")]
    pub profiles: Vec<PositionProfile>,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("df_Big5.csv")
}

const fn default_min_minutes_pct() -> f64 {
    60.0
}

fn default_leagues() -> Vec<String> {
    ["Premier League", "La Liga", "Serie A", "Bundesliga", "Ligue 1"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_per90_stats() -> Vec<String> {
    [
        "Buts",
        "Passes decisives",
        "Tacles reussis",
        "Interceptions",
        "Duels aeriens gagnes",
        "Courses progressives",
        "Ballons recuperes",
        "Passes progressives",
        "Passes reussies totales",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_rate_stats() -> Vec<String> {
    vec![
        "xG par 90 minutes".to_string(),
        "xG + xAG par 90 minutes".to_string(),
    ]
}

fn default_per90_suffix() -> String {
    " par 90".to_string()
}

fn default_position_labels() -> Vec<PositionLabel> {
    [
        ("Forward", Position::Attacker),
        ("Midfielder", Position::Midfielder),
        ("Defender", Position::Defender),
    ]
    .into_iter()
    .map(|(source, position)| PositionLabel {
        source: source.to_string(),
        position,
    })
    .collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            min_minutes_pct: default_min_minutes_pct(),
            leagues: default_leagues(),
            columns: ColumnNames::default(),
            per90_stats: default_per90_stats(),
            rate_stats: default_rate_stats(),
            per90_suffix: default_per90_suffix(),
            position_labels: default_position_labels(),
            profiles: default_profiles(),
        }
    }
}

/// Environment layer, e.g. `IMPACT_MIN_MINUTES_PCT` or `IMPACT_COLUMNS__PLAYER`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl PipelineConfig {
    /// Load configuration from defaults, a config file and the environment.
    ///
    /// With `path` set the file must exist; otherwise `impact.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        let builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;

        // Fail on bad profiles at load time rather than at first scoring.
        config.profile_set()?;
        Ok(config)
    }

    /// Validated profile set built from [`Self::profiles`].
    pub fn profile_set(&self) -> Result<ProfileSet> {
        ProfileSet::new(self.profiles.iter().cloned())
    }

    /// Name of the per-90 column derived from a counting statistic.
    pub fn per90_column(&self, stat: &str) -> String {
        format!("{stat}{}", self.per90_suffix)
    }

    /// Columns the input file must provide.
    pub fn required_columns(&self) -> Vec<&str> {
        let c = &self.columns;
        [
            &c.player,
            &c.team,
            &c.league,
            &c.position,
            &c.age,
            &c.minutes_pct,
            &c.minutes,
        ]
        .into_iter()
        .chain(&self.per90_stats)
        .chain(&self.rate_stats)
        .map(String::as_str)
        .collect()
    }
}
