//! End-to-end checks of load → prepare → score on a generated season file.

use approx::assert_relative_eq;
use player_impact::standardize::moments;
use player_impact::{
    IMPACT_SCORE, ImpactDashboard, ImpactError, ImpactScorer, PipelineConfig, Position,
    load_table, prepare, scaled_column,
};
use polars::prelude::*;
use rstest::{fixture, rstest};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "Joueur,Equipe,Ligue,Position,Age,Pourcentage de minutes jouees,Minutes jouees,\
Buts,Passes decisives,Tacles reussis,Interceptions,Duels aeriens gagnes,Courses progressives,\
Ballons recuperes,Passes progressives,Passes reussies totales,xG par 90 minutes,\
xG + xAG par 90 minutes,Dribbles reussis";

const LEAGUES: [&str; 6] = [
    "Premier League",
    "La Liga",
    "Serie A",
    "Bundesliga",
    "Ligue 1",
    "Eredivisie",
];

const POSITIONS: [&str; 4] = ["Forward", "Midfielder", "Defender", "Goalkeeper"];

/// A deterministic season file with a mix of qualifying and excluded rows.
fn season_csv() -> String {
    let mut lines = vec![HEADER.to_string()];

    for i in 0..120_u32 {
        let pct = 40 + (i * 13) % 61;
        let minutes = pct * 34;
        let stat = |a: u32, m: u32| (i * a + 3) % m;
        lines.push(format!(
            "Player {i},Club {},{},{},{},{pct},{minutes},{},{},{},{},{},{},{},{},{},{:.2},{:.2},{}",
            i % 17,
            LEAGUES[(i as usize) % LEAGUES.len()],
            POSITIONS[(i as usize / 6) % POSITIONS.len()],
            18 + i % 17,
            stat(7, 23),
            stat(5, 13),
            stat(11, 71),
            stat(13, 53),
            stat(3, 97),
            stat(17, 151),
            stat(19, 211),
            stat(23, 307),
            400 + stat(29, 1601),
            f64::from(stat(31, 90)) / 100.0,
            f64::from(stat(37, 120)) / 100.0,
            stat(41, 61),
        ));
    }

    // Never played: must not reach scoring.
    lines.push(
        "Unused Sub,Club 0,Serie A,Forward,19,0,0,0,0,0,0,0,0,0,0,0,0.00,0.00,0".to_string(),
    );
    lines.join("\n")
}

#[fixture]
fn season_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(season_csv().as_bytes()).unwrap();
    file
}

#[fixture]
fn settings() -> PipelineConfig {
    PipelineConfig::default()
}

fn prepared(file: &NamedTempFile, config: &PipelineConfig) -> DataFrame {
    let raw = load_table(file.path(), config).unwrap();
    prepare(&raw, config).unwrap()
}

fn scorer(config: &PipelineConfig) -> ImpactScorer {
    ImpactScorer::new(config.profile_set().unwrap(), config.columns.position.clone())
}

fn strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .map(str::to_string)
        .collect()
}

fn floats(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn position_rows(df: &DataFrame, position: Position) -> DataFrame {
    df.clone()
        .lazy()
        .filter(col("Position").eq(lit(position.label())))
        .collect()
        .unwrap()
}

#[rstest]
fn test_prepared_rows_satisfy_filters(season_file: NamedTempFile, #[from(settings)] config: PipelineConfig) {
    let prepared = prepared(&season_file, &config);
    assert!(prepared.height() > 0);

    for pct in floats(&prepared, "Pourcentage de minutes jouees") {
        assert!(pct.unwrap() > 60.0);
    }
    for league in strings(&prepared, "Ligue") {
        assert!(config.leagues.contains(&league), "unexpected league {league}");
    }
    for position in strings(&prepared, "Position") {
        assert!(position.parse::<Position>().is_ok(), "unexpected position {position}");
    }
    assert_eq!(prepared.column("Position").unwrap().null_count(), 0);
}

#[rstest]
fn test_zero_minute_player_never_prepared(season_file: NamedTempFile, #[from(settings)] config: PipelineConfig) {
    let prepared = prepared(&season_file, &config);
    assert!(!strings(&prepared, "Joueur").contains(&"Unused Sub".to_string()));
}

#[rstest]
fn test_per90_rates_are_exact(season_file: NamedTempFile, #[from(settings)] config: PipelineConfig) {
    let prepared = prepared(&season_file, &config);
    let minutes = floats(&prepared, "Minutes jouees");

    for stat in &config.per90_stats {
        let raw = floats(&prepared, stat);
        let rate = floats(&prepared, &config.per90_column(stat));

        for ((raw, rate), minutes) in raw.iter().zip(&rate).zip(&minutes) {
            let expected = raw.unwrap() / minutes.unwrap() * 90.0;
            assert_relative_eq!(rate.unwrap(), expected, epsilon = 1e-9);
        }
    }
}

#[rstest]
fn test_standardized_features_have_zero_mean_unit_std(
    season_file: NamedTempFile,
    #[from(settings)] config: PipelineConfig,
) {
    let scored = scorer(&config).score(&prepared(&season_file, &config)).unwrap();

    for profile in config.profile_set().unwrap().iter() {
        let rows = position_rows(&scored, profile.position());
        assert!(rows.height() > 1);

        for feature in profile.features() {
            let m = moments(&rows, &scaled_column(feature)).unwrap().unwrap();
            assert_relative_eq!(m.mean, 0.0, epsilon = 1e-9);
            assert_relative_eq!(m.std, 1.0, epsilon = 1e-9);
        }
    }
}

#[rstest]
fn test_impact_score_is_weighted_sum(season_file: NamedTempFile, #[from(settings)] config: PipelineConfig) {
    let scored = scorer(&config).score(&prepared(&season_file, &config)).unwrap();

    for profile in config.profile_set().unwrap().iter() {
        let rows = position_rows(&scored, profile.position());
        let scores = floats(&rows, IMPACT_SCORE);

        let mut expected = vec![0.0; rows.height()];
        for (feature, weight) in profile.weighted_features() {
            for (acc, v) in expected.iter_mut().zip(floats(&rows, &scaled_column(feature))) {
                *acc += v.unwrap() * weight;
            }
        }

        for (score, expected) in scores.iter().zip(&expected) {
            assert_relative_eq!(score.unwrap(), *expected, epsilon = 1e-9);
        }
    }
}

#[rstest]
fn test_scoring_is_idempotent(season_file: NamedTempFile, #[from(settings)] config: PipelineConfig) {
    let prepared = prepared(&season_file, &config);
    let scorer = scorer(&config);

    let first = scorer.score(&prepared).unwrap();
    let second = scorer.score(&prepared).unwrap();

    assert_eq!(first.get_column_names(), second.get_column_names());
    let bits = |df: &DataFrame| -> Vec<Option<u64>> {
        floats(df, IMPACT_SCORE)
            .into_iter()
            .map(|v| v.map(f64::to_bits))
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
    assert!(first.equals_missing(&second));
}

#[rstest]
fn test_every_prepared_row_is_scored(season_file: NamedTempFile, #[from(settings)] config: PipelineConfig) {
    let prepared = prepared(&season_file, &config);
    let scored = scorer(&config).score(&prepared).unwrap();

    assert_eq!(scored.height(), prepared.height());
    assert_eq!(scored.column(IMPACT_SCORE).unwrap().null_count(), 0);
}

#[rstest]
fn test_dashboard_queries(season_file: NamedTempFile, #[from(settings)] mut config: PipelineConfig) {
    config.data_path = season_file.path().to_path_buf();
    let mut dashboard = ImpactDashboard::open(config).unwrap();

    let table = dashboard.scored_table("Serie A").unwrap();
    let players = dashboard.players(&table).unwrap();
    assert!(players.len() >= 2);

    let top = dashboard.top_n(&table, Position::Defender, 3).unwrap();
    let cards = dashboard.cards(&top).unwrap();
    assert!(cards.len() <= 3);
    assert!(cards.iter().all(|c| c.position == Position::Defender));

    let comparison = dashboard
        .comparison(&table, &players[0], &players[1])
        .unwrap();
    assert_eq!(comparison.left.player, players[0]);
    assert_eq!(comparison.rows.len(), 5);

    let err = dashboard
        .comparison(&table, &players[0], "Player 0 (loan)")
        .unwrap_err();
    assert!(matches!(err, ImpactError::PlayerNotFound { .. }));
}
