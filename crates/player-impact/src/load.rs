//! Reading the raw season table from disk.

use crate::{ImpactError, PipelineConfig, Result};
use polars::prelude::*;
use std::path::Path;

/// Read a headered CSV file into a DataFrame.
///
/// The whole file is loaded or nothing is: an unreadable or malformed file
/// fails with [`ImpactError::Load`], and a file lacking any of
/// [`PipelineConfig::required_columns`] fails with
/// [`ImpactError::MissingColumn`]. Columns beyond the required ones are
/// kept, so profile features such as successful dribbles pass through.
pub fn load_table(path: impl AsRef<Path>, config: &PipelineConfig) -> Result<DataFrame> {
    let path = path.as_ref();
    let load_error = |source| ImpactError::Load {
        path: path.to_path_buf(),
        source,
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(load_error)?;

    ensure_columns(&df, &config.required_columns())?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded player table"
    );
    Ok(df)
}

/// Check that every named column is present.
pub fn ensure_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    match columns
        .iter()
        .find(|name| df.get_column_index(name).is_none())
    {
        Some(missing) => Err(ImpactError::MissingColumn((*missing).to_string())),
        None => Ok(()),
    }
}
