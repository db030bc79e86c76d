//! Memoization of the scored table.

use crate::Result;
use polars::prelude::*;

/// Remembers the last scoring input and its output.
///
/// The key is the input table itself: a lookup hits only when the new input
/// is equal to the cached one, nulls included. Callers stay correct with an
/// empty or invalidated cache, they just recompute.
#[derive(Debug, Default)]
pub struct ScoreCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

#[derive(Debug)]
struct CacheEntry {
    input: DataFrame,
    output: DataFrame,
}

impl ScoreCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached output for `input`, or compute and remember it.
    ///
    /// A failed computation leaves the previous entry in place.
    pub fn get_or_try_insert<F>(&mut self, input: &DataFrame, compute: F) -> Result<DataFrame>
    where
        F: FnOnce(&DataFrame) -> Result<DataFrame>,
    {
        if let Some(entry) = &self.entry {
            if entry.input.equals_missing(input) {
                self.hits += 1;
                tracing::debug!(hits = self.hits, "score cache hit");
                return Ok(entry.output.clone());
            }
        }

        self.misses += 1;
        tracing::debug!(misses = self.misses, "score cache miss");

        let output = compute(input)?;
        self.entry = Some(CacheEntry {
            input: input.clone(),
            output: output.clone(),
        });
        Ok(output)
    }

    /// Drop the cached entry.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of lookups answered from the cache.
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that had to compute.
    pub const fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImpactError;

    fn doubled(df: &DataFrame) -> Result<DataFrame> {
        let out = df
            .clone()
            .lazy()
            .with_column((col("x") * lit(2.0)).alias("x"))
            .collect()?;
        Ok(out)
    }

    #[test]
    fn test_hit_on_equal_input() {
        let mut cache = ScoreCache::new();
        let a = df!["x" => [1.0, 2.0, 3.0]].unwrap();
        let a_copy = df!["x" => [1.0, 2.0, 3.0]].unwrap();

        let first = cache.get_or_try_insert(&a, doubled).unwrap();
        let second = cache
            .get_or_try_insert(&a_copy, |_| panic!("should not recompute"))
            .unwrap();

        assert!(first.equals(&second));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_miss_on_changed_input() {
        let mut cache = ScoreCache::new();
        let a = df!["x" => [1.0, 2.0, 3.0]].unwrap();
        let b = df!["x" => [1.0, 2.0, 4.0]].unwrap();

        cache.get_or_try_insert(&a, doubled).unwrap();
        let out = cache.get_or_try_insert(&b, doubled).unwrap();

        let x: Vec<f64> = out
            .column("x")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(x, vec![2.0, 4.0, 8.0]);
        assert_eq!((cache.hits(), cache.misses()), (0, 2));
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut cache = ScoreCache::new();
        let a = df!["x" => [1.0]].unwrap();

        cache.get_or_try_insert(&a, doubled).unwrap();
        cache.invalidate();
        cache.get_or_try_insert(&a, doubled).unwrap();

        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_error_is_not_cached() {
        let mut cache = ScoreCache::new();
        let a = df!["x" => [1.0]].unwrap();

        let err = cache
            .get_or_try_insert(&a, |_| Err(ImpactError::MissingColumn("x".to_string())))
            .unwrap_err();
        assert!(matches!(err, ImpactError::MissingColumn(_)));

        cache.get_or_try_insert(&a, doubled).unwrap();
        assert_eq!((cache.hits(), cache.misses()), (0, 2));
    }
}
