//! Compound identifier pool.
//!
//! Loaded once at startup from a JSON array of CIDs and sampled uniformly,
//! with replacement, for every round attempt.

use std::path::Path;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::CompoundId;

/// Read-only population of candidate compound identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundPool {
    ids: Vec<CompoundId>,
}

impl CompoundPool {
    pub fn new(ids: Vec<CompoundId>) -> Self {
        Self { ids }
    }

    /// Parse a pool from a JSON array such as `[2244, 3672, 2519]`.
    pub fn from_json(json: &str) -> Result<Self> {
        let ids: Vec<CompoundId> =
            serde_json::from_str(json).context("compound pool must be a JSON array of integers")?;
        Ok(Self::new(ids))
    }

    /// Load a pool from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read compound pool: {}", path.display()))?;
        let pool = Self::from_json(&content)
            .with_context(|| format!("failed to parse compound pool: {}", path.display()))?;
        tracing::debug!(size = pool.len(), path = %path.display(), "loaded compound pool");
        Ok(pool)
    }

    /// Draw one identifier uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<CompoundId> {
        self.ids.choose(rng).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[CompoundId] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_json_array() {
        let pool = CompoundPool::from_json("[2244, 3672, 2519]").unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.ids(), &[2244, 3672, 2519]);
    }

    #[test]
    fn reject_non_integer_entries() {
        assert!(CompoundPool::from_json(r#"["aspirin"]"#).is_err());
        assert!(CompoundPool::from_json("{}").is_err());
    }

    #[test]
    fn empty_pool_samples_nothing() {
        let pool = CompoundPool::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pool.is_empty());
        assert_eq!(pool.sample(&mut rng), None);
    }

    #[test]
    fn samples_come_from_the_pool() {
        let pool = CompoundPool::new(vec![1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let cid = pool.sample(&mut rng).unwrap();
            assert!(pool.ids().contains(&cid));
        }
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        std::fs::write(&path, "[5793, 2244]").unwrap();
        let pool = CompoundPool::load(&path).unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn load_missing_file_names_the_path() {
        let err = CompoundPool::load(Path::new("no_such_pool.json")).unwrap_err();
        assert!(format!("{err:#}").contains("no_such_pool.json"));
    }
}
