//! Offline source backed by a JSON fixture file.
//!
//! ```json
//! {
//!   "compounds": [
//!     {
//!       "cid": 2244,
//!       "molecular_weight": 180.16,
//!       "xlogp": 1.2,
//!       "tpsa": 63.6,
//!       "hbond_donors": 1,
//!       "hbond_acceptors": 4,
//!       "rotatable_bonds": 3,
//!       "iupac_name": "2-acetyloxybenzoic acid",
//!       "formula": "C9H8O4",
//!       "synonyms": ["aspirin"]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use plasmamem_core::model::{CompoundId, PropertyRecord};
use plasmamem_core::traits::CompoundSource;

use crate::error::SourceError;
use crate::pubchem;

/// One compound in a fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCompound {
    #[serde(flatten)]
    pub properties: PropertyRecord,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    compounds: Vec<FixtureCompound>,
}

/// Compound data served from memory.
#[derive(Debug, Default)]
pub struct FixtureSource {
    compounds: HashMap<CompoundId, FixtureCompound>,
}

impl FixtureSource {
    pub fn new(compounds: Vec<FixtureCompound>) -> Self {
        Self {
            compounds: compounds
                .into_iter()
                .map(|c| (c.properties.cid, c))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: FixtureFile = serde_json::from_str(json).context("invalid fixture JSON")?;
        Ok(Self::new(file.compounds))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture: {}", path.display()))?;
        let source = Self::from_json(&content)
            .with_context(|| format!("failed to parse fixture: {}", path.display()))?;
        tracing::debug!(compounds = source.len(), "loaded fixture source");
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }

    /// Identifiers present in the fixture, ascending.
    pub fn ids(&self) -> Vec<CompoundId> {
        let mut ids: Vec<_> = self.compounds.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn get(&self, cid: CompoundId) -> Result<&FixtureCompound, SourceError> {
        self.compounds.get(&cid).ok_or(SourceError::NotFound(cid))
    }
}

#[async_trait]
impl CompoundSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch_properties(&self, cid: CompoundId) -> anyhow::Result<PropertyRecord> {
        Ok(self.get(cid)?.properties.clone())
    }

    async fn fetch_formula(&self, cid: CompoundId) -> anyhow::Result<String> {
        self.get(cid)?
            .formula
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no formula for compound {cid}"))
    }

    async fn fetch_synonyms(&self, cid: CompoundId) -> anyhow::Result<Vec<String>> {
        Ok(self.get(cid)?.synonyms.clone())
    }

    fn structure_image_url(&self, cid: CompoundId) -> String {
        pubchem::structure_image_url(pubchem::DEFAULT_BASE_URL, cid)
    }

    fn record_url(&self, cid: CompoundId) -> String {
        pubchem::record_url(cid)
    }
}
