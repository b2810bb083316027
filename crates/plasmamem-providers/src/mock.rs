//! Mock source for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;

use plasmamem_core::model::{CompoundId, PropertyRecord};
use plasmamem_core::traits::CompoundSource;

use crate::error::SourceError;

#[derive(Debug, Clone, Default)]
struct MockCompound {
    properties: PropertyRecord,
    formula: Option<String>,
    synonyms: Vec<String>,
}

/// A compound source for exercising the quiz engine without network calls.
///
/// Compounds are registered up front. Any cid marked as failing returns a
/// network error from every fetch.
#[derive(Debug, Default)]
pub struct MockSource {
    compounds: HashMap<CompoundId, MockCompound>,
    failing: HashSet<CompoundId>,
    /// Number of property fetches made.
    call_count: AtomicU32,
    /// Last cid whose properties were requested, 0 before the first call.
    last_cid: AtomicU64,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compound.
    pub fn with_compound(
        mut self,
        properties: PropertyRecord,
        formula: Option<&str>,
        synonyms: &[&str],
    ) -> Self {
        self.compounds.insert(
            properties.cid,
            MockCompound {
                properties,
                formula: formula.map(str::to_string),
                synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    /// Make every fetch for `cid` fail.
    pub fn with_failure(mut self, cid: CompoundId) -> Self {
        self.failing.insert(cid);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_cid(&self) -> Option<CompoundId> {
        match self.last_cid.load(Ordering::Relaxed) {
            0 => None,
            cid => Some(cid),
        }
    }

    fn get(&self, cid: CompoundId) -> Result<&MockCompound, SourceError> {
        if self.failing.contains(&cid) {
            return Err(SourceError::NetworkError(format!(
                "mock failure for compound {cid}"
            )));
        }
        self.compounds.get(&cid).ok_or(SourceError::NotFound(cid))
    }
}

#[async_trait]
impl CompoundSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_properties(&self, cid: CompoundId) -> anyhow::Result<PropertyRecord> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.last_cid.store(cid, Ordering::Relaxed);
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
        format!("mock://structure/{cid}")
    }

    fn record_url(&self, cid: CompoundId) -> String {
        format!("mock://record/{cid}")
    }
}
