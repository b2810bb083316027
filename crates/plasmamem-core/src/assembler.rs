//! Round assembly.
//!
//! Samples compounds from the pool until one has a complete property set,
//! then resolves its display name and Lipinski acceptor count. Attempts run
//! one at a time; a failed candidate is abandoned, never retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::instrument;

use crate::error::{AssemblyError, IncompleteRecord};
use crate::formula::approximate_hba;
use crate::model::{CompoundId, RoundLinks, RoundRecord, PLACEHOLDER_NAME};
use crate::pool::CompoundPool;
use crate::traits::CompoundSource;

/// Attempts before giving up on a round.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 12;

/// Builds [`RoundRecord`]s from a [`CompoundSource`].
pub struct RoundAssembler {
    source: Arc<dyn CompoundSource>,
    max_attempts: u32,
    fetch_timeout: Option<Duration>,
}

impl RoundAssembler {
    pub fn new(source: Arc<dyn CompoundSource>) -> Self {
        Self {
            source,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            fetch_timeout: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Bound every collaborator call. A timeout counts as a transport failure.
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Assemble one round from a randomly drawn compound.
    pub async fn assemble<R>(
        &self,
        pool: &CompoundPool,
        rng: &mut R,
    ) -> Result<RoundRecord, AssemblyError>
    where
        R: Rng + Send + ?Sized,
    {
        if pool.is_empty() {
            return Err(AssemblyError::EmptyPool);
        }

        for attempt in 1..=self.max_attempts {
            let Some(cid) = pool.sample(rng) else {
                return Err(AssemblyError::EmptyPool);
            };
            tracing::debug!(attempt, cid, "trying candidate");

            match self.assemble_candidate(cid).await {
                Ok(round) => {
                    tracing::info!(attempt, cid, name = %round.name, "round assembled");
                    return Ok(round);
                }
                Err(e) => {
                    tracing::warn!(attempt, cid, "candidate rejected: {e:#}");
                }
            }
        }

        Err(AssemblyError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Build a round for one specific compound.
    ///
    /// Fails if the property fetch fails or the record has holes. Name and
    /// formula lookups degrade instead of failing.
    #[instrument(skip(self))]
    pub async fn assemble_candidate(&self, cid: CompoundId) -> anyhow::Result<RoundRecord> {
        let props = self.bounded(self.source.fetch_properties(cid)).await?;
        if let Some(field) = props.missing_field() {
            return Err(IncompleteRecord { cid, field }.into());
        }

        let name = self.resolve_name(cid, props.iupac_name.as_deref()).await;

        let lipinski_hba = match self.bounded(self.source.fetch_formula(cid)).await {
            Ok(formula) => approximate_hba(&formula),
            Err(e) => {
                tracing::debug!(cid, "formula lookup failed, using database HBA: {e:#}");
                props.hbond_acceptors.unwrap_or_default()
            }
        };

        let links = RoundLinks {
            structure_image_url: self.source.structure_image_url(cid),
            record_url: self.source.record_url(cid),
        };
        Ok(RoundRecord::from_properties(&props, name, lipinski_hba, links)?)
    }

    /// Preferred display name: first synonym, then `fallback`, then a
    /// placeholder.
    pub async fn resolve_name(&self, cid: CompoundId, fallback: Option<&str>) -> String {
        let synonym = match self.bounded(self.source.fetch_synonyms(cid)).await {
            Ok(synonyms) => synonyms.into_iter().next(),
            Err(e) => {
                tracing::debug!(cid, "synonym lookup failed: {e:#}");
                None
            }
        };
        synonym
            .or_else(|| fallback.filter(|s| !s.is_empty()).map(str::to_string))
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string())
    }

    async fn bounded<T, F>(&self, fut: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| anyhow::anyhow!("fetch timed out after {}s", limit.as_secs_f64()))?,
            None => fut.await,
        }
    }
}
