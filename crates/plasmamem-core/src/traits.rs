//! Collaborator seams: the compound database and the display.
//!
//! [`CompoundSource`] is implemented by the `plasmamem-providers` crate;
//! [`DisplaySink`] by whatever front end renders the quiz.

use async_trait::async_trait;

use crate::compliance::Metric;
use crate::feedback::Feedback;
use crate::model::{CompoundId, PropertyRecord, RoundRecord, ToggleState};

// ---------------------------------------------------------------------------
// Compound source trait
// ---------------------------------------------------------------------------

/// A remote (or local) compound database.
#[async_trait]
pub trait CompoundSource: Send + Sync {
    /// Human-readable source name (e.g. "pubchem").
    fn name(&self) -> &str;

    /// Fetch the property set for a compound.
    async fn fetch_properties(&self, cid: CompoundId) -> anyhow::Result<PropertyRecord>;

    /// Fetch the molecular formula (e.g. `C9H8O4`).
    async fn fetch_formula(&self, cid: CompoundId) -> anyhow::Result<String>;

    /// Fetch known synonyms, most common name first.
    async fn fetch_synonyms(&self, cid: CompoundId) -> anyhow::Result<Vec<String>>;

    /// Reference to a 2D structure image.
    fn structure_image_url(&self, cid: CompoundId) -> String;

    /// Link to the compound's page in the source database.
    fn record_url(&self, cid: CompoundId) -> String;
}

// ---------------------------------------------------------------------------
// Display sink trait
// ---------------------------------------------------------------------------

/// Receives round state for rendering. Never consulted for evaluation.
pub trait DisplaySink: Send + Sync {
    /// A new round is being assembled.
    fn on_loading(&self);
    /// A new round is ready; show its given properties.
    fn on_round_ready(&self, round: &RoundRecord);
    /// A toggle changed state.
    fn on_toggle(&self, metric: Metric, state: ToggleState);
    /// Feedback after a check, reveal, or failed load.
    fn on_feedback(&self, feedback: &Feedback);
    /// The round was revealed; show every answer.
    fn on_revealed(&self, round: &RoundRecord);
    /// The streak counter changed.
    fn on_streak(&self, streak: u32);
}

/// No-op display sink.
pub struct NoopSink;

impl DisplaySink for NoopSink {
    fn on_loading(&self) {}
    fn on_round_ready(&self, _: &RoundRecord) {}
    fn on_toggle(&self, _: Metric, _: ToggleState) {}
    fn on_feedback(&self, _: &Feedback) {}
    fn on_revealed(&self, _: &RoundRecord) {}
    fn on_streak(&self, _: u32) {}
}
