//! Round state machine.
//!
//! ```text
//!   Idle ──next──▶ Fresh ──check──▶ CheckedIncomplete ──reveal──▶ Revealed
//!                    │                 ▲       │
//!                    └──check(perfect)─┼──▶ Solved
//!                                      └─check─┘
//! ```
//!
//! `next` is accepted in every phase. Loading is tracked separately by
//! epoch: a load that finishes after a newer `next` was issued is dropped,
//! and a failed load leaves the current round as it was.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compliance::Metric;
use crate::error::AssemblyError;
use crate::evaluator::{evaluate, EvaluationReport};
use crate::feedback::{pick_message, Feedback};
use crate::model::{
    ComplianceToggles, CompoundId, RoundRecord, Submission, ToggleState, ValueGuesses,
};
use crate::traits::DisplaySink;

/// Load generation. Each `next` request gets a new one.
pub type Epoch = u64;

/// Where the current round is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// No round has been loaded yet.
    Idle,
    /// Inputs enabled, no feedback yet.
    Fresh,
    /// Checked with mistakes; reveal is available.
    CheckedIncomplete,
    /// Checked with no mistakes; reveal is disabled.
    Solved,
    /// Answers shown; only `next` is accepted.
    Revealed,
}

/// Why a learner action had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("no round loaded")]
    NoRound,
    #[error("a round is loading")]
    Loading,
    #[error("round already revealed")]
    Revealed,
    #[error("reveal is only available after an incorrect check")]
    RevealUnavailable,
}

/// Result of a `check`.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Everything correct.
    Perfect {
        report: EvaluationReport,
        /// The streak went up on this check.
        streak_awarded: bool,
        message: &'static str,
    },
    /// Some checks failed.
    Incomplete(EvaluationReport),
    /// The evaluator was not invoked.
    Ignored(Rejected),
}

impl CheckOutcome {
    pub fn is_perfect(&self) -> bool {
        matches!(self, CheckOutcome::Perfect { .. })
    }
}

/// Result of finishing a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A new round is in place.
    Loaded { cid: CompoundId },
    /// A newer `next` was issued; this result was discarded.
    Superseded,
    /// No round could be assembled; the previous round is untouched.
    Failed(AssemblyError),
}

#[derive(Debug)]
struct ActiveRound {
    record: RoundRecord,
    toggles: ComplianceToggles,
    phase: RoundPhase,
    streak_awarded: bool,
}

/// Per-learner quiz state: the current round and the streak.
pub struct RoundSession {
    sink: Arc<dyn DisplaySink>,
    round: Option<ActiveRound>,
    streak: u32,
    epoch: Epoch,
    pending: Option<Epoch>,
    rng: StdRng,
}

impl RoundSession {
    pub fn new(sink: Arc<dyn DisplaySink>) -> Self {
        Self::with_rng(sink, StdRng::from_entropy())
    }

    /// Session whose congratulation picks are reproducible.
    pub fn with_seed(sink: Arc<dyn DisplaySink>, seed: u64) -> Self {
        Self::with_rng(sink, StdRng::seed_from_u64(seed))
    }

    fn with_rng(sink: Arc<dyn DisplaySink>, rng: StdRng) -> Self {
        sink.on_streak(0);
        Self {
            sink,
            round: None,
            streak: 0,
            epoch: 0,
            pending: None,
            rng,
        }
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.as_ref().map_or(RoundPhase::Idle, |r| r.phase)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current(&self) -> Option<&RoundRecord> {
        self.round.as_ref().map(|r| &r.record)
    }

    pub fn toggles(&self) -> Option<&ComplianceToggles> {
        self.round.as_ref().map(|r| &r.toggles)
    }

    /// Start loading a new round. Any earlier pending load is superseded.
    pub fn begin_load(&mut self) -> Epoch {
        self.epoch += 1;
        self.pending = Some(self.epoch);
        tracing::debug!(epoch = self.epoch, "loading new round");
        self.sink.on_loading();
        self.epoch
    }

    /// Install the result of the load started at `epoch`.
    pub fn finish_load(
        &mut self,
        epoch: Epoch,
        result: Result<RoundRecord, AssemblyError>,
    ) -> LoadOutcome {
        if self.pending != Some(epoch) {
            tracing::debug!(epoch, latest = self.epoch, "dropping stale load");
            return LoadOutcome::Superseded;
        }
        self.pending = None;

        match result {
            Ok(record) => {
                let cid = record.cid;
                self.sink.on_round_ready(&record);
                self.round = Some(ActiveRound {
                    record,
                    toggles: ComplianceToggles::default(),
                    phase: RoundPhase::Fresh,
                    streak_awarded: false,
                });
                LoadOutcome::Loaded { cid }
            }
            Err(e) => {
                tracing::warn!("round load failed: {e}");
                self.sink.on_feedback(&Feedback::LoadFailed {
                    reason: e.to_string(),
                });
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Clear the pending load started at `epoch` without installing
    /// anything. Returns false if a newer load has already taken over.
    pub fn abandon_load(&mut self, epoch: Epoch) -> bool {
        if self.pending != Some(epoch) {
            return false;
        }
        self.pending = None;
        tracing::debug!(epoch, "load abandoned");
        true
    }

    fn active_mut(&mut self) -> Result<&mut ActiveRound, Rejected> {
        if self.pending.is_some() {
            return Err(Rejected::Loading);
        }
        let round = self.round.as_mut().ok_or(Rejected::NoRound)?;
        if round.phase == RoundPhase::Revealed {
            return Err(Rejected::Revealed);
        }
        Ok(round)
    }

    /// Advance the toggle for `metric`. Locked once revealed.
    pub fn cycle_toggle(&mut self, metric: Metric) -> Result<ToggleState, Rejected> {
        let round = self.active_mut()?;
        let state = round.toggles.cycle(metric);
        self.sink.on_toggle(metric, state);
        Ok(state)
    }

    /// Score the current inputs. A no-op once revealed.
    pub fn check(&mut self, guesses: ValueGuesses) -> CheckOutcome {
        if self.pending.is_some() {
            return CheckOutcome::Ignored(Rejected::Loading);
        }
        let round = match self.round.as_mut() {
            None => return CheckOutcome::Ignored(Rejected::NoRound),
            Some(r) if r.phase == RoundPhase::Revealed => {
                return CheckOutcome::Ignored(Rejected::Revealed)
            }
            Some(r) => r,
        };

        let submission = Submission {
            guesses,
            toggles: round.toggles.clone(),
        };
        let report = evaluate(&round.record, &submission);

        if report.is_perfect() {
            round.phase = RoundPhase::Solved;
            let streak_awarded = !round.streak_awarded;
            round.streak_awarded = true;

            let message = pick_message(&mut self.rng);
            self.sink.on_feedback(&Feedback::Success {
                message: message.to_string(),
            });
            if streak_awarded {
                self.streak += 1;
                tracing::info!(streak = self.streak, "streak extended");
                self.sink.on_streak(self.streak);
            }
            CheckOutcome::Perfect {
                report,
                streak_awarded,
                message,
            }
        } else {
            round.phase = RoundPhase::CheckedIncomplete;
            self.sink
                .on_feedback(&Feedback::revise(report.clone(), &round.record));
            CheckOutcome::Incomplete(report)
        }
    }

    /// Reveal every answer. Only available after an incorrect check.
    pub fn reveal(&mut self) -> Result<RoundRecord, Rejected> {
        let round = self.active_mut()?;
        if round.phase != RoundPhase::CheckedIncomplete {
            return Err(Rejected::RevealUnavailable);
        }
        round.phase = RoundPhase::Revealed;
        let record = round.record.clone();
        self.sink.on_revealed(&record);
        self.sink.on_feedback(&Feedback::Revealed);
        Ok(record)
    }
}
