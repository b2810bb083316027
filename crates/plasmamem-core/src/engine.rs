//! Central quiz orchestrator.
//!
//! Owns the [`RoundSession`] behind an async lock and drives round
//! assembly. The lock is never held across a network call, so a second
//! `next` can start while an earlier assembly is still in flight; the
//! earlier one is then discarded by epoch. A `next_round` future dropped
//! before it finishes releases its pending load, so the session never stays
//! stuck in loading.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

use crate::assembler::{RoundAssembler, DEFAULT_MAX_ATTEMPTS};
use crate::compliance::Metric;
use crate::model::{ComplianceToggles, RoundRecord, ToggleState, ValueGuesses};
use crate::pool::CompoundPool;
use crate::session::{CheckOutcome, Epoch, LoadOutcome, Rejected, RoundPhase, RoundSession};
use crate::traits::{CompoundSource, DisplaySink};

/// Configuration for the quiz engine.
#[derive(Debug, Clone)]
pub struct QuizEngineConfig {
    /// Candidates tried per round before giving up.
    pub max_attempts: u32,
    /// Upper bound on each collaborator call.
    pub fetch_timeout: Option<Duration>,
    /// Seed for compound sampling and message picks.
    pub seed: Option<u64>,
}

impl Default for QuizEngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            fetch_timeout: Some(Duration::from_secs(10)),
            seed: None,
        }
    }
}

/// The quiz engine.
pub struct QuizEngine {
    assembler: RoundAssembler,
    pool: CompoundPool,
    session: Arc<Mutex<RoundSession>>,
    rng: Mutex<StdRng>,
}

impl QuizEngine {
    pub fn new(
        source: Arc<dyn CompoundSource>,
        pool: CompoundPool,
        sink: Arc<dyn DisplaySink>,
        config: QuizEngineConfig,
    ) -> Self {
        let assembler = RoundAssembler::new(source)
            .with_max_attempts(config.max_attempts)
            .with_fetch_timeout(config.fetch_timeout);

        let (session, rng) = match config.seed {
            Some(seed) => (
                RoundSession::with_seed(sink, seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (RoundSession::new(sink), StdRng::from_entropy()),
        };

        Self {
            assembler,
            pool,
            session: Arc::new(Mutex::new(session)),
            rng: Mutex::new(rng),
        }
    }

    /// Discard the current round and load a new one.
    pub async fn next_round(&self) -> LoadOutcome {
        let epoch = self.session.lock().await.begin_load();
        let mut pending = PendingLoad {
            session: Arc::clone(&self.session),
            epoch,
            settled: false,
        };

        // Each load draws from its own generator so overlapping loads
        // never share sampling state.
        let mut rng = {
            let mut master = self.rng.lock().await;
            StdRng::seed_from_u64(master.gen())
        };

        let result = self.assembler.assemble(&self.pool, &mut rng).await;
        let outcome = self.session.lock().await.finish_load(epoch, result);
        pending.settled = true;
        if outcome == LoadOutcome::Superseded {
            tracing::debug!(epoch, "load superseded by a newer request");
        }
        outcome
    }

    pub async fn cycle_toggle(&self, metric: Metric) -> Result<ToggleState, Rejected> {
        self.session.lock().await.cycle_toggle(metric)
    }

    pub async fn check(&self, guesses: ValueGuesses) -> CheckOutcome {
        self.session.lock().await.check(guesses)
    }

    pub async fn reveal(&self) -> Result<RoundRecord, Rejected> {
        self.session.lock().await.reveal()
    }

    pub async fn streak(&self) -> u32 {
        self.session.lock().await.streak()
    }

    pub async fn phase(&self) -> RoundPhase {
        self.session.lock().await.phase()
    }

    pub async fn is_loading(&self) -> bool {
        self.session.lock().await.is_loading()
    }

    pub async fn current_round(&self) -> Option<RoundRecord> {
        self.session.lock().await.current().cloned()
    }

    pub async fn toggles(&self) -> Option<ComplianceToggles> {
        self.session.lock().await.toggles().cloned()
    }
}

/// Releases a pending load when `next_round` is dropped mid-flight.
struct PendingLoad {
    session: Arc<Mutex<RoundSession>>,
    epoch: Epoch,
    settled: bool,
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Ok(mut session) = self.session.try_lock() {
            session.abandon_load(self.epoch);
            return;
        }
        // Lock is busy: finish the release on the runtime.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let session = Arc::clone(&self.session);
                let epoch = self.epoch;
                handle.spawn(async move {
                    session.lock().await.abandon_load(epoch);
                });
            }
            Err(_) => {
                tracing::warn!(epoch = self.epoch, "cancelled load left pending");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::assembler::tests::{complete, ScriptedSource};
    use crate::error::AssemblyError;
    use crate::evaluator::correct_toggles;
    use crate::traits::NoopSink;

    fn engine(source: ScriptedSource, pool: Vec<u64>) -> QuizEngine {
        QuizEngine::new(
            Arc::new(source),
            CompoundPool::new(pool),
            Arc::new(NoopSink),
            QuizEngineConfig {
                seed: Some(11),
                ..Default::default()
            },
        )
    }

    async fn solve(engine: &QuizEngine) -> CheckOutcome {
        let round = engine.current_round().await.unwrap();
        let target = correct_toggles(&round);
        for metric in Metric::ALL {
            while engine.toggles().await.unwrap().get(metric) != target.get(metric) {
                engine.cycle_toggle(metric).await.unwrap();
            }
        }
        engine
            .check(ValueGuesses {
                lipinski_hba: Some(round.lipinski_hba),
                hbond_donors: Some(round.hbond_donors),
                rotatable_bonds: Some(round.rotatable_bonds),
                database_hba: Some(round.hbond_acceptors),
                database_hbd: Some(round.hbond_donors),
            })
            .await
    }

    #[tokio::test]
    async fn full_round_lifecycle() {
        let source = ScriptedSource::with_properties(vec![Ok(complete(180.16)), Ok(complete(46.07))]);
        let engine = engine(source, vec![2244]);

        assert_eq!(engine.phase().await, RoundPhase::Idle);
        assert_eq!(
            engine.next_round().await,
            LoadOutcome::Loaded { cid: 2244 }
        );
        assert_eq!(engine.phase().await, RoundPhase::Fresh);

        assert!(solve(&engine).await.is_perfect());
        assert!(solve(&engine).await.is_perfect());
        assert_eq!(engine.streak().await, 1);

        engine.next_round().await;
        assert_eq!(engine.current_round().await.unwrap().molecular_weight, 46.07);
        assert!(solve(&engine).await.is_perfect());
        assert_eq!(engine.streak().await, 2);
    }

    #[tokio::test]
    async fn exhaustion_keeps_previous_round() {
        let source = ScriptedSource::with_properties(vec![Ok(complete(180.16))]);
        let engine = engine(source, vec![1]);
        engine.next_round().await;

        let outcome = engine.next_round().await;
        assert_eq!(
            outcome,
            LoadOutcome::Failed(AssemblyError::Exhausted {
                attempts: DEFAULT_MAX_ATTEMPTS
            })
        );
        assert_eq!(engine.current_round().await.unwrap().molecular_weight, 180.16);
        assert!(!engine.is_loading().await);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_next_keeps_only_the_latest() {
        let source = ScriptedSource::with_properties(vec![Ok(complete(100.0)), Ok(complete(200.0))]);
        *source.delays.lock().unwrap() =
            VecDeque::from([Duration::from_secs(5), Duration::from_millis(10)]);
        let engine = engine(source, vec![7]);

        let (first, second) = tokio::join!(engine.next_round(), async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            engine.next_round().await
        });

        assert_eq!(first, LoadOutcome::Superseded);
        assert_eq!(second, LoadOutcome::Loaded { cid: 7 });
        assert_eq!(engine.current_round().await.unwrap().molecular_weight, 200.0);
        assert!(!engine.is_loading().await);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_next_does_not_wedge_the_session() {
        let source = ScriptedSource::with_properties(vec![Ok(complete(180.16)), Ok(complete(46.07))]);
        *source.delays.lock().unwrap() =
            VecDeque::from([Duration::ZERO, Duration::from_secs(60)]);
        let engine = engine(source, vec![3]);
        assert_eq!(engine.next_round().await, LoadOutcome::Loaded { cid: 3 });

        let slow = tokio::time::timeout(Duration::from_secs(1), engine.next_round()).await;
        assert!(slow.is_err());

        assert!(!engine.is_loading().await);
        assert_eq!(engine.current_round().await.unwrap().molecular_weight, 180.16);
        assert!(matches!(
            engine.check(ValueGuesses::default()).await,
            CheckOutcome::Incomplete(_)
        ));
        assert!(engine.cycle_toggle(Metric::PolarSurfaceArea).await.is_ok());
    }

    #[tokio::test]
    async fn reveal_then_check_is_ignored() {
        let source = ScriptedSource::with_properties(vec![Ok(complete(180.16))]);
        let engine = engine(source, vec![1]);
        engine.next_round().await;

        assert!(matches!(
            engine.check(ValueGuesses::default()).await,
            CheckOutcome::Incomplete(_)
        ));
        engine.reveal().await.unwrap();
        assert_eq!(
            engine.check(ValueGuesses::default()).await,
            CheckOutcome::Ignored(Rejected::Revealed)
        );
        assert_eq!(engine.streak().await, 0);
    }
}
