//! End-to-end quiz sessions against the mock compound source.
//!
//! These tests drive the engine the way the play loop does: load a round,
//! set judgments, check, reveal, move on.

use std::sync::Arc;

use plasmamem_core::compliance::Metric;
use plasmamem_core::engine::{QuizEngine, QuizEngineConfig};
use plasmamem_core::error::AssemblyError;
use plasmamem_core::evaluator::correct_toggles;
use plasmamem_core::model::{PropertyRecord, ToggleState, ValueGuesses, PLACEHOLDER_NAME};
use plasmamem_core::pool::CompoundPool;
use plasmamem_core::session::{CheckOutcome, LoadOutcome, Rejected, RoundPhase};
use plasmamem_core::traits::NoopSink;
use plasmamem_providers::mock::MockSource;

fn ciprofloxacin() -> PropertyRecord {
    PropertyRecord {
        cid: 2764,
        molecular_weight: Some(331.34),
        xlogp: Some(-1.1),
        tpsa: Some(72.9),
        hbond_donors: Some(2),
        hbond_acceptors: Some(7),
        rotatable_bonds: Some(3),
        iupac_name: Some(
            "1-cyclopropyl-6-fluoro-4-oxo-7-piperazin-1-ylquinoline-3-carboxylic acid".into(),
        ),
    }
}

fn cyclosporin() -> PropertyRecord {
    PropertyRecord {
        cid: 5284373,
        molecular_weight: Some(1202.6),
        xlogp: Some(7.5),
        tpsa: Some(279.0),
        hbond_donors: Some(5),
        hbond_acceptors: Some(12),
        rotatable_bonds: Some(15),
        iupac_name: None,
    }
}

fn with_hole() -> PropertyRecord {
    PropertyRecord {
        cid: 999,
        tpsa: None,
        ..ciprofloxacin()
    }
}

fn engine(source: Arc<MockSource>, pool: Vec<u64>, max_attempts: u32) -> QuizEngine {
    QuizEngine::new(
        source,
        CompoundPool::new(pool),
        Arc::new(NoopSink),
        QuizEngineConfig {
            max_attempts,
            seed: Some(42),
            ..Default::default()
        },
    )
}

async fn set_toggles(engine: &QuizEngine, target: &[(Metric, ToggleState)]) {
    for &(metric, state) in target {
        while engine.toggles().await.unwrap().get(metric) != state {
            engine.cycle_toggle(metric).await.unwrap();
        }
    }
}

#[tokio::test]
async fn formula_hba_drives_the_acceptor_judgment() {
    let source = Arc::new(MockSource::new().with_compound(
        ciprofloxacin(),
        Some("C17H18FN3O3"),
        &["ciprofloxacin"],
    ));
    let engine = engine(source, vec![2764], 12);

    assert_eq!(engine.next_round().await, LoadOutcome::Loaded { cid: 2764 });
    let round = engine.current_round().await.unwrap();
    assert_eq!(round.name, "ciprofloxacin");
    assert_eq!(round.lipinski_hba, 6);
    assert_eq!(round.hbond_acceptors, 7);

    let target: Vec<_> = correct_toggles(&round).iter().collect();
    set_toggles(&engine, &target).await;

    // Database HBA in the Lipinski slot is wrong.
    let outcome = engine
        .check(ValueGuesses {
            lipinski_hba: Some(7),
            hbond_donors: Some(2),
            rotatable_bonds: Some(3),
            database_hba: Some(7),
            database_hbd: Some(2),
        })
        .await;
    assert!(matches!(outcome, CheckOutcome::Incomplete(_)));
    assert_eq!(engine.phase().await, RoundPhase::CheckedIncomplete);

    let outcome = engine
        .check(ValueGuesses::from_text("6", "2", "3", "7", "2"))
        .await;
    assert!(outcome.is_perfect());
    assert_eq!(engine.streak().await, 1);
    assert_eq!(engine.reveal().await, Err(Rejected::RevealUnavailable));
}

#[tokio::test]
async fn failing_compound_judgments() {
    let source = Arc::new(MockSource::new().with_compound(
        cyclosporin(),
        Some("C62H111N11O12"),
        &[],
    ));
    let engine = engine(source, vec![5284373], 12);
    engine.next_round().await;

    let round = engine.current_round().await.unwrap();
    assert_eq!(round.lipinski_hba, 23);
    let expected = correct_toggles(&round);
    for metric in Metric::ALL {
        // Five donors sits exactly on the limit.
        let want = if metric == Metric::HbondDonors {
            ToggleState::Pass
        } else {
            ToggleState::Fail
        };
        assert_eq!(expected.get(metric), want, "{metric}");
    }

    let all_pass: Vec<_> = Metric::ALL.iter().map(|&m| (m, ToggleState::Pass)).collect();
    set_toggles(&engine, &all_pass).await;
    let CheckOutcome::Incomplete(report) = engine
        .check(ValueGuesses::from_text("23", "5", "15", "12", "5"))
        .await
    else {
        panic!("expected an incomplete check");
    };
    assert!(report.values.iter().all(|v| v.correct));
    for check in &report.compliance {
        assert_eq!(check.correct, check.metric == Metric::HbondDonors);
    }
}

#[tokio::test]
async fn names_fall_back_to_placeholder() {
    let source = Arc::new(MockSource::new().with_compound(cyclosporin(), None, &[]));
    let engine = engine(source, vec![5284373], 12);
    engine.next_round().await;

    let round = engine.current_round().await.unwrap();
    assert_eq!(round.name, PLACEHOLDER_NAME);
    // No formula: the database count stands in.
    assert_eq!(round.lipinski_hba, 12);
}

#[tokio::test]
async fn systematic_name_used_without_synonyms() {
    let source = Arc::new(MockSource::new().with_compound(ciprofloxacin(), None, &[]));
    let engine = engine(source, vec![2764], 12);
    engine.next_round().await;

    let round = engine.current_round().await.unwrap();
    assert!(round.name.starts_with("1-cyclopropyl"));
}

#[tokio::test]
async fn incomplete_records_are_never_served() {
    let source = Arc::new(
        MockSource::new()
            .with_compound(with_hole(), Some("C17H18FN3O3"), &[])
            .with_compound(ciprofloxacin(), Some("C17H18FN3O3"), &[]),
    );
    let engine = engine(source, vec![999, 2764], 64);

    for _ in 0..5 {
        assert_eq!(engine.next_round().await, LoadOutcome::Loaded { cid: 2764 });
    }
}

#[tokio::test]
async fn exhaustion_is_reported_without_a_round() {
    let source = Arc::new(
        MockSource::new()
            .with_compound(ciprofloxacin(), Some("C17H18FN3O3"), &[])
            .with_failure(2764),
    );
    let engine = engine(source.clone(), vec![2764], 5);

    assert_eq!(
        engine.next_round().await,
        LoadOutcome::Failed(AssemblyError::Exhausted { attempts: 5 })
    );
    assert_eq!(source.call_count(), 5);
    assert_eq!(engine.phase().await, RoundPhase::Idle);
    assert!(matches!(
        engine.check(ValueGuesses::default()).await,
        CheckOutcome::Ignored(Rejected::NoRound)
    ));
}

#[tokio::test]
async fn reveal_then_next_starts_fresh() {
    let source = Arc::new(
        MockSource::new()
            .with_compound(ciprofloxacin(), Some("C17H18FN3O3"), &["ciprofloxacin"]),
    );
    let engine = engine(source, vec![2764], 12);
    engine.next_round().await;

    engine.cycle_toggle(Metric::LogP).await.unwrap();
    assert!(!engine.check(ValueGuesses::default()).await.is_perfect());
    let revealed = engine.reveal().await.unwrap();
    assert_eq!(revealed.lipinski_hba, 6);
    assert_eq!(
        engine.cycle_toggle(Metric::LogP).await,
        Err(Rejected::Revealed)
    );

    engine.next_round().await;
    assert_eq!(engine.phase().await, RoundPhase::Fresh);
    let toggles = engine.toggles().await.unwrap();
    assert!(toggles.iter().all(|(_, s)| s == ToggleState::Unset));
    assert_eq!(engine.streak().await, 0);
}
