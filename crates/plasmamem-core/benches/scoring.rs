use criterion::{black_box, criterion_group, criterion_main, Criterion};

use plasmamem_core::evaluator::{correct_toggles, evaluate};
use plasmamem_core::formula::approximate_hba;
use plasmamem_core::model::{PropertyRecord, RoundLinks, RoundRecord, Submission, ValueGuesses};

fn make_round() -> RoundRecord {
    let props = PropertyRecord {
        cid: 2764,
        molecular_weight: Some(331.34),
        xlogp: Some(-1.1),
        tpsa: Some(72.9),
        hbond_donors: Some(2),
        hbond_acceptors: Some(7),
        rotatable_bonds: Some(3),
        iupac_name: None,
    };
    RoundRecord::from_properties(&props, "ciprofloxacin".into(), 6, RoundLinks::default())
        .expect("complete record")
}

fn bench_evaluate(c: &mut Criterion) {
    let round = make_round();
    let perfect = Submission {
        guesses: ValueGuesses {
            lipinski_hba: Some(6),
            hbond_donors: Some(2),
            rotatable_bonds: Some(3),
            database_hba: Some(7),
            database_hbd: Some(2),
        },
        toggles: correct_toggles(&round),
    };
    let blank = Submission::default();

    c.bench_function("evaluate_perfect", |b| {
        b.iter(|| evaluate(black_box(&round), black_box(&perfect)))
    });
    c.bench_function("evaluate_blank", |b| {
        b.iter(|| evaluate(black_box(&round), black_box(&blank)))
    });
}

fn bench_formula(c: &mut Criterion) {
    c.bench_function("approximate_hba_small", |b| {
        b.iter(|| approximate_hba(black_box("C17H18FN3O3")))
    });
    c.bench_function("approximate_hba_salt", |b| {
        b.iter(|| approximate_hba(black_box("C66H75Cl2N9O24.ClH")))
    });
}

criterion_group!(benches, bench_evaluate, bench_formula);
criterion_main!(benches);
