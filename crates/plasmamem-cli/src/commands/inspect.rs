//! The `plasmamem inspect` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use plasmamem_core::assembler::RoundAssembler;
use plasmamem_core::compliance::{expected_compliance, Metric};
use plasmamem_core::evaluator::ValueField;
use plasmamem_core::model::RoundRecord;

use super::load_setup;

pub async fn execute(
    cid: Option<u64>,
    config_path: Option<PathBuf>,
    pool_path: Option<PathBuf>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let setup = load_setup(config_path.as_deref(), pool_path)?;
    let engine_config = setup.config.engine_config(seed);
    let assembler = RoundAssembler::new(setup.source.clone())
        .with_max_attempts(engine_config.max_attempts)
        .with_fetch_timeout(engine_config.fetch_timeout);

    let round = match cid {
        Some(cid) => assembler
            .assemble_candidate(cid)
            .await
            .with_context(|| format!("compound {cid} cannot be used as a round"))?,
        None => {
            let pool = setup.load_pool()?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            assembler.assemble(&pool, &mut rng).await?
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&round)?);
    } else {
        print_answers(&round);
    }

    Ok(())
}

fn print_answers(round: &RoundRecord) {
    println!("{} (CID {})", round.name, round.cid);
    println!(
        "MW {} · XLogP {} · TPSA {}",
        round.weight_display(),
        round.xlogp,
        round.tpsa_display()
    );

    let mut values = Table::new();
    values.set_header(vec!["Value", "Answer"]);
    for field in ValueField::ALL {
        values.add_row(vec![
            Cell::new(field.label()),
            Cell::new(field.expected(round)),
        ]);
    }
    println!("{values}");

    let mut rules = Table::new();
    rules.set_header(vec!["Metric", "Rule", "Value", "Limit", "Passes"]);
    for metric in Metric::ALL {
        let value = round.metric_value(metric);
        rules.add_row(vec![
            Cell::new(metric.label()),
            Cell::new(metric.rule()),
            Cell::new(value),
            Cell::new(format!("≤ {}", metric.threshold())),
            Cell::new(if expected_compliance(metric, value) {
                "yes"
            } else {
                "no"
            }),
        ]);
    }
    println!("{rules}");
}
