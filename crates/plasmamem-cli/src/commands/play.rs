//! The `plasmamem play` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};
use tokio::io::{AsyncBufReadExt, BufReader};

use plasmamem_core::compliance::Metric;
use plasmamem_core::engine::QuizEngine;
use plasmamem_core::evaluator::{correct_toggles, ValueField};
use plasmamem_core::feedback::Feedback;
use plasmamem_core::model::{ComplianceToggles, RoundRecord, ToggleState, ValueGuesses};
use plasmamem_core::session::CheckOutcome;
use plasmamem_core::traits::DisplaySink;

use super::load_setup;

const HELP: &str = "\
Commands:
  toggle <metric>                       cycle a judgment (mw, logp, hba, hbd, nrot, tpsa)
  check <HBA> <HBD> <NRot> <HBA_actual> <HBD_actual>
                                        score the round; use - for a blank value
  reveal                                show the answers after a wrong check
  show                                  print the current round
  next                                  load a new compound
  streak                                print the current streak
  help                                  print this help
  quit                                  leave";

/// Terminal rendering of quiz events.
struct TerminalSink;

impl DisplaySink for TerminalSink {
    fn on_loading(&self) {
        println!("Loading a new molecule…");
    }

    fn on_round_ready(&self, round: &RoundRecord) {
        print_round(round);
        println!("Type `help` for commands.");
    }

    fn on_toggle(&self, metric: Metric, state: ToggleState) {
        println!("{metric}: {state}");
    }

    fn on_feedback(&self, feedback: &Feedback) {
        println!("{feedback}");
    }

    fn on_revealed(&self, round: &RoundRecord) {
        let expected = correct_toggles(round);
        let mut table = Table::new();
        table.set_header(vec!["Answer", "Value"]);
        for field in ValueField::ALL {
            table.add_row(vec![
                Cell::new(field.label()),
                Cell::new(field.expected(round)),
            ]);
        }
        for (metric, state) in expected.iter() {
            table.add_row(vec![
                Cell::new(format!("{metric} ({})", metric.rule())),
                Cell::new(state),
            ]);
        }
        println!("{table}");
    }

    fn on_streak(&self, streak: u32) {
        println!("Streak: {streak}");
    }
}

fn print_round(round: &RoundRecord) {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("Compound"), Cell::new(&round.name)]);
    table.add_row(vec![Cell::new("CID"), Cell::new(round.cid)]);
    table.add_row(vec![Cell::new("Molecular weight"), Cell::new(round.weight_display())]);
    table.add_row(vec![Cell::new("XLogP"), Cell::new(round.xlogp)]);
    table.add_row(vec![Cell::new("TPSA"), Cell::new(round.tpsa_display())]);
    table.add_row(vec![Cell::new("Structure"), Cell::new(&round.structure_image_url)]);
    table.add_row(vec![Cell::new("Record"), Cell::new(&round.record_url)]);
    println!("{table}");
}

fn print_toggles(toggles: &ComplianceToggles) {
    let line: Vec<String> = toggles
        .iter()
        .map(|(metric, state)| format!("{metric} {state}"))
        .collect();
    println!("Judgments: {}", line.join("  "));
}

/// One line of learner input.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Toggle(Metric),
    Check(ValueGuesses),
    Reveal,
    Show,
    Next,
    Streak,
    Help,
    Quit,
}

/// Parse a line of input. Blank lines give `None`.
fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "toggle" | "t" => {
            let Some(name) = words.next() else {
                bail!("usage: toggle <metric>");
            };
            Command::Toggle(name.parse()?)
        }
        "check" | "c" => {
            let values: Vec<&str> = words.collect();
            let value = |i: usize| values.get(i).copied().unwrap_or("");
            Command::Check(ValueGuesses::from_text(
                value(0),
                value(1),
                value(2),
                value(3),
                value(4),
            ))
        }
        "reveal" | "r" => Command::Reveal,
        "show" | "s" => Command::Show,
        "next" | "n" => Command::Next,
        "streak" => Command::Streak,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command `{other}`, type `help`"),
    };
    Ok(Some(command))
}

pub async fn execute(
    config_path: Option<PathBuf>,
    pool_path: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let setup = load_setup(config_path.as_deref(), pool_path)?;
    let pool = setup.load_pool()?;
    tracing::info!(
        source = setup.source.name(),
        compounds = pool.len(),
        "starting quiz"
    );

    let engine = QuizEngine::new(
        setup.source,
        pool,
        Arc::new(TerminalSink),
        setup.config.engine_config(seed),
    );

    engine.next_round().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Toggle(metric) => {
                if let Err(rejected) = engine.cycle_toggle(metric).await {
                    println!("Ignored: {rejected}");
                }
            }
            Command::Check(guesses) => {
                if let CheckOutcome::Ignored(rejected) = engine.check(guesses).await {
                    println!("Ignored: {rejected}");
                }
            }
            Command::Reveal => {
                if let Err(rejected) = engine.reveal().await {
                    println!("Ignored: {rejected}");
                }
            }
            Command::Show => match engine.current_round().await {
                Some(round) => {
                    print_round(&round);
                    if let Some(toggles) = engine.toggles().await {
                        print_toggles(&toggles);
                    }
                }
                None => println!("No round loaded, type `next`."),
            },
            Command::Next => {
                engine.next_round().await;
            }
            Command::Streak => println!("Streak: {}", engine.streak().await),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    println!("Final streak: {}", engine.streak().await);
    Ok(())
}
