//! The `plasmamem rules` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use plasmamem_core::compliance::Metric;

pub fn execute() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Rule", "Passes when"]);

    for metric in Metric::ALL {
        table.add_row(vec![
            Cell::new(metric.label()),
            Cell::new(metric.rule()),
            Cell::new(format!("≤ {}", metric.threshold())),
        ]);
    }

    println!("{table}");
    println!("HBA is judged on the N + O count of the molecular formula.");
    Ok(())
}
