//! Text output: one fixed-point cost per record, and slot layout dumps

use anyhow::{anyhow, Result};
use std::io::Write;

use crate::cost::WeightFormula;
use crate::tree::GreedyTree;

const LAYOUT_HEADER: &str = "#SLOT\tLEVEL\tRANK\tPROBABILITY\tWEIGHT\n";

/// Fixed-point rendering of one cost (4 decimal digits).
pub fn format_cost(cost: f64) -> String {
    format!("{cost:.4}")
}

/// Write one cost per line, in record order.
pub fn write_costs<W: Write>(writer: &mut W, costs: &[f64]) -> Result<()> {
    for cost in costs {
        writeln!(writer, "{}", format_cost(*cost))?;
    }

    writer.flush()?;
    Ok(())
}

/// Render costs into a string (useful for tests and snapshots).
pub fn render_costs(costs: &[f64]) -> Result<String> {
    let mut buffer = Vec::new();
    write_costs(&mut buffer, costs)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered costs are not valid UTF-8"))
}

/// Write the occupied slots of `tree` in level order.
pub fn write_layout<W: Write>(
    writer: &mut W,
    tree: &GreedyTree,
    formula: WeightFormula,
) -> Result<()> {
    writer.write_all(LAYOUT_HEADER.as_bytes())?;

    for (slot, key) in tree.slots() {
        let line = format!(
            "{index}\t{level}\t{rank}\t{probability:.4}\t{weight}\n",
            index = slot.get(),
            level = slot.level(),
            rank = key.rank,
            probability = key.probability,
            weight = formula.weight(slot)
        );
        writer.write_all(line.as_bytes())?;
    }

    if !tree.unplaced().is_empty() {
        let ranks: Vec<String> = tree.unplaced().iter().map(ToString::to_string).collect();
        writeln!(writer, "#UNPLACED\t{}", ranks.join(","))?;
    }

    writer.flush()?;
    Ok(())
}

/// Render a layout into a string.
pub fn render_layout(tree: &GreedyTree, formula: WeightFormula) -> Result<String> {
    let mut buffer = Vec::new();
    write_layout(&mut buffer, tree, formula)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered layout is not valid UTF-8"))
}
