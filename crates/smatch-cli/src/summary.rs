use anyhow::Result;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use smatch_map::RankedMatch;

use crate::cli::OutputFormatArg;

pub fn print_matches(matches: &[RankedMatch], format: OutputFormatArg) -> Result<()> {
    match format {
        OutputFormatArg::Json => println!("{}", serde_json::to_string_pretty(matches)?),
        OutputFormatArg::Table => println!("{}", matches_table(matches)),
    }
    Ok(())
}

fn matches_table(matches: &[RankedMatch]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            header_cell("#"),
            header_cell("Source"),
            header_cell("Target"),
            header_cell("Score"),
        ]);
    for (rank, m) in matches.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(&m.source.name),
            Cell::new(&m.target.name),
            Cell::new(format!("{:.3}", m.sim)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}
