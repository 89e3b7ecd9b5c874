//! Rendering result tables for stdout.

use std::io::Write;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement};
use gnb_model::Table;

/// Write a table as tab-separated values with a header row.
///
/// Absent cells are written as empty fields.
pub fn write_tsv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    let names = table.column_names();
    tsv.write_record(&names).context("write TSV header")?;

    let columns = names
        .iter()
        .map(|name| table.values(name))
        .collect::<Result<Vec<_>, _>>()?;
    for row in 0..table.height() {
        tsv.write_record(columns.iter().map(|column| column[row].unwrap_or_default()))
            .with_context(|| format!("write TSV row {row}"))?;
    }
    tsv.flush().context("flush TSV output")?;
    Ok(())
}

/// Render a table for the terminal.
pub fn render_table(table: &Table) -> Result<comfy_table::Table> {
    let names = table.column_names();
    let mut rendered = comfy_table::Table::new();
    rendered.set_header(names.iter().map(|name| header_cell(name)));
    apply_table_style(&mut rendered);

    let columns = names
        .iter()
        .map(|name| table.values(name))
        .collect::<Result<Vec<_>, _>>()?;
    for row in 0..table.height() {
        rendered.add_row(columns.iter().map(|column| match column[row] {
            Some(value) => Cell::new(value),
            None => Cell::new("-").fg(Color::DarkGrey),
        }));
    }
    Ok(rendered)
}

pub fn apply_table_style(table: &mut comfy_table::Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
