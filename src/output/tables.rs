use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Stale-days cell colored by how close the value is to the SLA threshold.
pub fn color_coded_stale_days_cell(days: i64, sla_days: i64) -> Cell {
    let text = days.to_string();
    if days >= sla_days {
        Cell::new(text).fg(TableColor::Red)
    } else if days >= sla_days / 2 {
        Cell::new(text).fg(TableColor::Yellow)
    } else {
        Cell::new(text).fg(TableColor::Green)
    }
}
