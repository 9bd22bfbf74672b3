//! Shared table rendering

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows with the house table style, newline-terminated
pub fn render_table<I, T>(rows: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Tabled,
{
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
