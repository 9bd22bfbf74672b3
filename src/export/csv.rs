//! CSV export
//!
//! One row per expense, then one row per income, with French headers and
//! values so the file opens cleanly in a French spreadsheet.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{PeculeError, PeculeResult};
use crate::models::{CategoryId, CycleEntry, CycleId, Expense, Income};
use crate::storage::Storage;

pub const CSV_HEADER: [&str; 6] = ["Type", "Libellé", "Catégorie", "Montant", "Date", "Fixe"];

fn export_error(e: impl std::fmt::Display) -> PeculeError {
    PeculeError::Export(e.to_string())
}

fn fixed_label(is_fixed: bool) -> &'static str {
    if is_fixed {
        "Oui"
    } else {
        "Non"
    }
}

fn entry_record<T: CycleEntry>(entry: &T, category: &str) -> [String; 6] {
    [
        T::KIND.label().to_string(),
        entry.label().to_string(),
        category.to_string(),
        entry.amount().to_plain_string(),
        entry.date().format("%d/%m/%Y").to_string(),
        fixed_label(entry.is_fixed()).to_string(),
    ]
}

/// Write expenses and incomes as CSV
///
/// `category_names` resolves expense categories; unknown or missing
/// categories give an empty cell. Zero entries yield the header line only.
pub fn write_entries_csv<W: Write>(
    writer: W,
    expenses: &[Expense],
    incomes: &[Income],
    category_names: &HashMap<CategoryId, String>,
) -> PeculeResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER).map_err(export_error)?;

    for expense in expenses {
        let category = expense
            .category_id
            .and_then(|id| category_names.get(&id))
            .map(String::as_str)
            .unwrap_or("");
        csv.write_record(entry_record(expense, category))
            .map_err(export_error)?;
    }

    for income in incomes {
        csv.write_record(entry_record(income, "")).map_err(export_error)?;
    }

    csv.flush().map_err(export_error)?;
    Ok(())
}

/// CSV text for a set of entries
pub fn entries_csv_string(
    expenses: &[Expense],
    incomes: &[Income],
    category_names: &HashMap<CategoryId, String>,
) -> PeculeResult<String> {
    let mut buffer = Vec::new();
    write_entries_csv(&mut buffer, expenses, incomes, category_names)?;
    String::from_utf8(buffer).map_err(export_error)
}

/// Export every entry of a cycle, oldest first within each kind
pub fn export_cycle_csv<W: Write>(storage: &Storage, cycle_id: CycleId, writer: W) -> PeculeResult<()> {
    let expenses = storage.expenses.get_by_cycle(cycle_id)?;
    let incomes = storage.incomes.get_by_cycle(cycle_id)?;
    let names = storage.categories.names()?;
    write_entries_csv(writer, &expenses, &incomes, &names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let csv = entries_csv_string(&[], &[], &HashMap::new()).unwrap();
        assert_eq!(csv, "Type,Libellé,Catégorie,Montant,Date,Fixe\n");
    }

    #[test]
    fn test_rows_and_formatting() {
        let cycle = CycleId::new();
        let food = CategoryId::new();
        let mut names = HashMap::new();
        names.insert(food, "Alimentation".to_string());

        let expenses = vec![
            Expense::new(cycle, "Courses", Money::from_cents(1250), date(26)).with_category(food),
            Expense::new(cycle, "Loyer", Money::from_cents(80000), date(5)).fixed(true),
        ];
        let incomes = vec![Income::new(cycle, "Salaire", Money::from_cents(200000), date(27)).fixed(true)];

        let csv = entries_csv_string(&expenses, &incomes, &names).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Type,Libellé,Catégorie,Montant,Date,Fixe",
                "Dépense,Courses,Alimentation,12.50,26/01/2025,Non",
                "Dépense,Loyer,,800.00,05/01/2025,Oui",
                "Revenu,Salaire,,2000.00,27/01/2025,Oui",
            ]
        );
    }

    #[test]
    fn test_special_characters_are_quoted() {
        let cycle = CycleId::new();
        let expenses = vec![Expense::new(
            cycle,
            "Resto, \"chez Paul\"",
            Money::from_cents(4200),
            date(26),
        )];

        let csv = entries_csv_string(&expenses, &[], &HashMap::new()).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "Dépense,\"Resto, \"\"chez Paul\"\"\",,42.00,26/01/2025,Non");
    }

    #[test]
    fn test_newline_in_label_is_quoted() {
        let expenses = vec![Expense::new(
            CycleId::new(),
            "ligne 1\nligne 2",
            Money::from_cents(100),
            date(26),
        )];

        let csv = entries_csv_string(&expenses, &[], &HashMap::new()).unwrap();
        assert!(csv.contains("\"ligne 1\nligne 2\""));
    }
}
