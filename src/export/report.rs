//! Cycle report
//!
//! A two-page report of one budget cycle. The first page gives the summary
//! card, the donut chart of expenses by category and the breakdown table;
//! the second page, present only when the cycle has entries, lists the most
//! recent of them. The layout is built as data and rendered to plain text.

use std::collections::HashMap;
use std::fmt::{self, Write};

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::{PeculeError, PeculeResult};
use crate::models::{
    BudgetCycle, Category, CategoryId, CycleEntry, CycleId, EntryKind, Expense, Income, Money,
};
use crate::reports::{spending_by_category, totals};
use crate::storage::Storage;

/// Entries listed on the second page at most
pub const MAX_REPORT_ENTRIES: usize = 30;

pub const REPORT_TITLE: &str = "Pécule - Rapport de cycle";

/// Summary card of the first page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryCard {
    pub opening: Money,
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
}

/// One arc of the donut chart; angles in degrees, clockwise from the top
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSlice {
    pub label: String,
    pub color: String,
    pub start_angle: f64,
    pub sweep: f64,
}

/// One line of the category breakdown table
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub category: String,
    pub color: String,
    pub amount: Money,
    /// Share of total expenses, in `[0, 1]`
    pub share: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewPage {
    pub title: String,
    pub period: String,
    pub summary: SummaryCard,
    pub slices: Vec<DonutSlice>,
    pub breakdown: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryLine {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub label: String,
    /// Empty for incomes and uncategorized expenses
    pub category: String,
    pub amount: Money,
    pub is_fixed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntriesPage {
    pub lines: Vec<EntryLine>,
    /// Entries left out past [`MAX_REPORT_ENTRIES`]
    pub omitted: usize,
}

/// The full report layout
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub overview: OverviewPage,
    pub entries: Option<EntriesPage>,
}

impl CycleReport {
    pub fn build(
        cycle: &BudgetCycle,
        expenses: &[Expense],
        incomes: &[Income],
        categories: &HashMap<CategoryId, Category>,
    ) -> Self {
        let totals = totals(expenses, incomes);
        let summary = SummaryCard {
            opening: cycle.amount,
            income: totals.income,
            expense: totals.expense,
            balance: cycle.amount + totals.income - totals.expense,
        };

        let spending = spending_by_category(expenses, categories);

        let mut angle = 0.0;
        let slices = spending
            .iter()
            .filter(|row| row.amount.is_positive())
            .map(|row| {
                let sweep = row.share * 360.0;
                let slice = DonutSlice {
                    label: row.name.clone(),
                    color: row.color.clone(),
                    start_angle: angle,
                    sweep,
                };
                angle += sweep;
                slice
            })
            .collect();

        let breakdown = spending
            .into_iter()
            .map(|row| BreakdownRow {
                category: row.name,
                color: row.color,
                amount: row.amount,
                share: row.share,
                count: row.count,
            })
            .collect();

        let overview = OverviewPage {
            title: REPORT_TITLE.to_string(),
            period: cycle.period_label(),
            summary,
            slices,
            breakdown,
        };

        Self {
            overview,
            entries: entries_page(expenses, incomes, categories),
        }
    }

    pub fn page_count(&self) -> usize {
        if self.entries.is_some() {
            2
        } else {
            1
        }
    }

    /// Render the report as a plain-text document
    pub fn render_text(&self, currency: &str) -> PeculeResult<String> {
        let mut out = String::new();
        self.write_text(&mut out, currency)
            .map_err(|e| PeculeError::Export(format!("Failed to render report: {}", e)))?;
        Ok(out)
    }

    /// Write the plain-text document to `out`
    pub fn write_text<W: Write>(&self, out: &mut W, currency: &str) -> fmt::Result {
        let overview = &self.overview;
        let money = |m: Money| m.format_with_symbol(currency);

        writeln!(out, "{}", overview.title)?;
        writeln!(out, "Période : {}", overview.period)?;
        writeln!(out)?;

        writeln!(out, "Budget initial : {}", money(overview.summary.opening))?;
        writeln!(out, "Revenus       : {}", money(overview.summary.income))?;
        writeln!(out, "Dépenses      : {}", money(overview.summary.expense))?;
        writeln!(out, "Solde         : {}", money(overview.summary.balance))?;
        writeln!(out)?;

        if overview.breakdown.is_empty() {
            writeln!(out, "Aucune dépense sur ce cycle.")?;
        } else {
            let rows: Vec<BreakdownTableRow> = overview
                .breakdown
                .iter()
                .map(|row| BreakdownTableRow {
                    category: row.category.clone(),
                    amount: money(row.amount),
                    share: format!("{:.1} %", row.share * 100.0),
                    count: row.count,
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::psql());
            writeln!(out, "Dépenses par catégorie")?;
            writeln!(out, "{}", table)?;
        }

        if let Some(page) = &self.entries {
            writeln!(out)?;
            writeln!(out, "--- Page 2 ---")?;
            writeln!(out, "Dernières opérations")?;

            let rows: Vec<EntryTableRow> = page
                .lines
                .iter()
                .map(|line| EntryTableRow {
                    date: line.date.format("%d/%m/%Y").to_string(),
                    kind: line.kind.label().to_string(),
                    label: line.label.clone(),
                    category: line.category.clone(),
                    amount: match line.kind {
                        EntryKind::Expense => money(-line.amount),
                        EntryKind::Income => money(line.amount),
                    },
                    fixed: if line.is_fixed { "Oui" } else { "Non" }.to_string(),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::psql());
            writeln!(out, "{}", table)?;

            if page.omitted > 0 {
                writeln!(out, "… et {} opération(s) plus ancienne(s)", page.omitted)?;
            }
        }

        Ok(())
    }
}

fn entries_page(
    expenses: &[Expense],
    incomes: &[Income],
    categories: &HashMap<CategoryId, Category>,
) -> Option<EntriesPage> {
    let mut lines: Vec<EntryLine> = expenses
        .iter()
        .map(|e| EntryLine {
            date: e.date,
            kind: Expense::KIND,
            label: e.label.clone(),
            category: e
                .category_id
                .and_then(|id| categories.get(&id))
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            amount: e.amount,
            is_fixed: e.is_fixed,
        })
        .chain(incomes.iter().map(|i| EntryLine {
            date: i.date,
            kind: Income::KIND,
            label: i.label.clone(),
            category: String::new(),
            amount: i.amount,
            is_fixed: i.is_fixed,
        }))
        .collect();

    if lines.is_empty() {
        return None;
    }

    lines.sort_by(|a, b| b.date.cmp(&a.date));
    let omitted = lines.len().saturating_sub(MAX_REPORT_ENTRIES);
    lines.truncate(MAX_REPORT_ENTRIES);

    Some(EntriesPage { lines, omitted })
}

#[derive(Tabled)]
struct BreakdownTableRow {
    #[tabled(rename = "Catégorie")]
    category: String,
    #[tabled(rename = "Montant")]
    amount: String,
    #[tabled(rename = "Part")]
    share: String,
    #[tabled(rename = "Opérations")]
    count: usize,
}

#[derive(Tabled)]
struct EntryTableRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Libellé")]
    label: String,
    #[tabled(rename = "Catégorie")]
    category: String,
    #[tabled(rename = "Montant")]
    amount: String,
    #[tabled(rename = "Fixe")]
    fixed: String,
}

/// Build the report of a stored cycle
pub fn build_cycle_report(storage: &Storage, cycle_id: CycleId) -> PeculeResult<CycleReport> {
    let cycle = storage
        .cycles
        .get(cycle_id)?
        .ok_or_else(|| PeculeError::cycle_not_found(cycle_id.to_string()))?;
    let expenses = storage.expenses.get_by_cycle(cycle_id)?;
    let incomes = storage.incomes.get_by_cycle(cycle_id)?;
    let categories: HashMap<CategoryId, Category> = storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(CycleReport::build(&cycle, &expenses, &incomes, &categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn categories(list: &[&Category]) -> HashMap<CategoryId, Category> {
        list.iter().map(|c| (c.id, (*c).clone())).collect()
    }

    #[test]
    fn test_empty_cycle_has_one_page() {
        let cycle = BudgetCycle::new(Money::from_cents(100000), date(1, 25));
        let report = CycleReport::build(&cycle, &[], &[], &HashMap::new());

        assert_eq!(report.page_count(), 1);
        assert!(report.overview.slices.is_empty());
        assert_eq!(report.overview.summary.balance.cents(), 100000);

        let text = report.render_text("€").unwrap();
        assert!(text.contains(REPORT_TITLE));
        assert!(text.contains("Aucune dépense"));
        assert!(!text.contains("Page 2"));
    }

    #[test]
    fn test_donut_slices_cover_the_circle() {
        let cycle = BudgetCycle::new(Money::from_cents(100000), date(1, 25));
        let food = Category::new("Alimentation", "restaurant", "#4CAF50");
        let transport = Category::new("Transport", "car", "#2196F3");
        let expenses = vec![
            Expense::new(cycle.id, "Courses", Money::from_cents(7500), date(1, 26)).with_category(food.id),
            Expense::new(cycle.id, "Bus", Money::from_cents(2500), date(1, 27)).with_category(transport.id),
        ];

        let report = CycleReport::build(&cycle, &expenses, &[], &categories(&[&food, &transport]));
        let slices = &report.overview.slices;

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "Alimentation");
        assert!((slices[0].start_angle - 0.0).abs() < 1e-9);
        assert!((slices[0].sweep - 270.0).abs() < 1e-9);
        assert!((slices[1].start_angle - 270.0).abs() < 1e-9);
        assert!((slices[1].sweep - 90.0).abs() < 1e-9);
        assert_eq!(report.overview.breakdown[1].category, "Transport");
    }

    #[test]
    fn test_entries_page_limited_and_sorted() {
        let cycle = BudgetCycle::new(Money::from_cents(100000), date(1, 1));
        let expenses: Vec<_> = (1..=31)
            .map(|d| Expense::new(cycle.id, format!("E{}", d), Money::from_cents(100), date(1, d)))
            .collect();
        let incomes = vec![Income::new(cycle.id, "Prime", Money::from_cents(5000), date(2, 1))];

        let report = CycleReport::build(&cycle, &expenses, &incomes, &HashMap::new());
        let page = report.entries.as_ref().unwrap();

        assert_eq!(report.page_count(), 2);
        assert_eq!(page.lines.len(), MAX_REPORT_ENTRIES);
        assert_eq!(page.omitted, 2);
        assert_eq!(page.lines[0].label, "Prime");
        assert_eq!(page.lines[0].kind, EntryKind::Income);
        assert!(page.lines.windows(2).all(|w| w[0].date >= w[1].date));

        let text = report.render_text("€").unwrap();
        assert!(text.contains("Page 2"));
        assert!(text.contains("2 opération(s)"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_write_errors_are_returned() {
        let cycle = BudgetCycle::new(Money::from_cents(100000), date(1, 25));
        let report = CycleReport::build(&cycle, &[], &[], &HashMap::new());

        assert!(report.write_text(&mut FailingWriter, "€").is_err());

        let mut out = String::new();
        report.write_text(&mut out, "€").unwrap();
        assert_eq!(out, report.render_text("€").unwrap());
    }

    #[test]
    fn test_income_only_cycle_has_entries_page_but_no_slices() {
        let cycle = BudgetCycle::new(Money::zero(), date(1, 25));
        let incomes = vec![Income::new(cycle.id, "Salaire", Money::from_cents(200000), date(1, 27))];

        let report = CycleReport::build(&cycle, &[], &incomes, &HashMap::new());
        assert_eq!(report.page_count(), 2);
        assert!(report.overview.slices.is_empty());
        assert_eq!(report.overview.summary.income.cents(), 200000);
    }
}
