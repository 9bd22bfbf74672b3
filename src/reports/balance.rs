//! Balance calculators
//!
//! Pure read-side aggregation over one cycle and the entries it owns. Nothing
//! here touches storage; callers fetch the cycle, its expenses and incomes
//! and pass them in.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::models::{BudgetCycle, Category, CategoryId, CycleEntry, Expense, Income, Money};

use super::alert::BudgetAlert;

/// Name shown for expenses without a (live) category
pub const UNCATEGORIZED_NAME: &str = "Sans catégorie";
const UNCATEGORIZED_COLOR: &str = "#9E9E9E";

/// Σ incomes and Σ expenses of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Money,
    pub expense: Money,
}

pub fn totals(expenses: &[Expense], incomes: &[Income]) -> Totals {
    Totals {
        income: incomes.iter().map(|i| i.amount).sum(),
        expense: expenses.iter().map(|e| e.amount).sum(),
    }
}

/// Opening amount plus incomes minus expenses
pub fn balance(cycle: &BudgetCycle, expenses: &[Expense], incomes: &[Income]) -> Money {
    let totals = totals(expenses, incomes);
    cycle.amount + totals.income - totals.expense
}

/// Share of the available money already spent, clamped to `[0, 1]`
///
/// Available money is the opening amount plus incomes; when that is zero or
/// negative the result is 0.
pub fn percentage_used(cycle: &BudgetCycle, expenses: &[Expense], incomes: &[Income]) -> f64 {
    let totals = totals(expenses, incomes);
    let available = cycle.amount + totals.income;

    if !available.is_positive() {
        return 0.0;
    }

    (totals.expense.as_f64() / available.as_f64()).clamp(0.0, 1.0)
}

/// Running balance at the end of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub balance: Money,
}

/// Balance trend over a cycle, one point per distinct date
///
/// The first point is always `(start_date, amount)`. Entries sharing a date
/// are merged into a single point. Entries dated on the start date are left
/// out of the running total. Entries dated before it get no point of their
/// own; their amounts are carried into the following points.
pub fn history(cycle: &BudgetCycle, expenses: &[Expense], incomes: &[Income]) -> Vec<HistoryPoint> {
    let mut deltas: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for entry in expenses {
        *deltas.entry(entry.date).or_default() += entry.signed_amount();
    }
    for entry in incomes {
        *deltas.entry(entry.date).or_default() += entry.signed_amount();
    }

    let mut points = vec![HistoryPoint {
        date: cycle.start_date,
        balance: cycle.amount,
    }];
    let mut running = cycle.amount;

    for (date, delta) in deltas {
        if date == cycle.start_date {
            continue;
        }
        running += delta;
        if date > cycle.start_date {
            points.push(HistoryPoint {
                date,
                balance: running,
            });
        }
    }

    points
}

/// Expenses of one category within a cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    /// `None` for uncategorized expenses
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub color: String,
    pub amount: Money,
    /// Share of total expenses, in `[0, 1]`
    pub share: f64,
    pub count: usize,
}

/// Expenses grouped by category, largest first
///
/// Expenses pointing at a category missing from `categories` are counted as
/// uncategorized.
pub fn spending_by_category(
    expenses: &[Expense],
    categories: &HashMap<CategoryId, Category>,
) -> Vec<CategorySpending> {
    let mut grouped: HashMap<Option<CategoryId>, (Money, usize)> = HashMap::new();
    for expense in expenses {
        let key = expense.category_id.filter(|id| categories.contains_key(id));
        let slot = grouped.entry(key).or_insert((Money::zero(), 0));
        slot.0 += expense.amount;
        slot.1 += 1;
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();

    let mut rows: Vec<CategorySpending> = grouped
        .into_iter()
        .map(|(key, (amount, count))| {
            let (name, color) = match key.and_then(|id| categories.get(&id)) {
                Some(category) => (category.name.clone(), category.color.clone()),
                None => (UNCATEGORIZED_NAME.to_string(), UNCATEGORIZED_COLOR.to_string()),
            };
            let share = if total.is_positive() {
                amount.as_f64() / total.as_f64()
            } else {
                0.0
            };
            CategorySpending {
                category_id: key,
                name,
                color,
                amount,
                share,
                count,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// Everything the cycle screens show about a cycle
#[derive(Debug, Clone)]
pub struct CycleSummary {
    pub cycle: BudgetCycle,
    pub totals: Totals,
    pub balance: Money,
    pub percentage_used: f64,
    pub alert: BudgetAlert,
}

impl CycleSummary {
    pub fn compute(cycle: BudgetCycle, expenses: &[Expense], incomes: &[Income]) -> Self {
        let used = percentage_used(&cycle, expenses, incomes);
        Self {
            totals: totals(expenses, incomes),
            balance: balance(&cycle, expenses, incomes),
            percentage_used: used,
            alert: BudgetAlert::from_ratio(used),
            cycle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CycleId;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn cycle(cents: i64) -> BudgetCycle {
        BudgetCycle::new(Money::from_cents(cents), date(1, 25))
    }

    fn expense(cycle: &BudgetCycle, cents: i64, on: NaiveDate) -> Expense {
        Expense::new(cycle.id, "Dépense", Money::from_cents(cents), on)
    }

    fn income(cycle: &BudgetCycle, cents: i64, on: NaiveDate) -> Income {
        Income::new(cycle.id, "Revenu", Money::from_cents(cents), on)
    }

    #[test]
    fn test_balance_without_entries_is_opening_amount() {
        let c = cycle(250000);
        assert_eq!(balance(&c, &[], &[]), c.amount);
        assert_eq!(percentage_used(&c, &[], &[]), 0.0);
    }

    #[test]
    fn test_balance_formula() {
        let c = cycle(250000);
        let expenses = vec![expense(&c, 10000, date(1, 26)), expense(&c, 5050, date(1, 27))];
        let incomes = vec![income(&c, 20000, date(1, 27))];

        assert_eq!(balance(&c, &expenses, &incomes).cents(), 250000 + 20000 - 15050);
        assert_eq!(
            totals(&expenses, &incomes),
            Totals {
                income: Money::from_cents(20000),
                expense: Money::from_cents(15050),
            }
        );
    }

    #[test]
    fn test_percentage_used_clamped() {
        let c = cycle(10000);
        let overspent = vec![expense(&c, 1_000_000, date(1, 26))];
        assert_eq!(percentage_used(&c, &overspent, &[]), 1.0);

        let half = vec![expense(&c, 5000, date(1, 26))];
        assert!((percentage_used(&c, &half, &[]) - 0.5).abs() < 1e-9);

        let with_income = vec![income(&c, 10000, date(1, 26))];
        assert!((percentage_used(&c, &half, &with_income) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_used_zero_denominator() {
        let c = cycle(0);
        let expenses = vec![expense(&c, 5000, date(1, 26))];
        assert_eq!(percentage_used(&c, &expenses, &[]), 0.0);
    }

    #[test]
    fn test_history_example() {
        let c = cycle(250000);
        let expenses = vec![expense(&c, 10000, date(1, 26)), expense(&c, 5000, date(1, 27))];
        let incomes = vec![income(&c, 20000, date(1, 27))];

        let points = history(&c, &expenses, &incomes);
        assert_eq!(
            points,
            vec![
                HistoryPoint { date: date(1, 25), balance: Money::from_cents(250000) },
                HistoryPoint { date: date(1, 26), balance: Money::from_cents(240000) },
                HistoryPoint { date: date(1, 27), balance: Money::from_cents(255000) },
            ]
        );
    }

    #[test]
    fn test_history_merges_same_day_and_orders_dates() {
        let c = cycle(100000);
        let expenses = vec![
            expense(&c, 300, date(2, 3)),
            expense(&c, 100, date(1, 30)),
            expense(&c, 200, date(1, 30)),
        ];

        let points = history(&c, &expenses, &[]);
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].balance.cents(), 100000 - 300);
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_history_ignores_start_day_entries() {
        // Carried fixed entries land on the start date
        let c = cycle(100000);
        let expenses = vec![
            expense(&c, 80000, date(1, 25)).fixed(true),
            expense(&c, 1000, date(1, 26)),
        ];
        let incomes = vec![income(&c, 5000, date(1, 25))];

        let points = history(&c, &expenses, &incomes);
        assert_eq!(
            points,
            vec![
                HistoryPoint { date: date(1, 25), balance: Money::from_cents(100000) },
                HistoryPoint { date: date(1, 26), balance: Money::from_cents(99000) },
            ]
        );
    }

    #[test]
    fn test_history_carries_entries_dated_before_start() {
        let c = cycle(100000);
        let expenses = vec![expense(&c, 2000, date(1, 20)), expense(&c, 1000, date(1, 26))];

        let points = history(&c, &expenses, &[]);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].balance.cents(), 100000);
        assert_eq!(points[1].balance.cents(), 97000);
    }

    #[test]
    fn test_spending_by_category() {
        let c = cycle(100000);
        let food = Category::new("Alimentation", "restaurant", "#4CAF50");
        let mut categories = HashMap::new();
        categories.insert(food.id, food.clone());

        let expenses = vec![
            expense(&c, 3000, date(1, 26)).with_category(food.id),
            expense(&c, 1000, date(1, 27)).with_category(food.id),
            expense(&c, 1000, date(1, 27)),
            // Category no longer exists
            Expense::new(CycleId::new(), "Orphan", Money::from_cents(1000), date(1, 27))
                .with_category(CategoryId::new()),
        ];

        let rows = spending_by_category(&expenses, &categories);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Alimentation");
        assert_eq!(rows[0].amount.cents(), 4000);
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].share - 4000.0 / 6000.0).abs() < 1e-9);
        assert_eq!(rows[1].name, UNCATEGORIZED_NAME);
        assert_eq!(rows[1].count, 2);
    }

    #[test]
    fn test_summary() {
        let c = cycle(10000);
        let expenses = vec![expense(&c, 8500, date(1, 26))];
        let summary = CycleSummary::compute(c, &expenses, &[]);

        assert_eq!(summary.balance.cents(), 1500);
        assert!((summary.percentage_used - 0.85).abs() < 1e-9);
        assert_eq!(summary.alert.level, crate::reports::AlertLevel::Danger);
    }
}
