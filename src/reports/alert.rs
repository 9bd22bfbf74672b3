//! Budget alert classifier
//!
//! Maps how much of a budget has been used to a severity level with a
//! message for the user.

use std::fmt;

use crate::models::{BudgetCycle, Expense, Income};

use super::balance::percentage_used;

/// Severity of a budget alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlertLevel {
    /// Below 50%
    None,
    /// From 50% to below 80%
    Warning,
    /// From 80% to below 100%
    Danger,
    /// 100% and above
    Exceeded,
}

impl AlertLevel {
    /// Lower bound (inclusive) of each level, in percent
    const WARNING_FROM: f64 = 50.0;
    const DANGER_FROM: f64 = 80.0;
    const EXCEEDED_FROM: f64 = 100.0;

    pub fn from_percent(percent: f64) -> Self {
        if percent >= Self::EXCEEDED_FROM {
            AlertLevel::Exceeded
        } else if percent >= Self::DANGER_FROM {
            AlertLevel::Danger
        } else if percent >= Self::WARNING_FROM {
            AlertLevel::Warning
        } else {
            AlertLevel::None
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::None => write!(f, "none"),
            AlertLevel::Warning => write!(f, "warning"),
            AlertLevel::Danger => write!(f, "danger"),
            AlertLevel::Exceeded => write!(f, "exceeded"),
        }
    }
}

/// A classified budget usage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetAlert {
    pub level: AlertLevel,
    /// Usage on a 0-100 scale
    pub percent: f64,
}

impl BudgetAlert {
    /// Classify a usage given in percent (0-100 scale)
    pub fn classify(percent: f64) -> Self {
        Self {
            level: AlertLevel::from_percent(percent),
            percent,
        }
    }

    /// Classify a usage ratio in `[0, 1]`, as returned by `percentage_used`
    pub fn from_ratio(ratio: f64) -> Self {
        Self::classify(ratio * 100.0)
    }

    /// Classify how much of a cycle's available money has been spent
    pub fn for_cycle(cycle: &BudgetCycle, expenses: &[Expense], incomes: &[Income]) -> Self {
        Self::from_ratio(percentage_used(cycle, expenses, incomes))
    }

    /// Percentage rounded to the nearest integer
    pub fn rounded_percent(&self) -> i64 {
        self.percent.round() as i64
    }

    /// Message for the user; `None` below the warning threshold
    pub fn message(&self) -> Option<String> {
        let percent = self.rounded_percent();
        match self.level {
            AlertLevel::None => None,
            AlertLevel::Warning => Some(format!(
                "Heads up: {}% of your budget is already spent.",
                percent
            )),
            AlertLevel::Danger => Some(format!(
                "Budget almost exhausted: {}% spent.",
                percent
            )),
            AlertLevel::Exceeded => Some(format!(
                "Budget exceeded: {}% spent.",
                percent
            )),
        }
    }
}
