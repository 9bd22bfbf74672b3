//! Budget cycle model
//!
//! A cycle is a budget period with an opening balance. The cycle whose
//! `end_date` is `None` is the one currently open.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CycleId;
use super::money::Money;

/// Validation errors for budget cycles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleValidationError {
    NegativeAmount,
    EndBeforeStart {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl fmt::Display for CycleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Opening amount cannot be negative"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "Cycle cannot end ({}) before it starts ({})", end, start)
            }
        }
    }
}

impl std::error::Error for CycleValidationError {}

/// A budget period with an opening balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCycle {
    pub id: CycleId,

    /// Opening balance for the period
    pub amount: Money,

    pub start_date: NaiveDate,

    /// `None` while the cycle is open
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetCycle {
    /// Create a new open cycle
    pub fn new(amount: Money, start_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: CycleId::new(),
            amount,
            start_date,
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Close the cycle on the given date
    pub fn close(&mut self, end_date: NaiveDate) {
        self.end_date = Some(end_date);
        self.updated_at = Utc::now();
    }

    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.updated_at = Utc::now();
    }

    /// Whether `date` falls inside the cycle (open cycles have no upper bound)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }

    /// Human-readable period, e.g. "25/01/2025 – 24/02/2025" or
    /// "depuis le 25/01/2025" for an open cycle
    pub fn period_label(&self) -> String {
        let start = self.start_date.format("%d/%m/%Y");
        match self.end_date {
            Some(end) => format!("{} – {}", start, end.format("%d/%m/%Y")),
            None => format!("depuis le {}", start),
        }
    }

    pub fn validate(&self) -> Result<(), CycleValidationError> {
        if self.amount.is_negative() {
            return Err(CycleValidationError::NegativeAmount);
        }

        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(CycleValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for BudgetCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.period_label(), self.amount)
    }
}
