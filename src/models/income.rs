//! Income model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::{CycleEntry, EntryKind};
use super::ids::{CycleId, IncomeId};
use super::money::Money;

/// Money received during a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: IncomeId,
    pub cycle_id: CycleId,
    pub label: String,
    pub amount: Money,
    pub date: NaiveDate,

    /// Recurring income, carried into each new cycle
    #[serde(default)]
    pub is_fixed: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Income {
    pub fn new(
        cycle_id: CycleId,
        label: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: IncomeId::new(),
            cycle_id,
            label: label.into(),
            amount,
            date,
            is_fixed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn fixed(mut self, is_fixed: bool) -> Self {
        self.is_fixed = is_fixed;
        self
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl CycleEntry for Income {
    type Id = IncomeId;

    const KIND: EntryKind = EntryKind::Income;

    fn id(&self) -> IncomeId {
        self.id
    }

    fn cycle_id(&self) -> CycleId {
        self.cycle_id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn amount(&self) -> Money {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_fixed(&self) -> bool {
        self.is_fixed
    }

    fn carry_forward(&self, cycle_id: CycleId, date: NaiveDate) -> Self {
        Income::new(cycle_id, self.label.clone(), self.amount, date).fixed(self.is_fixed)
    }
}

impl fmt::Display for Income {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (+{})", self.date, self.label, self.amount)
    }
}
