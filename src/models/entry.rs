//! Behaviour shared by the dated, amount-bearing records owned by a cycle
//!
//! Expenses and incomes are stored separately but are folded together by the
//! balance calculators, duplicated together on rollover and exported
//! together. [`CycleEntry`] is the seam they share.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

use super::ids::CycleId;
use super::money::Money;

/// Which side of the ledger an entry sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    /// Label used in exports
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Expense => "Dépense",
            EntryKind::Income => "Revenu",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation errors shared by expenses and incomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyLabel,
    LabelTooLong(usize),
    NonPositiveAmount,
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLabel => write!(f, "Label cannot be empty"),
            Self::LabelTooLong(len) => {
                write!(f, "Label too long ({} chars, max {})", len, MAX_LABEL_LEN)
            }
            Self::NonPositiveAmount => write!(f, "Amount must be greater than zero"),
        }
    }
}

impl std::error::Error for EntryValidationError {}

/// Maximum label length, in characters
pub const MAX_LABEL_LEN: usize = 100;

/// A dated amount owned by exactly one budget cycle
pub trait CycleEntry: Clone + Serialize {
    type Id: Copy + Eq + Hash + fmt::Display;

    const KIND: EntryKind;

    fn id(&self) -> Self::Id;
    fn cycle_id(&self) -> CycleId;
    fn label(&self) -> &str;
    fn amount(&self) -> Money;
    fn date(&self) -> NaiveDate;
    fn is_fixed(&self) -> bool;

    /// A fresh copy of this entry placed in another cycle on the given date
    fn carry_forward(&self, cycle_id: CycleId, date: NaiveDate) -> Self;

    /// Contribution to the cycle balance: incomes add, expenses subtract
    fn signed_amount(&self) -> Money {
        match Self::KIND {
            EntryKind::Expense => -self.amount(),
            EntryKind::Income => self.amount(),
        }
    }

    fn validate(&self) -> Result<(), EntryValidationError> {
        let label = self.label().trim();
        if label.is_empty() {
            return Err(EntryValidationError::EmptyLabel);
        }

        let len = label.chars().count();
        if len > MAX_LABEL_LEN {
            return Err(EntryValidationError::LabelTooLong(len));
        }

        if !self.amount().is_positive() {
            return Err(EntryValidationError::NonPositiveAmount);
        }

        Ok(())
    }
}
