//! Expense category model
//!
//! Categories live in a mutable table. A fixed set of defaults is seeded on
//! first run; those are flagged `is_default` and cannot be deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Maximum category name length, in characters
pub const MAX_CATEGORY_NAME_LEN: usize = 30;

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Category name too long ({} chars, max {})",
                len, MAX_CATEGORY_NAME_LEN
            ),
            Self::InvalidColor(color) => {
                write!(f, "Invalid color '{}', expected #RRGGBB", color)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

/// An expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,

    /// Icon identifier (Material icon name)
    pub icon: String,

    /// Display color as `#RRGGBB`
    pub color: String,

    /// Seeded at first run; never deletable
    #[serde(default)]
    pub is_default: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new user category
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
        self.updated_at = Utc::now();
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) {
        self.icon = icon.into();
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = name.chars().count();
        if len > MAX_CATEGORY_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Check for a `#RRGGBB` color string
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Categories seeded on first run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCategory {
    Food,
    Housing,
    Transport,
    Health,
    Leisure,
    Shopping,
    Bills,
    Other,
}

impl DefaultCategory {
    pub fn all() -> &'static [DefaultCategory] {
        &[
            DefaultCategory::Food,
            DefaultCategory::Housing,
            DefaultCategory::Transport,
            DefaultCategory::Health,
            DefaultCategory::Leisure,
            DefaultCategory::Shopping,
            DefaultCategory::Bills,
            DefaultCategory::Other,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            DefaultCategory::Food => "Alimentation",
            DefaultCategory::Housing => "Logement",
            DefaultCategory::Transport => "Transport",
            DefaultCategory::Health => "Santé",
            DefaultCategory::Leisure => "Loisirs",
            DefaultCategory::Shopping => "Shopping",
            DefaultCategory::Bills => "Factures",
            DefaultCategory::Other => "Autre",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DefaultCategory::Food => "restaurant",
            DefaultCategory::Housing => "home",
            DefaultCategory::Transport => "directions_car",
            DefaultCategory::Health => "local_hospital",
            DefaultCategory::Leisure => "sports_esports",
            DefaultCategory::Shopping => "shopping_bag",
            DefaultCategory::Bills => "receipt_long",
            DefaultCategory::Other => "category",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            DefaultCategory::Food => "#4CAF50",
            DefaultCategory::Housing => "#3F51B5",
            DefaultCategory::Transport => "#FF9800",
            DefaultCategory::Health => "#E91E63",
            DefaultCategory::Leisure => "#9C27B0",
            DefaultCategory::Shopping => "#00BCD4",
            DefaultCategory::Bills => "#795548",
            DefaultCategory::Other => "#607D8B",
        }
    }

    /// Convert to a seeded category
    pub fn to_category(&self) -> Category {
        let mut category = Category::new(self.name(), self.icon(), self.color());
        category.is_default = true;
        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_categories() {
        let seeded: Vec<Category> = DefaultCategory::all()
            .iter()
            .map(|d| d.to_category())
            .collect();

        assert_eq!(seeded.len(), 8);
        assert!(seeded.iter().all(|c| c.is_default));
        assert!(seeded.iter().all(|c| c.validate().is_ok()));
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Vacances", "flight", "#00AAFF");
        assert!(category.validate().is_ok());

        category.set_color("blue");
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));

        category.set_color("#00AAFF");
        category.rename("");
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.rename("x".repeat(31));
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(31))
        );
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#a1B2c3"));
        assert!(!is_hex_color("a1B2c3"));
        assert!(!is_hex_color("#a1B2c"));
        assert!(!is_hex_color("#a1B2cg"));
    }
}
