//! Input validation
//!
//! Validators take the raw text a user typed and return the list of problems
//! found, empty when the input is acceptable. They never fail; services turn
//! a non-empty list into [`PeculeError::Validation`](crate::error::PeculeError)
//! only when asked to act on the input.

use chrono::NaiveDate;

use crate::models::category::{is_hex_color, MAX_CATEGORY_NAME_LEN};
use crate::models::entry::MAX_LABEL_LEN;
use crate::models::{Category, CategoryId, Money};

/// Maximum first name length, in characters
pub const MAX_FIRST_NAME_LEN: usize = 50;

/// Parse a date written `YYYY-MM-DD` or `DD/MM/YYYY`
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .ok()
}

/// Parse an amount such as `12.50`, `12,50` or `12,50 €`
pub fn parse_amount(input: &str) -> Option<Money> {
    Money::parse(input).ok()
}

/// Expense or income form
pub fn validate_entry(label: &str, amount: &str, date: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let label = label.trim();
    if label.is_empty() {
        errors.push("Label is required".to_string());
    } else if label.chars().count() > MAX_LABEL_LEN {
        errors.push(format!("Label must be at most {} characters", MAX_LABEL_LEN));
    }

    match parse_amount(amount) {
        None => errors.push("Amount is not a valid number".to_string()),
        Some(money) if !money.is_positive() => {
            errors.push("Amount must be greater than zero".to_string())
        }
        Some(_) => {}
    }

    if parse_date(date).is_none() {
        errors.push("Date must be YYYY-MM-DD or DD/MM/YYYY".to_string());
    }

    errors
}

/// Category name against the existing categories
///
/// `editing` is the category being renamed, which may keep its own name.
pub fn validate_category_name(
    name: &str,
    existing: &[Category],
    editing: Option<CategoryId>,
) -> Vec<String> {
    let mut errors = Vec::new();

    let name = name.trim();
    if name.is_empty() {
        errors.push("Category name is required".to_string());
        return errors;
    }

    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        errors.push(format!(
            "Category name must be at most {} characters",
            MAX_CATEGORY_NAME_LEN
        ));
    }

    let lowered = name.to_lowercase();
    let taken = existing
        .iter()
        .filter(|c| Some(c.id) != editing)
        .any(|c| c.name.trim().to_lowercase() == lowered);
    if taken {
        errors.push(format!("A category named '{}' already exists", name));
    }

    errors
}

/// Full category form: name plus color
pub fn validate_category(
    name: &str,
    color: &str,
    existing: &[Category],
    editing: Option<CategoryId>,
) -> Vec<String> {
    let mut errors = validate_category_name(name, existing, editing);
    if !is_hex_color(color.trim()) {
        errors.push("Color must be written #RRGGBB".to_string());
    }
    errors
}

/// First-run form
pub fn validate_onboarding(first_name: &str, amount: &str, start_date: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let first_name = first_name.trim();
    if first_name.is_empty() {
        errors.push("First name is required".to_string());
    } else if first_name.chars().count() > MAX_FIRST_NAME_LEN {
        errors.push(format!(
            "First name must be at most {} characters",
            MAX_FIRST_NAME_LEN
        ));
    }

    match parse_amount(amount) {
        None => errors.push("Opening amount is not a valid number".to_string()),
        Some(money) if money.is_negative() => {
            errors.push("Opening amount cannot be negative".to_string())
        }
        Some(_) => {}
    }

    if parse_date(start_date).is_none() {
        errors.push("Start date must be YYYY-MM-DD or DD/MM/YYYY".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_with_huge_amount_is_reported() {
        let errors = validate_entry("Loyer", "99999999999999999", "2025-01-26");
        assert_eq!(errors, vec!["Amount is not a valid number".to_string()]);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 25).unwrap();
        assert_eq!(parse_date("2025-01-25"), Some(expected));
        assert_eq!(parse_date(" 25/01/2025 "), Some(expected));
        assert_eq!(parse_date("25-01-2025"), None);
        assert_eq!(parse_date("2025-02-30"), None);
    }

    #[test]
    fn test_valid_entry() {
        assert!(validate_entry("Courses", "42,50", "2025-01-26").is_empty());
    }

    #[test]
    fn test_entry_collects_every_problem() {
        let errors = validate_entry("   ", "0", "demain");
        assert_eq!(errors.len(), 3);

        let errors = validate_entry(&"x".repeat(101), "abc", "26/01/2025");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("100"));

        assert!(validate_entry(&"é".repeat(100), "1", "26/01/2025").is_empty());
        assert_eq!(validate_entry("Courses", "-3", "26/01/2025").len(), 1);
    }

    #[test]
    fn test_category_name_uniqueness() {
        let food = Category::new("Alimentation", "restaurant", "#4CAF50");
        let existing = vec![food.clone()];

        assert_eq!(validate_category_name("alimentation ", &existing, None).len(), 1);
        assert!(validate_category_name("ALIMENTATION", &existing, Some(food.id)).is_empty());
        assert!(validate_category_name("Voyages", &existing, None).is_empty());
    }

    #[test]
    fn test_category_name_rules() {
        assert_eq!(validate_category_name("", &[], None).len(), 1);
        assert_eq!(validate_category_name(&"a".repeat(31), &[], None).len(), 1);
        assert!(validate_category_name(&"a".repeat(30), &[], None).is_empty());
    }

    #[test]
    fn test_category_color() {
        assert!(validate_category("Voyages", "#00AAFF", &[], None).is_empty());
        assert_eq!(validate_category("Voyages", "blue", &[], None).len(), 1);
        assert_eq!(validate_category("Voyages", "#00AAF", &[], None).len(), 1);
    }

    #[test]
    fn test_onboarding() {
        assert!(validate_onboarding("Camille", "0", "2025-01-25").is_empty());
        assert!(validate_onboarding("Camille", "2500,00", "25/01/2025").is_empty());
        assert_eq!(validate_onboarding("", "-1", "x").len(), 3);
        assert_eq!(validate_onboarding(&"n".repeat(51), "10", "2025-01-25").len(), 1);
    }
}
