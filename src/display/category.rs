//! Category display formatting

use tabled::Tabled;

use crate::models::Category;

use super::table::render_table;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Default")]
    default: &'static str,
}

/// Format categories as a table
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'pecule init' to create the default categories.\n"
            .to_string();
    }

    render_table(categories.iter().map(|c| CategoryRow {
        id: c.id.to_string(),
        name: c.name.clone(),
        icon: c.icon.clone(),
        color: c.color.clone(),
        default: if c.is_default { "yes" } else { "" },
    }))
}

/// Format category details
pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:       {}\n", category.id));
    output.push_str(&format!("  Icon:     {}\n", category.icon));
    output.push_str(&format!("  Color:    {}\n", category.color));
    output.push_str(&format!(
        "  Default:  {}\n",
        if category.is_default { "Yes" } else { "No" }
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        category.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DefaultCategory;

    #[test]
    fn test_format_empty_list() {
        let output = format_category_list(&[]);
        assert!(output.contains("No categories found"));
    }

    #[test]
    fn test_format_list() {
        let categories = vec![
            DefaultCategory::Food.to_category(),
            Category::new("Voyages", "flight", "#00AAFF"),
        ];

        let output = format_category_list(&categories);
        assert!(output.contains("Alimentation"));
        assert!(output.contains("Voyages"));
        assert!(output.contains("#00AAFF"));
    }

    #[test]
    fn test_format_details() {
        let category = Category::new("Voyages", "flight", "#00AAFF");
        let output = format_category_details(&category);
        assert!(output.contains("Category: Voyages"));
        assert!(output.contains("Default:  No"));
    }
}
