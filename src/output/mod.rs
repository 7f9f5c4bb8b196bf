use serde::{Deserialize, Serialize};

pub mod reporter;

pub use reporter::Reporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "text" | "table" => OutputFormat::Text,
            _ => OutputFormat::Text,
        }
    }
}

pub const COLUMN_WIDTH: usize = 30;

/// Two left-aligned columns, matching the table layout of every section.
pub fn table_row(label: &str, value: &str) -> String {
    format!(
        "{:<width$} {:<width$}",
        label,
        value,
        width = COLUMN_WIDTH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_are_case_insensitive() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::from("html"), OutputFormat::Text);
    }

    #[test]
    fn rows_pad_both_columns() {
        let row = table_row("Open issues", "12");
        assert_eq!(row.len(), COLUMN_WIDTH * 2 + 1);
        assert!(row.starts_with("Open issues "));
        assert_eq!(&row[COLUMN_WIDTH + 1..COLUMN_WIDTH + 3], "12");
    }
}
