//! Output formatting.

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde::Serialize;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table format
    Table,
    /// JSON format
    Json,
    /// Plain text format
    #[default]
    Plain,
}

/// Trait for plain text output.
pub trait PlainPrint {
    /// Print as plain text with formatting.
    fn plain_print(&self);
}

/// Trait for table row generation.
pub trait TableRow {
    /// Get table headers.
    fn headers() -> Vec<&'static str>;
    /// Get row data as strings.
    fn row(&self) -> Vec<String>;
}

/// Print items in plain text format.
pub fn print_plain<T: PlainPrint>(items: &[T]) {
    if items.is_empty() {
        println!("No results");
        return;
    }
    for item in items {
        item.plain_print();
    }
}

/// Print a table of items with proper formatting for each output mode.
pub fn print_table<T: TableRow + Serialize + PlainPrint>(items: Vec<T>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items).unwrap_or_default());
        }
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results");
                return;
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(T::headers());
            for item in &items {
                table.add_row(item.row());
            }
            println!("{table}");
        }
        OutputFormat::Plain => {
            print_plain(&items);
        }
    }
}

/// Format a timestamp for display. Missing timestamps fail soft.
pub fn format_time(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "some time ago".to_string(),
    }
}

/// Format a relative time for display. Rows whose timestamp failed to
/// parse render as a generic "some time ago".
pub fn format_relative_time(timestamp: Option<DateTime<Utc>>) -> String {
    let Some(ts) = timestamp else {
        return "some time ago".to_string();
    };

    let diff = (Utc::now() - ts).num_seconds();

    if diff < 0 {
        "just now".to_string()
    } else if diff < 60 {
        format!("{}s ago", diff)
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h {}m ago", diff / 3600, (diff % 3600) / 60)
    } else if diff < 2592000 {
        format!("{}d {}h ago", diff / 86400, (diff % 86400) / 3600)
    } else {
        format_time(Some(ts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_timestamp_fails_soft() {
        assert_eq!(format_relative_time(None), "some time ago");
        assert_eq!(format_time(None), "some time ago");
    }

    #[test]
    fn test_recent_relative_time() {
        let recent = Utc::now() - chrono::Duration::seconds(30);
        let rendered = format_relative_time(Some(recent));
        assert!(rendered.ends_with("s ago"), "got {rendered}");
    }
}
