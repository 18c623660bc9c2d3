use crate::import::ImportSummary;
use owo_colors::OwoColorize;

pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    pub fn format(summary: &ImportSummary, use_color: bool) -> Self {
        let message = format!(
            "Finished importing OMOP concepts: {} concepts created, {} concepts updated.",
            summary.created, summary.updated
        );

        let prefix = match (summary.processed(), use_color) {
            (0, true) => "•".yellow().to_string(),
            (0, false) => "•".to_string(),
            (_, true) => "✓".green().to_string(),
            (_, false) => "✓".to_string(),
        };

        Self { prefix, message }
    }
}

pub fn summary_json(summary: &ImportSummary) -> Result<String, String> {
    serde_json::to_string_pretty(summary).map_err(|e| format!("Failed to serialize summary: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn summary(created: u64, updated: u64) -> ImportSummary {
        ImportSummary {
            path: PathBuf::from("CONCEPT.csv"),
            total_rows: created + updated,
            created,
            updated,
            elapsed_ms: 12,
        }
    }

    #[test]
    fn message_reports_both_counters() {
        let out = CommandSummary::format(&summary(3, 0), false);
        assert_eq!(out.prefix, "✓");
        assert_eq!(
            out.message,
            "Finished importing OMOP concepts: 3 concepts created, 0 concepts updated."
        );
    }

    #[test]
    fn empty_import_uses_neutral_prefix() {
        let out = CommandSummary::format(&summary(0, 0), false);
        assert_eq!(out.prefix, "•");
    }

    #[test]
    fn colored_prefix_has_escape_codes() {
        let out = CommandSummary::format(&summary(0, 3), true);
        assert!(out.prefix.contains("\x1b["));
        assert!(!out.message.contains("\x1b["));
    }

    #[test]
    fn json_contains_counters() {
        let json = summary_json(&summary(2, 1)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["created"], 2);
        assert_eq!(value["updated"], 1);
        assert_eq!(value["total_rows"], 3);
        assert_eq!(value["path"], "CONCEPT.csv");
        assert_eq!(value["elapsed_ms"], 12);
    }
}
