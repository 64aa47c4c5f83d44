use crate::domain::model::{CsvRow, IssueDraft, COL_DESCRIPTION, COL_NOTES, COL_PLATFORM, COL_TITLE};

/// Builds the issue summary and description from a bug report row.
///
/// The summary is the `Title`, falling back to the raw description. The
/// description gets an `Additional notes` and a `Platform/URL` section only
/// when those cells are non-empty.
pub fn build_draft(row: &CsvRow) -> IssueDraft {
    let issue_text = row.get(COL_DESCRIPTION);
    let title = row.get(COL_TITLE);

    let mut description = issue_text.to_string();
    let notes = row.get(COL_NOTES);
    if !notes.is_empty() {
        description.push_str(&format!("\n\n**Additional notes**:\n{}", notes));
    }
    let platform = row.get(COL_PLATFORM);
    if !platform.is_empty() {
        description.push_str(&format!("\n\n**Platform/URL**: {}", platform));
    }

    let summary = if title.is_empty() { issue_text } else { title };

    IssueDraft {
        summary: summary.to_string(),
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        let fields: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CsvRow::new(1, fields)
    }

    #[test]
    fn test_crash_on_launch_row() {
        let draft = build_draft(&row(&[
            ("Priority", "Stop ship"),
            (COL_DESCRIPTION, "Crash on launch"),
            (COL_NOTES, ""),
            (COL_PLATFORM, "iOS 17"),
            (COL_TITLE, ""),
        ]));

        assert_eq!(draft.summary, "Crash on launch");
        assert_eq!(draft.description, "Crash on launch\n\n**Platform/URL**: iOS 17");
        assert!(!draft.description.contains("Additional notes"));
    }

    #[test]
    fn test_title_wins_over_description() {
        let draft = build_draft(&row(&[
            (COL_DESCRIPTION, "Tapping save twice duplicates the entry"),
            (COL_TITLE, "Duplicate entries on save"),
        ]));
        assert_eq!(draft.summary, "Duplicate entries on save");
        assert_eq!(draft.description, "Tapping save twice duplicates the entry");
    }

    #[test]
    fn test_all_sections_in_order() {
        let draft = build_draft(&row(&[
            (COL_DESCRIPTION, "Login fails"),
            (COL_NOTES, "Only with SSO\nrepro 3/3"),
            (COL_PLATFORM, "https://app.example.com/login"),
        ]));

        assert_eq!(
            draft.description,
            "Login fails\n\n**Additional notes**:\nOnly with SSO\nrepro 3/3\n\n**Platform/URL**: https://app.example.com/login"
        );
    }

    #[test]
    fn test_empty_row_yields_empty_draft() {
        let draft = build_draft(&CsvRow::default());
        assert_eq!(draft.summary, "");
        assert_eq!(draft.description, "");
    }
}
