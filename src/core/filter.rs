use crate::domain::model::CsvRow;

/// Keeps rows whose `Priority` equals the target exactly.
///
/// Matching is case-sensitive and does not trim whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityFilter {
    target: String,
}

impl PriorityFilter {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn matches(&self, row: &CsvRow) -> bool {
        row.priority() == self.target
    }
}

impl Default for PriorityFilter {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PRIORITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::COL_PRIORITY;
    use std::collections::HashMap;

    fn row(priority: &str) -> CsvRow {
        CsvRow::new(
            1,
            HashMap::from([(COL_PRIORITY.to_string(), priority.to_string())]),
        )
    }

    #[test]
    fn test_default_target_is_stop_ship() {
        let filter = PriorityFilter::default();
        assert_eq!(filter.target(), "Stop ship");
        assert!(filter.matches(&row("Stop ship")));
        assert!(!filter.matches(&row("Low")));
    }

    #[test]
    fn test_exact_match_only() {
        let filter = PriorityFilter::default();
        assert!(!filter.matches(&row("stop ship")));
        assert!(!filter.matches(&row(" Stop ship")));
        assert!(!filter.matches(&row("Stop ship ")));
        assert!(!filter.matches(&CsvRow::default()));
    }

    #[test]
    fn test_custom_target() {
        let filter = PriorityFilter::new("Nice to have");
        assert!(filter.matches(&row("Nice to have")));
        assert!(!filter.matches(&row("Stop ship")));
    }
}
