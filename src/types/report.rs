use std::fmt;

use serde::Serialize;

use super::verdict::Match;

/// Display text reported for items whose display value is missing or empty.
pub const MISSING_DISPLAY_PLACEHOLDER: &str = "(missing display)";

/// One row of a batch report.
///
/// Every classified item produces a row; `matches` is empty for clean items,
/// including those answered from the clean cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use]
pub struct ReportItem {
    key: String,
    display: String,
    matches: Vec<Match>,
}

impl ReportItem {
    pub fn new(key: impl Into<String>, display: impl Into<String>, matches: Vec<Match>) -> Self {
        Self {
            key: key.into(),
            display: display.into(),
            matches,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    #[must_use]
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.matches.is_empty()
    }
}

impl fmt::Display for ReportItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.display)?;
        if self.matches.is_empty() {
            return write!(f, ": clean");
        }
        let labels: Vec<String> = self.matches.iter().map(ToString::to_string).collect();
        write!(f, ": [{}]", labels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchKind;

    #[test]
    fn report_accessors() {
        let row = ReportItem::new("a", "x.tmp", vec![Match::new(MatchKind::Glob, "*.tmp")]);
        assert_eq!(row.key(), "a");
        assert_eq!(row.display(), "x.tmp");
        assert_eq!(row.matches().len(), 1);
        assert!(!row.is_clean());
    }

    #[test]
    fn report_display_clean() {
        let row = ReportItem::new("b", "x.txt", vec![]);
        assert_eq!(row.to_string(), "b (x.txt): clean");
    }

    #[test]
    fn report_display_with_matches() {
        let row = ReportItem::new(
            "a",
            "x.tmp",
            vec![
                Match::new(MatchKind::Glob, "*.tmp"),
                Match::new(MatchKind::Glob, "x.*"),
            ],
        );
        assert_eq!(row.to_string(), "a (x.tmp): [glob: *.tmp, glob: x.*]");
    }
}
