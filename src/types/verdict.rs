use std::fmt;

use serde::Serialize;

use super::spec::RuleKind;

/// Label of the built-in verdict for items without a display value.
pub const LINT_MISSING_DISPLAY: &str = "MISSING-DISPLAY-URI";

/// Where a [`Match`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// A user-supplied glob rule.
    Glob,
    /// The built-in check that runs before any rule.
    Lint,
}

impl MatchKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Glob => "glob",
            MatchKind::Lint => "lint",
        }
    }
}

impl From<RuleKind> for MatchKind {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::Glob => MatchKind::Glob,
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule's verdict for one item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[must_use]
pub struct Match {
    kind: MatchKind,
    label: String,
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.label)
    }
}

impl Match {
    pub fn new(kind: MatchKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }

    /// The built-in verdict for a missing or empty display value.
    pub fn missing_display() -> Self {
        Self::new(MatchKind::Lint, LINT_MISSING_DISPLAY)
    }

    #[must_use]
    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// A match pushed to subscribers while a streaming classification runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchEvent {
    pub key: String,
    pub verdict: Match,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_match() {
        let m = Match::new(MatchKind::Glob, "*.tmp");
        assert_eq!(m.kind(), MatchKind::Glob);
        assert_eq!(m.label(), "*.tmp");
    }

    #[test]
    fn missing_display_is_lint() {
        let m = Match::missing_display();
        assert_eq!(m.kind(), MatchKind::Lint);
        assert_eq!(m.label(), "MISSING-DISPLAY-URI");
        assert_eq!(m.to_string(), "lint: MISSING-DISPLAY-URI");
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_value(Match::new(MatchKind::Glob, "x")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "glob", "label": "x"}));
    }
}
