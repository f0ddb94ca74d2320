mod error;
mod item;
mod pattern;
mod report;
mod rule;
mod spec;
mod verdict;

pub use error::ValidationError;
pub use item::Item;
pub use pattern::CompiledPattern;
pub use report::{MISSING_DISPLAY_PLACEHOLDER, ReportItem};
pub use rule::CompiledRule;
pub use spec::{RuleKind, RuleSpec};
pub use verdict::{LINT_MISSING_DISPLAY, Match, MatchEvent, MatchKind};
