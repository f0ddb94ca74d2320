mod cache;
mod compile;
mod config;
mod engine;
mod error;
mod evaluate;
mod operation;
mod parse;
mod types;

pub use cache::{CleanCache, DEFAULT_CACHE_CAPACITY};
pub use config::{EngineConfig, Settings};
pub use engine::{Engine, TORN_DOWN_MESSAGE};
pub use error::{ConfigError, EngineError, SUPERSEDED_CLASSIFICATION};
pub use operation::{DEFAULT_ABORT_MESSAGE, OperationController, Tick};
pub use types::{
    CompiledPattern, CompiledRule, Item, LINT_MISSING_DISPLAY, MISSING_DISPLAY_PLACEHOLDER, Match,
    MatchEvent, MatchKind, ReportItem, RuleKind, RuleSpec, ValidationError,
};
