use super::error::ValidationError;
use super::pattern::CompiledPattern;
use super::spec::{RuleKind, RuleSpec};

/// A validated rule with its matcher compiled.
///
/// Produced by [`CompiledRule::compile`] and published by the engine as part
/// of an immutable rule set. The label defaults to the raw pattern text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    kind: RuleKind,
    label: String,
    matcher: CompiledPattern,
}

impl CompiledRule {
    /// Validate and compile one untyped rule specification.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for the first violated constraint. Nothing
    /// is returned for a spec that fails half way.
    pub fn compile(value: &serde_json::Value) -> Result<Self, ValidationError> {
        Self::from_spec(RuleSpec::from_value(value)?)
    }

    /// Compile an already-typed specification.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyPattern`] if the pattern is empty.
    pub fn from_spec(spec: RuleSpec) -> Result<Self, ValidationError> {
        if spec.pattern.is_empty() {
            return Err(ValidationError::EmptyPattern);
        }
        let matcher = match spec.kind {
            RuleKind::Glob => CompiledPattern::new(&spec.pattern),
        };
        Ok(Self {
            kind: spec.kind,
            label: spec.label.unwrap_or(spec.pattern),
            matcher,
        })
    }

    #[must_use]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        &self.matcher
    }

    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.matches(text)
    }
}
