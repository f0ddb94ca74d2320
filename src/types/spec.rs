use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ValidationError, json_type_name};

/// The rule languages the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Shell-style glob over the item's display value.
    Glob,
}

impl RuleKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Glob => "glob",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "glob" => Some(RuleKind::Glob),
            _ => None,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated rule specification, as supplied by a settings source.
///
/// Settings sources hand the engine untyped JSON; [`RuleSpec::from_value`]
/// performs the shape checks. The builder methods exist for callers that
/// assemble rules in code:
///
/// ```
/// use itemsieve::RuleSpec;
///
/// let spec = RuleSpec::glob("*.tmp").with_label("Temporary files");
/// let value: serde_json::Value = spec.into();
/// assert_eq!(value["kind"], "glob");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub kind: RuleKind,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RuleSpec {
    #[must_use]
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Glob,
            pattern: pattern.into(),
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Validate an untyped specification.
    ///
    /// A `label` key that is present must hold a string, `null` included.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let Value::Object(fields) = value else {
            return Err(ValidationError::NotAnObject {
                found: json_type_name(value),
            });
        };

        let label = match fields.get("label") {
            None => None,
            Some(Value::String(label)) => Some(label.clone()),
            Some(other) => {
                return Err(ValidationError::LabelNotString {
                    found: json_type_name(other),
                });
            }
        };

        let kind = match fields.get("kind") {
            Some(Value::String(name)) => {
                RuleKind::from_name(name).ok_or_else(|| ValidationError::UnsupportedKind {
                    kind: name.clone(),
                })?
            }
            Some(other) => {
                return Err(ValidationError::KindNotString {
                    found: json_type_name(other),
                });
            }
            None => return Err(ValidationError::KindNotString { found: "nothing" }),
        };

        let pattern = match (kind, fields.get("pattern")) {
            (RuleKind::Glob, Some(Value::String(pattern))) if pattern.is_empty() => {
                return Err(ValidationError::EmptyPattern);
            }
            (RuleKind::Glob, Some(Value::String(pattern))) => pattern.clone(),
            (RuleKind::Glob, Some(other)) => {
                return Err(ValidationError::PatternNotString {
                    found: json_type_name(other),
                });
            }
            (RuleKind::Glob, None) => {
                return Err(ValidationError::PatternNotString { found: "nothing" });
            }
        };

        Ok(Self {
            kind,
            pattern,
            label,
        })
    }
}

impl From<RuleSpec> for Value {
    fn from(spec: RuleSpec) -> Self {
        let mut fields = Map::new();
        fields.insert("kind".into(), Value::String(spec.kind.as_str().to_owned()));
        fields.insert("pattern".into(), Value::String(spec.pattern));
        if let Some(label) = spec.label {
            fields.insert("label".into(), Value::String(label));
        }
        Value::Object(fields)
    }
}
