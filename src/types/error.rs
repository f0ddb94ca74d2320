use thiserror::Error;

/// Why a single rule specification was rejected.
///
/// Checks run in a fixed order (object shape, `label`, `kind`, `pattern`) and
/// the first violation wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rule specification must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("field 'label' must be a string, found {found}")]
    LabelNotString { found: &'static str },

    #[error("field 'kind' must be a string, found {found}")]
    KindNotString { found: &'static str },

    #[error("unsupported rule kind '{kind}'")]
    UnsupportedKind { kind: String },

    #[error("field 'pattern' must be a string, found {found}")]
    PatternNotString { found: &'static str },

    #[error("field 'pattern' must not be empty")]
    EmptyPattern,
}

/// Short JSON type name used in validation messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_an_object_message() {
        let err = ValidationError::NotAnObject { found: "null" };
        assert_eq!(
            err.to_string(),
            "rule specification must be an object, found null"
        );
    }

    #[test]
    fn label_not_string_message() {
        let err = ValidationError::LabelNotString { found: "number" };
        assert_eq!(err.to_string(), "field 'label' must be a string, found number");
    }

    #[test]
    fn unsupported_kind_message() {
        let err = ValidationError::UnsupportedKind {
            kind: "regex".into(),
        };
        assert_eq!(err.to_string(), "unsupported rule kind 'regex'");
    }

    #[test]
    fn empty_pattern_message() {
        assert_eq!(
            ValidationError::EmptyPattern.to_string(),
            "field 'pattern' must not be empty"
        );
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&serde_json::json!(null)), "null");
        assert_eq!(json_type_name(&serde_json::json!([1])), "array");
        assert_eq!(json_type_name(&serde_json::json!({"a": 1})), "object");
        assert_eq!(json_type_name(&serde_json::json!(1.5)), "number");
    }
}
