use serde::{Deserialize, Serialize};

/// An entry supplied by an item-list source, e.g. a recent-files provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identity of the item; the clean cache is keyed on it.
    pub key: String,
    /// Text the rules match against.
    #[serde(default)]
    pub display: Option<String>,
}

impl Item {
    pub fn new(key: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display: Some(display.into()),
        }
    }

    pub fn without_display(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display: None,
        }
    }

    /// The display value, or `None` if it is missing or empty.
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        self.display.as_deref().filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_display_counts_as_missing() {
        assert_eq!(Item::new("k", "").display_text(), None);
        assert_eq!(Item::without_display("k").display_text(), None);
        assert_eq!(Item::new("k", "a.txt").display_text(), Some("a.txt"));
    }

    #[test]
    fn deserializes_without_display() {
        let item: Item = serde_json::from_str(r#"{"key": "file:///a"}"#).unwrap();
        assert_eq!(item, Item::without_display("file:///a"));
    }
}
