use serde_json::Value;

/// Site configuration as read from the control plane.
///
/// Treated as opaque: the only question asked of it is whether a marker key
/// appears somewhere in its serialized form.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSnapshot {
    raw: Value,
}

impl ConfigurationSnapshot {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn empty() -> Self {
        Self::new(Value::Object(Default::default()))
    }

    pub fn to_text(&self) -> String {
        self.raw.to_string()
    }

    /// Finds `key` ignoring ASCII case and returns it spelled the way the
    /// snapshot spells it.
    ///
    /// An occurrence in key position (`"key":`) wins over one buried in a
    /// value; otherwise the first occurrence anywhere in the text is used.
    pub fn find_token(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }

        let text = self.to_text();
        // ASCII uppercasing keeps byte offsets stable between the two strings.
        let haystack = text.to_ascii_uppercase();
        let needle = key.to_ascii_uppercase();

        let start = haystack
            .find(&format!("\"{}\":", needle))
            .map(|idx| idx + 1)
            .or_else(|| haystack.find(&needle))?;

        text.get(start..start + needle.len()).map(str::to_string)
    }
}

impl From<Value> for ConfigurationSnapshot {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}
