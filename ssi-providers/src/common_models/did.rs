use std::fmt;

use serde::{Deserialize, Serialize};

/// A method-typed identity string, e.g. `did:key:z6Mk...`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DidValue(String);

impl fmt::Display for DidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<String> for DidValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<DidValue> for String {
    fn from(value: DidValue) -> Self {
        value.0
    }
}

impl DidValue {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the method name, i.e. `key` for `did:key:z6Mk...`.
    pub fn method(&self) -> Option<&str> {
        let mut parts = self.0.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("did"), Some(method), Some(_)) if !method.is_empty() => Some(method),
            _ => None,
        }
    }
}

impl From<&str> for DidValue {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::DidValue;

    #[test]
    fn test_did_value_method() {
        assert_eq!(DidValue::from("did:key:z6MkTest").method(), Some("key"));
        assert_eq!(
            DidValue::from("did:web:example.com:alice").method(),
            Some("web")
        );
        assert_eq!(DidValue::from("not-a-did").method(), None);
        assert_eq!(DidValue::from("did::z").method(), None);
    }
}
