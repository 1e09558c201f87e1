//! The request capability every catalog operation is built on.

use crate::error::{QobuzError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Query parameter carrying the user's session token.
pub const USER_AUTH_TOKEN: &str = "user_auth_token";

/// A synchronous JSON request capability.
///
/// Implementations own authentication, signing and network I/O. Errors are
/// returned as-is to the caller; nothing in this crate retries.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Issue `endpoint` (e.g. `album/get`) with the given parameters and
    /// return the decoded JSON body.
    fn request(&self, endpoint: &str, params: &Params) -> Result<Value>;
}

/// Named request parameters, kept sorted by key.
///
/// Absent optional values are never inserted, so the transport only ever
/// sees parameters that carry a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
    signed: bool,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a parameter only when `value` is present.
    pub fn with_opt<V: fmt::Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Attach the user's session token, if any.
    pub fn with_token(self, token: Option<&str>) -> Self {
        self.with_opt(USER_AUTH_TOKEN, token)
    }

    /// Mark the request as requiring a signature.
    pub fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    pub fn insert(&mut self, key: &str, value: impl fmt::Display) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Whether a response's `status` field equals `expected`.
///
/// Logical failures are reported this way rather than through HTTP status.
pub(crate) fn status_is(response: &Value, expected: &str) -> bool {
    response.get("status").and_then(Value::as_str) == Some(expected)
}

/// The `<key>.items` array of a listing response.
pub(crate) fn items<'a>(response: &'a Value, key: &'static str) -> Result<&'a [Value]> {
    response
        .get(key)
        .and_then(|listing| listing.get("items"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| QobuzError::InvalidPayload {
            entity: key,
            reason: "response has no `items` array".to_string(),
        })
}

/// Deserialize a payload fragment, naming the entity on failure.
pub(crate) fn parse<T: DeserializeOwned>(value: &Value, entity: &'static str) -> Result<T> {
    T::deserialize(value).map_err(|e| QobuzError::InvalidPayload {
        entity,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_values_are_omitted() {
        let params = Params::new()
            .with("album_id", "0060253780968")
            .with_opt::<u32>("limit", None)
            .with_token(None);

        assert_eq!(params.len(), 1);
        assert_eq!(params.get("album_id"), Some("0060253780968"));
        assert_eq!(params.get(USER_AUTH_TOKEN), None);
    }

    #[test]
    fn test_params_iterate_sorted() {
        let params = Params::new()
            .with("track_id", 5)
            .with("format_id", 27)
            .with("intent", "stream")
            .signed();

        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["format_id", "intent", "track_id"]);
        assert!(params.is_signed());
    }

    #[test]
    fn test_status_is() {
        assert!(status_is(&json!({"status": "success"}), "success"));
        assert!(!status_is(&json!({"status": "error"}), "success"));
        assert!(!status_is(&json!({}), "success"));
    }

    #[test]
    fn test_items_requires_listing() {
        let response = json!({"albums": {"items": [{"id": 1}], "total": 1}});
        assert_eq!(items(&response, "albums").unwrap().len(), 1);
        assert!(matches!(
            items(&response, "tracks"),
            Err(QobuzError::InvalidPayload { entity: "tracks", .. })
        ));
    }
}
