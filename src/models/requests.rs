//! Request DTOs for the key-value server API
//!
//! Defines the structure of incoming HTTP request bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CacheError, Result};

/// Deadline as sent by clients: epoch seconds, either as a number or a numeric string.
///
/// Any other JSON shape lands in `Other` so it is rejected as a bad request
/// rather than failing body extraction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Deadline {
    Seconds(i64),
    Text(String),
    Other(Value),
}

impl Deadline {
    /// Converts to an absolute UTC timestamp; an empty string means no deadline.
    pub fn to_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        let seconds = match self {
            Deadline::Seconds(seconds) => *seconds,
            Deadline::Text(text) if text.trim().is_empty() => return Ok(None),
            Deadline::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                CacheError::InvalidRequest(format!("Deadline '{}' is not an integer", text))
            })?,
            Deadline::Other(other) => {
                return Err(CacheError::InvalidRequest(format!(
                    "Deadline {} is not an integer number of seconds",
                    other
                )))
            }
        };

        DateTime::from_timestamp(seconds, 0).map(Some).ok_or_else(|| {
            CacheError::InvalidRequest(format!("Deadline {} is out of range", seconds))
        })
    }
}

/// Request body for POST /store (insert-if-absent) and PUT /store (overwrite)
///
/// # Fields
/// - `key`: The key to store the value under
/// - `value`: Any JSON value, including `""`
/// - `deadline`: Optional absolute expiry in Unix epoch seconds
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The key
    pub key: String,
    /// The value to store; null or missing is rejected
    #[serde(default)]
    pub value: Option<Value>,
    /// Optional deadline in epoch seconds
    #[serde(default)]
    pub deadline: Option<Deadline>,
}

impl StoreRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.value.is_none() {
            return Some("Value is required".to_string());
        }
        None
    }

    /// Validates and splits the request into key, value and absolute deadline.
    pub fn into_parts(self) -> Result<(String, Value, Option<DateTime<Utc>>)> {
        if let Some(error_msg) = self.validate() {
            return Err(CacheError::InvalidRequest(error_msg));
        }
        let expires_at = match &self.deadline {
            Some(deadline) => deadline.to_timestamp()?,
            None => None,
        };
        let value = self
            .value
            .ok_or_else(|| CacheError::InvalidRequest("Value is required".to_string()))?;
        Ok((self.key, value, expires_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, Some(json!("hello")));
        assert!(req.deadline.is_none());
    }

    #[test]
    fn test_store_request_structured_value() {
        let json = r#"{"key": "doc", "value": {"a": [1, 2]}, "deadline": 1700000000}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value, Some(json!({"a": [1, 2]})));
        assert_eq!(req.deadline, Some(Deadline::Seconds(1_700_000_000)));
    }

    #[test]
    fn test_deadline_as_string() {
        let json = r#"{"key": "k", "value": 1, "deadline": "1700000000"}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        let (_, _, expires_at) = req.into_parts().unwrap();
        assert_eq!(expires_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_empty_deadline_means_no_expiry() {
        assert_eq!(Deadline::Text(String::new()).to_timestamp().unwrap(), None);
    }

    #[test]
    fn test_invalid_deadline_rejected() {
        let result = Deadline::Text("tomorrow".to_string()).to_timestamp();
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));

        let result = Deadline::Seconds(i64::MAX).to_timestamp();
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_non_integer_deadlines_rejected() {
        for raw in ["1.5", "true", "99999999999999999999", "[1]", "{\"at\": 1}"] {
            let json = format!(r#"{{"key": "k", "value": 1, "deadline": {}}}"#, raw);
            let req: StoreRequest = serde_json::from_str(&json).unwrap();
            assert!(
                matches!(req.into_parts(), Err(CacheError::InvalidRequest(_))),
                "deadline {} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_null_deadline_means_no_expiry() {
        let req: StoreRequest =
            serde_json::from_str(r#"{"key": "k", "value": 1, "deadline": null}"#).unwrap();
        let (_, _, expires_at) = req.into_parts().unwrap();
        assert!(expires_at.is_none());
    }

    #[test]
    fn test_validate_empty_key() {
        let req = StoreRequest {
            key: "".to_string(),
            value: Some(json!("test")),
            deadline: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_missing_value() {
        let req: StoreRequest = serde_json::from_str(r#"{"key": "k", "value": null}"#).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_empty_string_value_is_valid() {
        let req = StoreRequest {
            key: "k".to_string(),
            value: Some(json!("")),
            deadline: None,
        };
        assert!(req.validate().is_none());
        let (_, value, _) = req.into_parts().unwrap();
        assert_eq!(value, json!(""));
    }
}
