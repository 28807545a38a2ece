//! # API Request Models
//!
//! Structures for incoming API request bodies.
//! Each struct represents the expected JSON body for an endpoint.
//!
//! Fields are optional at the serde level so that handlers can answer
//! a missing field with a field-specific message instead of a generic
//! deserialization error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to mint a badge.
///
/// ## Example JSON
///
/// ```json
/// {
///     "studentName": "Ada Lovelace",
///     "courseId": "RUST-101",
///     "studentAddress": "0x8f2c...e41a"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBadgeRequest {
    pub student_name: Option<String>,
    pub course_id: Option<String>,
    /// Recipient Sui address (`0x` + 64 hex digits).
    pub student_address: Option<String>,
}

/// Request to update a badge's progress.
///
/// ## Example JSON
///
/// ```json
/// {
///     "badgeId": "0x5d1e...9b07",
///     "progress": 50
/// }
/// ```
///
/// ## Notes
///
/// - `progress` may be a number or a numeric string
/// - Fractional values are truncated toward zero
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProgressRequest {
    pub badge_id: Option<String>,
    pub progress: Option<Value>,
}

/// Request to look up an address balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetBalanceRequest {
    pub address: Option<String>,
}

/// Request to read a badge object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetBadgeRequest {
    pub badge_id: Option<String>,
}

/// Interpret a JSON progress value as an integer.
///
/// Accepts numbers and numeric strings; returns `None` for anything
/// else (booleans, objects, `"abc"`, non-finite values).
pub fn parse_progress(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

/// Treat empty or whitespace-only strings as missing.
///
/// Present values are returned exactly as sent.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_progress() {
        assert_eq!(parse_progress(&json!(50)), Some(50));
        assert_eq!(parse_progress(&json!(-1)), Some(-1));
        assert_eq!(parse_progress(&json!(42.9)), Some(42));
        assert_eq!(parse_progress(&json!("75")), Some(75));
        assert_eq!(parse_progress(&json!(" 12 ")), Some(12));
        assert_eq!(parse_progress(&json!("abc")), None);
        assert_eq!(parse_progress(&json!(true)), None);
        assert_eq!(parse_progress(&json!({"value": 1})), None);
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let request: CreateBadgeRequest =
            serde_json::from_value(json!({ "studentName": "Ada" })).unwrap();
        assert_eq!(request.student_name.as_deref(), Some("Ada"));
        assert!(request.course_id.is_none());
        assert!(non_empty(&Some("   ".to_string())).is_none());
        assert!(non_empty(&None).is_none());
    }

    #[test]
    fn test_non_empty_keeps_surrounding_whitespace() {
        assert_eq!(non_empty(&Some(" Ada ".to_string())), Some(" Ada "));
    }
}
