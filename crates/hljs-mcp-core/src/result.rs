//! Engine and aggregate highlight results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Language reported by an aggregated result.
pub const MIXED_LANGUAGE: &str = "mixed";

/// Appended after every successfully highlighted segment.
pub const SUCCESS_TERMINATOR: &str = "\n ";

/// Appended after every segment that fell back to its original text.
pub const FAILURE_TERMINATOR: &str = "\n";

/// Output of a single engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineResult {
    /// Marked-up text
    pub value: String,
    /// Whether the engine hit syntax it could not reconcile
    pub illegal: bool,
    /// Engine confidence score
    pub relevance: u32,
    /// Grammar the engine used
    pub language: String,
}

impl EngineResult {
    /// Decode the raw object returned by the engine.
    ///
    /// `value` and `language` must be strings. `illegal` and `relevance`
    /// are coerced the way the script engine would (truthiness and integer
    /// conversion), defaulting to `false` and `0` when absent.
    pub fn from_json(raw: &Value) -> Result<Self> {
        let object = raw.as_object().ok_or_else(|| {
            Error::MalformedEngineResponse(format!("expected an object, got {}", kind_of(raw)))
        })?;

        let required_string = |field: &str| -> Result<String> {
            match object.get(field) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(Error::MalformedEngineResponse(format!(
                    "field `{field}` must be a string, got {}",
                    kind_of(other)
                ))),
                None => Err(Error::MalformedEngineResponse(format!(
                    "missing field `{field}`"
                ))),
            }
        };

        Ok(Self {
            value: required_string("value")?,
            language: required_string("language")?,
            illegal: object.get("illegal").map(is_truthy).unwrap_or(false),
            relevance: object.get("relevance").map(to_relevance).unwrap_or(0),
        })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn to_relevance(value: &Value) -> u32 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    let int32 = to_int32(number);
    u32::try_from(int32).unwrap_or(0)
}

/// ECMAScript ToInt32: truncate, wrap modulo 2^32, reinterpret as signed.
fn to_int32(number: f64) -> i32 {
    if !number.is_finite() {
        return 0;
    }
    let wrapped = number.trunc().rem_euclid(4_294_967_296.0);
    // `wrapped` is in [0, 2^32), so the cast is exact.
    (wrapped as u32) as i32
}

/// Aggregate result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HighlightResult {
    /// Stitched marked-up text
    pub value: String,
    /// True if any segment was illegal
    pub illegal: bool,
    /// Reported language, always [`MIXED_LANGUAGE`] for aggregated output
    pub language: String,
    /// Sum of the segments' relevance
    pub relevance: u32,
}

impl HighlightResult {
    /// Result for a request where no segment could be highlighted.
    pub fn unhighlighted(text: &str) -> Self {
        let mut value = String::with_capacity(text.len() + 1);
        for segment in text.split('\n') {
            value.push_str(segment);
            value.push_str(FAILURE_TERMINATOR);
        }

        Self {
            value,
            illegal: false,
            language: MIXED_LANGUAGE.to_string(),
            relevance: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_response() {
        let raw = json!({
            "value": "<span class=\"hljs-built_in\">print</span>(1)",
            "illegal": false,
            "relevance": 5,
            "language": "python",
        });

        let result = EngineResult::from_json(&raw).unwrap();
        assert_eq!(result.value, "<span class=\"hljs-built_in\">print</span>(1)");
        assert!(!result.illegal);
        assert_eq!(result.relevance, 5);
        assert_eq!(result.language, "python");
    }

    #[test]
    fn test_decode_defaults_optional_fields() {
        let raw = json!({ "value": "x", "language": "plaintext" });
        let result = EngineResult::from_json(&raw).unwrap();
        assert!(!result.illegal);
        assert_eq!(result.relevance, 0);
    }

    #[test]
    fn test_decode_missing_value() {
        let raw = json!({ "language": "python", "relevance": 3 });
        let err = EngineResult::from_json(&raw).unwrap_err();
        assert!(matches!(err, Error::MalformedEngineResponse(_)));
        assert!(err.to_string().contains("`value`"));
    }

    #[test]
    fn test_decode_mistyped_language() {
        let raw = json!({ "value": "x", "language": 7 });
        let err = EngineResult::from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("`language` must be a string"));
    }

    #[test]
    fn test_decode_non_object() {
        assert!(EngineResult::from_json(&Value::Null).is_err());
        assert!(EngineResult::from_json(&json!("value")).is_err());
    }

    #[test]
    fn test_illegal_truthiness() {
        let decode = |illegal: Value| {
            EngineResult::from_json(&json!({ "value": "", "language": "", "illegal": illegal }))
                .unwrap()
                .illegal
        };
        assert!(decode(json!(true)));
        assert!(decode(json!(1)));
        assert!(decode(json!("yes")));
        assert!(decode(json!({})));
        assert!(!decode(json!(0)));
        assert!(!decode(json!("")));
        assert!(!decode(Value::Null));
    }

    #[test]
    fn test_relevance_coercion() {
        let decode = |relevance: Value| {
            EngineResult::from_json(&json!({ "value": "", "language": "", "relevance": relevance }))
                .unwrap()
                .relevance
        };
        assert_eq!(decode(json!(7)), 7);
        assert_eq!(decode(json!(7.9)), 7);
        assert_eq!(decode(json!(-4)), 0);
        assert_eq!(decode(json!("12")), 12);
        assert_eq!(decode(json!(true)), 1);
        assert_eq!(decode(json!([1])), 0);
    }

    #[test]
    fn test_relevance_wraps_like_int32() {
        let decode = |relevance: Value| {
            EngineResult::from_json(&json!({ "value": "", "language": "", "relevance": relevance }))
                .unwrap()
                .relevance
        };
        assert_eq!(decode(json!(4_294_967_301u64)), 5);
        assert_eq!(decode(json!(2_147_483_647)), 2_147_483_647);
        // 2^31 wraps to i32::MIN, which clamps to 0.
        assert_eq!(decode(json!(2_147_483_648u64)), 0);
        assert_eq!(decode(json!(-4_294_967_295i64)), 1);
        assert_eq!(decode(json!(1e300)), 0);
    }

    #[test]
    fn test_unhighlighted() {
        let result = HighlightResult::unhighlighted("a\nb");
        assert_eq!(result.value, "a\nb\n");
        assert!(!result.illegal);
        assert_eq!(result.relevance, 0);
        assert_eq!(result.language, MIXED_LANGUAGE);

        assert_eq!(HighlightResult::unhighlighted("").value, "\n");
    }

    #[test]
    fn test_highlight_result_serialization() {
        let result = HighlightResult {
            value: "x\n ".to_string(),
            illegal: true,
            language: MIXED_LANGUAGE.to_string(),
            relevance: 3,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["language"], "mixed");
        assert_eq!(json["relevance"], 3);
        assert_eq!(json["illegal"], true);
    }
}
