//! Typed payload evaluation.
//!
//! A menu item carries a raw `payload` and a `payloadType` tag. Before the
//! selection leaves the node the payload is converted according to the tag.

use ctxmenu_core::MenuError;
use serde_json::{Number, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Converts a raw payload according to its type tag.
pub trait PayloadEvaluator {
    /// Evaluate `payload` as `payload_type`.
    ///
    /// `context` is the message the selection arrived in; `msg` payloads are
    /// looked up in it.
    fn evaluate(
        &self,
        payload: &Value,
        payload_type: &str,
        context: &Value,
    ) -> Result<Value, MenuError>;
}

/// Evaluator for the payload types a node can resolve on its own.
///
/// Supported: `str`, `num`, `bool`, `json`, `bin`, `date`, `env`, `msg`.
/// Anything else (`flow`, `global`, `jsonata`, ...) needs the host runtime
/// and fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEvaluator;

impl PayloadEvaluator for StandardEvaluator {
    fn evaluate(
        &self,
        payload: &Value,
        payload_type: &str,
        context: &Value,
    ) -> Result<Value, MenuError> {
        let fail = |reason: String| MenuError::PayloadEvaluation {
            payload_type: payload_type.to_string(),
            reason,
        };
        match payload_type {
            "" | "str" => Ok(payload.clone()),
            "num" => number(payload)
                .ok_or_else(|| fail(format!("'{}' is not a number", text(payload)))),
            "bool" => Ok(Value::Bool(boolean(payload))),
            "json" => match payload {
                Value::String(s) => serde_json::from_str(s).map_err(|e| fail(e.to_string())),
                other => Ok(other.clone()),
            },
            "bin" => binary(payload).map_err(fail),
            "date" => Ok(Value::from(now_millis())),
            "env" => Ok(std::env::var(text(payload)).map_or(Value::Null, Value::String)),
            "msg" => Ok(lookup(context, &text(payload)).cloned().unwrap_or(Value::Null)),
            other => Err(fail(format!("unsupported payload type '{other}'"))),
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn number(value: &Value) -> Option<Value> {
    let n = match value {
        Value::Number(n) => return Some(Value::Number(n.clone())),
        Value::Bool(b) => return Some(Value::from(u8::from(*b))),
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

fn boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => text(other).eq_ignore_ascii_case("true"),
    }
}

fn binary(value: &Value) -> Result<Value, String> {
    let parsed;
    let array = match value {
        Value::String(s) => {
            parsed = serde_json::from_str::<Value>(s).map_err(|e| e.to_string())?;
            &parsed
        }
        other => other,
    };
    let Value::Array(items) = array else {
        return Err("expected an array of bytes".to_string());
    };
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|b| u8::try_from(b).ok())
                .map(Value::from)
                .ok_or_else(|| format!("'{item}' is not a byte"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Follow a dotted path (`a.b.0`) through objects and arrays.
#[must_use]
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(root, |value, key| match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
