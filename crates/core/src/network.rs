//! Wire format of the position feed.
//!
//! The feed answers a GET with a json object. The shapes understood are
//! `{"position": [x, y]}`, `{"x": x, "y": y}` and, when the server has
//! nothing to report, `{"error": "..."}` or `{"message": "..."}`.
//! Unknown fields are ignored.

use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::PollError,
    types::{DeviceId, Position, PositionReport},
};

#[derive(Deserialize)]
struct RawPayload {
    position: Option<Value>,
    x: Option<Value>,
    y: Option<Value>,
    device_id: Option<Value>,
    timestamp: Option<Value>,
    error: Option<Value>,
    message: Option<Value>,
}

/// Payload as produced by feeds, used by the simulated feed.
#[derive(Serialize)]
pub struct PositionPayload {
    pub position: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&PositionReport> for PositionPayload {
    fn from(report: &PositionReport) -> Self {
        PositionPayload {
            position: [report.position.x, report.position.y],
            device_id: report.device_id.as_ref().map(|d| d.to_string()),
            timestamp: report.timestamp.clone(),
        }
    }
}

pub fn encode_report(report: &PositionReport) -> Result<String, PollError> {
    serde_json::to_string(&PositionPayload::from(report))
        .map_err(|e| PollError::InvalidJson(e.to_string()))
}

/// Decode a response body. Nothing is rendered unless this succeeds.
pub fn decode_report(body: &str) -> Result<PositionReport, PollError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| PollError::InvalidJson(e.to_string()))?;
    trace!("Decoding payload {value}");

    if !value.is_object() {
        return Err(PollError::InvalidJson(format!(
            "expected an object, got {}",
            kind_of(&value)
        )));
    }

    let raw: RawPayload =
        serde_json::from_value(value).map_err(|e| PollError::InvalidJson(e.to_string()))?;

    let position = match (&raw.position, &raw.x, &raw.y) {
        (Some(position), _, _) if !position.is_null() => decode_pair(position)?,
        (_, Some(x), Some(y)) => Position::new(
            number(x).ok_or_else(|| malformed("x", x))?,
            number(y).ok_or_else(|| malformed("y", y))?,
        ),
        (_, Some(_), None) => {
            return Err(PollError::MalformedPosition("x without y".to_string()));
        }
        (_, None, Some(_)) => {
            return Err(PollError::MalformedPosition("y without x".to_string()));
        }
        _ => {
            let reported = raw.error.as_ref().or(raw.message.as_ref());
            return Err(match reported {
                Some(Value::String(reason)) => PollError::Reported(reason.clone()),
                Some(other) => PollError::Reported(other.to_string()),
                None => PollError::MissingPosition,
            });
        }
    };

    Ok(PositionReport {
        device_id: raw.device_id.as_ref().and_then(device_id),
        position,
        timestamp: raw.timestamp.as_ref().map(|t| match t {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
    })
}

fn decode_pair(value: &Value) -> Result<Position, PollError> {
    let Value::Array(items) = value else {
        return Err(PollError::MalformedPosition(format!(
            "expected an array, got {}",
            kind_of(value)
        )));
    };

    match items.as_slice() {
        [x, y] => Ok(Position::new(
            number(x).ok_or_else(|| malformed("x", x))?,
            number(y).ok_or_else(|| malformed("y", y))?,
        )),
        _ => Err(PollError::MalformedPosition(format!(
            "expected 2 coordinates, got {}",
            items.len()
        ))),
    }
}

fn number(value: &Value) -> Option<f64> {
    value.as_f64()
}

fn device_id(value: &Value) -> Option<DeviceId> {
    match value {
        Value::String(s) if !s.is_empty() => Some(DeviceId::new(s.as_str())),
        Value::Number(n) => Some(DeviceId::new(n.to_string())),
        _ => None,
    }
}

fn malformed(axis: &str, value: &Value) -> PollError {
    PollError::MalformedPosition(format!("{axis} is {}, not a number", kind_of(value)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_array() {
        let report = decode_report(r#"{"position":[2,3]}"#).unwrap();
        assert_eq!(report.position, Position::new(2.0, 3.0));
        assert_eq!(report.device_id, None);
        assert_eq!(report.timestamp, None);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let report =
            decode_report(r#"{"position":[1.5,-2],"rssi":-60,"beacons":{"a":1}}"#).unwrap();
        assert_eq!(report.position, Position::new(1.5, -2.0));
    }

    #[test]
    fn test_xy_shape() {
        let report =
            decode_report(r#"{"x":1.5,"y":2,"timestamp":"2024-01-01 10:00:00"}"#).unwrap();
        assert_eq!(report.position, Position::new(1.5, 2.0));
        assert_eq!(report.timestamp.as_deref(), Some("2024-01-01 10:00:00"));
    }

    #[test]
    fn test_device_id() {
        let report = decode_report(r#"{"position":[0,0],"device_id":"user_device"}"#).unwrap();
        assert_eq!(report.device_id, Some(DeviceId::new("user_device")));

        let report = decode_report(r#"{"position":[0,0],"device_id":7}"#).unwrap();
        assert_eq!(report.device_id, Some(DeviceId::new("7")));

        let report = decode_report(r#"{"position":[0,0],"device_id":""}"#).unwrap();
        assert_eq!(report.device_id, None);
    }

    #[test]
    fn test_missing_position() {
        assert_eq!(
            decode_report(r#"{"other":"x"}"#),
            Err(PollError::MissingPosition)
        );
        assert_eq!(
            decode_report(r#"{"position":null}"#),
            Err(PollError::MissingPosition)
        );
    }

    #[test]
    fn test_reported_errors() {
        assert_eq!(
            decode_report(r#"{"error":"No position data available"}"#),
            Err(PollError::Reported("No position data available".to_string()))
        );
        assert_eq!(
            decode_report(r#"{"message":"Not enough data"}"#),
            Err(PollError::Reported("Not enough data".to_string()))
        );
    }

    #[test]
    fn test_malformed_positions() {
        for body in [
            r#"{"position":"2,3"}"#,
            r#"{"position":{"x":2,"y":3}}"#,
            r#"{"position":[2]}"#,
            r#"{"position":[2,3,4]}"#,
            r#"{"position":[]}"#,
            r#"{"position":["2",3]}"#,
            r#"{"position":[2,null]}"#,
            r#"{"x":1}"#,
            r#"{"x":1,"y":"2"}"#,
        ] {
            let result = decode_report(body);
            assert!(
                matches!(result, Err(PollError::MalformedPosition(_))),
                "{body} decoded to {result:?}"
            );
        }
    }

    #[test]
    fn test_invalid_json() {
        for body in ["", "not json", "[2,3]", "42", r#"{"position":[2,3]"#] {
            let result = decode_report(body);
            assert!(
                matches!(result, Err(PollError::InvalidJson(_))),
                "{body} decoded to {result:?}"
            );
        }
    }

    #[test]
    fn test_encoded_report_decodes() {
        let report = PositionReport::new(Position::new(4.0, 0.5)).with_device("tag-1");
        let body = encode_report(&report).unwrap();
        assert_eq!(decode_report(&body).unwrap(), report);
    }
}
