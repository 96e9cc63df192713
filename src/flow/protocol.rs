//! Line-delimited JSON messages exchanged with a flow host process.
//!
//! The host writes [`HostMessage`]s to its stdout, one per line. After it has
//! reported `loaded`, it reads a single [`ExecuteRequest`] line from stdin.

use crate::error::{ErrorCode, FlowError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostMessage {
    /// The module imported; lists its callable attributes
    Loaded {
        #[serde(default)]
        attributes: Vec<String>,
    },
    Emit {
        #[serde(default)]
        data: Value,
    },
    /// The entry point returned; `null` means no result
    Result {
        #[serde(default)]
        value: Value,
    },
    Error { stage: FailureStage, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Load,
    Execution,
}

impl HostMessage {
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| {
            FlowError::protocol(
                ErrorCode::PROTOCOL_MALFORMED,
                format!("unreadable message from flow host: {e}"),
                Some(line),
            )
            .with_source(e)
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loaded { .. } => "loaded",
            Self::Emit { .. } => "emit",
            Self::Result { .. } => "result",
            Self::Error { .. } => "error",
        }
    }
}

/// The single request sent to a host once its module has loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub entry: String,
    pub argument: Value,
    pub present: bool,
}

impl ExecuteRequest {
    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self).map_err(|e| {
            FlowError::internal(
                ErrorCode::INTERNAL_GENERIC,
                format!("could not encode invocation request: {e}"),
            )
        })?;
        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_loaded() {
        let msg = HostMessage::parse(r#"{"event":"loaded","attributes":["executor","helper"]}"#)
            .unwrap();
        assert_eq!(
            msg,
            HostMessage::Loaded {
                attributes: vec!["executor".into(), "helper".into()]
            }
        );
    }

    #[test]
    fn test_parse_emit_and_result() {
        let msg = HostMessage::parse(r#"{"event":"emit","data":{"progress":50}}"#).unwrap();
        assert_eq!(
            msg,
            HostMessage::Emit {
                data: json!({"progress": 50})
            }
        );

        let msg = HostMessage::parse(r#"{"event":"result"}"#).unwrap();
        assert_eq!(msg, HostMessage::Result { value: Value::Null });
    }

    #[test]
    fn test_parse_error_stages() {
        let msg = HostMessage::parse(
            r#"{"event":"error","stage":"execution","message":"ValueError: bad"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            HostMessage::Error {
                stage: FailureStage::Execution,
                message: "ValueError: bad".into()
            }
        );
        assert_eq!(msg.kind(), "error");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = HostMessage::parse("Traceback (most recent call last):").unwrap_err();
        assert_eq!(err.code(), ErrorCode::PROTOCOL_MALFORMED);
        assert!(matches!(err, FlowError::Protocol { line: Some(_), .. }));

        let err = HostMessage::parse(r#"{"event":"bogus"}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PROTOCOL_MALFORMED);
    }

    #[test]
    fn test_request_line() {
        let request = ExecuteRequest {
            entry: "executor".into(),
            argument: json!({"x": 1}),
            present: true,
        };
        let line = request.to_line().unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(
            serde_json::from_str::<ExecuteRequest>(line.trim_end()).unwrap(),
            request
        );
    }
}
