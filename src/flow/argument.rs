//! Decoding of the optional command-line argument handed to a flow.

use serde_json::Value;

/// The argument passed to a flow's entry point.
///
/// `Absent` means no argument was given at all, which is kept distinct from
/// an argument that decoded to JSON `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FlowArgument {
    #[default]
    Absent,
    Present(Value),
}

impl FlowArgument {
    /// Parse the raw argument text, if any
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(text) => Self::Present(decode(text)),
            None => Self::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Value sent over the wire; absent arguments travel as `null` with
    /// `present: false` alongside.
    pub fn wire_value(&self) -> Value {
        self.as_value().cloned().unwrap_or(Value::Null)
    }
}

/// Decode text as JSON, falling back to the text itself as a string.
pub fn decode(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
