use std::fmt;

/// Rejection of a key-value map by a request schema. Holds every problem
/// found in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { messages: vec![message.into()] }
    }

    pub fn from_messages(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn missing(type_name: &str, fields: &[&str]) -> Self {
        Self::new(format!(
            "additional fields are required to create {}: {}",
            type_name,
            fields.join(", ")
        ))
    }

    pub fn unknown_field(name: &str) -> Self {
        Self::new(format!("unknown field `{}`", name))
    }

    pub fn invalid_value(name: &str, value: &serde_json::Value) -> Self {
        Self::new(format!("invalid value {} for field `{}`", value, name))
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}
