use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ErrorResponse;

pub const OK: u16 = 200;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SuccessResponse {
    pub data: Value,
}

impl SuccessResponse {
    pub fn new(data: Value) -> Self {
        Self { data }
    }
}

/// The JSON body written back to the caller.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Reply {
    Success { response: Value, code: u16 },
    Failure { error: String, code: u16 },
}

impl Reply {
    pub fn code(&self) -> u16 {
        match self {
            Self::Success { code, .. } | Self::Failure { code, .. } => *code,
        }
    }
}

impl From<Result<SuccessResponse, ErrorResponse>> for Reply {
    fn from(result: Result<SuccessResponse, ErrorResponse>) -> Self {
        match result {
            Ok(success) => Self::Success { response: success.data, code: OK },
            Err(e) => Self::Failure { error: e.message().to_string(), code: e.status.code() },
        }
    }
}
