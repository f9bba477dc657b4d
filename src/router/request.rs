use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::ADMIN_LOGIN;
use crate::schema::{FieldKind, FieldSpec, RequestModel, RequestSchema, ValidatedRequest};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A decoded call as it reaches the dispatcher.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Request {
    pub body: Map<String, Value>,
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn new(body: Map<String, Value>, headers: HashMap<String, String>) -> Self {
        Self { body, headers }
    }
}

/// Case-insensitive header lookup.
pub fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Per-call facts collected while dispatching, logged when the reply goes out.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Context {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nclients: Option<usize>,
}

impl Context {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self { request_id: request_id.into(), ..Default::default() }
    }

    /// Uses the caller's `X-Request-Id` when given, otherwise a fresh id.
    pub fn for_headers(headers: &HashMap<String, String>) -> Self {
        let request_id = find_header(headers, REQUEST_ID_HEADER)
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        Self::new(request_id)
    }
}

/// The top-level envelope every call carries.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MethodRequest {
    pub account: Option<String>,
    pub login: String,
    pub token: String,
    pub method: String,
    pub arguments: Map<String, Value>,
}

impl MethodRequest {
    pub fn is_admin(&self) -> bool {
        self.login == ADMIN_LOGIN
    }
}

const METHOD_REQUEST_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("account", FieldKind::Char),
    FieldSpec::new("login", FieldKind::Char).required(),
    FieldSpec::new("token", FieldKind::Char).required(),
    FieldSpec::new("arguments", FieldKind::Arguments).required(),
    FieldSpec::new("method", FieldKind::Char).required().not_null(),
];

impl RequestModel for MethodRequest {
    const SCHEMA: RequestSchema = RequestSchema::new("MethodRequest", METHOD_REQUEST_FIELDS);

    fn from_validated(validated: ValidatedRequest) -> Self {
        Self {
            account: validated.text("account"),
            login: validated.text("login").unwrap_or_default(),
            token: validated.text("token").unwrap_or_default(),
            method: validated.text("method").unwrap_or_default(),
            arguments: validated.object("arguments").unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn builds_from_full_body() {
        let request: MethodRequest = schema::build(&map(json!({
            "account": "horns",
            "login": "hf",
            "token": "abc",
            "method": "online_score",
            "arguments": {"phone": "79175002040"},
        })))
        .unwrap();
        assert_eq!(request.account.as_deref(), Some("horns"));
        assert_eq!(request.method, "online_score");
        assert_eq!(request.arguments.get("phone"), Some(&json!("79175002040")));
        assert!(!request.is_admin());
    }

    #[test]
    fn admin_is_derived_from_login() {
        let request: MethodRequest = schema::build(&map(json!({
            "login": "admin", "token": "", "method": "online_score", "arguments": {},
        })))
        .unwrap();
        assert!(request.is_admin());
        assert_eq!(request.account, None);
    }

    #[test]
    fn method_may_not_be_empty() {
        let err = schema::build::<MethodRequest>(&map(json!({
            "login": "hf", "token": "", "method": "", "arguments": {},
        })))
        .unwrap_err();
        assert!(err.to_string().contains("`method`"));
    }

    #[test]
    fn reports_all_missing_envelope_fields() {
        let err = schema::build::<MethodRequest>(&map(json!({"account": "horns"}))).unwrap_err();
        assert!(err.to_string().ends_with("login, token, arguments, method"));
    }

    #[test]
    fn request_id_comes_from_header_or_is_generated() {
        let mut headers = HashMap::new();
        headers.insert("X-Request-Id".to_string(), "abc".to_string());
        assert_eq!(Context::for_headers(&headers).request_id, "abc");

        let generated = Context::for_headers(&HashMap::new()).request_id;
        assert_eq!(generated.len(), 32);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        assert_eq!(find_header(&headers, "content-type"), Some("application/json"));
        assert_eq!(find_header(&headers, "x-request-id"), None);
    }
}
