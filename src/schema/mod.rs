//! Declarative request schemas.
//!
//! A request type declares a `const` table of [`FieldSpec`]s. Incoming
//! key-value maps are checked against that table in one pass and either
//! rejected as a whole or turned into a [`ValidatedRequest`], from which
//! the typed request is materialized.

pub mod error;
pub mod field;

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};

pub use self::error::ValidationError;
pub use self::field::{FieldKind, FieldSpec, Gender};

/// Ordered field table attached to a request type.
#[derive(Debug, Clone, Copy)]
pub struct RequestSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RequestSchema {
    /// Panics (at compile time when used in a `const`) if two fields share a name.
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        let mut i = 0;
        while i < fields.len() {
            let mut j = i + 1;
            while j < fields.len() {
                if str_eq(fields[i].name, fields[j].name) {
                    panic!("duplicate field name in request schema");
                }
                j += 1;
            }
            i += 1;
        }
        Self { name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn validate(&self, raw: &Map<String, Value>) -> Result<ValidatedRequest, ValidationError> {
        self.validate_at(raw, Local::now().date_naive())
    }

    pub fn validate_at(
        &self,
        raw: &Map<String, Value>,
        today: NaiveDate,
    ) -> Result<ValidatedRequest, ValidationError> {
        let missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required && !raw.contains_key(f.name))
            .map(|f| f.name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::missing(self.name, &missing));
        }

        let mut messages = Vec::new();
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            let failure = match self.field(key) {
                None => Some(ValidationError::unknown_field(key)),
                Some(spec) if !spec.validate_at(value, today) => {
                    Some(ValidationError::invalid_value(key, value))
                }
                Some(spec) => {
                    values.insert(spec.name, value.clone());
                    None
                }
            };
            if let Some(failure) = failure {
                messages.extend(failure.into_messages());
            }
        }

        if !messages.is_empty() {
            return Err(ValidationError::from_messages(messages));
        }
        Ok(ValidatedRequest { schema: self.name, values })
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Field values that passed their schema. Only [`RequestSchema::validate`]
/// creates one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    schema: &'static str,
    values: BTreeMap<&'static str, Value>,
}

impl ValidatedRequest {
    pub fn schema_name(&self) -> &'static str {
        self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of the fields holding a non-empty value, sorted.
    pub fn non_empty_fields(&self) -> Vec<&'static str> {
        self.values
            .iter()
            .filter(|(_, v)| !field::is_empty(v))
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(Value::as_str).map(str::to_owned)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn object(&self, name: &str) -> Option<Map<String, Value>> {
        self.get(name).and_then(Value::as_object).cloned()
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(field::parse_date)
    }

    pub fn phone(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(field::phone_number)
    }

    /// `None` unless every element is an `i64`.
    pub fn integers(&self, name: &str) -> Option<Vec<i64>> {
        self.get(name)
            .and_then(Value::as_array)
            .and_then(|ids| ids.iter().map(Value::as_i64).collect())
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }
}

/// A typed request built from a schema-checked map.
pub trait RequestModel: Sized {
    const SCHEMA: RequestSchema;

    /// Cross-field rule checked against the raw map before any field is
    /// validated.
    fn check(_raw: &Map<String, Value>) -> Result<(), ValidationError> {
        Ok(())
    }

    fn from_validated(validated: ValidatedRequest) -> Self;
}

pub fn build<T: RequestModel>(raw: &Map<String, Value>) -> Result<T, ValidationError> {
    build_at(raw, Local::now().date_naive())
}

pub fn build_at<T: RequestModel>(
    raw: &Map<String, Value>,
    today: NaiveDate,
) -> Result<T, ValidationError> {
    T::check(raw)?;
    let validated = T::SCHEMA.validate_at(raw, today)?;
    Ok(T::from_validated(validated))
}

/// True when `raw` has `name` bound to a non-empty value.
pub fn is_present(raw: &Map<String, Value>, name: &str) -> bool {
    raw.get(name).map_or(false, |v| !field::is_empty(v))
}
