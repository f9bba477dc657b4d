use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::router::error::DispatchError;
use crate::router::request::{Context, MethodRequest};
use crate::router::MethodHandler;
use crate::schema::{self, FieldKind, FieldSpec, RequestModel, RequestSchema, ValidatedRequest};
use crate::scoring::Scoring;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("client_ids", FieldKind::ClientIds).required().not_null(),
    FieldSpec::new("date", FieldKind::Date),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ClientsInterestsRequest {
    pub client_ids: Vec<i64>,
    pub date: Option<NaiveDate>,
}

impl RequestModel for ClientsInterestsRequest {
    const SCHEMA: RequestSchema = RequestSchema::new("ClientsInterestsRequest", FIELDS);

    fn from_validated(validated: ValidatedRequest) -> Self {
        Self {
            client_ids: validated.integers("client_ids").unwrap_or_default(),
            date: validated.date("date"),
        }
    }
}

pub struct ClientsInterestsHandler;

impl MethodHandler for ClientsInterestsHandler {
    fn name(&self) -> &'static str {
        "clients_interests"
    }

    fn handle(
        &self,
        request: &MethodRequest,
        ctx: &mut Context,
        scoring: &dyn Scoring,
    ) -> Result<Value, DispatchError> {
        let arguments: ClientsInterestsRequest = schema::build(&request.arguments)?;
        ctx.nclients = Some(arguments.client_ids.len());

        let mut interests = Map::new();
        for client_id in &arguments.client_ids {
            let picked = scoring.interests(*client_id)?;
            interests.insert(client_id.to_string(), Value::from(picked));
        }
        Ok(Value::Object(interests))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn keeps_id_order() {
        let request: ClientsInterestsRequest = schema::build(&map(json!({
            "client_ids": [3, 1, 2],
            "date": "19.07.2017",
        })))
        .unwrap();
        assert_eq!(request.client_ids, vec![3, 1, 2]);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2017, 7, 19));
    }

    #[test]
    fn client_ids_are_required_and_non_empty() {
        for args in [
            json!({}),
            json!({"date": "20.07.2017"}),
            json!({"client_ids": []}),
            json!({"client_ids": {"1": 2}}),
            json!({"client_ids": ["1", "2"]}),
            json!({"client_ids": [1, 2], "date": "XXX"}),
        ] {
            assert!(schema::build::<ClientsInterestsRequest>(&map(args)).is_err());
        }
    }

    #[test]
    fn date_is_optional() {
        let request: ClientsInterestsRequest =
            schema::build(&map(json!({"client_ids": [1], "date": null}))).unwrap();
        assert_eq!(request.date, None);
    }
}
