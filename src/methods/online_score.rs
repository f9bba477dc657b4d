use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::router::error::DispatchError;
use crate::router::request::{Context, MethodRequest};
use crate::router::MethodHandler;
use crate::schema::{
    self, FieldKind, FieldSpec, Gender, RequestModel, RequestSchema, ValidatedRequest,
    ValidationError,
};
use crate::scoring::{ScoreInput, Scoring};

/// Score returned to admin callers without consulting the scorer.
pub const ADMIN_SCORE: u32 = 42;

/// Field pairs of which at least one must be fully supplied.
pub const REQUIRED_PAIRS: [(&str, &str); 3] = [
    ("phone", "email"),
    ("first_name", "last_name"),
    ("gender", "birthday"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("first_name", FieldKind::Char),
    FieldSpec::new("last_name", FieldKind::Char),
    FieldSpec::new("email", FieldKind::Email),
    FieldSpec::new("phone", FieldKind::Phone),
    FieldSpec::new("birthday", FieldKind::BirthDay),
    FieldSpec::new("gender", FieldKind::Gender),
];

#[derive(Debug, Clone, PartialEq)]
pub struct OnlineScoreRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<i64>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<i64>,
    /// Fields supplied with a non-empty value.
    pub has: Vec<String>,
}

impl OnlineScoreRequest {
    pub fn gender_name(&self) -> Option<&'static str> {
        self.gender.and_then(Gender::from_code).map(|g| g.name())
    }

    pub fn score_input(&self) -> ScoreInput {
        ScoreInput {
            phone: self.phone,
            email: self.email.clone(),
            birthday: self.birthday,
            gender: self.gender,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

impl RequestModel for OnlineScoreRequest {
    const SCHEMA: RequestSchema = RequestSchema::new("OnlineScoreRequest", FIELDS);

    fn check(raw: &Map<String, Value>) -> Result<(), ValidationError> {
        let satisfied = REQUIRED_PAIRS
            .iter()
            .any(|(a, b)| schema::is_present(raw, a) && schema::is_present(raw, b));
        if satisfied {
            return Ok(());
        }
        let pairs: Vec<String> = REQUIRED_PAIRS
            .iter()
            .map(|(a, b)| format!("{} & {}", a, b))
            .collect();
        Err(ValidationError::new(format!(
            "at least one pair must be given: {}",
            pairs.join(", ")
        )))
    }

    fn from_validated(validated: ValidatedRequest) -> Self {
        Self {
            first_name: validated.text("first_name"),
            last_name: validated.text("last_name"),
            email: validated.text("email").filter(|e| !e.is_empty()),
            phone: validated.phone("phone"),
            birthday: validated.date("birthday"),
            gender: validated.integer("gender"),
            has: validated
                .non_empty_fields()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

pub struct OnlineScoreHandler;

impl MethodHandler for OnlineScoreHandler {
    fn name(&self) -> &'static str {
        "online_score"
    }

    fn handle(
        &self,
        request: &MethodRequest,
        ctx: &mut Context,
        scoring: &dyn Scoring,
    ) -> Result<Value, DispatchError> {
        let arguments: OnlineScoreRequest = schema::build(&request.arguments)?;
        ctx.has = Some(arguments.has.clone());

        if request.is_admin() {
            return Ok(json!({ "score": ADMIN_SCORE }));
        }

        debug!(gender = ?arguments.gender_name(), "scoring client");
        let score = scoring.score(&arguments.score_input())?;
        Ok(json!({ "score": score }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn phone_and_email_alone_are_enough() {
        let request: OnlineScoreRequest = schema::build(&map(json!({
            "phone": "79175002040",
            "email": "stupnikov@otus.ru",
        })))
        .unwrap();
        assert_eq!(request.phone, Some(79175002040));
        assert_eq!(request.has, vec!["email", "phone"]);
    }

    #[test]
    fn empty_arguments_satisfy_no_pair() {
        let err = schema::build::<OnlineScoreRequest>(&Map::new()).unwrap_err();
        assert!(err.to_string().starts_with("at least one pair"));
    }

    #[test]
    fn half_pairs_are_rejected() {
        for args in [
            json!({"phone": "79175002040"}),
            json!({"first_name": "s", "email": "a@b.cd"}),
            json!({"gender": 1, "phone": "79175002040", "last_name": ""}),
            json!({"phone": "79175002040", "email": ""}),
        ] {
            assert!(schema::build::<OnlineScoreRequest>(&map(args)).is_err());
        }
    }

    #[test]
    fn pair_check_runs_before_field_checks() {
        let err = schema::build::<OnlineScoreRequest>(&map(json!({"email": "bad", "nope": 1})))
            .unwrap_err();
        assert_eq!(err.messages().len(), 1);
        assert!(err.to_string().starts_with("at least one pair"));
    }

    #[test]
    fn invalid_values_fail_after_pair_check() {
        let err = schema::build::<OnlineScoreRequest>(&map(json!({
            "phone": "89175002040",
            "email": "stupnikov@otus.ru",
        })))
        .unwrap_err();
        assert!(err.to_string().contains("`phone`"));
    }

    #[test]
    fn gender_and_birthday_pair() {
        let request: OnlineScoreRequest = schema::build(&map(json!({
            "gender": 2,
            "birthday": "01.01.2000",
        })))
        .unwrap();
        assert_eq!(request.gender_name(), Some("female"));
        assert_eq!(request.birthday, NaiveDate::from_ymd_opt(2000, 1, 1));
        assert_eq!(request.score_input().gender, Some(2));
    }
}
