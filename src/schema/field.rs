use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use state::InitCell;

pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Oldest accepted birthday, in years before the current one.
pub const MAX_AGE_YEARS: i32 = 70;

const PHONE_MIN: i64 = 7 * 10_i64.pow(10);
const PHONE_MAX: i64 = 8 * 10_i64.pow(10);

static EMAIL_RE: InitCell<Regex> = InitCell::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+$")
            .expect("email pattern is valid")
    })
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Unknown = 0,
    Male = 1,
    Female = 2,
}

impl Gender {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// The value type a declared field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Char,
    Arguments,
    Email,
    Phone,
    Date,
    BirthDay,
    Gender,
    ClientIds,
}

impl FieldKind {
    pub fn validate(&self, value: &Value) -> bool {
        self.validate_at(value, Local::now().date_naive())
    }

    /// Same as [`FieldKind::validate`] with `today` pinned, which only
    /// matters for birthdays.
    pub fn validate_at(&self, value: &Value, today: NaiveDate) -> bool {
        match self {
            Self::Char => value.is_string(),
            Self::Arguments => value.is_object(),
            Self::Email => value.as_str().map_or(false, |s| email_regex().is_match(s)),
            Self::Phone => {
                phone_number(value).map_or(false, |n| (PHONE_MIN..PHONE_MAX).contains(&n))
            }
            Self::Date => parse_date(value).is_some(),
            Self::BirthDay => parse_date(value)
                .map_or(false, |date| date.year() >= today.year() - MAX_AGE_YEARS),
            Self::Gender => value.as_i64().map_or(false, |g| matches!(g, 1..=3)),
            Self::ClientIds => value
                .as_array()
                .map_or(false, |ids| ids.iter().all(is_integer)),
        }
    }
}

/// One declared field of a request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldSpec {
    /// Optional and nullable by default.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: true,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn validate(&self, value: &Value) -> bool {
        self.validate_at(value, Local::now().date_naive())
    }

    pub fn validate_at(&self, value: &Value, today: NaiveDate) -> bool {
        if is_empty(value) {
            return self.nullable;
        }
        self.kind.validate_at(value, today)
    }
}

/// `null`, `""`, `[]` and `{}` count as empty. Numbers never do.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

pub fn phone_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Ids are carried as `i64`, so larger integers are rejected here rather
/// than lost later.
fn is_integer(value: &Value) -> bool {
    value.is_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn email_accepts_plus_and_subdomains() {
        assert!(FieldKind::Email.validate(&json!("a.b+c@sub.domain.com")));
        assert!(FieldKind::Email.validate(&json!("stupnikov@otus.ru")));
    }

    #[test]
    fn email_rejects_malformed() {
        assert!(!FieldKind::Email.validate(&json!("not-an-email")));
        assert!(!FieldKind::Email.validate(&json!("user@localhost")));
        assert!(!FieldKind::Email.validate(&json!(42)));
    }

    #[test]
    fn phone_accepts_number_and_text() {
        assert!(FieldKind::Phone.validate(&json!(79991234567_i64)));
        assert!(FieldKind::Phone.validate(&json!("79991234567")));
    }

    #[test]
    fn phone_rejects_wrong_prefix_or_length() {
        assert!(!FieldKind::Phone.validate(&json!(89991234567_i64)));
        assert!(!FieldKind::Phone.validate(&json!(7999123456_i64)));
        assert!(!FieldKind::Phone.validate(&json!("7999123456a")));
        assert!(!FieldKind::Phone.validate(&json!(7.9e10)));
    }

    #[test]
    fn date_requires_day_month_year() {
        assert!(FieldKind::Date.validate(&json!("01.01.2000")));
        assert!(!FieldKind::Date.validate(&json!("2000-01-01")));
        assert!(!FieldKind::Date.validate(&json!("31.02.2000")));
    }

    #[test]
    fn birthday_limited_to_seventy_years() {
        assert!(FieldKind::BirthDay.validate_at(&json!("15.06.1954"), today()));
        assert!(!FieldKind::BirthDay.validate_at(&json!("15.06.1953"), today()));
        assert!(!FieldKind::BirthDay.validate_at(&json!("XXX"), today()));
    }

    #[test]
    fn gender_accepts_one_through_three() {
        for g in [1, 2, 3] {
            assert!(FieldKind::Gender.validate(&json!(g)));
        }
        assert!(!FieldKind::Gender.validate(&json!(0)));
        assert!(!FieldKind::Gender.validate(&json!(4)));
        assert!(!FieldKind::Gender.validate(&json!("1")));
        assert!(!FieldKind::Gender.validate(&json!(1.0)));
    }

    #[test]
    fn client_ids_must_all_be_integers() {
        assert!(FieldKind::ClientIds.validate(&json!([1, 2, 3])));
        assert!(!FieldKind::ClientIds.validate(&json!([1, "2"])));
        assert!(!FieldKind::ClientIds.validate(&json!({"1": 1})));
    }

    #[test]
    fn client_ids_must_fit_in_i64() {
        assert!(FieldKind::ClientIds.validate(&json!([1, i64::MAX])));
        assert!(!FieldKind::ClientIds.validate(&json!([1, u64::MAX])));
        assert!(!FieldKind::ClientIds.validate(&json!([1.5])));
    }

    #[test]
    fn nullable_bypasses_kind_check_for_empty_values() {
        let spec = FieldSpec::new("email", FieldKind::Email);
        assert!(spec.validate(&Value::Null));
        assert!(spec.validate(&json!("")));

        let strict = FieldSpec::new("method", FieldKind::Char).required().not_null();
        assert!(!strict.validate(&json!("")));
        assert!(strict.validate(&json!("online_score")));
    }

    #[test]
    fn zero_is_not_empty() {
        let spec = FieldSpec::new("gender", FieldKind::Gender);
        assert!(!spec.validate(&json!(0)));
    }

    #[test]
    fn gender_names() {
        assert_eq!(Gender::from_code(0).map(|g| g.name()), Some("unknown"));
        assert_eq!(Gender::from_code(2), Some(Gender::Female));
        assert_eq!(Gender::from_code(3), None);
    }
}
