use chrono::{DateTime, Local, TimeZone};
use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha512};

use crate::router::request::MethodRequest;

pub const SALT: &str = "Otus";
pub const ADMIN_LOGIN: &str = "admin";
pub const ADMIN_SALT: &str = "42";

const ADMIN_HOUR_FORMAT: &str = "%Y%m%d%H";

pub struct ScoringAuth;

impl ScoringAuth {
    pub fn check_auth(request: &MethodRequest) -> bool {
        Self::check_auth_at(request, &Local::now())
    }

    pub fn check_auth_at<Tz: TimeZone>(request: &MethodRequest, now: &DateTime<Tz>) -> bool
    where
        Tz::Offset: std::fmt::Display,
    {
        let expected = if request.is_admin() {
            Self::admin_digest_at(now)
        } else {
            Self::user_digest(request.account.as_deref().unwrap_or_default(), &request.login)
        };

        constant_time_eq(expected.as_bytes(), request.token.as_bytes())
    }

    /// Token an admin must present during the hour containing `now`.
    pub fn admin_digest_at<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        sha512_hex(&format!("{}{}", now.format(ADMIN_HOUR_FORMAT), ADMIN_SALT))
    }

    pub fn user_digest(account: &str, login: &str) -> String {
        sha512_hex(&format!("{}{}{}", account, login, SALT))
    }
}

fn sha512_hex(input: &str) -> String {
    format!("{:x}", Sha512::digest(input.as_bytes()))
}
