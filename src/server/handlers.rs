use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};
use warp::http::{HeaderMap, StatusCode};
use warp::hyper::body::Bytes;
use warp::reject::{LengthRequired, MethodNotAllowed, PayloadTooLarge, Rejection};

use crate::router::error::{DispatchError, ErrorCode, ErrorResponse};
use crate::router::request::{Context, Request};
use crate::router::response::Reply;
use crate::router::RouterFunction;
use crate::{bad_request, error_response, not_found};

pub type Result<T> = std::result::Result<T, Rejection>;

/// Path (without slashes) the method router is mounted on.
pub const METHOD_PATH: &str = "method";

pub struct Handler;

impl Handler {
    pub async fn post<R>(
        path: String,
        headers: HeaderMap,
        body: Bytes,
        router: Arc<R>,
    ) -> Result<impl warp::Reply>
    where
        R: RouterFunction,
    {
        let reply = Self::handle(&path, header_map(&headers), &body, router.as_ref());
        let status =
            StatusCode::from_u16(reply.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        Ok(warp::reply::with_status(warp::reply::json(&reply), status))
    }

    /// Turns rejections raised before [`Handler::post`] runs into the same
    /// JSON envelope.
    pub async fn recover(
        rejection: Rejection,
    ) -> std::result::Result<impl warp::Reply, Infallible> {
        let error = rejection_error(&rejection);
        info!(rejection = ?rejection, code = error.status.code(), "request rejected");

        let status = error.status.to_warp_status_code();
        let reply = Reply::from(Err(error));
        Ok(warp::reply::with_status(warp::reply::json(&reply), status))
    }

    /// Decodes `body`, routes it and builds the reply envelope.
    pub fn handle<R>(path: &str, headers: HashMap<String, String>, body: &[u8], router: &R) -> Reply
    where
        R: RouterFunction + ?Sized,
    {
        let mut ctx = Context::for_headers(&headers);
        info!(
            path = %path,
            body = %String::from_utf8_lossy(body),
            request_id = %ctx.request_id,
            "request received"
        );

        let result: std::result::Result<_, ErrorResponse> = match decode_body(body) {
            Err(e) => Err(e.into()),
            Ok(_) if path.trim_matches('/') != METHOD_PATH => {
                Err(not_found!(ErrorCode::NotFound.reason()))
            }
            Ok(body) => router.route(&Request::new(body, headers), &mut ctx),
        };

        let reply = Reply::from(result);
        info!(
            context = %serde_json::to_string(&ctx).unwrap_or_default(),
            reply = %serde_json::to_string(&reply).unwrap_or_default(),
            "request finished"
        );
        reply
    }
}

fn decode_body(body: &[u8]) -> std::result::Result<serde_json::Map<String, Value>, DispatchError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(DispatchError::Decode("expected a JSON object".into())),
        Err(e) => Err(DispatchError::Decode(e.to_string())),
    }
}

fn rejection_error(rejection: &Rejection) -> ErrorResponse {
    if rejection.is_not_found() {
        not_found!(ErrorCode::NotFound.reason())
    } else if rejection.find::<MethodNotAllowed>().is_some() {
        error_response!(ErrorCode::MethodNotAllowed)
    } else if rejection.find::<LengthRequired>().is_some() {
        bad_request!(DispatchError::Decode("content-length header is required".into()))
    } else if rejection.find::<PayloadTooLarge>().is_some() {
        bad_request!(DispatchError::Decode("payload too large".into()))
    } else {
        warn!(rejection = ?rejection, "unhandled rejection");
        bad_request!(DispatchError::Decode("unreadable body".into()))
    }
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
        })
        .collect()
}
