//! Method dispatch.
//!
//! [`MethodRouter`] validates the envelope, authenticates the caller and
//! hands the call to the [`MethodHandler`] registered under the requested
//! method name.

pub mod error;
pub mod request;
pub mod response;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::auth::ScoringAuth;
use crate::methods::{ClientsInterestsHandler, OnlineScoreHandler};
use crate::schema;
use crate::scoring::Scoring;

use self::error::{DispatchError, ErrorResponse};
use self::request::{Context, MethodRequest, Request};
use self::response::SuccessResponse;

/// A named operation reachable through the `method` field.
pub trait MethodHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(
        &self,
        request: &MethodRequest,
        ctx: &mut Context,
        scoring: &dyn Scoring,
    ) -> Result<Value, DispatchError>;
}

pub trait RouterFunction: Send + Sync {
    fn route(&self, request: &Request, ctx: &mut Context) -> Result<SuccessResponse, ErrorResponse>;
}

#[derive(Clone)]
pub struct MethodRouter {
    handlers: HashMap<&'static str, Arc<dyn MethodHandler>>,
    scoring: Arc<dyn Scoring>,
}

impl MethodRouter {
    /// Router with `online_score` and `clients_interests` registered.
    pub fn new(scoring: Arc<dyn Scoring>) -> Self {
        Self::empty(scoring)
            .register(OnlineScoreHandler)
            .register(ClientsInterestsHandler)
    }

    pub fn empty(scoring: Arc<dyn Scoring>) -> Self {
        Self { handlers: HashMap::new(), scoring }
    }

    pub fn register<H: MethodHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.insert(handler.name(), Arc::new(handler));
        self
    }

    pub fn methods(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn dispatch(&self, request: &Request, ctx: &mut Context) -> Result<Value, DispatchError> {
        let method_request: MethodRequest = schema::build(&request.body)?;

        if !ScoringAuth::check_auth(&method_request) {
            warn!(request_id = %ctx.request_id, login = %method_request.login, "bad auth token");
            return Err(DispatchError::Auth);
        }

        let handler = self
            .handlers
            .get(method_request.method.as_str())
            .ok_or_else(|| DispatchError::UnknownMethod(method_request.method.clone()))?;

        info!(
            request_id = %ctx.request_id,
            method = handler.name(),
            admin = method_request.is_admin(),
            "dispatching"
        );
        handler.handle(&method_request, ctx, self.scoring.as_ref())
    }
}

impl RouterFunction for MethodRouter {
    fn route(
        &self,
        request: &Request,
        ctx: &mut Context,
    ) -> Result<SuccessResponse, ErrorResponse> {
        self.dispatch(request, ctx)
            .map(SuccessResponse::new)
            .map_err(ErrorResponse::from)
    }
}
