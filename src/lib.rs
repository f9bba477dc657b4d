//! Schema-validated method dispatch for the scoring API.
//!
//! A call arrives as a JSON envelope naming a `method`. The envelope and the
//! method's `arguments` are checked against declarative schemas
//! ([`schema`]), the caller's token is verified ([`auth`]), and the
//! registered handler ([`methods`]) produces the reply through the
//! [`scoring`] collaborators. [`server`] puts the whole thing behind warp.

pub mod auth;
pub mod logging;
pub mod methods;
pub mod router;
pub mod schema;
pub mod scoring;
pub mod server;

pub use router::error::{DispatchError, ErrorCode, ErrorResponse};
pub use router::request::{Context, MethodRequest, Request};
pub use router::response::{Reply, SuccessResponse};
pub use router::{MethodHandler, MethodRouter, RouterFunction};
pub use schema::{RequestModel, RequestSchema, ValidatedRequest, ValidationError};
pub use server::{ScoringServer, ServerConfig};
