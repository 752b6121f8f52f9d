//! REST API.
//!
//! JSON endpoints for the clinic resources under `/api/`, protected by
//! bearer JWTs. Every response uses the `ApiResponse` envelope.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{serve, ServerError};
pub use types::{ApiContext, ApiResponse};
