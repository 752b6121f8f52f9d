//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Access logger: method, path, status and latency
//! 2. JWT filter: verifies a bearer token if present, attaches `Principal`
//! 3. Auth guard: protected routes only, rejects requests without a principal

pub mod audit;
pub mod auth;
