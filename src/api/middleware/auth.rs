//! Bearer token authentication.
//!
//! `jwt_filter` runs on every route: it verifies an `Authorization: Bearer`
//! token when one is sent and injects a `Principal` into request
//! extensions. Requests without a token pass through unauthenticated.
//! `require_auth` sits on the protected routes and rejects requests the
//! filter did not authenticate.

use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Principal};
use crate::crypto::CryptoError;
use crate::db;

const AUTH_PREFIX: &str = "/api/auth/";

pub async fn jwt_filter(req: Request<axum::body::Body>, next: Next) -> Response {
    match jwt_filter_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn jwt_filter_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if req.uri().path().starts_with(AUTH_PREFIX) {
        return Ok(next.run(req).await);
    }

    let Some(token) = bearer_token(&req) else {
        return Ok(next.run(req).await);
    };

    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let claims = match ctx.core.jwt.verify(&token) {
        Ok(claims) => claims,
        Err(CryptoError::TokenExpired) => return Err(ApiError::TokenExpired),
        Err(e) => {
            tracing::warn!(error = %e, path = req.uri().path(), "Rejected bearer token");
            return Err(ApiError::InvalidToken);
        }
    };

    if req.extensions().get::<Principal>().is_none() {
        let user = {
            let conn = ctx.core.open_db()?;
            db::get_user_by_email(&conn, &claims.sub)?
        }; // Connection dropped here, before any .await

        let user = user.ok_or_else(|| {
            tracing::warn!(subject = %claims.sub, "Token subject has no account");
            ApiError::InvalidToken
        })?;
        req.extensions_mut().insert(Principal {
            user_id: user.id,
            email: user.email,
            role: user.role,
        });
    }

    Ok(next.run(req).await)
}

/// Reject requests that reached a protected route without a principal.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    if req.extensions().get::<Principal>().is_none() {
        return ApiError::Unauthorized.into_response();
    }
    next.run(req).await
}

fn bearer_token(req: &Request<axum::body::Body>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
