use std::future::Future;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::claims::Claims;
use crate::error::{AuthError, AuthResult};
use crate::extractors::extract_bearer;
use crate::metrics::record_rejection;
use crate::permissions::check_permission;
use crate::verifier::JwtVerifier;

/// Runs extraction, verification and permission checks for one call.
#[derive(Clone)]
pub struct AuthGuard {
    verifier: Arc<JwtVerifier>,
}

impl AuthGuard {
    pub fn new(verifier: Arc<JwtVerifier>) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &JwtVerifier {
        &self.verifier
    }

    /// An empty `required` permission only authenticates.
    ///
    /// Verification failures of any kind surface as [`AuthError::Unauthorized`];
    /// the specific failure is logged and counted. Extraction and permission
    /// failures surface as-is.
    pub async fn authorize(&self, headers: &HeaderMap, required: &str) -> AuthResult<Claims> {
        let token = extract_bearer(headers).inspect_err(|err| reject(err, required))?;
        debug!(stage = "token_extracted", required, "authorizing request");

        let claims = self.verifier.verify(&token).await.map_err(|err| {
            warn!(
                kind = err.kind(),
                error = %err,
                required,
                "token verification failed"
            );
            record_rejection(err.kind());
            AuthError::Unauthorized
        })?;
        debug!(stage = "claims_verified", subject = ?claims.subject, "token verified");

        if !required.is_empty() {
            check_permission(required, &claims).inspect_err(|err| reject(err, required))?;
        }
        debug!(stage = "permission_checked", required, "request authorized");
        Ok(claims)
    }

    /// Wraps `operation` so it only runs once `permission` is satisfied.
    pub fn requires_auth<F>(&self, permission: impl Into<String>, operation: F) -> Guarded<F> {
        Guarded {
            guard: self.clone(),
            permission: permission.into(),
            operation,
        }
    }
}

fn reject(err: &AuthError, required: &str) {
    warn!(kind = err.kind(), required, "request rejected");
    record_rejection(err.kind());
}

/// An operation that receives verified claims ahead of its own arguments.
#[derive(Clone)]
pub struct Guarded<F> {
    guard: AuthGuard,
    permission: String,
    operation: F,
}

impl<F> Guarded<F> {
    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub async fn call<A, Fut, T>(&self, headers: &HeaderMap, args: A) -> AuthResult<T>
    where
        F: Fn(Claims, A) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.guard.authorize(headers, &self.permission).await?;
        Ok((self.operation)(claims, args).await)
    }
}

/// Middleware state: the guard plus the permission a route demands.
#[derive(Clone)]
pub struct RequiredPermission {
    guard: AuthGuard,
    permission: &'static str,
}

impl RequiredPermission {
    pub fn new(guard: AuthGuard, permission: &'static str) -> Self {
        Self { guard, permission }
    }
}

/// Use with `axum::middleware::from_fn_with_state`. Stores [`Claims`] in the
/// request extensions; the bearer token itself is not forwarded.
pub async fn require_permission(
    State(required): State<RequiredPermission>,
    mut req: Request,
    next: Next,
) -> Response {
    let outcome = required
        .guard
        .authorize(req.headers(), required.permission)
        .await;
    match outcome {
        Ok(claims) => {
            req.headers_mut().remove(axum::http::header::AUTHORIZATION);
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
