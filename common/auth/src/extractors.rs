use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::error::{AuthError, AuthResult};

const BEARER: &str = "Bearer";

/// Pulls the bare token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer(headers: &HeaderMap) -> AuthResult<String> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }
    let raw = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    parse_bearer(raw)
}

fn parse_bearer(raw: &str) -> AuthResult<String> {
    let parts: Vec<&str> = raw.split_whitespace().collect();

    if !parts.contains(&BEARER) {
        return Err(AuthError::InvalidScheme);
    }
    match parts.as_slice() {
        [_] => Err(AuthError::MissingToken),
        [BEARER, token] => Ok((*token).to_owned()),
        [_, _] => Err(AuthError::InvalidScheme),
        _ => Err(AuthError::MalformedHeader),
    }
}
