use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common_http_errors::error_response;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Auth header must be present")]
    MissingHeader,
    #[error("Authorization header must start with \"Bearer\".")]
    InvalidScheme,
    #[error("Auth token not found")]
    MissingToken,
    #[error("Authorization header must be bearer token.")]
    MalformedHeader,
    #[error("Authorization malformed.")]
    MissingKeyId,
    #[error("no signing key matches kid '{kid}'")]
    KeyNotFound { kid: String },
    #[error("Token expired.")]
    TokenExpired,
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    #[error("unable to parse authentication token: {0}")]
    TokenParseFailure(String),
    #[error("Permissions not included in JWT.")]
    PermissionsClaimMissing,
    #[error("permission '{required}' not granted")]
    PermissionDenied { required: String },
    #[error("failed to fetch JWKS: {0}")]
    KeySetUnavailable(String),
    #[error("Unauthorized")]
    Unauthorized,
}

impl AuthError {
    /// Stable machine-readable code, shared by several kinds.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader
            | AuthError::InvalidScheme
            | AuthError::MissingToken
            | AuthError::MalformedHeader
            | AuthError::MissingKeyId
            | AuthError::KeyNotFound { .. }
            | AuthError::TokenParseFailure(_) => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsClaimMissing => "invalid_claims",
            AuthError::PermissionDenied { .. } | AuthError::Unauthorized => "unauthorized",
            AuthError::KeySetUnavailable(_) => "jwks_unavailable",
        }
    }

    /// Unique per variant; used as a log field and metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::InvalidScheme => "invalid_scheme",
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::MissingKeyId => "missing_key_id",
            AuthError::KeyNotFound { .. } => "key_not_found",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::TokenParseFailure(_) => "token_parse_failure",
            AuthError::PermissionsClaimMissing => "permissions_claim_missing",
            AuthError::PermissionDenied { .. } => "permission_denied",
            AuthError::KeySetUnavailable(_) => "key_set_unavailable",
            AuthError::Unauthorized => "unauthorized",
        }
    }

    /// Client-facing description. Never carries internal detail.
    pub fn description(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "Auth header must be present",
            AuthError::InvalidScheme => "Authorization header must start with \"Bearer\".",
            AuthError::MissingToken => "Auth token not found",
            AuthError::MalformedHeader => "Authorization header must be bearer token.",
            AuthError::MissingKeyId => "Authorization malformed.",
            AuthError::KeyNotFound { .. } => "Unable to find the appropriate key.",
            AuthError::TokenExpired => "Token expired.",
            AuthError::InvalidClaims => "Incorrect claims. Please, check the audience and issuer.",
            AuthError::TokenParseFailure(_) => "Unable to parse authentication token.",
            AuthError::PermissionsClaimMissing => "Permissions not included in JWT.",
            AuthError::PermissionDenied { .. } => "Permission not available",
            AuthError::KeySetUnavailable(_) => "Unable to fetch signing keys.",
            AuthError::Unauthorized => "Unauthorized",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::KeyNotFound { .. } | AuthError::TokenParseFailure(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match value.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::ImmatureSignature => Self::InvalidClaims,
            ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
                Self::InvalidClaims
            }
            _ => Self::TokenParseFailure(value.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.code(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use jsonwebtoken::errors::{Error as JwtError, ErrorKind};

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AuthError::MissingHeader.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::KeyNotFound { kid: "k".into() }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::TokenParseFailure("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::PermissionDenied { required: "post:drinks".into() }.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::KeySetUnavailable("timeout".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn jsonwebtoken_errors_map_to_kinds() {
        let expired: AuthError = JwtError::from(ErrorKind::ExpiredSignature).into();
        assert!(matches!(expired, AuthError::TokenExpired));

        let audience: AuthError = JwtError::from(ErrorKind::InvalidAudience).into();
        assert!(matches!(audience, AuthError::InvalidClaims));

        let immature: AuthError = JwtError::from(ErrorKind::ImmatureSignature).into();
        assert!(matches!(immature, AuthError::InvalidClaims));

        let missing_aud: AuthError =
            JwtError::from(ErrorKind::MissingRequiredClaim("aud".into())).into();
        assert!(matches!(missing_aud, AuthError::InvalidClaims));

        let signature: AuthError = JwtError::from(ErrorKind::InvalidSignature).into();
        assert!(matches!(signature, AuthError::TokenParseFailure(_)));

        let algorithm: AuthError = JwtError::from(ErrorKind::InvalidAlgorithm).into();
        assert!(matches!(algorithm, AuthError::TokenParseFailure(_)));
    }

    #[tokio::test]
    async fn response_hides_internal_detail() {
        let resp = AuthError::KeySetUnavailable("dns error: tenant.example.com".into())
            .into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = resp.into_body().collect().await.expect("body").to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "error": 503,
                "message": "Unable to fetch signing keys."
            })
        );
    }
}
