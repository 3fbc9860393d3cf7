pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod guards;
pub mod jwks;
pub mod metrics;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::Claims;
pub use config::{ConfigError, JwtConfig};
pub use error::{AuthError, AuthResult};
pub use extractors::extract_bearer;
pub use guards::{require_permission, AuthGuard, Guarded, RequiredPermission};
pub use jwks::{Jwk, JwkSet, JwksFetcher};
pub use permissions::{check_permission, DELETE_DRINKS, GET_DRINKS_DETAIL, POST_DRINKS};
pub use verifier::JwtVerifier;
