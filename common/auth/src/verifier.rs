use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::Claims;
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::jwks::{JwkSet, JwksFetcher};

#[derive(Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
    jwks: JwksFetcher,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let jwks = JwksFetcher::from_config(&config);
        Self { config, jwks }
    }

    pub fn with_fetcher(config: JwtConfig, jwks: JwksFetcher) -> Self {
        Self { config, jwks }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn jwks_fetcher(&self) -> &JwksFetcher {
        &self.jwks
    }

    /// Verifies `token` against the provider's current key set.
    pub async fn verify(&self, token: &str) -> AuthResult<Claims> {
        let kid = self.key_id(token)?;
        let keys = self.jwks.keys().await?;
        self.verify_kid(token, &kid, &keys)
    }

    /// Verifies `token` against a fixed key set without touching the network.
    pub fn verify_with_key_set(&self, token: &str, keys: &JwkSet) -> AuthResult<Claims> {
        let kid = self.key_id(token)?;
        self.verify_kid(token, &kid, keys)
    }

    fn key_id(&self, token: &str) -> AuthResult<String> {
        let header =
            decode_header(token).map_err(|err| AuthError::TokenParseFailure(err.to_string()))?;
        header.kid.ok_or(AuthError::MissingKeyId)
    }

    fn verify_kid(&self, token: &str, kid: &str, keys: &JwkSet) -> AuthResult<Claims> {
        let jwk = keys.find(kid).ok_or_else(|| AuthError::KeyNotFound {
            kid: kid.to_string(),
        })?;
        let key = jwk.decoding_key()?;

        let token_data = decode::<Value>(token, &key, &self.validation())?;
        let claims = Claims::from_verified(token_data.claims)?;
        debug!(kid, "verified JWT successfully");
        Ok(claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = self.config.algorithms.clone();
        validation.set_audience(&[self.config.audience.as_str()]);
        let mut required = vec!["exp", "aud"];
        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer.as_str()]);
            required.push("iss");
        }
        validation.set_required_spec_claims(&required);
        validation.validate_nbf = true;
        validation.leeway = self.config.leeway_seconds;
        validation
    }
}
