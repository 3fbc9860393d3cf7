use std::env;
use std::time::Duration;

use jsonwebtoken::Algorithm;

pub const DEFAULT_AUTH0_DOMAIN: &str = "coffee-shop-udacity01.us.auth0.com";
pub const DEFAULT_API_AUDIENCE: &str = "http://127.0.0.1:5000/api/v2";
pub const ALLOWED_ALGORITHMS: &[Algorithm] = &[Algorithm::RS256];

const DEFAULT_JWKS_TIMEOUT_SECS: u64 = 5;

/// Runtime configuration for JWT verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Identity provider host, e.g. `tenant.us.auth0.com`.
    pub issuer_domain: String,
    /// Expected audience claim (aud).
    pub audience: String,
    /// Signature algorithms a token may present. Asymmetric only.
    pub algorithms: Vec<Algorithm>,
    /// Expected issuer claim (iss). Not checked when unset.
    pub issuer: Option<String>,
    /// Key set location, derived from `issuer_domain` unless overridden.
    pub jwks_url: String,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u64,
    pub jwks_timeout: Duration,
    /// Reuse a fetched key set for this long. `None` fetches on every verification.
    pub jwks_cache_ttl: Option<Duration>,
}

impl JwtConfig {
    pub fn new(issuer_domain: impl Into<String>, audience: impl Into<String>) -> Self {
        let issuer_domain = issuer_domain.into();
        Self {
            jwks_url: jwks_url_for(&issuer_domain),
            issuer_domain,
            audience: audience.into(),
            algorithms: ALLOWED_ALGORITHMS.to_vec(),
            issuer: None,
            leeway_seconds: 0,
            jwks_timeout: Duration::from_secs(DEFAULT_JWKS_TIMEOUT_SECS),
            jwks_cache_ttl: None,
        }
    }

    /// Reads `AUTH0_DOMAIN`, `API_AUDIENCE` and the optional `AUTH_*` tuning variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let domain = env::var("AUTH0_DOMAIN").unwrap_or_else(|_| DEFAULT_AUTH0_DOMAIN.to_string());
        let audience =
            env::var("API_AUDIENCE").unwrap_or_else(|_| DEFAULT_API_AUDIENCE.to_string());
        let mut config = Self::new(domain, audience);

        if let Ok(issuer) = env::var("AUTH0_ISSUER") {
            config = config.with_issuer(issuer);
        }
        if let Ok(url) = env::var("AUTH_JWKS_URL") {
            config = config.with_jwks_url(url);
        }
        if let Some(secs) = secs_from_env("AUTH_JWKS_TIMEOUT_SECS")? {
            config = config.with_jwks_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = secs_from_env("AUTH_JWKS_CACHE_TTL_SECS")? {
            if secs > 0 {
                config = config.with_jwks_cache_ttl(Duration::from_secs(secs));
            }
        }
        if let Some(secs) = secs_from_env("AUTH_LEEWAY_SECS")? {
            config = config.with_leeway(secs);
        }
        Ok(config)
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn with_jwks_timeout(mut self, timeout: Duration) -> Self {
        self.jwks_timeout = timeout;
        self
    }

    pub fn with_jwks_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = Some(ttl);
        self
    }
}

pub fn jwks_url_for(domain: &str) -> String {
    format!("https://{domain}/.well-known/jwks.json")
}

#[derive(Debug, thiserror::Error)]
#[error("environment variable {name} must be a whole number of seconds, got '{value}'")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

fn secs_from_env(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError { name, value }),
        Err(_) => Ok(None),
    }
}
