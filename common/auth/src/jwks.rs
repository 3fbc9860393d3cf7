use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// One entry of the provider's published key set.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
    /// RSA modulus, base64url.
    #[serde(default)]
    pub n: Option<String>,
    /// RSA exponent, base64url.
    #[serde(default)]
    pub e: Option<String>,
}

impl Jwk {
    /// Builds the RSA verification key for this entry.
    pub fn decoding_key(&self) -> AuthResult<DecodingKey> {
        let kid = self.kid.as_deref().unwrap_or_default();
        if self.kty != "RSA" {
            return Err(AuthError::TokenParseFailure(format!(
                "key '{kid}' has unsupported kty '{}'",
                self.kty
            )));
        }
        let (Some(n), Some(e)) = (self.n.as_deref(), self.e.as_deref()) else {
            return Err(AuthError::TokenParseFailure(format!(
                "key '{kid}' missing RSA components"
            )));
        };
        DecodingKey::from_rsa_components(n, e).map_err(|err| {
            AuthError::TokenParseFailure(format!("key '{kid}' is not a valid RSA key: {err}"))
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// When several entries share a kid, the last one wins.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().rev().find(|key| key.kid.as_deref() == Some(kid))
    }
}

struct CachedJwks {
    keys: Arc<JwkSet>,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct JwksFetcher {
    client: Client,
    url: String,
    ttl: Option<Duration>,
    cache: Arc<RwLock<Option<CachedJwks>>>,
}

impl JwksFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|err| {
            warn!(error = %err, "failed to build JWKS client with timeout, using defaults");
            Client::new()
        });
        Self::with_client(client, url)
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        let fetcher = Self::new(config.jwks_url.clone(), config.jwks_timeout);
        match config.jwks_cache_ttl {
            Some(ttl) => fetcher.with_cache_ttl(ttl),
            None => fetcher,
        }
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            ttl: None,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Serve a fetched key set for up to `ttl` before fetching again.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current key set, from cache when enabled and fresh.
    pub async fn keys(&self) -> AuthResult<Arc<JwkSet>> {
        let Some(ttl) = self.ttl else {
            return self.fetch().await.map(Arc::new);
        };

        if let Some(cached) = self.cached().await {
            return Ok(cached);
        }

        let mut guard = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = guard.as_ref().filter(|c| c.expires_at > Instant::now()) {
            return Ok(cached.keys.clone());
        }
        let keys = Arc::new(self.fetch().await?);
        *guard = Some(CachedJwks {
            keys: keys.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(keys)
    }

    async fn cached(&self) -> Option<Arc<JwkSet>> {
        let guard = self.cache.read().await;
        guard
            .as_ref()
            .filter(|cached| cached.expires_at > Instant::now())
            .map(|cached| cached.keys.clone())
    }

    /// Fetches the key set from the provider, bypassing any cache.
    pub async fn fetch(&self) -> AuthResult<JwkSet> {
        debug!(url = %self.url, "fetching JWKS");
        let response = self.client.get(&self.url).send().await.map_err(|err| {
            warn!(url = %self.url, error = %err, "JWKS request failed");
            AuthError::KeySetUnavailable(err.to_string())
        })?;

        if !response.status().is_success() {
            warn!(url = %self.url, status = %response.status(), "JWKS endpoint returned error");
            return Err(AuthError::KeySetUnavailable(format!(
                "HTTP {} from {}",
                response.status(),
                self.url
            )));
        }

        response.json::<JwkSet>().await.map_err(|err| {
            warn!(url = %self.url, error = %err, "failed to parse JWKS response");
            AuthError::KeySetUnavailable(err.to_string())
        })
    }
}
