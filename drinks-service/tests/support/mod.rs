use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{header::AUTHORIZATION, Method, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use common_auth::{JwtConfig, JwtVerifier};
use drinks_service::app_state::AppState;
use drinks_service::routes::build_router;
use drinks_service::store::DrinkStore;
use http_body_util::BodyExt;
use httpmock::prelude::*;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};
use tower::util::ServiceExt;

pub const KID: &str = "coffee-shop-key";
pub const AUDIENCE: &str = "http://127.0.0.1:5000/api/v2";

pub struct Signer {
    encoding: EncodingKey,
    modulus: String,
    exponent: String,
}

pub fn signer() -> &'static Signer {
    static SIGNER: OnceLock<Signer> = OnceLock::new();
    SIGNER.get_or_init(|| {
        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).expect("key generation");
        let public_key = private_key.to_public_key();
        let pem = private_key.to_pkcs1_pem(LineEnding::LF).expect("pem");
        Signer {
            encoding: EncodingKey::from_rsa_pem(pem.as_bytes()).expect("encoding key"),
            modulus: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
            exponent: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
        }
    })
}

impl Signer {
    pub fn token(&self, permissions: &[&str], expires_in: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = json!({
            "iss": "https://tenant.example.com/",
            "sub": "auth0|manager",
            "aud": AUDIENCE,
            "iat": now,
            "exp": now + expires_in,
            "permissions": permissions,
        });
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(KID.to_string());
        encode(&header, &claims, &self.encoding).expect("sign token")
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<DrinkStore>,
    /// Kept alive for the lifetime of the router.
    pub _jwks: MockServer,
}

impl TestApp {
    pub fn new() -> Self {
        let jwks = MockServer::start();
        let signer = signer();
        jwks.mock(|when, then| {
            when.method(GET).path("/.well-known/jwks.json");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "keys": [{
                        "kty": "RSA",
                        "kid": KID,
                        "use": "sig",
                        "n": signer.modulus,
                        "e": signer.exponent
                    }]
                }));
        });

        let config = JwtConfig::new("tenant.example.com", AUDIENCE)
            .with_jwks_url(format!("{}/.well-known/jwks.json", jwks.base_url()));
        let store = Arc::new(DrinkStore::new());
        let state = AppState::new(store.clone(), Arc::new(JwtVerifier::new(config)));

        Self { router: build_router(state), store, _jwks: jwks }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let resp = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");
        let status = resp.status();
        let bytes = resp.into_body().collect().await.expect("body").to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}
