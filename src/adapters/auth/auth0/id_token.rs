//! ID token verification against the tenant's JWKS.
//!
//! An ID token is accepted only when:
//!
//! 1. its signature verifies against a key from `/.well-known/jwks.json`
//! 2. `iss` is the tenant issuer and `aud` contains our client id
//! 3. it has not expired
//! 4. its `nonce` equals the one generated for this login

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::IdTokenVerifier;

use super::pkce::tokens_match;
use super::settings::Auth0Settings;

/// Claims of an Auth0 ID token that we read.
#[derive(Debug, Serialize, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    aud: Audience,
    #[serde(default)]
    nonce: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nickname: Option<String>,
}

/// `aud` is a single string or an array of strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    ttl: Duration,
}

impl JwksCache {
    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.ttl
    }
}

/// Verifies ID tokens with keys from the tenant JWKS, cached for
/// `jwks_cache_ttl`. A token signed with an unknown `kid` forces one
/// refetch so key rotation is picked up before the cache expires.
pub struct JwksIdTokenVerifier {
    issuer: String,
    client_id: String,
    jwks_url: String,
    jwks_cache_ttl: Duration,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl JwksIdTokenVerifier {
    /// Keys are fetched lazily on the first verification.
    pub fn new(settings: &Auth0Settings) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .build()
            .map_err(|e| {
                AuthError::service_unavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            issuer: settings.issuer(),
            client_id: settings.client_id.clone(),
            jwks_url: settings.jwks_url(),
            jwks_cache_ttl: settings.jwks_cache_ttl,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch JWKS: {}", e);
                AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("JWKS endpoint returned {}", status);
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse JWKS: {}", e);
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!("Fetched {} keys from JWKS", jwks.keys.len());

        *self.jwks_cache.write().await = Some(JwksCache {
            jwks: jwks.clone(),
            fetched_at: Instant::now(),
            ttl: self.jwks_cache_ttl,
        });

        Ok(jwks)
    }

    async fn cached_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| !c.is_expired()) {
                return Ok(cached.jwks.clone());
            }
        }
        self.fetch_jwks().await
    }

    async fn decoding_key(&self, header: &Header) -> Result<(DecodingKey, Algorithm), AuthError> {
        let kid = header.kid.as_deref().ok_or_else(|| {
            tracing::warn!("ID token missing 'kid' header");
            AuthError::InvalidToken
        })?;

        let mut jwks = self.cached_jwks().await?;
        if jwks.find(kid).is_none() {
            tracing::info!(kid, "Unknown signing key, refetching JWKS");
            jwks = self.fetch_jwks().await?;
        }

        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::warn!("No matching key found for kid: {}", kid);
            AuthError::InvalidToken
        })?;

        let algorithm = match jwk.common.key_algorithm {
            Some(jsonwebtoken::jwk::KeyAlgorithm::RS256) | None => Algorithm::RS256,
            Some(jsonwebtoken::jwk::KeyAlgorithm::RS384) => Algorithm::RS384,
            Some(jsonwebtoken::jwk::KeyAlgorithm::RS512) => Algorithm::RS512,
            Some(jsonwebtoken::jwk::KeyAlgorithm::ES256) => Algorithm::ES256,
            Some(jsonwebtoken::jwk::KeyAlgorithm::ES384) => Algorithm::ES384,
            Some(other) => {
                tracing::warn!("Unsupported algorithm: {:?}", other);
                return Err(AuthError::InvalidToken);
            }
        };

        let key = DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!("Failed to create decoding key: {}", e);
            AuthError::InvalidToken
        })?;

        Ok((key, algorithm))
    }

    /// Checks signature and claims, then maps them to a user.
    fn verify_with_key(
        &self,
        id_token: &str,
        key: &DecodingKey,
        algorithm: Algorithm,
        expected_nonce: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.client_id]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);

        let claims = decode::<IdTokenClaims>(id_token, key, &validation)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("ID token expired");
                        AuthError::TokenExpired
                    }
                    _ => {
                        tracing::warn!("ID token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })?
            .claims;

        if !claims.aud.contains(&self.client_id) {
            tracing::warn!("Audience mismatch: expected '{}'", self.client_id);
            return Err(AuthError::InvalidToken);
        }

        let nonce_ok = claims
            .nonce
            .as_deref()
            .is_some_and(|nonce| tokens_match(expected_nonce, nonce));
        if !nonce_ok {
            tracing::warn!("ID token nonce mismatch");
            return Err(AuthError::InvalidToken);
        }

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Invalid user ID in ID token: {}", claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(
            user_id,
            claims.email,
            claims.name.or(claims.nickname),
            claims.email_verified.unwrap_or(false),
        ))
    }
}

#[async_trait]
impl IdTokenVerifier for JwksIdTokenVerifier {
    async fn verify(
        &self,
        id_token: &str,
        expected_nonce: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(id_token).map_err(|e| {
            tracing::debug!("Failed to decode ID token header: {}", e);
            AuthError::InvalidToken
        })?;

        let (key, algorithm) = self.decoding_key(&header).await?;
        self.verify_with_key(id_token, &key, algorithm, expected_nonce)
    }
}

impl std::fmt::Debug for JwksIdTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksIdTokenVerifier")
            .field("issuer", &self.issuer)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}
