//! Token types and JWT signing
//!
//! Access and refresh tokens are both JWTs carrying the user id as the
//! `sub` claim. They are distinguished only by signing key and lifetime:
//! the access token is short-lived and self-certifying, the refresh token
//! is longer-lived and anchored in the refresh-token ledger.
//!
//! Verification keeps the two failure modes apart: [`TokenError::Expired`]
//! means the signature checked out but the token aged out (actionable by a
//! refresh), while [`TokenError::Invalid`] covers bad signatures, wrong
//! keys, and malformed tokens.

use std::path::Path;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    error::{TokenError, ValidationError},
    user::UserId,
};

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject - user ID
    pub sub: String,
    /// Issued at in seconds (as UTC timestamp)
    pub iat: i64,
    /// Expiration time in seconds (as UTC timestamp)
    pub exp: i64,
    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Signing key material for one token class.
#[derive(Debug, Clone)]
pub enum JwtKey {
    /// RS256 - RSA with SHA-256
    Rs256 {
        /// Private key for signing (PEM format)
        private_key: Vec<u8>,
        /// Public key for verifying (PEM format)
        public_key: Vec<u8>,
    },
    /// HS256 - HMAC with SHA-256
    Hs256 {
        /// Secret key for both signing and verifying
        secret_key: Vec<u8>,
    },
}

/// Configuration for one token class: key material, lifetime, issuer.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Algorithm and keys
    pub key: JwtKey,
    /// Lifetime of issued tokens
    pub ttl: Duration,
    /// Issuer claim
    pub issuer: Option<String>,
}

impl JwtConfig {
    /// Create a new HS256 configuration.
    pub fn new_hs256(secret_key: Vec<u8>, ttl: Duration) -> Self {
        Self {
            key: JwtKey::Hs256 { secret_key },
            ttl,
            issuer: None,
        }
    }

    /// Create a new RS256 configuration.
    pub fn new_rs256(private_key: Vec<u8>, public_key: Vec<u8>, ttl: Duration) -> Self {
        Self {
            key: JwtKey::Rs256 {
                private_key,
                public_key,
            },
            ttl,
            issuer: None,
        }
    }

    /// Create an RS256 configuration from RSA key files (PEM format).
    pub fn from_rs256_pem_files(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
        ttl: Duration,
    ) -> Result<Self, Error> {
        use std::fs::read;

        let private_key = read(private_key_path).map_err(|e| {
            ValidationError::InvalidField(format!("Failed to read private key file: {e}"))
        })?;

        let public_key = read(public_key_path).map_err(|e| {
            ValidationError::InvalidField(format!("Failed to read public key file: {e}"))
        })?;

        Ok(Self::new_rs256(private_key, public_key, ttl))
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Get the algorithm to use with jsonwebtoken
    pub fn jwt_algorithm(&self) -> Algorithm {
        match &self.key {
            JwtKey::Rs256 { .. } => Algorithm::RS256,
            JwtKey::Hs256 { .. } => Algorithm::HS256,
        }
    }

    /// Get the encoding key for signing
    pub fn encoding_key(&self) -> Result<EncodingKey, Error> {
        match &self.key {
            JwtKey::Rs256 { private_key, .. } => EncodingKey::from_rsa_pem(private_key)
                .map_err(|e| TokenError::Signing(format!("Invalid RSA private key: {e}")).into()),
            JwtKey::Hs256 { secret_key } => Ok(EncodingKey::from_secret(secret_key)),
        }
    }

    /// Get the decoding key for verification
    pub fn decoding_key(&self) -> Result<DecodingKey, Error> {
        match &self.key {
            JwtKey::Rs256 { public_key, .. } => DecodingKey::from_rsa_pem(public_key)
                .map_err(|e| TokenError::Invalid(format!("Invalid RSA public key: {e}")).into()),
            JwtKey::Hs256 { secret_key } => Ok(DecodingKey::from_secret(secret_key)),
        }
    }

    /// Get the validation configuration for verification
    pub fn validation(&self) -> Validation {
        Validation::new(self.jwt_algorithm())
    }
}

/// Signing configuration for the full access/refresh pair.
///
/// The two classes use distinct secrets so an access token can never be
/// replayed as a refresh token or vice versa.
#[derive(Debug, Clone)]
pub struct TokenForgeConfig {
    /// Configuration for short-lived access tokens
    pub access: JwtConfig,
    /// Configuration for long-lived refresh tokens
    pub refresh: JwtConfig,
}

impl TokenForgeConfig {
    /// Default access-token lifetime.
    pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
    /// Default refresh-token lifetime.
    pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

    /// Create a configuration with two HS256 secrets and default lifetimes.
    pub fn new_hs256(access_secret: Vec<u8>, refresh_secret: Vec<u8>) -> Self {
        Self {
            access: JwtConfig::new_hs256(
                access_secret,
                Duration::minutes(Self::DEFAULT_ACCESS_TTL_MINUTES),
            ),
            refresh: JwtConfig::new_hs256(
                refresh_secret,
                Duration::days(Self::DEFAULT_REFRESH_TTL_DAYS),
            ),
        }
    }

    /// Override the access-token lifetime.
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access.ttl = ttl;
        self
    }

    /// Override the refresh-token lifetime.
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh.ttl = ttl;
        self
    }

    /// Set the issuer claim on both token classes.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        self.access.issuer = Some(issuer.clone());
        self.refresh.issuer = Some(issuer);
        self
    }
}

/// A freshly issued access/refresh pair.
///
/// Transient: the pair exists in transit and in the caller's possession
/// only. The ledger persists a hash of the refresh token, never the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Sign a token for `user_id` under the given configuration.
pub fn sign(user_id: &UserId, config: &JwtConfig) -> Result<String, Error> {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + config.ttl).timestamp(),
        iss: config.issuer.clone(),
    };

    let header = Header::new(config.jwt_algorithm());
    let encoding_key = config.encoding_key()?;

    encode(&header, &claims, &encoding_key)
        .map_err(|e| TokenError::Signing(format!("Failed to encode JWT: {e}")).into())
}

/// Verify a token and return its claims.
///
/// Expiry is reported as [`TokenError::Expired`], every other failure as
/// [`TokenError::Invalid`].
pub fn verify(token: &str, config: &JwtConfig) -> Result<JwtClaims, Error> {
    let decoding_key = config.decoding_key()?;
    let validation = config.validation();

    let token_data = decode::<JwtClaims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(format!("JWT validation failed: {e}")),
        }
    })?;

    Ok(token_data.claims)
}
