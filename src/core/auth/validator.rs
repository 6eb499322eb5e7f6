//! Bearer-token validation for the HTTP transport.
//!
//! Tokens are RS256 JWTs validated against the configured issuer and
//! audience. Signing keys are discovered once at startup through the
//! issuer's OIDC metadata document and held for the process lifetime.

use std::collections::BTreeMap;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::Principal;
use crate::core::config::AuthConfig;

/// Errors from token validation and key discovery.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Fetching the OIDC metadata or JWKS document failed.
    #[error("OIDC discovery failed: {0}")]
    Discovery(#[from] reqwest::Error),

    /// The token header carries no `kid`, so no signing key can be selected.
    #[error("token has no key id (kid) header")]
    MissingKeyId,

    /// No discovered signing key matches the token's `kid`.
    #[error("no signing key matches kid '{0}'")]
    UnknownKey(String),

    /// The matching JWKS entry is not a usable RSA key.
    #[error("signing key '{0}' is missing RSA components")]
    MalformedKey(String),

    /// Signature, issuer, audience, or lifetime validation failed.
    #[error("token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Relevant subset of the OIDC discovery document.
#[derive(Debug, Deserialize)]
struct OidcMetadata {
    jwks_uri: String,
}

/// A single JSON Web Key as published in a JWKS document.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type, e.g. "RSA".
    pub kty: String,

    /// Key id matched against the token header.
    #[serde(default)]
    pub kid: Option<String>,

    /// RSA modulus, base64url-encoded.
    #[serde(default)]
    pub n: Option<String>,

    /// RSA public exponent, base64url-encoded.
    #[serde(default)]
    pub e: Option<String>,
}

/// A JWKS document: the issuer's published signing keys.
#[derive(Debug, Clone, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// Validates bearer tokens against a fixed issuer, audience, and key set.
pub struct TokenValidator {
    jwks: JwkSet,
    validation: Validation,
}

impl TokenValidator {
    /// Build a validator by discovering the issuer's signing keys.
    ///
    /// Fetches `{issuer}/.well-known/openid-configuration`, follows its
    /// `jwks_uri`, and pins the resulting key set.
    pub async fn discover(config: &AuthConfig) -> Result<Self, AuthError> {
        let metadata_url = format!(
            "{}/.well-known/openid-configuration",
            config.issuer.trim_end_matches('/')
        );
        debug!("Fetching OIDC metadata from {}", metadata_url);

        let metadata: OidcMetadata = reqwest::get(&metadata_url)
            .await?
            .error_for_status()?
            .json()
            .await?;

        let jwks: JwkSet = reqwest::get(&metadata.jwks_uri)
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!(
            "Discovered {} signing key(s) from {}",
            jwks.keys.len(),
            metadata.jwks_uri
        );

        Ok(Self::from_jwks(jwks, &config.issuer, &config.audience))
    }

    /// Build a validator from an already-fetched key set.
    pub fn from_jwks(jwks: JwkSet, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);

        Self { jwks, validation }
    }

    /// Validate a bearer token and produce the authenticated principal.
    pub fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let jwk = self
            .jwks
            .keys
            .iter()
            .find(|k| k.kty == "RSA" && k.kid.as_deref() == Some(kid.as_str()))
            .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?;

        let (n, e) = match (&jwk.n, &jwk.e) {
            (Some(n), Some(e)) => (n, e),
            _ => return Err(AuthError::MalformedKey(kid)),
        };
        let key = DecodingKey::from_rsa_components(n, e)?;

        let data = decode::<serde_json::Value>(token, &key, &self.validation)?;
        Ok(Principal::authenticated(stringify_claims(data.claims)))
    }
}

/// Flatten a JWT payload into a string-to-string claim map.
///
/// Scalar values are stringified (a numeric `sub` still resolves); arrays
/// and nested objects are dropped since the username probe has no use for
/// them.
fn stringify_claims(payload: serde_json::Value) -> BTreeMap<String, String> {
    let mut claims = BTreeMap::new();

    if let serde_json::Value::Object(map) = payload {
        for (name, value) in map {
            match value {
                serde_json::Value::String(s) => {
                    claims.insert(name, s);
                }
                serde_json::Value::Number(n) => {
                    claims.insert(name, n.to_string());
                }
                serde_json::Value::Bool(b) => {
                    claims.insert(name, b.to_string());
                }
                _ => {}
            }
        }
    }

    claims
}
