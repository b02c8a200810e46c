//! Bearer token verification.
//!
//! Tokens are JWTs signed with a shared HMAC secret. The secret is loaded
//! once; verification is a pure function of the token and that key.

use std::collections::HashSet;

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Accepted signing algorithms: the symmetric HMAC family only.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Why a token failed verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("unexpected signing method: {0:?}")]
    UnexpectedAlgorithm(Algorithm),

    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),

    #[error("claim `{0}` is not a numeric date")]
    MalformedClaim(&'static str),
}

/// Claims the gateway reads from a verified token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    /// Subject; `None` when absent or not a string.
    #[serde(default, deserialize_with = "string_or_none")]
    pub sub: Option<String>,

    #[serde(default)]
    exp: Option<serde_json::Value>,

    #[serde(default)]
    nbf: Option<serde_json::Value>,
}

impl Claims {
    /// Time claims are optional, but when present they must be numbers.
    /// The decoder skips values it cannot parse, so check them here.
    fn check_time_claims(&self) -> Result<(), TokenError> {
        for (name, value) in [("exp", &self.exp), ("nbf", &self.nbf)] {
            if let Some(value) = value {
                if !value.is_number() {
                    return Err(TokenError::MalformedClaim(name));
                }
            }
        }
        Ok(())
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Verifies HMAC-signed bearer tokens.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    /// Create a verifier for the given shared secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        // exp and nbf are enforced when present but not required
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token)?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            return Err(TokenError::UnexpectedAlgorithm(header.alg));
        }

        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        data.claims.check_time_claims()?;
        Ok(data.claims)
    }
}
