//! Password hashing and bearer token signing
//!
//! # Passwords
//!
//! Stored as Argon2id PHC strings (`$argon2id$v=19$m=...$salt$hash`). The
//! salt and cost parameters travel inside the string.
//!
//! # Tokens
//!
//! `base64url(canonical claims JSON) "." base64url(HMAC-SHA256(payload, secret))`
//!
//! - Claims: `sub` (user id), `username`, `exp` (Unix epoch ms)
//! - Canonical JSON: sorted keys, no whitespace
//! - The MAC covers the encoded payload part exactly as sent
//! - Tokens expire [`TOKEN_TTL_MS`] after issue
//!
//! This module has no HTTP framework dependencies; the server wraps it in
//! middleware.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime: 24 hours
pub const TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;

// ========================================
// Error Types
// ========================================

/// Token signing and verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token is not `payload.signature` or a part does not decode
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Signature does not match the payload
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token expiry is in the past
    #[error("Token expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },

    /// Signing secret rejected by the MAC
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

// ========================================
// Passwords
// ========================================

/// Random 32-byte signing secret as 64 hex characters
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))
}

/// Check `password` against a stored PHC string
///
/// An unparseable stored hash never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// ========================================
// Tokens
// ========================================

/// Identity carried by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    /// Expiry, Unix epoch milliseconds
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` expiring [`TOKEN_TTL_MS`] after `now_ms`
    pub fn new(user_id: Uuid, username: &str, now_ms: i64) -> Self {
        Self {
            sub: user_id,
            username: username.to_string(),
            exp: now_ms + TOKEN_TTL_MS,
        }
    }

    fn to_value(&self) -> Value {
        serde_json::json!({
            "sub": self.sub.to_string(),
            "username": self.username,
            "exp": self.exp,
        })
    }
}

fn mac_for(secret: &str, payload_part: &str) -> std::result::Result<HmacSha256, TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
    mac.update(payload_part.as_bytes());
    Ok(mac)
}

/// Sign claims into a bearer token
pub fn issue_token(claims: &Claims, secret: &str) -> std::result::Result<String, TokenError> {
    let payload_part = URL_SAFE_NO_PAD.encode(to_canonical_json(&claims.to_value()).as_bytes());
    let signature = mac_for(secret, &payload_part)?.finalize().into_bytes();
    Ok(format!("{}.{}", payload_part, URL_SAFE_NO_PAD.encode(signature)))
}

/// Verify a bearer token's signature and expiry
pub fn verify_token(
    token: &str,
    secret: &str,
    now_ms: i64,
) -> std::result::Result<Claims, TokenError> {
    let (payload_part, signature_part) = token
        .split_once('.')
        .ok_or_else(|| TokenError::Malformed("missing signature".to_string()))?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature_part)
        .map_err(|e| TokenError::Malformed(format!("signature is not base64: {}", e)))?;
    mac_for(secret, payload_part)?
        .verify_slice(&signature)
        .map_err(|_| TokenError::InvalidSignature)?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload_part)
        .map_err(|e| TokenError::Malformed(format!("payload is not base64: {}", e)))?;
    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("invalid claims: {}", e)))?;

    if claims.exp <= now_ms {
        return Err(TokenError::Expired {
            exp: claims.exp,
            now: now_ms,
        });
    }

    Ok(claims)
}

/// Convert JSON to canonical form (sorted keys, no whitespace)
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| *k);
            let items: Vec<String> = pairs
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), to_canonical_json(v)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        // Display for serde_json scalars is compact and correctly escaped
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_730_000_000_000;

    #[test]
    fn test_secret_shape() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, generate_secret());
    }

    #[test]
    fn test_password_hash_is_salted_argon2id() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();

        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("hunter2"));
        // Fresh salt per call
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_verify_password_rejects_unparseable_hash() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_token_round_trip() {
        let claims = Claims::new(Uuid::new_v4(), "alice", NOW);
        let token = issue_token(&claims, "secret").unwrap();

        let verified = verify_token(&token, "secret", NOW + 1000).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn test_token_signature_is_hmac_sha256() {
        let claims = Claims::new(Uuid::new_v4(), "alice", NOW);
        let token = issue_token(&claims, "secret").unwrap();
        let (payload_part, signature_part) = token.split_once('.').unwrap();

        let mut mac = HmacSha256::new_from_slice(b"secret").unwrap();
        mac.update(payload_part.as_bytes());
        let expected = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        assert_eq!(signature_part, expected);
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = issue_token(&Claims::new(Uuid::new_v4(), "alice", NOW), "secret").unwrap();
        assert_eq!(
            verify_token(&token, "other-secret", NOW),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_token_tampered_payload_rejected() {
        let token = issue_token(&Claims::new(Uuid::new_v4(), "alice", NOW), "secret").unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged_claims = Claims::new(Uuid::new_v4(), "mallory", NOW);
        let forged_payload =
            URL_SAFE_NO_PAD.encode(to_canonical_json(&forged_claims.to_value()).as_bytes());
        let forged = format!("{}.{}", forged_payload, signature);

        assert_eq!(verify_token(&forged, "secret", NOW), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_token_expiry() {
        let claims = Claims::new(Uuid::new_v4(), "alice", NOW);
        let token = issue_token(&claims, "secret").unwrap();

        assert!(verify_token(&token, "secret", NOW + TOKEN_TTL_MS - 1).is_ok());
        assert!(matches!(
            verify_token(&token, "secret", NOW + TOKEN_TTL_MS),
            Err(TokenError::Expired { .. })
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(matches!(verify_token("", "s", NOW), Err(TokenError::Malformed(_))));
        assert!(matches!(verify_token("abc", "s", NOW), Err(TokenError::Malformed(_))));
        assert!(matches!(verify_token("abc.!!!", "s", NOW), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_canonical_json_sorting() {
        let json = serde_json::json!({
            "z_field": "last",
            "a_field": "first",
            "m_field": {"b": 2, "a": 1}
        });

        assert_eq!(
            to_canonical_json(&json),
            r#"{"a_field":"first","m_field":{"a":1,"b":2},"z_field":"last"}"#
        );
    }

    #[test]
    fn test_canonical_json_escapes_strings() {
        let json = serde_json::json!({"name": "quote\" and \\ backslash\n"});
        let canonical = to_canonical_json(&json);
        let back: Value = serde_json::from_str(&canonical).unwrap();
        assert_eq!(back, json);
    }
}
