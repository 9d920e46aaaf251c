//! Tokenized transport: signed-JWT wrapping of mutation payloads.
//!
//! Some clients submit and receive record payloads as short-lived HS256
//! JWTs instead of plain JSON, so that payloads in transit logs are opaque
//! and tamper-evident. The payload rides under a `data` claim; the token is
//! signed with the same secret as access tokens and expires quickly.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use agrireg_core::error::CoreError;

/// Lifetime of a payload token in seconds.
const PAYLOAD_TOKEN_TTL_SECS: i64 = 600;

#[derive(Serialize)]
struct SignClaims<'a, T: Serialize> {
    exp: i64,
    iat: i64,
    data: &'a T,
}

#[derive(Deserialize)]
struct VerifyClaims<T> {
    #[allow(dead_code)]
    exp: i64,
    data: T,
}

/// Wrap a payload in a signed, short-lived JWT.
pub fn sign_payload<T: Serialize>(payload: &T, secret: &str) -> Result<String, CoreError> {
    let now = chrono::Utc::now().timestamp();
    let claims = SignClaims {
        exp: now + PAYLOAD_TOKEN_TTL_SECS,
        iat: now,
        data: payload,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CoreError::Internal(format!("payload signing failed: {e}")))
}

/// Verify a payload token and extract the wrapped payload.
///
/// Rejects tokens with a bad signature, a missing `data` claim, or an
/// elapsed expiry.
pub fn verify_payload<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, CoreError> {
    let token_data = decode::<VerifyClaims<T>>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| CoreError::Unauthorized(format!("Invalid payload token: {e}")))?;
    Ok(token_data.claims.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        name: String,
        qty: i64,
    }

    #[test]
    fn test_round_trip() {
        let payload = Payload {
            name: "broiler".into(),
            qty: 42,
        };
        let token = sign_payload(&payload, "secret").unwrap();
        let decoded: Payload = verify_payload(&token, "secret").unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_payload(
            &Payload {
                name: "x".into(),
                qty: 1,
            },
            "secret-a",
        )
        .unwrap();
        let result: Result<Payload, _> = verify_payload(&token, "secret-b");
        assert!(matches!(result, Err(CoreError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Hand-build a token whose exp is in the past.
        let now = chrono::Utc::now().timestamp();
        #[derive(Serialize)]
        struct Expired<'a> {
            exp: i64,
            iat: i64,
            data: &'a Payload,
        }
        let claims = Expired {
            exp: now - 3600,
            iat: now - 7200,
            data: &Payload {
                name: "x".into(),
                qty: 1,
            },
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        let result: Result<Payload, _> = verify_payload(&token, "secret");
        assert!(matches!(result, Err(CoreError::Unauthorized(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let result: Result<Payload, _> = verify_payload("nonsense", "secret");
        assert!(result.is_err());
    }
}
