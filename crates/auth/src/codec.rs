//! Signed token encoding (HS256 JWT).
//!
//! The codec only proves integrity: it turns claims into a signed string and
//! back. Expiry is checked by the token service, not here.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Claims, SigningKey};

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed token")]
    MalformedToken,

    #[error("token signature does not match")]
    SignatureMismatch,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Encodes/decodes signed claims.
///
/// Implementations must be pure functions of their key and input.
pub trait ClaimsCodec: Send + Sync {
    fn encode(&self, claims: &Claims) -> Result<Token, CodecError>;

    /// Verify the signature and return the embedded claims, unvalidated.
    fn decode(&self, token: &str) -> Result<Claims, CodecError>;
}

/// HMAC-SHA256 JWT codec bound to a single process-wide key.
#[derive(Clone)]
pub struct Hs256Codec {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Codec {
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            header: Header::new(Algorithm::HS256),
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256Codec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Codec").finish_non_exhaustive()
    }
}

impl ClaimsCodec for Hs256Codec {
    fn encode(&self, claims: &Claims) -> Result<Token, CodecError> {
        jsonwebtoken::encode(&self.header, claims, &self.encoding)
            .map(Token)
            .map_err(|e| CodecError::Encoding(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<Claims, CodecError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    CodecError::SignatureMismatch
                }
                _ => CodecError::MalformedToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration};
    use proptest::prelude::*;

    use super::*;

    const KEY: &str = "test-signing-key-with-at-least-32-bytes!";
    const OTHER_KEY: &str = "another-signing-key-with-32-bytes-or-more";
    const B64URL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    fn codec(key: &str) -> Hs256Codec {
        Hs256Codec::new(&SigningKey::new(key).unwrap())
    }

    fn sample_claims() -> Claims {
        Claims::new(
            "alice",
            ["CUSTOMER"],
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            Duration::seconds(3600),
        )
        .unwrap()
    }

    #[test]
    fn encode_is_deterministic() {
        let codec = codec(KEY);
        let claims = sample_claims();
        assert_eq!(codec.encode(&claims).unwrap(), codec.encode(&claims).unwrap());
    }

    #[test]
    fn decode_does_not_check_expiry() {
        let codec = codec(KEY);
        let mut claims = sample_claims();
        claims.issued_at = DateTime::from_timestamp(10, 0).unwrap();
        claims.expires_at = DateTime::from_timestamp(20, 0).unwrap();
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(token.as_str()).unwrap(), claims);
    }

    #[test]
    fn foreign_key_is_a_signature_mismatch() {
        let token = codec(OTHER_KEY).encode(&sample_claims()).unwrap();
        assert_eq!(codec(KEY).decode(token.as_str()), Err(CodecError::SignatureMismatch));
    }

    #[test]
    fn foreign_algorithm_is_a_signature_mismatch() {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &sample_claims(),
            &EncodingKey::from_secret(KEY.as_bytes()),
        )
        .unwrap();
        assert_eq!(codec(KEY).decode(&token), Err(CodecError::SignatureMismatch));
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec(KEY);
        for raw in ["", "not-a-token", "a.b", "a.b.c", "....", "Bearer x.y.z"] {
            assert_eq!(codec.decode(raw), Err(CodecError::MalformedToken), "input {raw:?}");
        }
    }

    #[test]
    fn missing_claims_are_malformed() {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "alice", "iat": 1, "exp": 2 }),
            &EncodingKey::from_secret(KEY.as_bytes()),
        )
        .unwrap();
        assert_eq!(codec(KEY).decode(&token), Err(CodecError::MalformedToken));
    }

    fn arb_claims() -> impl Strategy<Value = Claims> {
        (
            "[a-z][a-z0-9_]{0,15}",
            prop::collection::vec("[A-Z_]{1,24}", 0..4),
            0i64..4_000_000_000i64,
            1i64..1_000_000i64,
        )
            .prop_map(|(sub, roles, iat, ttl)| Claims {
                sub,
                roles,
                issued_at: DateTime::from_timestamp(iat, 0).unwrap(),
                expires_at: DateTime::from_timestamp(iat + ttl, 0).unwrap(),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: decode(encode(C)) reconstructs every claim.
        #[test]
        fn round_trip_preserves_claims(claims in arb_claims()) {
            let codec = codec(KEY);
            let token = codec.encode(&claims).unwrap();
            prop_assert_eq!(codec.decode(token.as_str()).unwrap(), claims);
        }

        /// Property: replacing any single character of a token breaks decoding.
        #[test]
        fn single_character_tamper_is_detected(
            claims in arb_claims(),
            position in any::<prop::sample::Index>(),
            replacement in any::<prop::sample::Index>(),
        ) {
            let codec = codec(KEY);
            let token = codec.encode(&claims).unwrap().into_string();
            let mut bytes = token.into_bytes();
            let idx = position.index(bytes.len());

            let mut candidate = B64URL[replacement.index(B64URL.len())];
            if candidate == bytes[idx] {
                candidate = if candidate == b'A' { b'B' } else { b'A' };
            }
            bytes[idx] = candidate;

            let tampered = String::from_utf8(bytes).unwrap();
            prop_assert!(codec.decode(&tampered).is_err());
        }
    }
}
