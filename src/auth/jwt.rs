/// JWT encoding and decoding over an asymmetric key pair.
///
/// Key material is loaded from PEM files once at startup, wrapped in
/// `JwtKeys`, and shared read-only across all requests. Decoding pins the
/// configured algorithm so a token signed with any other algorithm is
/// rejected outright.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// Process-wide signing and verification keys
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
}

impl JwtKeys {
    /// Build keys from PEM-encoded key material.
    ///
    /// # Errors
    /// Returns error if either PEM is malformed or the algorithm name is
    /// not one jsonwebtoken knows.
    pub fn from_pem(
        private_key_pem: &[u8],
        public_key_pem: &[u8],
        algorithm: &str,
    ) -> Result<Self, AppError> {
        let algorithm: Algorithm = algorithm
            .parse()
            .map_err(|_| AppError::Internal(format!("Unknown JWT algorithm: {}", algorithm)))?;

        let encoding = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| AppError::Internal(format!("Invalid private key PEM: {}", e)))?;
        let decoding = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| AppError::Internal(format!("Invalid public key PEM: {}", e)))?;

        Ok(Self {
            encoding,
            decoding,
            algorithm,
        })
    }

    /// Read the key pair from the configured PEM files.
    ///
    /// Called once from `main`; the result is immutable for the process
    /// lifetime.
    pub fn load(settings: &JwtSettings) -> Result<Self, AppError> {
        let private_key_pem = std::fs::read(&settings.private_key_file).map_err(|e| {
            AppError::Internal(format!(
                "Failed to read private key {}: {}",
                settings.private_key_file, e
            ))
        })?;
        let public_key_pem = std::fs::read(&settings.public_key_file).map_err(|e| {
            AppError::Internal(format!(
                "Failed to read public key {}: {}",
                settings.public_key_file, e
            ))
        })?;

        Self::from_pem(&private_key_pem, &public_key_pem, &settings.algorithm)
    }
}

/// Sign claims into a three-segment token string.
///
/// # Errors
/// Returns error if signing fails (key/algorithm mismatch)
pub fn encode_jwt(claims: &Claims, keys: &JwtKeys) -> Result<String, AppError> {
    encode(&Header::new(keys.algorithm), claims, &keys.encoding)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify a token's signature and expiry and extract its claims.
///
/// The validation accepts only the configured algorithm; a token whose
/// header names any other algorithm fails even if its signature would
/// otherwise verify.
///
/// # Errors
/// Returns `InvalidToken` if the token is malformed, expired, or signed
/// with the wrong key or algorithm. The root cause is logged, never
/// returned to the client.
pub fn decode_jwt(token: &str, keys: &JwtKeys) -> Result<Claims, AppError> {
    let mut validation = Validation::new(keys.algorithm);
    // No grace window: current time >= exp is expired
    validation.leeway = 0;

    decode::<Claims>(token, &keys.decoding, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!("JWT validation error: {}", e);
            AppError::Auth(AuthError::InvalidToken)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::TokenType;
    use crate::auth::credentials::AuthenticatedUser;
    use chrono::Duration;
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
    use rsa::{RsaPrivateKey, RsaPublicKey};
    use uuid::Uuid;

    lazy_static::lazy_static! {
        static ref TEST_KEYS: (String, String) = generate_test_pem();
    }

    fn generate_test_pem() -> (String, String) {
        let mut rng = rand::thread_rng();
        let private_key =
            RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate private key");
        let public_key = RsaPublicKey::from(&private_key);

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .expect("Failed to encode private key")
            .to_string();
        let public_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .expect("Failed to encode public key");

        (private_pem, public_pem)
    }

    fn test_keys() -> JwtKeys {
        JwtKeys::from_pem(TEST_KEYS.0.as_bytes(), TEST_KEYS.1.as_bytes(), "RS256")
            .expect("Failed to build test keys")
    }

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            login: "alice".to_string(),
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let keys = test_keys();
        let user = test_user();
        let claims = Claims::new(TokenType::Access, &user, Duration::minutes(30));

        let token = encode_jwt(&claims, &keys).expect("Failed to encode token");
        assert_eq!(token.split('.').count(), 3);

        let decoded = decode_jwt(&token, &keys).expect("Failed to decode token");
        assert_eq!(decoded.token_type, TokenType::Access);
        assert_eq!(decoded.sub, user.user_id.to_string());
        assert_eq!(decoded.user_id, claims.user_id);
        assert_eq!(decoded.login, claims.login);
        assert_eq!(decoded.iat, claims.iat);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = test_keys();
        let claims = Claims::new(TokenType::Access, &test_user(), Duration::minutes(-5));

        let token = encode_jwt(&claims, &keys).expect("Failed to encode token");
        assert!(decode_jwt(&token, &keys).is_err());
    }

    #[test]
    fn recently_expired_token_is_rejected() {
        // A token whose exp passed seconds ago must already be dead;
        // there is no grace window.
        let keys = test_keys();
        let claims = Claims::new(TokenType::Access, &test_user(), Duration::seconds(-30));

        let token = encode_jwt(&claims, &keys).expect("Failed to encode token");
        assert!(decode_jwt(&token, &keys).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = test_keys();
        let claims = Claims::new(TokenType::Access, &test_user(), Duration::minutes(30));

        let token = encode_jwt(&claims, &keys).expect("Failed to encode token");
        let tampered = format!("{}X", token);
        assert!(decode_jwt(&tampered, &keys).is_err());
    }

    #[test]
    fn malformed_token_is_rejected() {
        let keys = test_keys();
        assert!(decode_jwt("not.a.token", &keys).is_err());
        assert!(decode_jwt("", &keys).is_err());
    }

    #[test]
    fn foreign_algorithm_is_rejected() {
        // A token signed with HS256 must fail against an RS256-pinned
        // validation, even if an attacker picked the secret well.
        let keys = test_keys();
        let claims = Claims::new(TokenType::Access, &test_user(), Duration::minutes(30));

        let hs_token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_KEYS.1.as_bytes()),
        )
        .expect("Failed to encode HS256 token");

        assert!(decode_jwt(&hs_token, &keys).is_err());
    }

    #[test]
    fn wrong_key_is_rejected() {
        let keys = test_keys();
        let (other_private, other_public) = generate_test_pem();
        let other_keys =
            JwtKeys::from_pem(other_private.as_bytes(), other_public.as_bytes(), "RS256")
                .expect("Failed to build keys");

        let claims = Claims::new(TokenType::Access, &test_user(), Duration::minutes(30));
        let token = encode_jwt(&claims, &other_keys).expect("Failed to encode token");

        assert!(decode_jwt(&token, &keys).is_err());
    }

    #[test]
    fn unknown_algorithm_name_fails_key_construction() {
        let result = JwtKeys::from_pem(TEST_KEYS.0.as_bytes(), TEST_KEYS.1.as_bytes(), "XS256");
        assert!(result.is_err());
    }
}
