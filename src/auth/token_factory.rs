/// Typed token construction.
///
/// Builds access and refresh claim payloads for an authenticated user and
/// delegates signing to the codec. Expiry windows come from policy:
/// minutes for access tokens, days for refresh tokens, unless the caller
/// supplies an explicit override.

use chrono::Duration;

use crate::auth::claims::{Claims, TokenType};
use crate::auth::credentials::AuthenticatedUser;
use crate::auth::jwt::{encode_jwt, JwtKeys};
use crate::configuration::JwtSettings;
use crate::error::AppError;

/// Sign a token of the given type for a user.
///
/// `expire_override` replaces the policy window when present.
///
/// # Errors
/// Returns error if signing fails
pub fn create_jwt(
    token_type: TokenType,
    user: &AuthenticatedUser,
    keys: &JwtKeys,
    settings: &JwtSettings,
    expire_override: Option<Duration>,
) -> Result<String, AppError> {
    let window = expire_override.unwrap_or_else(|| match token_type {
        TokenType::Access => Duration::minutes(settings.access_token_expire_minutes),
        TokenType::Refresh => Duration::days(settings.refresh_token_expire_days),
    });

    let claims = Claims::new(token_type, user, window);
    encode_jwt(&claims, keys)
}

/// Short-lived access token carrying `sub`, `user_id`, and `login`.
pub fn create_access_token(
    user: &AuthenticatedUser,
    keys: &JwtKeys,
    settings: &JwtSettings,
) -> Result<String, AppError> {
    create_jwt(TokenType::Access, user, keys, settings, None)
}

/// Long-lived refresh token carrying `sub` and `user_id` only.
pub fn create_refresh_token(
    user: &AuthenticatedUser,
    keys: &JwtKeys,
    settings: &JwtSettings,
) -> Result<String, AppError> {
    create_jwt(TokenType::Refresh, user, keys, settings, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::decode_jwt;
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
    use rsa::{RsaPrivateKey, RsaPublicKey};
    use uuid::Uuid;

    lazy_static::lazy_static! {
        static ref TEST_KEYS: JwtKeys = {
            let mut rng = rand::thread_rng();
            let private_key =
                RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate private key");
            let public_key = RsaPublicKey::from(&private_key);
            let private_pem = private_key
                .to_pkcs8_pem(LineEnding::LF)
                .expect("Failed to encode private key");
            let public_pem = public_key
                .to_public_key_pem(LineEnding::LF)
                .expect("Failed to encode public key");
            JwtKeys::from_pem(private_pem.as_bytes(), public_pem.as_bytes(), "RS256")
                .expect("Failed to build test keys")
        };
    }

    fn test_settings() -> JwtSettings {
        JwtSettings {
            algorithm: "RS256".to_string(),
            private_key_file: "unused".to_string(),
            public_key_file: "unused".to_string(),
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 14,
        }
    }

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            login: "alice".to_string(),
        }
    }

    #[test]
    fn access_token_has_access_type_and_login() {
        let settings = test_settings();
        let user = test_user();

        let token = create_access_token(&user, &TEST_KEYS, &settings)
            .expect("Failed to create access token");
        let claims = decode_jwt(&token, &TEST_KEYS).expect("Failed to decode token");

        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.login.as_deref(), Some("alice"));
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn refresh_token_has_refresh_type_and_day_horizon() {
        let settings = test_settings();

        let token = create_refresh_token(&test_user(), &TEST_KEYS, &settings)
            .expect("Failed to create refresh token");
        let claims = decode_jwt(&token, &TEST_KEYS).expect("Failed to decode token");

        assert_eq!(claims.token_type, TokenType::Refresh);
        assert!(claims.login.is_none());
        assert_eq!(claims.exp - claims.iat, 14 * 24 * 60 * 60);
    }

    #[test]
    fn same_login_event_same_user_different_horizons() {
        let settings = test_settings();
        let user = test_user();

        let access = create_access_token(&user, &TEST_KEYS, &settings).unwrap();
        let refresh = create_refresh_token(&user, &TEST_KEYS, &settings).unwrap();

        let access_claims = decode_jwt(&access, &TEST_KEYS).unwrap();
        let refresh_claims = decode_jwt(&refresh, &TEST_KEYS).unwrap();

        assert_eq!(access_claims.user_id, refresh_claims.user_id);
        assert_ne!(access_claims.token_type, refresh_claims.token_type);
        assert!(refresh_claims.exp > access_claims.exp);
    }

    #[test]
    fn explicit_override_replaces_policy_window() {
        let settings = test_settings();

        let token = create_jwt(
            TokenType::Access,
            &test_user(),
            &TEST_KEYS,
            &settings,
            Some(Duration::minutes(5)),
        )
        .expect("Failed to create token");
        let claims = decode_jwt(&token, &TEST_KEYS).expect("Failed to decode token");

        assert_eq!(claims.exp - claims.iat, 5 * 60);
    }
}
