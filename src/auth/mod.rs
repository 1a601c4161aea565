/// Authentication module
///
/// JWT issuance and validation, password hashing, credential
/// verification, and issued-token persistence.

mod claims;
mod credentials;
mod jwt;
mod password;
mod token_factory;
mod token_store;

pub use claims::Claims;
pub use claims::TokenType;
pub use credentials::authenticate;
pub use credentials::AuthenticatedUser;
pub use jwt::decode_jwt;
pub use jwt::encode_jwt;
pub use jwt::JwtKeys;
pub use password::hash_password;
pub use password::verify_password;
pub use token_factory::create_access_token;
pub use token_factory::create_jwt;
pub use token_factory::create_refresh_token;
pub use token_store::save_token;
pub use token_store::StoredToken;
