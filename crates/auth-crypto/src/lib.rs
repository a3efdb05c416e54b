pub mod hashing;
pub mod jwt;
pub mod keys;

pub use hashing::PasswordHasher;
pub use jwt::{JwtConfig, JwtError, JwtService, TokenClaims, TokenType};
pub use keys::{KeyError, KeyManager};
