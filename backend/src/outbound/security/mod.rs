//! Credential hashing and bearer token adapters.
//!
//! - **argon2_hasher**: Argon2id implementation of the `PasswordHasher` port.
//! - **jwt_tokens**: HS256 JSON Web Token implementation of `TokenService`.
//! - **signing_secret**: environment-driven loading of the token signing
//!   secret with build-mode specific validation.

mod argon2_hasher;
pub mod fingerprint;
mod jwt_tokens;
pub mod signing_secret;

pub use argon2_hasher::{Argon2PasswordHasher, PasswordHashSettings};
pub use jwt_tokens::{DEFAULT_TOKEN_TTL_SECS, JwtTokenService};
pub use signing_secret::{BuildMode, SigningSecret, SigningSecretError, signing_secret_from_env};
