//! Argon2id password hashing adapter.
//!
//! Digests are stored as PHC strings, so verification always uses the
//! parameters embedded in the digest rather than the current settings. Raising
//! the cost therefore only affects new registrations.

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use rand::RngCore;

use crate::domain::PasswordDigest;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

const SALT_BYTES: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashSettings {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for PasswordHashSettings {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Argon2id implementation of [`PasswordHasher`].
///
/// # Examples
/// ```
/// use holocron::domain::ports::PasswordHasher;
/// use holocron::outbound::security::{Argon2PasswordHasher, PasswordHashSettings};
///
/// let hasher = Argon2PasswordHasher::new(PasswordHashSettings {
///     memory_kib: 1024,
///     iterations: 1,
///     parallelism: 1,
/// })
/// .unwrap();
/// let digest = hasher.hash("Hunter22").unwrap();
/// assert!(hasher.verify("Hunter22", &digest));
/// ```
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Build a hasher with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hashing`] when Argon2 rejects the
    /// parameters.
    pub fn new(settings: PasswordHashSettings) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|err| PasswordHashError::hashing(format!("invalid argon2 parameters: {err}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordDigest, PasswordHashError> {
        let mut salt_bytes = [0_u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        let phc = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        Ok(PasswordDigest::new(phc.to_string()))
    }

    fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool {
        let Ok(parsed) = PasswordHash::new(digest.as_str()) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
