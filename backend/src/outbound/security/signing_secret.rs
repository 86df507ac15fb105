//! Token signing secret loading and validation.
//!
//! The secret is read from the file named by `JWT_SECRET_FILE`, falling back
//! to the `JWT_SECRET` variable. Release builds require one of them and
//! enforce a minimum length; debug builds fall back to an ephemeral random
//! secret so local runs work without setup.

use std::fmt;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::fingerprint::secret_fingerprint;

/// Environment variable naming a file that holds the signing secret.
pub const SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";
/// Environment variable holding the signing secret inline.
pub const SECRET_ENV: &str = "JWT_SECRET";
/// Shortest secret accepted by release builds.
pub const SECRET_MIN_LEN: usize = 32;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing or short secrets with a warning.
    Debug,
    /// Release builds require an explicit secret of sufficient length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use holocron::outbound::security::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Where the loaded secret came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SecretSource {
    /// Read from a file.
    File(PathBuf),
    /// Read from the `JWT_SECRET` variable.
    Env,
    /// Generated at startup; tokens do not survive a restart.
    Ephemeral,
}

/// Symmetric signing secret. Wiped from memory on drop.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Zeroizing<Vec<u8>>,
    source: SecretSource,
}

impl SigningSecret {
    /// Wrap explicit secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes.into()),
            source: SecretSource::Env,
        }
    }

    fn ephemeral() -> Self {
        let mut bytes = vec![0_u8; SECRET_MIN_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self {
            bytes: Zeroizing::new(bytes),
            source: SecretSource::Ephemeral,
        }
    }

    /// Raw secret bytes.
    pub fn expose(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Origin of the secret.
    pub fn source(&self) -> &SecretSource {
        &self.source
    }

    /// Non-reversible fingerprint suitable for logs.
    pub fn fingerprint(&self) -> String {
        secret_fingerprint(self.expose())
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("source", &self.source)
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Errors raised while loading the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum SigningSecretError {
    /// Neither source is configured in a release build.
    #[error("missing signing secret: set JWT_SECRET_FILE or JWT_SECRET")]
    Missing,
    /// Reading the secret file failed.
    #[error("failed to read signing secret at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for a release build.
    #[error("signing secret too short: need >= {min_len} bytes, got {length}")]
    TooShort { length: usize, min_len: usize },
}

/// Load the signing secret from the environment.
///
/// # Examples
///
/// ```rust
/// use holocron::outbound::security::{BuildMode, signing_secret_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     _ => None,
/// });
///
/// let secret = signing_secret_from_env(&env, BuildMode::Release).unwrap();
/// assert_eq!(secret.expose().len(), 32);
/// ```
///
/// # Errors
///
/// Returns [`SigningSecretError`] when a release build has no usable secret
/// or the configured file cannot be read.
pub fn signing_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SigningSecret, SigningSecretError> {
    let secret = match non_blank(env, SECRET_FILE_ENV) {
        Some(path) => read_secret_file(PathBuf::from(path), mode)?,
        None => match non_blank(env, SECRET_ENV) {
            Some(value) => SigningSecret::new(value.trim_end().as_bytes()),
            None if mode.is_debug() => {
                warn!("no signing secret configured; using an ephemeral secret (dev only)");
                SigningSecret::ephemeral()
            }
            None => return Err(SigningSecretError::Missing),
        },
    };

    check_length(&secret, mode)?;
    info!(
        fingerprint = %secret.fingerprint(),
        source = ?secret.source(),
        "token signing secret loaded"
    );
    Ok(secret)
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn read_secret_file(path: PathBuf, mode: BuildMode) -> Result<SigningSecret, SigningSecretError> {
    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let end = bytes
                .iter()
                .rposition(|byte| !byte.is_ascii_whitespace())
                .map_or(0, |last| last + 1);
            Ok(SigningSecret {
                bytes: Zeroizing::new(bytes[..end].to_vec()),
                source: SecretSource::File(path),
            })
        }
        Err(error) if mode.is_debug() => {
            warn!(
                path = %path.display(),
                error = %error,
                "signing secret file unreadable; using an ephemeral secret (dev only)"
            );
            Ok(SigningSecret::ephemeral())
        }
        Err(error) => Err(SigningSecretError::Read {
            path,
            source: error,
        }),
    }
}

fn check_length(secret: &SigningSecret, mode: BuildMode) -> Result<(), SigningSecretError> {
    let length = secret.expose().len();
    if length >= SECRET_MIN_LEN {
        return Ok(());
    }
    if mode.is_debug() {
        warn!(length, min_len = SECRET_MIN_LEN, "signing secret is shorter than recommended");
        return Ok(());
    }
    Err(SigningSecretError::TooShort {
        length,
        min_len: SECRET_MIN_LEN,
    })
}

#[cfg(test)]
mod tests;
