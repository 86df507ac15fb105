//! Signing secret fingerprinting for operational visibility.
//!
//! Operators can confirm which secret a deployment is using by comparing the
//! logged fingerprint, without the secret itself ever reaching the logs.

use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 fingerprint of `secret` as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use holocron::outbound::security::fingerprint::secret_fingerprint;
///
/// let fp = secret_fingerprint(b"correct horse battery staple");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fingerprint_is_deterministic_lowercase_hex() {
        let first = secret_fingerprint(&[b'a'; 32]);
        let second = secret_fingerprint(&[b'a'; 32]);

        assert_eq!(first, second);
        assert_eq!(first.len(), FINGERPRINT_BYTES * 2);
        assert_eq!(first, first.to_lowercase());
    }

    #[rstest]
    fn different_secrets_produce_different_fingerprints() {
        assert_ne!(secret_fingerprint(&[b'a'; 32]), secret_fingerprint(&[b'b'; 32]));
    }

    #[rstest]
    fn known_vector() {
        // SHA-256("abc") = ba7816bf8f01cfea414140de5dae2223...
        assert_eq!(secret_fingerprint(b"abc"), "ba7816bf8f01cfea");
    }
}
