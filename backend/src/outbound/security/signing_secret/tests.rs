//! Unit tests for signing secret loading.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug)]
struct TempSecretFile {
    path: PathBuf,
}

impl TempSecretFile {
    fn new(contents: &[u8]) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("jwt-secret-{}", Uuid::new_v4()));
        std::fs::write(&path, contents)?;
        Ok(Self { path })
    }

    fn path_str(&self) -> &str {
        self.path
            .to_str()
            .expect("temporary path should be valid UTF-8")
    }
}

impl Drop for TempSecretFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn expect_error(result: Result<SigningSecret, SigningSecretError>, label: &str) -> SigningSecretError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn release_without_any_secret_is_rejected() {
    let env = mock_env(&[]);
    let err = expect_error(
        signing_secret_from_env(&env, BuildMode::Release),
        "expected missing secret to fail",
    );
    assert!(matches!(err, SigningSecretError::Missing));
}

#[rstest]
fn blank_values_count_as_missing() {
    let env = mock_env(&[(SECRET_FILE_ENV, "  "), (SECRET_ENV, "")]);
    let err = expect_error(
        signing_secret_from_env(&env, BuildMode::Release),
        "expected blank secret to fail",
    );
    assert!(matches!(err, SigningSecretError::Missing));
}

#[rstest]
fn debug_without_any_secret_uses_an_ephemeral_one() {
    let env = mock_env(&[]);
    let secret = signing_secret_from_env(&env, BuildMode::Debug).expect("debug fallback");

    assert_eq!(secret.source(), &SecretSource::Ephemeral);
    assert_eq!(secret.expose().len(), SECRET_MIN_LEN);
}

#[rstest]
fn file_takes_precedence_over_inline_secret() {
    let file = TempSecretFile::new(&[b'f'; SECRET_MIN_LEN]).expect("secret file");
    let inline = "i".repeat(SECRET_MIN_LEN);
    let env = mock_env(&[(SECRET_FILE_ENV, file.path_str()), (SECRET_ENV, &inline)]);

    let secret = signing_secret_from_env(&env, BuildMode::Release).expect("file secret");

    assert_eq!(secret.expose(), [b'f'; SECRET_MIN_LEN].as_slice());
    assert!(matches!(secret.source(), SecretSource::File(_)));
}

#[rstest]
fn trailing_newlines_in_secret_files_are_ignored() {
    let mut contents = vec![b'k'; SECRET_MIN_LEN];
    contents.extend_from_slice(b"\n\n");
    let file = TempSecretFile::new(&contents).expect("secret file");
    let env = mock_env(&[(SECRET_FILE_ENV, file.path_str())]);

    let secret = signing_secret_from_env(&env, BuildMode::Release).expect("file secret");

    assert_eq!(secret.expose().len(), SECRET_MIN_LEN);
}

#[rstest]
#[case(BuildMode::Release, false)]
#[case(BuildMode::Debug, true)]
fn short_secrets_fail_only_in_release(#[case] mode: BuildMode, #[case] accepted: bool) {
    let env = mock_env(&[(SECRET_ENV, "too-short")]);
    let result = signing_secret_from_env(&env, mode);

    if accepted {
        assert_eq!(result.expect("debug accepts").expose(), b"too-short");
    } else {
        let err = expect_error(result, "expected short secret to fail");
        assert!(matches!(
            err,
            SigningSecretError::TooShort {
                length: 9,
                min_len: SECRET_MIN_LEN
            }
        ));
    }
}

#[rstest]
fn release_unreadable_file_is_rejected() {
    let missing = std::env::temp_dir().join(format!("jwt-secret-missing-{}", Uuid::new_v4()));
    let missing = missing.to_string_lossy().into_owned();
    let env = mock_env(&[(SECRET_FILE_ENV, &missing)]);

    let err = expect_error(
        signing_secret_from_env(&env, BuildMode::Release),
        "expected unreadable file to fail",
    );
    assert!(matches!(err, SigningSecretError::Read { .. }));
}

#[rstest]
fn debug_output_never_contains_the_secret() {
    let secret = SigningSecret::new("super-secret-signing-material-0001");
    let rendered = format!("{secret:?}");

    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains(&secret.fingerprint()));
}
