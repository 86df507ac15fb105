//! Authentication primitives: login credentials, registration requests and
//! login outcomes.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::collections::BTreeSet;
use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, FullName, RoleName, User, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length.
pub const PASSWORD_MAX: usize = 50;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the identity service.
///
/// ## Invariants
/// - `email` is trimmed, lowercased and non-empty. It is not checked for
///   shape so a malformed address fails like any unknown account.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use holocron::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@Example.com", "Admin123").unwrap();
/// assert_eq!(creds.email(), "admin@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Lowercased email used for the credential lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures for a registration request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Email, full name or role failed its value constructor.
    #[error(transparent)]
    Field(#[from] UserValidationError),
    /// Password length is outside the accepted bounds.
    #[error("password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },
    /// Password lacks a required character class.
    #[error("password must have an uppercase letter, a lowercase letter and a number or symbol")]
    PasswordTooWeak,
    /// No roles were requested.
    #[error("at least one role is required")]
    NoRoles,
}

impl RegistrationValidationError {
    /// Request field the failure relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Field(
                UserValidationError::EmptyEmail | UserValidationError::InvalidEmail,
            ) => "email",
            Self::Field(
                UserValidationError::FullNameTooShort { .. }
                | UserValidationError::FullNameTooLong { .. },
            ) => "fullName",
            Self::Field(_) | Self::NoRoles => "roles",
            Self::PasswordLength { .. } | Self::PasswordTooWeak => "password",
        }
    }
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use holocron::domain::{Registration, RoleName};
///
/// let request = Registration::try_from_parts(
///     "Rey@Jakku.example",
///     "Scavenger1",
///     "Rey",
///     ["USER"],
/// )
/// .unwrap();
/// assert_eq!(request.email().as_ref(), "rey@jakku.example");
/// assert!(request.roles().contains(&RoleName::User));
/// ```
#[derive(Clone)]
pub struct Registration {
    email: Email,
    password: Zeroizing<String>,
    full_name: FullName,
    roles: BTreeSet<RoleName>,
}

impl Registration {
    /// Validate raw registration inputs.
    pub fn try_from_parts<I, S>(
        email: &str,
        password: &str,
        full_name: &str,
        roles: I,
    ) -> Result<Self, RegistrationValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let email = Email::new(email)?;
        check_password_policy(password)?;
        let full_name = FullName::new(full_name)?;
        let roles = roles
            .into_iter()
            .map(|name| name.as_ref().parse::<RoleName>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        if roles.is_empty() {
            return Err(RegistrationValidationError::NoRoles);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            full_name,
            roles,
        })
    }

    /// Normalised email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password, zeroised on drop.
    pub fn password(&self) -> &Zeroizing<String> {
        &self.password
    }

    /// Full name.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Requested role names.
    pub fn roles(&self) -> &BTreeSet<RoleName> {
        &self.roles
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

fn check_password_policy(password: &str) -> Result<(), RegistrationValidationError> {
    let length = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
        return Err(RegistrationValidationError::PasswordLength {
            min: PASSWORD_MIN,
            max: PASSWORD_MAX,
        });
    }
    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit_or_symbol = password.chars().any(|c| !c.is_alphabetic());
    if has_upper && has_lower && has_digit_or_symbol {
        Ok(())
    } else {
        Err(RegistrationValidationError::PasswordTooWeak)
    }
}

/// Successful login: the user's public profile and a bearer token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Authenticated user.
    pub user: User,
    /// Signed bearer token.
    pub token: IssuedToken,
}

/// Signed token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded token.
    pub token: String,
    /// Expiry instant embedded in the token.
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
