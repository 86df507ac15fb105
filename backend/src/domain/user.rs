//! User and role data model.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    FullNameTooShort { min: usize },
    FullNameTooLong { max: usize },
    UnknownRole { name: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
            Self::FullNameTooShort { min } => {
                write!(f, "full name must be at least {min} characters")
            }
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
            Self::UnknownRole { name } => write!(f, "invalid role: {name}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value, value.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Case-insensitive email address, stored trimmed and lowercased.
///
/// # Examples
/// ```
/// use holocron::domain::Email;
///
/// let email = Email::new("  Leia@Alderaan.example ").unwrap();
/// assert_eq!(email.as_ref(), "leia@alderaan.example");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Normalise and validate an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = email.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@');
        if local.is_empty() || !domain_ok || normalized.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a full name.
pub const FULL_NAME_MIN: usize = 2;
/// Maximum allowed length for a full name.
pub const FULL_NAME_MAX: usize = 50;

/// Human readable name of the account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a [`FullName`], trimming surrounding whitespace.
    pub fn new(full_name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = full_name.as_ref().trim();
        let length = trimmed.chars().count();
        if length < FULL_NAME_MIN {
            return Err(UserValidationError::FullNameTooShort { min: FULL_NAME_MIN });
        }
        if length > FULL_NAME_MAX {
            return Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Closed set of role names understood by the authorization guard.
///
/// Parsing is case-insensitive; the wire and storage form is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    /// Catalog administrators.
    Admin,
    /// Regular registered users.
    User,
}

impl RoleName {
    /// Storage representation of the role name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(UserValidationError::UnknownRole { name: s.to_owned() }),
        }
    }
}

/// Persisted role reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    id: Uuid,
    name: RoleName,
}

impl Role {
    /// Build a role reference from its stored parts.
    pub fn new(id: Uuid, name: RoleName) -> Self {
        Self { id, name }
    }

    /// Role row identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Role name.
    pub fn name(&self) -> RoleName {
        self.name
    }
}

/// Encoded password hash (PHC string). Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an encoded hash produced by a password hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded hash.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Registered account without credential material.
///
/// ## Invariants
/// - `email` is lowercase.
/// - `roles` holds each role at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    full_name: FullName,
    roles: BTreeSet<RoleName>,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(
        id: UserId,
        email: Email,
        full_name: FullName,
        roles: impl IntoIterator<Item = RoleName>,
    ) -> Self {
        Self {
            id,
            email,
            full_name,
            roles: roles.into_iter().collect(),
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Full name.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Assigned role names.
    pub fn roles(&self) -> &BTreeSet<RoleName> {
        &self.roles
    }

    /// Whether the user holds at least one of `required`.
    pub fn has_any_role(&self, required: &BTreeSet<RoleName>) -> bool {
        !self.roles.is_disjoint(required)
    }
}

/// A user together with the stored password digest, used only for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// Account profile.
    pub user: User,
    /// Stored password hash.
    pub digest: PasswordDigest,
}

/// Insert payload for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Identifier assigned by the service.
    pub id: UserId,
    /// Normalised email.
    pub email: Email,
    /// Full name.
    pub full_name: FullName,
    /// Password hash.
    pub digest: PasswordDigest,
    /// Resolved role references.
    pub roles: Vec<Role>,
}
