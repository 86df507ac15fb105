//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    Authorizer, MockLoginService, MockMovieCommand, MockMovieQuery, MockMovieSyncCommand,
    MockRegistrationService, MockTokenService, TokenError, UserRepository,
};
use crate::domain::{
    AccessDecision, AuthorizationGuard, Email, Error, FullName, NewUser, PasswordDigest,
    RoleName, RoleRequirement, UserId,
};
use crate::test_support::InMemoryUserRepository;

use super::state::{HttpState, HttpStatePorts};

/// Bearer token resolving to the seeded administrator.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Bearer token resolving to the seeded regular user.
pub const MEMBER_TOKEN: &str = "member-token";

/// Build handler state from unconfigured mocks, letting `configure` replace
/// the ports a test exercises. Unconfigured mocks panic when called.
pub fn state_with(configure: impl FnOnce(&mut HttpStatePorts)) -> HttpState {
    let mut ports = HttpStatePorts {
        login: Arc::new(MockLoginService::new()),
        registration: Arc::new(MockRegistrationService::new()),
        movies: Arc::new(MockMovieQuery::new()),
        movie_commands: Arc::new(MockMovieCommand::new()),
        sync: Arc::new(MockMovieSyncCommand::new()),
        authorizer: Arc::new(StubAuthorizer::deny_all()),
        tokens: Arc::new(MockTokenService::new()),
    };
    configure(&mut ports);
    HttpState::new(ports)
}

/// Authorizer returning a fixed decision for restricted requirements.
pub struct StubAuthorizer(AccessDecision);

impl StubAuthorizer {
    pub fn allow_all() -> Self {
        Self(AccessDecision::Allow)
    }

    pub fn deny_all() -> Self {
        Self(AccessDecision::Deny)
    }
}

#[async_trait]
impl Authorizer for StubAuthorizer {
    async fn authorize(
        &self,
        _subject: Option<&UserId>,
        requirement: &RoleRequirement,
    ) -> Result<AccessDecision, Error> {
        if requirement.is_unrestricted() {
            Ok(AccessDecision::Allow)
        } else {
            Ok(self.0)
        }
    }
}

/// An administrator and a regular user stored in an in-memory repository.
pub struct Callers {
    pub admin: UserId,
    pub member: UserId,
    pub users: Arc<InMemoryUserRepository>,
}

impl Callers {
    /// Seed one account per role.
    pub async fn seed() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let admin = insert(&users, "admin@holocron.example", RoleName::Admin).await;
        let member = insert(&users, "member@holocron.example", RoleName::User).await;
        Self {
            admin,
            member,
            users,
        }
    }

    /// Token service resolving [`ADMIN_TOKEN`] and [`MEMBER_TOKEN`].
    pub fn tokens(&self) -> MockTokenService {
        let admin = self.admin.clone();
        let member = self.member.clone();
        let mut tokens = MockTokenService::new();
        tokens.expect_validate().returning(move |token| match token {
            ADMIN_TOKEN => Ok(admin.clone()),
            MEMBER_TOKEN => Ok(member.clone()),
            _ => Err(TokenError::invalid()),
        });
        tokens
    }

    /// Real guard over the seeded repository.
    pub fn guard(&self) -> AuthorizationGuard {
        AuthorizationGuard::new(self.users.clone())
    }

    /// Install the seeded tokens and guard into `ports`.
    pub fn install(&self, ports: &mut HttpStatePorts) {
        ports.tokens = Arc::new(self.tokens());
        ports.authorizer = Arc::new(self.guard());
    }
}

async fn insert(users: &InMemoryUserRepository, email: &str, role: RoleName) -> UserId {
    let role = users
        .find_role_by_name(role)
        .await
        .expect("role lookup")
        .expect("seeded role");
    let id = UserId::random();
    users
        .insert(&NewUser {
            id: id.clone(),
            email: Email::new(email).expect("email"),
            full_name: FullName::new("Holocron Tester").expect("name"),
            digest: PasswordDigest::new("$argon2id$unused"),
            roles: vec![role],
        })
        .await
        .expect("insert");
    id
}
