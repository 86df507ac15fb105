//! Behaviour tests for the registration, login and authorization flow.
//!
//! The identity service runs with the real Argon2 hasher (at a low cost) and
//! the real JWT signer over the in-memory credential store. Token expiry is
//! driven by a mutable clock.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use holocron::domain::ports::{Authorizer, LoginService, RegistrationService, TokenService};
use holocron::domain::{
    AccessDecision, AuthorizationGuard, Error, ErrorCode, IdentityService, LoginCredentials,
    LoginOutcome, Registration, RoleName, RoleRequirement, UserId,
};
use holocron::outbound::security::{
    Argon2PasswordHasher, JwtTokenService, PasswordHashSettings, SigningSecret,
};
use holocron::test_support::{InMemoryUserRepository, MutableClock};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;

const ADMIN_ONLY: RoleRequirement = RoleRequirement::any_of(&[RoleName::Admin]);

#[derive(Clone)]
struct Harness {
    runtime: Arc<Runtime>,
    users: Arc<InMemoryUserRepository>,
    clock: Arc<MutableClock>,
    tokens: Arc<JwtTokenService>,
    identity: Arc<IdentityService>,
}

#[derive(Default, ScenarioState)]
struct IdentityWorld {
    harness: Slot<Harness>,
    accounts: Slot<BTreeMap<String, UserId>>,
    logins: Slot<Vec<Result<LoginOutcome, Error>>>,
    registration_error: Slot<Error>,
    decisions: Slot<BTreeMap<String, AccessDecision>>,
}

impl IdentityWorld {
    fn harness(&self) -> Harness {
        self.harness.get().expect("identity service should be set up")
    }

    fn account(&self, email: &str) -> UserId {
        self.accounts
            .get()
            .unwrap_or_default()
            .get(email)
            .cloned()
            .expect("account should be registered")
    }

    fn record_login(&self, result: Result<LoginOutcome, Error>) {
        let mut logins = self.logins.get().unwrap_or_default();
        logins.push(result);
        self.logins.set(logins);
    }

    fn last_login(&self) -> Result<LoginOutcome, Error> {
        self.logins
            .get()
            .and_then(|logins| logins.last().cloned())
            .expect("a login should have been attempted")
    }

    fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, Error> {
        let harness = self.harness();
        let credentials =
            LoginCredentials::try_from_parts(email, password).expect("valid login shape");
        harness
            .runtime
            .block_on(harness.identity.login(&credentials))
    }

    fn register(&self, email: &str, password: &str, role: &str) -> Result<UserId, Error> {
        let harness = self.harness();
        let registration =
            Registration::try_from_parts(email, password, "Rebel Operative", [role])
                .expect("valid registration shape");
        harness
            .runtime
            .block_on(harness.identity.register(&registration))
            .map(|user| user.id().clone())
    }
}

#[fixture]
fn world() -> IdentityWorld {
    IdentityWorld::default()
}

#[given("an identity service with real hashing and signing")]
fn an_identity_service_with_real_hashing_and_signing(world: &IdentityWorld) {
    let start = Utc
        .with_ymd_and_hms(2026, 5, 4, 9, 0, 0)
        .single()
        .expect("valid instant");
    let clock = Arc::new(MutableClock::new(start));
    let users = Arc::new(InMemoryUserRepository::default());
    let hasher = Argon2PasswordHasher::new(PasswordHashSettings {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("argon2 parameters");
    let tokens = Arc::new(JwtTokenService::new(
        &SigningSecret::new(vec![b's'; 32]),
        Duration::hours(2),
        clock.clone(),
    ));
    let identity = Arc::new(IdentityService::new(
        users.clone(),
        Arc::new(hasher),
        tokens.clone(),
    ));

    world.harness.set(Harness {
        runtime: Arc::new(Runtime::new().expect("create runtime")),
        users,
        clock,
        tokens,
        identity,
    });
}

#[given("a registered account \"{email}\" with password \"{password}\" and role {role}")]
fn a_registered_account(world: &IdentityWorld, email: String, password: String, role: String) {
    let id = world
        .register(&email, &password, &role)
        .expect("registration should succeed");
    let mut accounts = world.accounts.get().unwrap_or_default();
    accounts.insert(email, id);
    world.accounts.set(accounts);
}

#[when("\"{email}\" logs in with password \"{password}\"")]
fn account_logs_in(world: &IdentityWorld, email: String, password: String) {
    let result = world.login(&email, &password);
    world.record_login(result);
}

#[when("\"{email}\" registers again")]
fn account_registers_again(world: &IdentityWorld, email: String) {
    let error = world
        .register(&email, "AnotherPass1", "user")
        .expect_err("duplicate registration should fail");
    world.registration_error.set(error);
}

#[when("each account's token is checked against the admin requirement")]
fn each_accounts_token_is_checked(world: &IdentityWorld) {
    let harness = world.harness();
    let guard = AuthorizationGuard::new(harness.users.clone());
    let mut decisions = BTreeMap::new();
    for email in world.accounts.get().unwrap_or_default().keys() {
        let password = match email.as_str() {
            "mon@rebellion.org" => "Chandrila9",
            _ => "Alderaan77",
        };
        let outcome = world.login(email, password).expect("login should succeed");
        let subject = harness
            .tokens
            .validate(&outcome.token.token)
            .expect("fresh token should validate");
        let decision = harness
            .runtime
            .block_on(guard.authorize(Some(&subject), &ADMIN_ONLY))
            .expect("authorization should evaluate");
        decisions.insert(email.clone(), decision);
    }
    world.decisions.set(decisions);
}

#[when("the clock advances by {seconds} seconds")]
fn the_clock_advances(world: &IdentityWorld, seconds: i64) {
    world.harness().clock.advance(Duration::seconds(seconds));
}

#[then("login succeeds")]
fn login_succeeds(world: &IdentityWorld) {
    world.last_login().expect("login should succeed");
}

#[then("the issued token identifies \"{email}\"")]
fn the_issued_token_identifies(world: &IdentityWorld, email: String) {
    let outcome = world.last_login().expect("login should succeed");
    let subject = world
        .harness()
        .tokens
        .validate(&outcome.token.token)
        .expect("token should validate");
    assert_eq!(subject, world.account(&email));
    assert_eq!(outcome.user.id(), &subject);
}

#[then("the request fails with code conflict")]
fn the_request_fails_with_code_conflict(world: &IdentityWorld) {
    let error = world
        .registration_error
        .get()
        .expect("registration error should be recorded");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(world.harness().users.len(), 1);
}

#[then("both logins fail identically as unauthorized")]
fn both_logins_fail_identically(world: &IdentityWorld) {
    let errors: Vec<Error> = world
        .logins
        .get()
        .unwrap_or_default()
        .into_iter()
        .map(|result| result.expect_err("login should fail"))
        .collect();
    assert_eq!(errors.len(), 2);
    for error in &errors {
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
    assert_eq!(errors[0].message(), errors[1].message());
}

#[then("\"{email}\" is allowed")]
fn account_is_allowed(world: &IdentityWorld, email: String) {
    let decisions = world.decisions.get().expect("decisions should be recorded");
    assert_eq!(decisions.get(&email), Some(&AccessDecision::Allow));
}

#[then("\"{email}\" is denied")]
fn account_is_denied(world: &IdentityWorld, email: String) {
    let decisions = world.decisions.get().expect("decisions should be recorded");
    assert_eq!(decisions.get(&email), Some(&AccessDecision::Deny));
}

#[then("the issued token is rejected")]
fn the_issued_token_is_rejected(world: &IdentityWorld) {
    let outcome = world.last_login().expect("login should succeed");
    assert!(world.harness().tokens.validate(&outcome.token.token).is_err());
}

#[scenario(
    path = "tests/features/identity_flow.feature",
    name = "A registered user logs in and receives a token for themselves"
)]
fn a_registered_user_logs_in_and_receives_a_token_for_themselves(world: IdentityWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/identity_flow.feature",
    name = "Registering the same email twice is a conflict"
)]
fn registering_the_same_email_twice_is_a_conflict(world: IdentityWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/identity_flow.feature",
    name = "A wrong password and an unknown email fail the same way"
)]
fn a_wrong_password_and_an_unknown_email_fail_the_same_way(world: IdentityWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/identity_flow.feature",
    name = "Only administrators pass an admin requirement"
)]
fn only_administrators_pass_an_admin_requirement(world: IdentityWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/identity_flow.feature",
    name = "Tokens stop working once their window has passed"
)]
fn tokens_stop_working_once_their_window_has_passed(world: IdentityWorld) {
    drop(world);
}
