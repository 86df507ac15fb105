//! Bearer token authentication for HTTP handlers.
//!
//! [`Authenticated`] is an extractor: a handler that takes it only runs once
//! the `Authorization: Bearer <token>` header has been validated. Missing,
//! malformed and expired tokens all fail with the same 401 body.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, RoleRequirement, UserId};

use super::ApiResult;
use super::state::HttpState;

const BEARER: &str = "bearer";

fn unauthenticated() -> Error {
    Error::unauthorized("invalid or expired token")
}

/// Principal resolved from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(UserId);

impl Authenticated {
    /// Subject of the presented token.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    /// Run the authorization guard for this principal.
    ///
    /// # Errors
    ///
    /// Returns a forbidden error when the caller's current roles do not
    /// intersect `requirement`.
    pub async fn require(&self, state: &HttpState, requirement: &RoleRequirement) -> ApiResult<()> {
        state.authorizer.enforce(Some(&self.0), requirement).await
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(unauthenticated)?
        .to_str()
        .map_err(|_| unauthenticated())?;
    let (scheme, token) = value.trim().split_once(' ').ok_or_else(unauthenticated)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER) || token.is_empty() {
        return Err(unauthenticated());
    }
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state not configured"))?;
    let token = bearer_token(req.headers())?;
    let user_id = state.tokens.validate(token).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        unauthenticated()
    })?;
    Ok(Authenticated(user_id))
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockTokenService, TokenError};
    use crate::inbound::http::test_utils::{StubAuthorizer, state_with};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;

    const VALID: &str = "valid-token";

    fn token_service(subject: UserId) -> MockTokenService {
        let mut tokens = MockTokenService::new();
        tokens.expect_validate().returning(move |token| {
            if token == VALID {
                Ok(subject.clone())
            } else {
                Err(TokenError::invalid())
            }
        });
        tokens
    }

    async fn call_with(header: Option<&str>) -> (StatusCode, String) {
        let subject = UserId::random();
        let state = state_with(|ports| {
            ports.tokens = std::sync::Arc::new(token_service(subject.clone()));
            ports.authorizer = std::sync::Arc::new(StubAuthorizer::allow_all());
        });
        let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
            "/whoami",
            web::get().to(|principal: Authenticated| async move {
                HttpResponse::Ok().body(principal.user_id().to_string())
            }),
        ))
        .await;

        let mut request = test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).expect("utf8 body");
        if status.is_success() {
            assert_eq!(body, subject.to_string());
        }
        (status, body)
    }

    #[rstest]
    #[case(Some("Bearer valid-token"))]
    #[case(Some("bearer   valid-token "))]
    #[actix_web::test]
    async fn valid_bearer_tokens_resolve_the_subject(#[case] header: Option<&str>) {
        let (status, _) = call_with(header).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer "))]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("Bearer expired-token"))]
    #[actix_web::test]
    async fn missing_or_invalid_tokens_are_unauthorized(#[case] header: Option<&str>) {
        let (status, body) = call_with(header).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("invalid or expired token"));
    }
}
