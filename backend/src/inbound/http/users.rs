//! Identity API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"rey@jakku.example","password":"Scavenger1","fullName":"Rey","roles":["user"]}
//! POST /api/v1/auth/login {"email":"rey@jakku.example","password":"Scavenger1"}
//! ```

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{LoginCredentials, LoginOutcome, Registration, RoleName, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_login_validation_error, map_registration_validation_error,
};

/// Registration request body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public account profile. Never carries the password hash.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<RoleName>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            full_name: user.full_name().to_string(),
            roles: user.roles().iter().copied().collect(),
        }
    }
}

/// Successful login payload.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            user: UserResponse::from(&outcome.user),
            access_token: outcome.token.token,
            token_type: "Bearer".to_owned(),
            expires_at: outcome.token.expires_at,
        }
    }
}

/// Create an account. Returns the profile without issuing a token.
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        full_name,
        roles,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&email, &password, &full_name, &roles)
        .map_err(map_registration_validation_error)?;
    let user = state.registration.register(&registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for a bearer token.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_login_validation_error)?;
    let outcome = state.login.login(&credentials).await?;
    Ok(web::Json(LoginResponse::from(outcome)))
}

#[cfg(test)]
mod tests;
