//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod auth;
pub mod error;
pub mod health;
pub mod movies;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

use crate::domain::Error;

/// JSON body extractor configuration turning parse failures into
/// `invalid_request` errors instead of Actix's plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| Error::invalid_request(format!("invalid JSON body: {err}")).into())
}

/// Query string extractor configuration with the same error shape.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| Error::invalid_request(format!("invalid query: {err}")).into())
}

/// Register every API route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .configure(movies::configure);
}
