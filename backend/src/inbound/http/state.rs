//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! driving ports, so handler tests can swap in test doubles without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    Authorizer, LoginService, MovieCommand, MovieQuery, MovieSyncCommand, RegistrationService,
    TokenService,
};

/// Parameter object bundling every port the HTTP handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub movies: Arc<dyn MovieQuery>,
    pub movie_commands: Arc<dyn MovieCommand>,
    pub sync: Arc<dyn MovieSyncCommand>,
    pub authorizer: Arc<dyn Authorizer>,
    pub tokens: Arc<dyn TokenService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub movies: Arc<dyn MovieQuery>,
    pub movie_commands: Arc<dyn MovieCommand>,
    pub sync: Arc<dyn MovieSyncCommand>,
    pub authorizer: Arc<dyn Authorizer>,
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            registration,
            movies,
            movie_commands,
            sync,
            authorizer,
            tokens,
        } = ports;
        Self {
            login,
            registration,
            movies,
            movie_commands,
            sync,
            authorizer,
            tokens,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
