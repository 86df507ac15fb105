//! Builders wiring outbound adapters into domain services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use holocron::domain::ports::{
    FilmFeedSource, MovieRepository, MovieSyncCommand, PasswordHasher, TokenService,
    UserRepository,
};
use holocron::domain::{AuthorizationGuard, CatalogService, IdentityService, MovieSyncService};
use holocron::inbound::http::state::{HttpState, HttpStatePorts};
use holocron::outbound::persistence::{DieselMovieRepository, DieselUserRepository};
use holocron::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use holocron::outbound::swapi::SwapiFilmSource;

use super::ServerConfig;

/// Services shared between the HTTP workers and the sync schedule.
pub(crate) struct AppServices {
    pub(crate) http_state: web::Data<HttpState>,
    pub(crate) sync: Arc<dyn MovieSyncCommand>,
}

/// Build every adapter and service from the server configuration.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the hasher parameters are rejected or the
/// feed client cannot be constructed.
pub(crate) fn build_services(config: &ServerConfig) -> std::io::Result<AppServices> {
    let users: Arc<dyn UserRepository> =
        Arc::new(DieselUserRepository::new(config.db_pool.clone()));
    let movies = Arc::new(DieselMovieRepository::new(config.db_pool.clone()));

    let hasher: Arc<dyn PasswordHasher> = Arc::new(
        Argon2PasswordHasher::new(config.hashing)
            .map_err(|e| std::io::Error::other(format!("password hasher setup failed: {e}")))?,
    );
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let jwt = JwtTokenService::new(&config.token.secret, config.token.ttl, clock);
    info!(ttl_secs = jwt.ttl().num_seconds(), "token service ready");
    let tokens: Arc<dyn TokenService> = Arc::new(jwt);

    let swapi = SwapiFilmSource::new(config.feed.url.clone(), config.feed.timeout)
        .map_err(|e| std::io::Error::other(format!("feed client setup failed: {e}")))?;
    info!(endpoint = %swapi.endpoint(), "film feed configured");
    let feed: Arc<dyn FilmFeedSource> = Arc::new(swapi);

    let identity = Arc::new(IdentityService::new(
        Arc::clone(&users),
        hasher,
        Arc::clone(&tokens),
    ));
    let catalog = Arc::new(CatalogService::new(Arc::clone(&movies), config.catalog));
    let movie_store: Arc<dyn MovieRepository> = movies;
    let sync: Arc<dyn MovieSyncCommand> =
        Arc::new(MovieSyncService::new(feed, movie_store, config.feed.sync));

    let http_state = web::Data::new(HttpState::new(HttpStatePorts {
        login: identity.clone(),
        registration: identity,
        movies: catalog.clone(),
        movie_commands: catalog,
        sync: Arc::clone(&sync),
        authorizer: Arc::new(AuthorizationGuard::new(users)),
        tokens,
    }));

    Ok(AppServices { http_state, sync })
}
