//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use holocron::domain::{CatalogSettings, MovieSyncConfig};
use holocron::outbound::persistence::DbPool;
use holocron::outbound::security::{PasswordHashSettings, SigningSecret};
use holocron::settings::{AppSettings, SettingsError};
use url::Url;

/// Token signing parameters.
pub struct TokenConfig {
    pub(crate) secret: SigningSecret,
    pub(crate) ttl: chrono::Duration,
}

/// Film feed and schedule parameters.
pub struct FeedConfig {
    pub(crate) url: Url,
    pub(crate) timeout: Duration,
    pub(crate) sync: MovieSyncConfig,
    pub(crate) interval: Duration,
}

/// Everything needed to build adapters, services and the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) token: TokenConfig,
    pub(crate) hashing: PasswordHashSettings,
    pub(crate) catalog: CatalogSettings,
    pub(crate) feed: FeedConfig,
}

impl ServerConfig {
    /// Derive the server configuration from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a value is present but unusable, such
    /// as an out-of-range page size, token TTL or sync interval.
    pub fn from_settings(
        settings: &AppSettings,
        db_pool: DbPool,
        secret: SigningSecret,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr(),
            db_pool,
            token: TokenConfig {
                secret,
                ttl: settings.token_ttl()?,
            },
            hashing: settings.hash_settings(),
            catalog: settings.catalog_settings()?,
            feed: FeedConfig {
                url: settings.feed_url()?,
                timeout: settings.feed_timeout(),
                sync: settings.sync_config()?,
                interval: settings.sync_interval()?,
            },
        })
    }
}
