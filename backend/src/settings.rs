//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags and `HOLOCRON_*` environment variables. Unset
//! optional values fall back to the defaults below; the database URL has no
//! default and must be provided.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{
    CatalogSettings, DEFAULT_PAGE_SIZE, ItemFailurePolicy, MAX_PAGE_SIZE, MovieSyncConfig,
    ParseItemFailurePolicyError,
};
use crate::outbound::security::{DEFAULT_TOKEN_TTL_SECS, PasswordHashSettings};
use crate::outbound::swapi::DEFAULT_FEED_URL;

const DEFAULT_PORT: u16 = 3000;

/// Longest accepted token lifetime: 30 days.
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Longest accepted sync interval: 365 days.
pub const MAX_SYNC_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// Errors raised when settings are present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `HOLOCRON_DATABASE_URL` was not provided.
    #[error("missing database URL: set HOLOCRON_DATABASE_URL or --database-url")]
    MissingDatabaseUrl,
    /// The feed URL does not parse.
    #[error("invalid feed URL {value}: {source}")]
    InvalidFeedUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// The item failure policy is not a known name.
    #[error(transparent)]
    InvalidFailurePolicy(#[from] ParseItemFailurePolicyError),
    /// The default page size is outside `1..=MAX_PAGE_SIZE`.
    #[error("invalid default page size {value}: expected 1 to {MAX_PAGE_SIZE}")]
    InvalidPageSize { value: u32 },
    /// The token lifetime is not positive or exceeds the accepted maximum.
    #[error("invalid token TTL {value}s: expected 1 to {MAX_TOKEN_TTL_SECS} seconds")]
    InvalidTokenTtl { value: i64 },
    /// The sync interval exceeds the accepted maximum.
    #[error("invalid sync interval {value}s: expected 0 to {MAX_SYNC_INTERVAL_SECS} seconds")]
    InvalidSyncInterval { value: u64 },
}

/// Runtime configuration for the catalog server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOLOCRON")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Page size used when a listing does not name one.
    #[ortho_config(default = 10)]
    pub default_page_size: u32,
    /// Bearer token lifetime in seconds.
    #[ortho_config(default = 7200)]
    pub token_ttl_secs: i64,
    /// Argon2 memory cost in KiB.
    pub hash_memory_kib: Option<u32>,
    /// Argon2 pass count.
    pub hash_iterations: Option<u32>,
    /// Argon2 lanes.
    pub hash_parallelism: Option<u32>,
    /// Films collection endpoint.
    pub feed_url: Option<String>,
    /// Feed request timeout in seconds.
    #[ortho_config(default = 10)]
    pub feed_timeout_secs: u64,
    /// Seconds between scheduled syncs; zero disables the schedule.
    #[ortho_config(default = 86400)]
    pub sync_interval_secs: u64,
    /// `abort` or `continue`.
    pub sync_item_failure_policy: Option<String>,
}

impl AppSettings {
    /// Bind address, defaulting to all interfaces on port 3000.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidPageSize`] unless the default page
    /// size lies within `1..=MAX_PAGE_SIZE`.
    pub fn catalog_settings(&self) -> Result<CatalogSettings, SettingsError> {
        let value = self.default_page_size;
        if !(1..=MAX_PAGE_SIZE).contains(&value) {
            return Err(SettingsError::InvalidPageSize { value });
        }
        Ok(CatalogSettings {
            default_page_size: value,
        })
    }

    /// Token lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidTokenTtl`] unless the lifetime lies
    /// within `1..=MAX_TOKEN_TTL_SECS` seconds.
    pub fn token_ttl(&self) -> Result<chrono::Duration, SettingsError> {
        let value = self.token_ttl_secs;
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&value) {
            return Err(SettingsError::InvalidTokenTtl { value });
        }
        chrono::Duration::try_seconds(value).ok_or(SettingsError::InvalidTokenTtl { value })
    }

    /// Argon2 cost parameters, each falling back to the library default.
    pub fn hash_settings(&self) -> PasswordHashSettings {
        let defaults = PasswordHashSettings::default();
        PasswordHashSettings {
            memory_kib: self.hash_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.hash_iterations.unwrap_or(defaults.iterations),
            parallelism: self.hash_parallelism.unwrap_or(defaults.parallelism),
        }
    }

    /// Films collection endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidFeedUrl`] when the value does not parse.
    pub fn feed_url(&self) -> Result<Url, SettingsError> {
        let value = self.feed_url.as_deref().unwrap_or(DEFAULT_FEED_URL);
        Url::parse(value).map_err(|source| SettingsError::InvalidFeedUrl {
            value: value.to_owned(),
            source,
        })
    }

    /// Feed request timeout.
    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    /// Interval between scheduled syncs; zero disables the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidSyncInterval`] above
    /// `MAX_SYNC_INTERVAL_SECS`.
    pub fn sync_interval(&self) -> Result<Duration, SettingsError> {
        let value = self.sync_interval_secs;
        if value > MAX_SYNC_INTERVAL_SECS {
            return Err(SettingsError::InvalidSyncInterval { value });
        }
        Ok(Duration::from_secs(value))
    }

    /// Sync service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidFailurePolicy`] for unknown names.
    pub fn sync_config(&self) -> Result<MovieSyncConfig, SettingsError> {
        let item_failure_policy = match self.sync_item_failure_policy.as_deref() {
            Some(name) => name.parse()?,
            None => ItemFailurePolicy::default(),
        };
        Ok(MovieSyncConfig {
            item_failure_policy,
        })
    }
}

// Keep the derive defaults above in step with the adapter constants.
const _: () = assert!(DEFAULT_PAGE_SIZE == 10);
const _: () = assert!(DEFAULT_TOKEN_TTL_SECS == 7_200);
const _: () = assert!(DEFAULT_PAGE_SIZE <= MAX_PAGE_SIZE);
