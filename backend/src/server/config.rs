//! Server settings and the configuration object handed to [`super::create_server`].
//!
//! Settings are layered by OrthoConfig: defaults, then an optional config
//! file, then `VENUE_*` environment variables, then command-line flags.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use venue_backend::domain::ports::LoginService;
use venue_backend::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_DB_POOL_SIZE: u32 = 10;

/// Settings controlling how the booking server starts.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VENUE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; bookings are kept in memory when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Email of the single admin account.
    pub admin_email: Option<String>,
    /// Password of the admin account.
    pub admin_password: Option<String>,
    /// File holding at least 32 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("db_pool_size", &self.db_pool_size)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .field("session_key_file", &self.session_key_file)
            .field("cookie_secure", &self.cookie_secure)
            .field("allow_ephemeral_session_key", &self.allow_ephemeral_session_key)
            .finish()
    }
}

/// Errors raised while interpreting [`AppSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Only one half of the admin credentials was supplied.
    #[error("VENUE_ADMIN_EMAIL and VENUE_ADMIN_PASSWORD must be set together")]
    PartialAdminCredentials,
    /// The admin email is not a valid address.
    #[error("invalid admin email: {message}")]
    AdminEmail { message: String },
    /// The pool size must be positive.
    #[error("db pool size must be greater than zero")]
    ZeroPoolSize,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Pool size, defaulting to ten connections.
    pub fn db_pool_size(&self) -> Result<u32, SettingsError> {
        match self.db_pool_size.unwrap_or(DEFAULT_DB_POOL_SIZE) {
            0 => Err(SettingsError::ZeroPoolSize),
            size => Ok(size),
        }
    }

    /// Session key file path.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Configured admin credentials, if both halves are present.
    pub fn admin_credentials(&self) -> Result<Option<(String, Zeroizing<String>)>, SettingsError> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => {
                Ok(Some((email.clone(), Zeroizing::new(password.clone()))))
            }
            (None, None) => Ok(None),
            _ => Err(SettingsError::PartialAdminCredentials),
        }
    }
}

/// Everything [`super::create_server`] needs, resolved from settings.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) login: Option<Arc<dyn LoginService>>,
}

impl ServerConfig {
    /// Configuration with in-memory storage and the fixture login.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            login: None,
        }
    }

    /// Use PostgreSQL-backed repositories from `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Authenticate admins with `login` instead of the fixture account.
    #[must_use]
    pub fn with_login(mut self, login: Arc<dyn LoginService>) -> Self {
        self.login = Some(login);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "VENUE_BIND_ADDR",
        "VENUE_DATABASE_URL",
        "VENUE_DB_POOL_SIZE",
        "VENUE_ADMIN_EMAIL",
        "VENUE_ADMIN_PASSWORD",
        "VENUE_SESSION_KEY_FILE",
        "VENUE_COOKIE_SECURE",
        "VENUE_ALLOW_EPHEMERAL_SESSION_KEY",
    ];

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("venue-backend")]).expect("settings load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();

        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.cookie_secure);
        assert!(!settings.allow_ephemeral_session_key);
        assert!(settings.database_url.is_none());
        assert_eq!(settings.db_pool_size().expect("size"), 10);
        assert!(settings.admin_credentials().expect("creds").is_none());
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("VENUE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("VENUE_DATABASE_URL", Some("postgres://localhost/venue".to_owned())),
            ("VENUE_DB_POOL_SIZE", Some("4".to_owned())),
            ("VENUE_ADMIN_EMAIL", Some("ops@venue.test".to_owned())),
            ("VENUE_ADMIN_PASSWORD", Some("s3cret".to_owned())),
            ("VENUE_SESSION_KEY_FILE", None),
            ("VENUE_COOKIE_SECURE", Some("false".to_owned())),
            ("VENUE_ALLOW_EPHEMERAL_SESSION_KEY", Some("true".to_owned())),
        ]);

        let settings = load();

        assert_eq!(settings.bind_addr().expect("addr").port(), 9000);
        assert_eq!(settings.db_pool_size().expect("size"), 4);
        assert!(!settings.cookie_secure);
        assert!(settings.allow_ephemeral_session_key);
        let (email, password) = settings
            .admin_credentials()
            .expect("valid creds")
            .expect("creds present");
        assert_eq!(email, "ops@venue.test");
        assert_eq!(password.as_str(), "s3cret");
    }

    #[rstest]
    fn half_configured_admin_is_rejected() {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "VENUE_ADMIN_EMAIL").then(|| "ops@venue.test".to_owned());
            (name, value)
        }));

        let err = load().admin_credentials().expect_err("partial credentials");

        assert!(matches!(err, SettingsError::PartialAdminCredentials));
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let _guard = lock_env([
            ("VENUE_ADMIN_EMAIL", Some("ops@venue.test".to_owned())),
            ("VENUE_ADMIN_PASSWORD", Some("s3cret".to_owned())),
            ("VENUE_DATABASE_URL", Some("postgres://u:pw@db/venue".to_owned())),
        ]);

        let rendered = format!("{:?}", load());

        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("pw@db"));
    }
}
