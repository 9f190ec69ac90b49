//! Driving port for admin authentication.
//!
//! Handlers authenticate through [`LoginService`] so they never see where the
//! admin account is defined.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::{ActorEmail, Error, LoginCredentials};

/// Use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the admin's identity.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<ActorEmail, Error>;
}

/// Authenticates against the single admin account from settings.
///
/// Only a SHA-256 digest of the password is held.
pub struct ConfiguredLoginService {
    admin: ActorEmail,
    password_digest: [u8; 32],
}

impl ConfiguredLoginService {
    /// Build from the configured admin email and password.
    pub fn new(admin: ActorEmail, password: &Zeroizing<String>) -> Self {
        Self {
            admin,
            password_digest: Sha256::digest(password.as_bytes()).into(),
        }
    }

    fn password_matches(&self, password: &str) -> bool {
        let supplied: [u8; 32] = Sha256::digest(password.as_bytes()).into();
        constant_time_eq::constant_time_eq(&supplied, &self.password_digest)
    }
}

impl std::fmt::Debug for ConfiguredLoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredLoginService")
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LoginService for ConfiguredLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<ActorEmail, Error> {
        let password_matches = self.password_matches(credentials.password());
        if credentials.email() == self.admin.as_ref() && password_matches {
            Ok(self.admin.clone())
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

/// Development authenticator accepting `admin@venue.test` / `password`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<ActorEmail, Error> {
        if credentials.email() == "admin@venue.test" && credentials.password() == "password" {
            ActorEmail::new(credentials.email())
                .map_err(|err| Error::internal(format!("invalid fixture admin email: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
