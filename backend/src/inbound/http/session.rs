//! Session helpers keeping handlers free of framework-specific logic.
//!
//! The signed cookie carries only the authenticated admin's email. Handlers
//! ask [`SessionContext::require_actor`] for it and pass the result to the
//! driving ports as the `performedBy` identity.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{ActorEmail, Error};

pub(crate) const ACTOR_EMAIL_KEY: &str = "actor_email";

/// Newtype exposing domain-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated admin in the session cookie.
    pub fn persist_actor(&self, actor: &ActorEmail) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACTOR_EMAIL_KEY, actor.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop every session value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Admin stored in the session, if any.
    ///
    /// A value that no longer validates as an email is treated as absent.
    pub fn actor(&self) -> Result<Option<ActorEmail>, Error> {
        let raw = self
            .0
            .get::<String>(ACTOR_EMAIL_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match ActorEmail::new(&value) {
            Ok(actor) => Some(actor),
            Err(error) => {
                warn!(%error, "invalid actor email in session cookie");
                None
            }
        }))
    }

    /// Require an authenticated admin or fail with `401 Unauthorized`.
    pub fn require_actor(&self) -> Result<ActorEmail, Error> {
        self.actor()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Self::new) })
    }
}
