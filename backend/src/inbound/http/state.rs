//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only ever talk to
//! driving ports, so they stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{BookingCommand, BookingQuery, LoginService};

/// Parameter object bundling the port implementations used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub booking_commands: Arc<dyn BookingCommand>,
    pub booking_queries: Arc<dyn BookingQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub booking_commands: Arc<dyn BookingCommand>,
    pub booking_queries: Arc<dyn BookingQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use venue_backend::domain::BookingService;
    /// use venue_backend::domain::ports::FixtureLoginService;
    /// use venue_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use venue_backend::outbound::memory::InMemoryBookingStore;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let store = Arc::new(InMemoryBookingStore::new(clock.clone()));
    /// let service = Arc::new(BookingService::new(store.clone(), store, clock));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     booking_commands: service.clone(),
    ///     booking_queries: service,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            booking_commands,
            booking_queries,
        } = ports;
        Self {
            login,
            booking_commands,
            booking_queries,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
