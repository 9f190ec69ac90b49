//! Builders for HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use venue_backend::domain::BookingService;
use venue_backend::domain::ports::{BookingCommand, BookingQuery, FixtureLoginService, LoginService};
use venue_backend::inbound::http::state::{HttpState, HttpStatePorts};
use venue_backend::outbound::memory::InMemoryBookingStore;
use venue_backend::outbound::persistence::{
    DbPool, DieselBookingHistoryRepository, DieselBookingRepository,
};

use super::ServerConfig;

type BookingPorts = (Arc<dyn BookingCommand>, Arc<dyn BookingQuery>);

/// Build the booking command/query pair, backed by PostgreSQL when a pool is
/// available and by the in-memory store otherwise.
fn build_booking_ports_with_pool<Pool>(
    pool: &Option<Pool>,
    clock: Arc<dyn Clock>,
    make_db_ports: impl FnOnce(&Pool, Arc<dyn Clock>) -> BookingPorts,
) -> BookingPorts {
    match pool {
        Some(pool) => make_db_ports(pool, clock),
        None => {
            let store = Arc::new(InMemoryBookingStore::new(Arc::clone(&clock)));
            let service = Arc::new(BookingService::new(Arc::clone(&store), store, clock));
            (service.clone() as Arc<dyn BookingCommand>, service as Arc<dyn BookingQuery>)
        }
    }
}

fn diesel_booking_ports(pool: &DbPool, clock: Arc<dyn Clock>) -> BookingPorts {
    let service = Arc::new(BookingService::new(
        Arc::new(DieselBookingRepository::new(pool.clone())),
        Arc::new(DieselBookingHistoryRepository::new(pool.clone())),
        clock,
    ));
    (service.clone() as Arc<dyn BookingCommand>, service as Arc<dyn BookingQuery>)
}

fn build_login(config: &ServerConfig) -> Arc<dyn LoginService> {
    config
        .login
        .clone()
        .unwrap_or_else(|| Arc::new(FixtureLoginService))
}

/// Build the shared HTTP state from configured ports and local fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (booking_commands, booking_queries) =
        build_booking_ports_with_pool(&config.db_pool, Arc::new(DefaultClock), diesel_booking_ports);

    web::Data::new(HttpState::new(HttpStatePorts {
        login: build_login(config),
        booking_commands,
        booking_queries,
    }))
}
