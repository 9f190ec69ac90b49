//! Port for the append-only booking history store.
//!
//! The port deliberately has no update or delete method.

use async_trait::async_trait;

use crate::domain::{ActorEmail, BookingHistoryEntry, BookingId, HistoryDetails};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking history adapters.
    pub enum BookingHistoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "booking history connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "booking history query failed: {message}",
    }
}

/// Port for appending and listing audit entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingHistoryRepository: Send + Sync {
    /// Insert one entry; storage assigns `id` and `created_at`.
    async fn append(
        &self,
        booking_id: BookingId,
        details: &HistoryDetails,
        performed_by: &ActorEmail,
    ) -> Result<BookingHistoryEntry, BookingHistoryRepositoryError>;

    /// Entries for a booking ordered by `(created_at, id)`.
    async fn list_for_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<BookingHistoryEntry>, BookingHistoryRepositoryError>;
}
