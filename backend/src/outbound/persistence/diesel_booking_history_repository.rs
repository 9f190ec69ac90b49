//! PostgreSQL-backed `BookingHistoryRepository`.
//!
//! Only INSERT and SELECT statements are issued against `booking_history`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{BookingHistoryRepository, BookingHistoryRepositoryError};
use crate::domain::{ActorEmail, BookingHistoryEntry, BookingId, HistoryDetails};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{HistoryRow, NewHistoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::booking_history;

/// Diesel implementation of [`BookingHistoryRepository`].
#[derive(Clone)]
pub struct DieselBookingHistoryRepository {
    pool: DbPool,
}

impl DieselBookingHistoryRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> BookingHistoryRepositoryError {
    map_pool_error(error, BookingHistoryRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> BookingHistoryRepositoryError {
    map_diesel_error(
        &error,
        BookingHistoryRepositoryError::query,
        BookingHistoryRepositoryError::connection,
    )
}

fn to_entry(row: HistoryRow) -> Result<BookingHistoryEntry, BookingHistoryRepositoryError> {
    let id = row.id;
    row.into_entry().ok_or_else(|| {
        warn!(entry_id = id, "history entry has an invalid performer");
        BookingHistoryRepositoryError::query(format!("history entry {id} has an invalid performer"))
    })
}

#[async_trait]
impl BookingHistoryRepository for DieselBookingHistoryRepository {
    async fn append(
        &self,
        booking_id: BookingId,
        details: &HistoryDetails,
        performed_by: &ActorEmail,
    ) -> Result<BookingHistoryEntry, BookingHistoryRepositoryError> {
        let payload = details.to_payload().map_err(|err| {
            BookingHistoryRepositoryError::query(format!("history payload not encodable: {err}"))
        })?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let action = details.action();
        let row = diesel::insert_into(booking_history::table)
            .values(NewHistoryRow {
                booking_id: booking_id.get(),
                action: action.as_str(),
                details: payload,
                performed_by: performed_by.as_ref(),
            })
            .returning(HistoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        to_entry(row)
    }

    async fn list_for_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<BookingHistoryEntry>, BookingHistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = booking_history::table
            .filter(booking_history::booking_id.eq(booking_id.get()))
            .order((booking_history::created_at.asc(), booking_history::id.asc()))
            .select(HistoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_entry).collect()
    }
}
