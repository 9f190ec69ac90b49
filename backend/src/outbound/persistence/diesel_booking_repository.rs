//! PostgreSQL-backed `BookingRepository`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{BookingRepository, BookingRepositoryError, NewBooking, StatusChange};
use crate::domain::{Booking, BookingDetailsPatch, BookingId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{BookingRow, DetailsUpdate, NewBookingRow, NotesUpdate, StatusUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::bookings;

/// Diesel implementation of [`BookingRepository`].
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> BookingRepositoryError {
    map_pool_error(error, BookingRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> BookingRepositoryError {
    map_diesel_error(
        &error,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
    )
}

fn to_domain(row: Option<BookingRow>) -> Result<Option<Booking>, BookingRepositoryError> {
    row.map(Booking::try_from).transpose().inspect_err(|err| {
        warn!(error = %err, "stored booking failed validation");
    })
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = bookings::table
            .find(id.get())
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        to_domain(row)
    }

    async fn insert(&self, booking: &NewBooking) -> Result<Booking, BookingRepositoryError> {
        let values = NewBookingRow::try_from(booking)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::insert_into(bookings::table)
            .values(values)
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    BookingRepositoryError::duplicate_booking_number(booking.booking_number.as_str())
                } else {
                    diesel_error(err)
                }
            })?;
        Booking::try_from(row)
    }

    async fn update_status(
        &self,
        id: BookingId,
        change: &StatusChange,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::update(bookings::table.find(id.get()))
            .set(StatusUpdate::from(change))
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        to_domain(row)
    }

    async fn update_notes(
        &self,
        id: BookingId,
        notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::update(bookings::table.find(id.get()))
            .set(NotesUpdate {
                additional_notes: notes.as_deref(),
                updated_at,
            })
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        to_domain(row)
    }

    async fn update_details(
        &self,
        id: BookingId,
        patch: &BookingDetailsPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let changes = DetailsUpdate::new(patch, updated_at)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::update(bookings::table.find(id.get()))
            .set(changes)
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        to_domain(row)
    }

    async fn latest_booking_number(
        &self,
        prefix: &str,
    ) -> Result<Option<String>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        bookings::table
            .filter(bookings::booking_number.like(format!("{prefix}%")))
            .select(bookings::booking_number)
            .order(bookings::booking_number.desc())
            .first::<String>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)
    }

    async fn find_by_event_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = bookings::table
            .filter(bookings::event_date.eq(date))
            .order(bookings::id.asc())
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(Booking::try_from).collect()
    }
}
