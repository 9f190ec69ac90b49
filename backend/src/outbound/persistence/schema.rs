//! Diesel table definitions matching `migrations/`.
//!
//! Keep in sync with the SQL migrations; `diesel print-schema` against a
//! migrated database regenerates them.

diesel::table! {
    /// Venue bookings.
    ///
    /// `booking_number` carries a UNIQUE constraint and `status` a CHECK
    /// constraint limiting it to the six lifecycle values.
    bookings (id) {
        /// Primary key (BIGSERIAL).
        id -> Int8,
        /// `SH-YYYY-NNNN`, unique.
        booking_number -> Varchar,
        /// Lifecycle status in snake_case.
        status -> Varchar,
        customer_name -> Varchar,
        customer_email -> Varchar,
        event_date -> Date,
        guest_count -> Nullable<Int4>,
        additional_notes -> Nullable<Text>,
        /// Last entry into `quoted`.
        quote_sent_date -> Nullable<Timestamptz>,
        /// Last entry into `deposit_paid`.
        deposit_received_date -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail; rows are never updated or deleted.
    booking_history (id) {
        /// Primary key (BIGSERIAL).
        id -> Int8,
        /// Owning booking.
        booking_id -> Int8,
        /// Action tag such as `status_changed`.
        action -> Varchar,
        /// Action-specific payload.
        details -> Jsonb,
        /// Email of the acting admin.
        performed_by -> Varchar,
        /// Defaults to `now()`.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(booking_history -> bookings (booking_id));
diesel::allow_tables_to_appear_in_same_query!(bookings, booking_history);
