//! Shared doubles for unit tests inside the crate.

use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{Booking, BookingId, BookingNumber, BookingStatus};

/// Clock returning a settable instant.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26)
        .single()
        .expect("valid fixture timestamp")
}

/// Booking `SH-2026-<id>` in `status`, created at [`fixed_instant`].
pub fn sample_booking(id: i64, status: BookingStatus) -> Booking {
    let sequence = u32::try_from(id).expect("small fixture id");
    Booking {
        id: BookingId::new(id),
        booking_number: BookingNumber::new(2026, sequence).expect("valid number"),
        status,
        customer_name: "Ana Lima".to_owned(),
        customer_email: "ana@example.com".to_owned(),
        event_date: NaiveDate::from_ymd_opt(2026, 9, 12).expect("valid date"),
        guest_count: Some(120),
        additional_notes: None,
        quote_sent_date: None,
        deposit_received_date: None,
        created_at: fixed_instant(),
        updated_at: fixed_instant(),
    }
}
