//! Booking aggregate and its value types.
//!
//! A [`Booking`] is a reservation of the venue for one event date. Its
//! [`BookingNumber`] is assigned once at creation and never changes; its
//! [`BookingStatus`] moves through the lifecycle governed by
//! [`crate::domain::BookingStatusMachine`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned booking identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(i64);

impl BookingId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a booking.
///
/// # Examples
///
/// ```
/// # use venue_backend::domain::BookingStatus;
/// let status: BookingStatus = "deposit_paid".parse().expect("known status");
/// assert_eq!(status, BookingStatus::DepositPaid);
/// assert_eq!(status.as_str(), "deposit_paid");
/// assert!("archived".parse::<BookingStatus>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Initial enquiry, assigned at creation.
    #[default]
    Inquiry,
    /// A quote has been sent to the customer.
    Quoted,
    /// The customer has confirmed the booking.
    Confirmed,
    /// The deposit has been received.
    DepositPaid,
    /// The event has taken place.
    Completed,
    /// The booking was cancelled.
    Cancelled,
}

impl BookingStatus {
    /// Every recognised status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Inquiry,
        Self::Quoted,
        Self::Confirmed,
        Self::DepositPaid,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire and database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inquiry => "inquiry",
            Self::Quoted => "quoted",
            Self::Confirmed => "confirmed",
            Self::DepositPaid => "deposit_paid",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of the six known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status: {input}")]
pub struct ParseBookingStatusError {
    /// The unrecognised input value.
    pub input: String,
}

impl FromStr for BookingStatus {
    type Err = ParseBookingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseBookingStatusError {
                input: s.to_owned(),
            })
    }
}

const BOOKING_NUMBER_PREFIX: &str = "SH";
const MAX_SEQUENCE: u32 = 9999;

/// Reasons a booking number string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingNumberError {
    /// The text does not follow `SH-YYYY-NNNN`.
    #[error("booking number '{input}' is not of the form SH-YYYY-NNNN")]
    Malformed {
        /// Offending input.
        input: String,
    },
    /// Sequence values run from 1 to 9999.
    #[error("booking sequence {sequence} is outside 1..=9999")]
    SequenceOutOfRange {
        /// Offending sequence value.
        sequence: u32,
    },
    /// Years are rendered with exactly four digits.
    #[error("booking year {year} cannot be rendered with four digits")]
    YearOutOfRange {
        /// Offending year.
        year: i32,
    },
}

/// Human-readable, year-scoped booking identifier `SH-YYYY-NNNN`.
///
/// The suffix is zero-padded to four digits so lexicographic order of the
/// rendered strings equals numeric order within a year.
///
/// # Examples
///
/// ```
/// # use venue_backend::domain::BookingNumber;
/// let number = BookingNumber::new(2026, 38).expect("valid number");
/// assert_eq!(number.as_str(), "SH-2026-0038");
///
/// let parsed = BookingNumber::parse("SH-2026-0038").expect("parses");
/// assert_eq!(parsed.year(), 2026);
/// assert_eq!(parsed.sequence(), 38);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingNumber {
    rendered: String,
    year: i32,
    sequence: u32,
}

impl BookingNumber {
    /// Build a number from its year and sequence.
    pub fn new(year: i32, sequence: u32) -> Result<Self, BookingNumberError> {
        if !(1000..=9999).contains(&year) {
            return Err(BookingNumberError::YearOutOfRange { year });
        }
        if !(1..=MAX_SEQUENCE).contains(&sequence) {
            return Err(BookingNumberError::SequenceOutOfRange { sequence });
        }
        Ok(Self {
            rendered: format!("{}{sequence:04}", Self::prefix_for_year(year)),
            year,
            sequence,
        })
    }

    /// Parse and validate a rendered booking number.
    pub fn parse(input: &str) -> Result<Self, BookingNumberError> {
        let malformed = || BookingNumberError::Malformed {
            input: input.to_owned(),
        };
        let mut parts = input.split('-');
        let (Some(prefix), Some(year), Some(sequence), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        let all_digits = |part: &str, width: usize| {
            part.len() == width && part.bytes().all(|b| b.is_ascii_digit())
        };
        if prefix != BOOKING_NUMBER_PREFIX || !all_digits(year, 4) || !all_digits(sequence, 4) {
            return Err(malformed());
        }
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let sequence = sequence.parse::<u32>().map_err(|_| malformed())?;
        Self::new(year, sequence)
    }

    /// Prefix shared by every number allocated in `year`.
    #[must_use]
    pub fn prefix_for_year(year: i32) -> String {
        format!("{BOOKING_NUMBER_PREFIX}-{year:04}-")
    }

    /// Four-digit creation year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Sequence within the year, starting at 1.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Rendered `SH-YYYY-NNNN` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.rendered.as_str()
    }

    /// Number following this one in the same year.
    pub fn successor(&self) -> Result<Self, BookingNumberError> {
        let next = self
            .sequence
            .checked_add(1)
            .ok_or(BookingNumberError::SequenceOutOfRange {
                sequence: self.sequence,
            })?;
        Self::new(self.year, next)
    }
}

impl fmt::Display for BookingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl TryFrom<String> for BookingNumber {
    type Error = BookingNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BookingNumber> for String {
    fn from(value: BookingNumber) -> Self {
        value.rendered
    }
}

/// Validated identity of the admin performing an action.
///
/// Stored as `performed_by` on every history entry. Trimmed and lower-cased
/// so the same admin is always recorded identically.
///
/// # Examples
///
/// ```
/// # use venue_backend::domain::ActorEmail;
/// let actor = ActorEmail::new("  Events@Example.COM ").expect("valid email");
/// assert_eq!(actor.as_ref(), "events@example.com");
/// assert!(ActorEmail::new("nobody").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorEmail(String);

/// Validation errors for [`ActorEmail`] and customer emails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Blank once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// Missing a local part, `@`, or domain.
    #[error("email '{input}' is not a valid address")]
    Malformed {
        /// Offending input.
        input: String,
    },
    /// Longer than [`MAX_EMAIL_CHARS`].
    #[error("email must be at most {MAX_EMAIL_CHARS} characters, got {length}")]
    TooLong {
        /// Length of the trimmed input in characters.
        length: usize,
    },
}

/// Longest accepted email address, in characters.
pub const MAX_EMAIL_CHARS: usize = 320;
/// Longest accepted customer name, in characters.
pub const MAX_CUSTOMER_NAME_CHARS: usize = 200;
/// Largest accepted guest count; the column is a signed 32-bit integer.
pub const MAX_GUEST_COUNT: u32 = i32::MAX.unsigned_abs();

fn normalise_email(raw: &str) -> Result<String, EmailValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EmailValidationError::Empty);
    }
    let length = trimmed.chars().count();
    if length > MAX_EMAIL_CHARS {
        return Err(EmailValidationError::TooLong { length });
    }
    match trimmed.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(trimmed.to_lowercase())
        }
        _ => Err(EmailValidationError::Malformed {
            input: trimmed.to_owned(),
        }),
    }
}

impl ActorEmail {
    /// Validate and normalise an acting user's email.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        normalise_email(raw.as_ref()).map(Self)
    }
}

impl AsRef<str> for ActorEmail {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ActorEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ActorEmail {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorEmail> for String {
    fn from(value: ActorEmail) -> Self {
        value.0
    }
}

/// A venue reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Storage-assigned identifier.
    pub id: BookingId,
    /// Immutable `SH-YYYY-NNNN` number.
    pub booking_number: BookingNumber,
    /// Current lifecycle state.
    pub status: BookingStatus,
    /// Customer's full name.
    pub customer_name: String,
    /// Customer contact email.
    pub customer_email: String,
    /// Date of the event; used for availability checks.
    pub event_date: NaiveDate,
    /// Expected number of guests, when known.
    pub guest_count: Option<u32>,
    /// Free-text admin notes.
    pub additional_notes: Option<String>,
    /// Last time the booking entered `quoted`.
    pub quote_sent_date: Option<DateTime<Utc>>,
    /// Last time the booking entered `deposit_paid`.
    pub deposit_received_date: Option<DateTime<Utc>>,
    /// Creation timestamp assigned by storage.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking blocks its event date for other customers.
    #[must_use]
    pub fn holds_event_date(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

/// Validation errors raised while building a [`BookingDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingDraftError {
    /// Customer name blank once trimmed.
    #[error("customer name must not be empty")]
    EmptyCustomerName,
    /// Customer email failed validation.
    #[error("customer email is invalid: {0}")]
    CustomerEmail(#[from] EmailValidationError),
    /// Guest count must be positive when supplied.
    #[error("guest count must be greater than zero")]
    ZeroGuests,
    /// Customer name longer than [`MAX_CUSTOMER_NAME_CHARS`].
    #[error("customer name must be at most {MAX_CUSTOMER_NAME_CHARS} characters, got {length}")]
    CustomerNameTooLong {
        /// Length of the trimmed name in characters.
        length: usize,
    },
    /// Guest count above [`MAX_GUEST_COUNT`].
    #[error("guest count must be at most {MAX_GUEST_COUNT}, got {count}")]
    GuestCountTooLarge {
        /// Rejected count.
        count: u32,
    },
}

fn validate_customer_name(raw: &str) -> Result<String, BookingDraftError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(BookingDraftError::EmptyCustomerName);
    }
    let length = name.chars().count();
    if length > MAX_CUSTOMER_NAME_CHARS {
        return Err(BookingDraftError::CustomerNameTooLong { length });
    }
    Ok(name.to_owned())
}

fn validate_guest_count(guest_count: Option<u32>) -> Result<(), BookingDraftError> {
    match guest_count {
        Some(0) => Err(BookingDraftError::ZeroGuests),
        Some(count) if count > MAX_GUEST_COUNT => {
            Err(BookingDraftError::GuestCountTooLarge { count })
        }
        _ => Ok(()),
    }
}

/// Validated input for a new booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    customer_name: String,
    customer_email: String,
    event_date: NaiveDate,
    guest_count: Option<u32>,
    additional_notes: Option<String>,
}

impl BookingDraft {
    /// Validate raw booking inputs.
    pub fn try_new(
        customer_name: &str,
        customer_email: &str,
        event_date: NaiveDate,
        guest_count: Option<u32>,
    ) -> Result<Self, BookingDraftError> {
        let customer_name = validate_customer_name(customer_name)?;
        validate_guest_count(guest_count)?;
        Ok(Self {
            customer_name,
            customer_email: normalise_email(customer_email)?,
            event_date,
            guest_count,
            additional_notes: None,
        })
    }

    /// Attach initial notes; blank notes are dropped.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.additional_notes = normalise_notes(notes);
        self
    }

    /// Customer name.
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Normalised customer email.
    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    /// Event date.
    pub fn event_date(&self) -> NaiveDate {
        self.event_date
    }

    /// Guest count, if supplied.
    pub fn guest_count(&self) -> Option<u32> {
        self.guest_count
    }

    /// Initial notes, if any.
    pub fn additional_notes(&self) -> Option<&str> {
        self.additional_notes.as_deref()
    }
}

/// Partial update of customer-facing booking details.
///
/// Status and notes are deliberately absent: they have their own operations
/// and audit actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDetailsPatch {
    /// New customer name.
    pub customer_name: Option<String>,
    /// New customer email.
    pub customer_email: Option<String>,
    /// New event date.
    pub event_date: Option<NaiveDate>,
    /// New guest count.
    pub guest_count: Option<u32>,
}

impl BookingDetailsPatch {
    /// Whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_email.is_none()
            && self.event_date.is_none()
            && self.guest_count.is_none()
    }

    /// Validate field values, normalising name and email.
    pub fn validated(self) -> Result<Self, BookingDraftError> {
        let customer_name = self
            .customer_name
            .as_deref()
            .map(validate_customer_name)
            .transpose()?;
        let customer_email = self
            .customer_email
            .as_deref()
            .map(normalise_email)
            .transpose()?;
        validate_guest_count(self.guest_count)?;
        Ok(Self {
            customer_name,
            customer_email,
            event_date: self.event_date,
            guest_count: self.guest_count,
        })
    }

    /// Drop fields whose value already matches `current`, returning the
    /// effective patch and the wire names of the fields that change.
    #[must_use]
    pub fn effective_against(self, current: &Booking) -> (Self, Vec<String>) {
        let mut changed = Vec::new();
        let customer_name = self
            .customer_name
            .filter(|name| *name != current.customer_name);
        if customer_name.is_some() {
            changed.push("customerName".to_owned());
        }
        let customer_email = self
            .customer_email
            .filter(|email| *email != current.customer_email);
        if customer_email.is_some() {
            changed.push("customerEmail".to_owned());
        }
        let event_date = self.event_date.filter(|date| *date != current.event_date);
        if event_date.is_some() {
            changed.push("eventDate".to_owned());
        }
        let guest_count = self
            .guest_count
            .filter(|count| Some(*count) != current.guest_count);
        if guest_count.is_some() {
            changed.push("guestCount".to_owned());
        }
        (
            Self {
                customer_name,
                customer_email,
                event_date,
                guest_count,
            },
            changed,
        )
    }
}

/// Trim notes and collapse blank input to `None`.
#[must_use]
pub fn normalise_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Year used for booking-number allocation on `date`.
#[must_use]
pub fn allocation_year(date: NaiveDate) -> i32 {
    date.year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SH-2026-0001", 2026, 1)]
    #[case("SH-2025-9999", 2025, 9999)]
    #[case("SH-2031-0420", 2031, 420)]
    fn parses_well_formed_numbers(#[case] raw: &str, #[case] year: i32, #[case] seq: u32) {
        let number = BookingNumber::parse(raw).expect("valid number");
        assert_eq!(number.year(), year);
        assert_eq!(number.sequence(), seq);
        assert_eq!(number.as_str(), raw);
    }

    #[rstest]
    #[case("SH-2026-37")]
    #[case("SH-2026-00a7")]
    #[case("XX-2026-0001")]
    #[case("SH-26-0001")]
    #[case("SH-2026-0001-1")]
    #[case("")]
    fn rejects_malformed_numbers(#[case] raw: &str) {
        let err = BookingNumber::parse(raw).expect_err("malformed");
        assert!(matches!(err, BookingNumberError::Malformed { .. }));
    }

    #[rstest]
    fn zero_sequence_is_out_of_range() {
        let err = BookingNumber::parse("SH-2026-0000").expect_err("zero sequence");
        assert_eq!(err, BookingNumberError::SequenceOutOfRange { sequence: 0 });
    }

    #[rstest]
    fn string_order_matches_numeric_order_within_a_year() {
        let ninth = BookingNumber::new(2026, 9).expect("valid");
        let tenth = BookingNumber::new(2026, 10).expect("valid");
        assert!(ninth.as_str() < tenth.as_str());
    }

    #[rstest]
    fn successor_fails_after_last_sequence() {
        let last = BookingNumber::new(2026, 9999).expect("valid");
        assert!(last.successor().is_err());
    }

    #[rstest]
    fn status_round_trips_through_serde_as_snake_case() {
        for status in BookingStatus::ALL {
            let value = serde_json::to_value(status).expect("serialise");
            assert_eq!(value, serde_json::Value::String(status.as_str().to_owned()));
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
    }

    #[rstest]
    #[case("Quoted")]
    #[case("depositPaid")]
    #[case(" inquiry")]
    fn status_parsing_is_exact(#[case] raw: &str) {
        assert!(raw.parse::<BookingStatus>().is_err());
    }

    #[rstest]
    fn draft_rejects_blank_name_and_zero_guests() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).expect("date");
        assert_eq!(
            BookingDraft::try_new("  ", "a@b.c", date, None),
            Err(BookingDraftError::EmptyCustomerName)
        );
        assert_eq!(
            BookingDraft::try_new("Ana", "a@b.c", date, Some(0)),
            Err(BookingDraftError::ZeroGuests)
        );
    }

    #[rstest]
    #[case("n", MAX_CUSTOMER_NAME_CHARS, true)]
    #[case("n", MAX_CUSTOMER_NAME_CHARS + 1, false)]
    #[case("é", MAX_CUSTOMER_NAME_CHARS, true)]
    fn draft_limits_customer_name_length(
        #[case] unit: &str,
        #[case] length: usize,
        #[case] accepted: bool,
    ) {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).expect("date");
        let name = unit.repeat(length);
        let result = BookingDraft::try_new(&name, "a@b.c", date, None);
        if accepted {
            assert!(result.is_ok());
        } else {
            assert_eq!(result, Err(BookingDraftError::CustomerNameTooLong { length }));
        }
    }

    #[rstest]
    fn draft_rejects_overlong_email() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).expect("date");
        let email = format!("{}@example.com", "a".repeat(MAX_EMAIL_CHARS));
        let err = BookingDraft::try_new("Ana", &email, date, None).expect_err("too long");
        assert!(matches!(
            err,
            BookingDraftError::CustomerEmail(EmailValidationError::TooLong { .. })
        ));
    }

    #[rstest]
    #[case(MAX_GUEST_COUNT, true)]
    #[case(MAX_GUEST_COUNT + 1, false)]
    #[case(3_000_000_000, false)]
    fn guest_count_fits_the_storage_column(#[case] count: u32, #[case] accepted: bool) {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).expect("date");
        let draft = BookingDraft::try_new("Ana", "a@b.c", date, Some(count));
        assert_eq!(draft.is_ok(), accepted);
        let patch = BookingDetailsPatch {
            guest_count: Some(count),
            ..BookingDetailsPatch::default()
        }
        .validated();
        assert_eq!(patch.is_ok(), accepted);
        if !accepted {
            assert_eq!(
                patch.err(),
                Some(BookingDraftError::GuestCountTooLarge { count })
            );
        }
    }

    #[rstest]
    fn patch_rejects_overlong_name() {
        let patch = BookingDetailsPatch {
            customer_name: Some("n".repeat(MAX_CUSTOMER_NAME_CHARS + 1)),
            ..BookingDetailsPatch::default()
        };
        assert!(matches!(
            patch.validated(),
            Err(BookingDraftError::CustomerNameTooLong { .. })
        ));
    }

    #[rstest]
    fn draft_normalises_email_and_drops_blank_notes() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).expect("date");
        let draft = BookingDraft::try_new(" Ana Lima ", "Ana@Example.com", date, Some(80))
            .expect("valid draft")
            .with_notes(Some("   ".to_owned()));
        assert_eq!(draft.customer_name(), "Ana Lima");
        assert_eq!(draft.customer_email(), "ana@example.com");
        assert_eq!(draft.additional_notes(), None);
    }
}
