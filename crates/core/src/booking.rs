//! Booking validity and duplicate checks.
//!
//! [`validate`] is a pure decision over a proposed stay and a snapshot of
//! the active bookings the storage layer handed over. Checks run in a fixed
//! order and the first failure wins, so callers always see the same,
//! most specific rejection for the same input.

use chrono::{NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde::Serialize;

use crate::access::Owned;
use crate::types::{DbId, Timestamp};

/// Longest stay a single booking may cover, in days.
pub const MAX_STAY_DAYS: f64 = 3.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// An unvalidated booking as submitted by a caller.
///
/// Dates are kept as raw text so that "missing" and "unparseable" are
/// reported the same way.
#[derive(Debug, Clone, Copy)]
pub struct BookingDraft<'a> {
    pub owner_id: DbId,
    pub hotel_id: DbId,
    pub check_in: Option<&'a str>,
    pub check_out: Option<&'a str>,
}

/// The slice of an existing booking the duplicate check needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSnapshot {
    pub id: DbId,
    pub owner_id: DbId,
    pub hotel_id: DbId,
}

impl Owned for BookingSnapshot {
    fn owner_id(&self) -> DbId {
        self.owner_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// A new booking: all four checks apply.
    Create,
    /// Changing the dates of an existing booking: the duplicate check is
    /// skipped. The snapshot should already exclude the booking itself.
    Update,
}

/// A stay that passed validation, with its dates parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedStay {
    pub check_in: Timestamp,
    pub check_out: Timestamp,
    /// Stay length in (possibly fractional) days.
    pub days: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum BookingRejection {
    #[error("Please provide valid check-in and check-out dates")]
    MissingDates,

    #[error("Check-out date must be after check-in date")]
    InvalidRange,

    #[error("Booking cannot be made for more than 3 nights")]
    StayTooLong,

    #[error("You have already booked this hotel")]
    DuplicateBooking,
}

impl BookingRejection {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            BookingRejection::MissingDates => "MISSING_DATES",
            BookingRejection::InvalidRange => "INVALID_RANGE",
            BookingRejection::StayTooLong => "STAY_TOO_LONG",
            BookingRejection::DuplicateBooking => "DUPLICATE_BOOKING",
        }
    }
}

/// Parse a check-in/check-out value.
///
/// Accepts RFC 3339 (`2024-01-01T14:00:00Z`), a naive date-time taken as
/// UTC (`2024-01-01T14:00:00`), or a bare date at midnight UTC
/// (`2024-01-01`). The result is truncated to whole milliseconds, the
/// resolution the stay-length check works in, so the stored value is
/// exactly the validated one.
pub fn parse_stay_date(raw: &str) -> Option<Timestamp> {
    parse_timestamp(raw.trim()).map(|ts| ts.trunc_subsecs(3))
}

fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Stay length in days from the millisecond difference.
pub fn stay_length_days(check_in: Timestamp, check_out: Timestamp) -> f64 {
    (check_out - check_in).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Validate a proposed stay against the snapshot of active bookings.
///
/// Checks, first failure wins:
/// 1. both dates present and parseable ([`BookingRejection::MissingDates`]);
/// 2. check-out strictly after check-in ([`BookingRejection::InvalidRange`]);
/// 3. at most [`MAX_STAY_DAYS`] ([`BookingRejection::StayTooLong`]);
/// 4. on create only, no active booking by the same owner at the same hotel,
///    whatever its dates ([`BookingRejection::DuplicateBooking`]).
pub fn validate(
    draft: &BookingDraft<'_>,
    existing: &[BookingSnapshot],
    mode: ValidationMode,
) -> Result<ValidatedStay, BookingRejection> {
    let check_in = draft.check_in.and_then(parse_stay_date);
    let check_out = draft.check_out.and_then(parse_stay_date);
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Err(BookingRejection::MissingDates);
    };

    if check_out <= check_in {
        return Err(BookingRejection::InvalidRange);
    }

    let days = stay_length_days(check_in, check_out);
    if days > MAX_STAY_DAYS {
        return Err(BookingRejection::StayTooLong);
    }

    if mode == ValidationMode::Create
        && existing
            .iter()
            .any(|b| b.owner_id == draft.owner_id && b.hotel_id == draft.hotel_id)
    {
        return Err(BookingRejection::DuplicateBooking);
    }

    Ok(ValidatedStay {
        check_in,
        check_out,
        days,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const OWNER: DbId = 1;
    const HOTEL: DbId = 100;

    fn draft<'a>(check_in: Option<&'a str>, check_out: Option<&'a str>) -> BookingDraft<'a> {
        BookingDraft {
            owner_id: OWNER,
            hotel_id: HOTEL,
            check_in,
            check_out,
        }
    }

    fn existing(id: DbId, owner_id: DbId, hotel_id: DbId) -> BookingSnapshot {
        BookingSnapshot {
            id,
            owner_id,
            hotel_id,
        }
    }

    #[test]
    fn short_stay_without_prior_booking_passes() {
        let stay = validate(
            &draft(Some("2024-01-01"), Some("2024-01-03")),
            &[],
            ValidationMode::Create,
        )
        .expect("two-night stay should pass");
        assert_eq!(stay.days, 2.0);
        assert_eq!(stay.check_in.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn exactly_three_days_passes() {
        let stay = validate(
            &draft(Some("2024-01-01"), Some("2024-01-04")),
            &[],
            ValidationMode::Create,
        )
        .expect("three-day stay is the limit");
        assert_eq!(stay.days, 3.0);
    }

    #[test]
    fn four_days_is_too_long() {
        assert_eq!(
            validate(
                &draft(Some("2024-01-01"), Some("2024-01-05")),
                &[],
                ValidationMode::Create,
            ),
            Err(BookingRejection::StayTooLong)
        );
    }

    #[test]
    fn fractional_overrun_is_too_long() {
        assert_eq!(
            validate(
                &draft(Some("2024-01-01T00:00:00Z"), Some("2024-01-04T12:00:00Z")),
                &[],
                ValidationMode::Create,
            ),
            Err(BookingRejection::StayTooLong)
        );
    }

    #[test]
    fn missing_or_garbage_dates_are_rejected_first() {
        let cases = [
            (None, Some("2024-01-02")),
            (Some("2024-01-01"), None),
            (None, None),
            (Some("next tuesday"), Some("2024-01-02")),
            (Some(""), Some("2024-01-02")),
        ];
        for (check_in, check_out) in cases {
            assert_eq!(
                validate(&draft(check_in, check_out), &[], ValidationMode::Create),
                Err(BookingRejection::MissingDates),
                "check_in={check_in:?} check_out={check_out:?}"
            );
        }
    }

    #[test]
    fn reversed_or_equal_range_is_invalid_regardless_of_length() {
        let cases = [
            ("2024-01-05", "2024-01-01"),
            ("2024-01-01", "2024-01-01"),
            ("2024-03-01", "2024-01-01"),
        ];
        for (check_in, check_out) in cases {
            assert_eq!(
                validate(
                    &draft(Some(check_in), Some(check_out)),
                    &[],
                    ValidationMode::Create
                ),
                Err(BookingRejection::InvalidRange)
            );
        }
    }

    #[test]
    fn range_is_checked_before_duplicates() {
        let prior = [existing(5, OWNER, HOTEL)];
        assert_eq!(
            validate(
                &draft(Some("2024-01-04"), Some("2024-01-01")),
                &prior,
                ValidationMode::Create
            ),
            Err(BookingRejection::InvalidRange)
        );
    }

    #[test]
    fn second_booking_at_same_hotel_is_duplicate_even_without_overlap() {
        let prior = [existing(5, OWNER, HOTEL)];
        assert_eq!(
            validate(
                &draft(Some("2030-06-01"), Some("2030-06-02")),
                &prior,
                ValidationMode::Create
            ),
            Err(BookingRejection::DuplicateBooking)
        );
    }

    #[test]
    fn bookings_by_others_or_elsewhere_do_not_count() {
        let prior = [existing(5, 2, HOTEL), existing(6, OWNER, 200)];
        assert!(validate(
            &draft(Some("2024-01-01"), Some("2024-01-02")),
            &prior,
            ValidationMode::Create
        )
        .is_ok());
    }

    #[test]
    fn update_skips_duplicate_check() {
        let prior = [existing(5, OWNER, HOTEL)];
        let stay = validate(
            &draft(Some("2024-01-01"), Some("2024-01-02")),
            &prior,
            ValidationMode::Update,
        );
        assert_matches!(stay, Ok(ValidatedStay { days, .. }) if days == 1.0);
    }

    #[test]
    fn update_still_enforces_length() {
        assert_eq!(
            validate(
                &draft(Some("2024-01-01"), Some("2024-01-10")),
                &[],
                ValidationMode::Update,
            ),
            Err(BookingRejection::StayTooLong)
        );
    }

    #[test]
    fn repeated_validation_is_stable() {
        let prior = [existing(5, OWNER, HOTEL)];
        let d = draft(Some("2024-01-01"), Some("2024-01-02"));
        let first = validate(&d, &prior, ValidationMode::Create);
        for _ in 0..3 {
            assert_eq!(validate(&d, &prior, ValidationMode::Create), first);
        }
    }

    #[test]
    fn parses_supported_date_formats() {
        let midnight = parse_stay_date("2024-01-01").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        let naive = parse_stay_date("2024-01-01T14:30:00").unwrap();
        assert_eq!(naive.to_rfc3339(), "2024-01-01T14:30:00+00:00");

        let offset = parse_stay_date("2024-01-01T09:00:00+07:00").unwrap();
        assert_eq!(offset.to_rfc3339(), "2024-01-01T02:00:00+00:00");

        assert!(parse_stay_date("01/02/2024").is_none());
        assert!(parse_stay_date("   ").is_none());
        assert!(parse_stay_date("2024-02-30").is_none());
    }

    #[test]
    fn sub_millisecond_precision_is_dropped() {
        let parsed = parse_stay_date("2024-01-04T00:00:00.000900Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-04T00:00:00+00:00");
        let kept = parse_stay_date("2024-01-04T00:00:00.001900Z").unwrap();
        assert_eq!(kept.timestamp_subsec_millis(), 1);
        assert_eq!(kept.timestamp_subsec_nanos(), 1_000_000);
    }

    #[test]
    fn validated_stay_never_exceeds_the_limit_by_a_fraction() {
        let stay = validate(
            &draft(Some("2024-01-01T00:00:00Z"), Some("2024-01-04T00:00:00.000900Z")),
            &[],
            ValidationMode::Create,
        )
        .expect("truncates to exactly three days");
        assert_eq!(stay.check_out - stay.check_in, chrono::TimeDelta::days(3));

        assert_eq!(
            validate(
                &draft(Some("2024-01-01T00:00:00Z"), Some("2024-01-04T00:00:00.001Z")),
                &[],
                ValidationMode::Create,
            ),
            Err(BookingRejection::StayTooLong)
        );
    }

    #[test]
    fn rejection_codes_are_stable() {
        assert_eq!(BookingRejection::MissingDates.code(), "MISSING_DATES");
        assert_eq!(BookingRejection::InvalidRange.code(), "INVALID_RANGE");
        assert_eq!(BookingRejection::StayTooLong.code(), "STAY_TOO_LONG");
        assert_eq!(BookingRejection::DuplicateBooking.code(), "DUPLICATE_BOOKING");
    }
}
