//! Booking price calculation.
//!
//! - Daily-rate listings: `price_per_day * nights`, where nights is the
//!   stay length in days rounded up, with a minimum of one.
//! - Monthly rent: `monthly_price * months`, a duration in years counting as
//!   twelve months each.
//! - Lease: `lease_price + advance_amount`, whatever the requested duration.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::Error;
use super::booking::{BookingRequest, DurationUnit, StayTerm};
use super::property::{Property, PropertyType, RentalType};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Exclusive upper bound on a booking total (10^12).
pub const MAX_BOOKING_TOTAL: Decimal = Decimal::from_parts((1_000_000_000_000_u64 & 0xFFFF_FFFF) as u32, (1_000_000_000_000_u64 >> 32) as u32, 0, false, 0);

/// Reasons a booking cannot be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingError {
    MissingDates,
    CheckOutBeforeCheckIn,
    MissingDuration,
    ZeroDuration,
    StayTooLong,
    MissingRentalType,
    MissingPrice { field: &'static str },
    TotalOutOfRange,
}

impl PricingError {
    fn field(self) -> &'static str {
        match self {
            Self::MissingDates | Self::CheckOutBeforeCheckIn | Self::StayTooLong => "toDate",
            Self::MissingDuration | Self::ZeroDuration => "duration",
            Self::MissingRentalType => "rentalType",
            Self::MissingPrice { field } => field,
            Self::TotalOutOfRange => "totalPrice",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::MissingDates => "missing_dates",
            Self::CheckOutBeforeCheckIn => "check_out_before_check_in",
            Self::MissingDuration => "missing_duration",
            Self::ZeroDuration => "zero_duration",
            Self::StayTooLong => "stay_too_long",
            Self::MissingRentalType => "missing_rental_type",
            Self::MissingPrice { .. } => "missing_price",
            Self::TotalOutOfRange => "total_out_of_range",
        }
    }
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDates => write!(f, "dates are required for this property type"),
            Self::CheckOutBeforeCheckIn => write!(f, "check-out must not be before check-in"),
            Self::MissingDuration => write!(f, "duration is required for rental properties"),
            Self::ZeroDuration => write!(f, "duration must be at least 1"),
            Self::StayTooLong => write!(f, "requested stay is too long"),
            Self::MissingRentalType => write!(f, "listing has no rental type"),
            Self::MissingPrice { field } => write!(f, "listing has no {field}"),
            Self::TotalOutOfRange => write!(f, "booking total exceeds the supported amount"),
        }
    }
}

impl std::error::Error for PricingError {}

impl From<PricingError> for Error {
    fn from(err: PricingError) -> Self {
        Error::invalid_field(err.field(), err.code(), err.to_string())
    }
}

/// Pick the stay term a listing type needs out of a booking request.
pub fn stay_term_for(kind: PropertyType, request: &BookingRequest) -> Result<StayTerm, PricingError> {
    if kind.is_daily_rate() {
        match (request.check_in, request.check_out) {
            (Some(check_in), Some(check_out)) => Ok(StayTerm::Dates {
                check_in,
                check_out,
            }),
            _ => Err(PricingError::MissingDates),
        }
    } else {
        match (request.duration, request.duration_unit) {
            (Some(0), Some(_)) => Err(PricingError::ZeroDuration),
            (Some(length), Some(unit)) => Ok(StayTerm::Duration { length, unit }),
            _ => Err(PricingError::MissingDuration),
        }
    }
}

/// Number of nights between two instants: whole days rounded up, at least one.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use traveltrove::domain::pricing::nights_between;
///
/// let check_in = Utc.with_ymd_and_hms(2025, 3, 1, 14, 0, 0).unwrap();
/// let check_out = Utc.with_ymd_and_hms(2025, 3, 3, 11, 0, 0).unwrap();
/// assert_eq!(nights_between(check_in, check_out), Ok(2));
/// assert_eq!(nights_between(check_in, check_in), Ok(1));
/// ```
pub fn nights_between(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> Result<u32, PricingError> {
    let millis = (check_out - check_in).num_milliseconds();
    if millis < 0 {
        return Err(PricingError::CheckOutBeforeCheckIn);
    }
    let days = millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) > 0);
    u32::try_from(days.max(1)).map_err(|_| PricingError::StayTooLong)
}

/// Rental length in months.
pub fn months_for(length: u32, unit: DurationUnit) -> Result<u32, PricingError> {
    match unit {
        DurationUnit::Months => Ok(length),
        DurationUnit::Years => length.checked_mul(12).ok_or(PricingError::StayTooLong),
    }
}

/// Total price for `term` at `property`, in major currency units.
pub fn quote(property: &Property, term: &StayTerm) -> Result<Decimal, PricingError> {
    let pricing = &property.pricing;
    if property.kind.is_daily_rate() {
        let StayTerm::Dates {
            check_in,
            check_out,
        } = *term
        else {
            return Err(PricingError::MissingDates);
        };
        let nights = nights_between(check_in, check_out)?;
        let rate = price(pricing.price_per_day, "pricePerDay")?;
        return within_range(rate.checked_mul(Decimal::from(nights)));
    }

    match pricing.rental_type {
        Some(RentalType::Lease) => {
            let lease = price(pricing.lease_price, "leasePrice")?;
            let advance = price(pricing.advance_amount, "advanceAmount")?;
            within_range(lease.checked_add(advance))
        }
        Some(RentalType::Rent) => {
            let StayTerm::Duration { length, unit } = *term else {
                return Err(PricingError::MissingDuration);
            };
            if length == 0 {
                return Err(PricingError::ZeroDuration);
            }
            let months = months_for(length, unit)?;
            let monthly = price(pricing.monthly_price, "monthlyPrice")?;
            within_range(monthly.checked_mul(Decimal::from(months)))
        }
        None => Err(PricingError::MissingRentalType),
    }
}

/// Totals are stored as `NUMERIC(14, 2)`.
fn within_range(total: Option<Decimal>) -> Result<Decimal, PricingError> {
    total
        .filter(|total| *total < MAX_BOOKING_TOTAL)
        .ok_or(PricingError::TotalOutOfRange)
}

fn price(amount: Option<Decimal>, field: &'static str) -> Result<Decimal, PricingError> {
    amount.ok_or(PricingError::MissingPrice { field })
}
