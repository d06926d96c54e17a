//! Listing-completion checklist.
//!
//! Completion is derived on every read rather than stored, so it can never
//! drift from the listing it describes.

use rust_decimal::Decimal;

use super::property::{Property, RentalType};

/// Number of photos a listing needs before it can be booked.
pub const MIN_LISTING_IMAGES: usize = 5;

/// Checklist reported to hosts for each listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStatus {
    pub basic_info: bool,
    pub images: bool,
    pub pricing: bool,
    /// Reported only; a missing payout account never blocks completion.
    pub payment_account: bool,
    pub complete: bool,
}

impl CompletionStatus {
    /// Evaluate the checklist for `property`.
    ///
    /// # Examples
    /// ```
    /// use traveltrove::domain::{CompletionStatus, MIN_LISTING_IMAGES};
    /// # use traveltrove::domain::{PropertyDraft, PropertyFields, PropertyId, PropertyType, UserId};
    /// # use rust_decimal::Decimal;
    /// # let fields = PropertyFields {
    /// #     name: Some("Palm Court".into()),
    /// #     kind: Some(PropertyType::Resort),
    /// #     state: Some("Kerala".into()),
    /// #     city: Some("Kochi".into()),
    /// #     address: Some("1 Marine Drive".into()),
    /// #     price_per_day: Some(Decimal::new(3000, 0)),
    /// #     images: Some(vec!["https://img.example/a.jpg".into(); MIN_LISTING_IMAGES]),
    /// #     ..PropertyFields::default()
    /// # };
    /// # let property = PropertyDraft::new(fields).unwrap().into_property(
    /// #     PropertyId::random(), UserId::random(), Vec::new(), chrono::Utc::now());
    /// let status = CompletionStatus::evaluate(&property, false);
    /// assert!(status.complete);
    /// assert!(!status.payment_account);
    /// ```
    pub fn evaluate(property: &Property, host_has_payment_account: bool) -> Self {
        let basic_info = has_basic_info(property);
        let images = property.images.len() >= MIN_LISTING_IMAGES;
        let pricing = has_pricing(property);
        Self {
            basic_info,
            images,
            pricing,
            payment_account: host_has_payment_account,
            complete: basic_info && images && pricing,
        }
    }
}

fn has_basic_info(property: &Property) -> bool {
    let location = &property.location;
    [
        property.name.as_str(),
        location.state.as_str(),
        location.city.as_str(),
        location.address.as_str(),
    ]
    .iter()
    .all(|value| !value.trim().is_empty())
}

fn has_pricing(property: &Property) -> bool {
    let pricing = &property.pricing;
    if property.kind.is_daily_rate() {
        return is_positive(pricing.price_per_day);
    }
    match pricing.rental_type {
        Some(RentalType::Rent) => is_positive(pricing.monthly_price),
        Some(RentalType::Lease) => {
            is_positive(pricing.lease_price)
                && is_positive(pricing.advance_amount)
                && pricing.lease_time_limit.is_some_and(|months| months > 0)
        }
        None => false,
    }
}

fn is_positive(amount: Option<Decimal>) -> bool {
    amount.is_some_and(|value| value > Decimal::ZERO)
}
