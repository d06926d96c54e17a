//! Booking domain service.
//!
//! Prices are always computed here from the stored listing. Gateway outages
//! never block a booking: order creation falls back to payment on location,
//! and a failed payout after verification is logged and left for manual
//! settlement.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::ports::{
    BOOKING_CURRENCY, BookingRepository, BookingService, OrderRequest, PaymentGateway,
    PaymentOrder, PropertyRepository, TransferRequest, UserRepository,
};
use crate::domain::pricing::{quote, stay_term_for};
use crate::domain::{
    Booking, BookingId, BookingRequest, BookingView, CompletionStatus, Error, GuestContact,
    PaymentMethod, PaymentStatus, PaymentVerification, Property, PropertyId, PropertySummary,
    User, UserId,
};

/// Booking service implementing the driving port.
#[derive(Clone)]
pub struct BookingServiceImpl {
    bookings: Arc<dyn BookingRepository>,
    properties: Arc<dyn PropertyRepository>,
    users: Arc<dyn UserRepository>,
    gateway: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
}

impl BookingServiceImpl {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        properties: Arc<dyn PropertyRepository>,
        users: Arc<dyn UserRepository>,
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            properties,
            users,
            gateway,
            clock,
        }
    }

    async fn bookable_property(&self, request: &BookingRequest) -> Result<Property, Error> {
        let id = request.property.ok_or_else(|| {
            Error::invalid_field("propertyId", "missing_field", "propertyId is required")
        })?;
        let property = self
            .properties
            .find_by_id(&id)
            .await?
            .ok_or_else(|| Error::not_found("property not found"))?;
        if !property.available {
            return Err(Error::invalid_field(
                "propertyId",
                "unavailable",
                "property is not accepting bookings",
            ));
        }
        if !CompletionStatus::evaluate(&property, false).complete {
            return Err(Error::invalid_field(
                "propertyId",
                "listing_incomplete",
                "property listing is not complete",
            ));
        }
        Ok(property)
    }

    /// Open a gateway order, or `None` when the gateway is unusable.
    async fn open_order(&self, booking: &BookingId, amount: Decimal) -> Option<PaymentOrder> {
        let request = OrderRequest {
            amount,
            currency: BOOKING_CURRENCY.to_owned(),
            receipt: format!("booking_{booking}"),
        };
        match self.gateway.create_order(&request).await {
            Ok(order) => Some(order),
            Err(err) => {
                warn!(
                    booking_id = %booking,
                    error = %err,
                    "payment order failed; falling back to payment on location"
                );
                None
            }
        }
    }

    async fn pay_out_host(&self, booking: &Booking) {
        let host = match self.host_of(&booking.property).await {
            Ok(Some(host)) => host,
            Ok(None) => return,
            Err(err) => {
                warn!(booking_id = %booking.id, error = %err, "host lookup for payout failed");
                return;
            }
        };
        let Some(account) = host.payment_account else {
            info!(
                booking_id = %booking.id,
                host_id = %host.id,
                "host has no payout account; skipping transfer"
            );
            return;
        };
        let request = TransferRequest {
            account,
            amount: booking.total_price,
            currency: BOOKING_CURRENCY.to_owned(),
            booking: booking.id,
        };
        match self.gateway.transfer(&request).await {
            Ok(transfer_id) => {
                info!(booking_id = %booking.id, %transfer_id, "host payout transferred");
            }
            Err(err) => {
                warn!(booking_id = %booking.id, error = %err, "host payout failed");
            }
        }
    }

    async fn host_of(&self, property: &PropertyId) -> Result<Option<User>, Error> {
        let Some(property) = self.properties.find_by_id(property).await? else {
            return Ok(None);
        };
        Ok(self
            .users
            .find_by_id(&property.host)
            .await?
            .map(|account| account.user))
    }

    async fn summaries(
        &self,
        bookings: &[Booking],
    ) -> Result<HashMap<PropertyId, PropertySummary>, Error> {
        let ids = distinct(bookings.iter().map(|booking| booking.property));
        let properties = self.properties.find_many(&ids).await?;
        Ok(properties
            .iter()
            .map(|property| (property.id, PropertySummary::from(property)))
            .collect())
    }
}

fn distinct<T: Copy + Eq + Hash>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(*item)).collect()
}

#[async_trait]
impl BookingService for BookingServiceImpl {
    async fn create(&self, guest: &UserId, request: BookingRequest) -> Result<Booking, Error> {
        let property = self.bookable_property(&request).await?;

        let guests = request.guests.unwrap_or(1);
        if guests == 0 {
            return Err(Error::invalid_field(
                "guests",
                "zero_guests",
                "at least one guest is required",
            ));
        }
        if let Some(max) = property.max_guests.filter(|max| guests > *max) {
            return Err(Error::invalid_field(
                "guests",
                "too_many_guests",
                format!("this property accepts at most {max} guests"),
            ));
        }

        let term = stay_term_for(property.kind, &request)?;
        let total_price = quote(&property, &term)?;
        let id = BookingId::random();

        let (payment_status, payment_method, order_id) =
            match request.payment_method.unwrap_or(PaymentMethod::Online) {
                PaymentMethod::PayOnLocation => {
                    (PaymentStatus::PayOnLocation, PaymentMethod::PayOnLocation, None)
                }
                PaymentMethod::Online => match self.open_order(&id, total_price).await {
                    Some(order) => (PaymentStatus::Pending, PaymentMethod::Online, Some(order.id)),
                    None => (PaymentStatus::PayOnLocation, PaymentMethod::PayOnLocation, None),
                },
            };

        let now = self.clock.utc();
        let booking = Booking {
            id,
            guest: *guest,
            property: property.id,
            term,
            guests,
            total_price,
            payment_status,
            payment_method,
            order_id,
            payment_id: None,
            created_at: now,
            updated_at: now,
        };
        self.bookings.insert(&booking).await?;
        info!(
            booking_id = %booking.id,
            property_id = %property.id,
            total = %total_price,
            status = booking.payment_status.as_str(),
            "booking created"
        );
        Ok(booking)
    }

    async fn verify_payment(
        &self,
        caller: &UserId,
        verification: PaymentVerification,
    ) -> Result<Booking, Error> {
        let PaymentVerification {
            booking: booking_id,
            payment_id,
            order_id,
        } = verification;
        let mut booking = self
            .bookings
            .find_by_id(&booking_id)
            .await?
            .ok_or_else(|| Error::not_found("booking not found"))?;
        if booking.guest != *caller {
            return Err(Error::forbidden("only the guest who booked can verify payment"));
        }
        if booking.payment_status == PaymentStatus::Paid {
            return Err(Error::conflict("booking is already paid"));
        }
        if booking
            .order_id
            .as_deref()
            .is_some_and(|expected| expected != order_id)
        {
            return Err(Error::invalid_field(
                "orderId",
                "order_mismatch",
                "orderId does not match the booking",
            ));
        }

        booking.mark_paid(payment_id, order_id, self.clock.utc());
        if !self.bookings.update(&booking).await? {
            return Err(Error::not_found("booking not found"));
        }
        info!(booking_id = %booking.id, "booking payment verified");

        self.pay_out_host(&booking).await;
        Ok(booking)
    }

    async fn guest_bookings(&self, guest: &UserId) -> Result<Vec<BookingView>, Error> {
        let bookings = self.bookings.list_for_guest(guest).await?;
        let summaries = self.summaries(&bookings).await?;
        Ok(bookings
            .into_iter()
            .map(|booking| BookingView {
                property: summaries.get(&booking.property).cloned(),
                guest: None,
                booking,
            })
            .collect())
    }

    async fn host_bookings(&self, host: &UserId) -> Result<Vec<BookingView>, Error> {
        let listings = self.properties.list_by_host(host).await?;
        if listings.is_empty() {
            return Ok(Vec::new());
        }
        let summaries: HashMap<PropertyId, PropertySummary> = listings
            .iter()
            .map(|property| (property.id, PropertySummary::from(property)))
            .collect();
        let ids: Vec<PropertyId> = summaries.keys().copied().collect();
        let bookings = self.bookings.list_for_properties(&ids).await?;

        let guest_ids = distinct(bookings.iter().map(|booking| booking.guest));
        let contacts: HashMap<UserId, GuestContact> = self
            .users
            .find_many(&guest_ids)
            .await?
            .into_iter()
            .map(|user| {
                (
                    user.id,
                    GuestContact {
                        id: user.id,
                        name: user.name,
                        email: user.email,
                        phone: user.phone,
                    },
                )
            })
            .collect();

        Ok(bookings
            .into_iter()
            .map(|booking| BookingView {
                property: summaries.get(&booking.property).cloned(),
                guest: contacts.get(&booking.guest).cloned(),
                booking,
            })
            .collect())
    }
}
