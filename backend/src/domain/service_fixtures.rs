//! Shared fixtures for domain service tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;

use crate::domain::{
    EmailAddress, HashedPassword, MIN_LISTING_IMAGES, PersonName, PhoneNumber, Property,
    PropertyDraft, PropertyFields, PropertyId, PropertyType, User, UserAccount, UserId,
};

pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock pinned to [`fixture_now`].
pub(crate) struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_now()
    }
}

pub(crate) fn user(name: &str, email: &str, is_host: bool) -> User {
    User {
        id: UserId::random(),
        name: PersonName::new(name).expect("fixture name"),
        email: EmailAddress::new(email).expect("fixture email"),
        phone: PhoneNumber::new("+91 98470 12345").expect("fixture phone"),
        avatar: None,
        is_host,
        payment_account: None,
        created_at: fixture_now(),
    }
}

/// Wrap `user` with the hash `PrefixHasher` would produce for `Secret1!`.
pub(crate) fn account(user: User) -> UserAccount {
    UserAccount {
        user,
        password_hash: HashedPassword::new("hashed:Secret1!"),
    }
}

/// A bookable villa at 4500 a night owned by `host`.
pub(crate) fn complete_villa(host: UserId) -> Property {
    let images = (0..MIN_LISTING_IMAGES)
        .map(|i| format!("https://img.example/villa-{i}.jpg"))
        .collect();
    PropertyDraft::new(PropertyFields {
        name: Some("Sea Breeze".into()),
        kind: Some(PropertyType::Villa),
        state: Some("Goa".into()),
        city: Some("Panaji".into()),
        address: Some("12 Beach Road".into()),
        price_per_day: Some(Decimal::new(4500, 0)),
        max_guests: Some(4),
        images: Some(images),
        ..PropertyFields::default()
    })
    .expect("valid fixture draft")
    .into_property(PropertyId::random(), host, Vec::new(), fixture_now())
}
