//! Port implementations over [`MemoryStore`].

use std::cmp::Reverse;

use async_trait::async_trait;

use crate::domain::ports::{
    BookingPersistenceError, BookingRepository, PropertyPersistenceError, PropertyRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Booking, BookingId, EmailAddress, HashedPassword, Property, PropertyFilter, PropertyId, User,
    UserAccount, UserId,
};

use super::{MemoryStore, Poisoned};

impl From<Poisoned> for UserPersistenceError {
    fn from(err: Poisoned) -> Self {
        Self::query(err.to_string())
    }
}

impl From<Poisoned> for PropertyPersistenceError {
    fn from(err: Poisoned) -> Self {
        Self::query(err.to_string())
    }
}

impl From<Poisoned> for BookingPersistenceError {
    fn from(err: Poisoned) -> Self {
        Self::query(err.to_string())
    }
}

fn newest_first_properties(mut found: Vec<Property>) -> Vec<Property> {
    found.sort_by_key(|property| Reverse((property.created_at, *property.id.as_uuid())));
    found
}

fn newest_first_bookings(mut found: Vec<Booking>) -> Vec<Booking> {
    found.sort_by_key(|booking| Reverse((booking.created_at, *booking.id.as_uuid())));
    found
}

#[derive(Debug, Clone)]
pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut tables = self.store.write()?;
        if tables
            .users
            .values()
            .any(|existing| existing.user.email == account.user.email)
        {
            return Err(UserPersistenceError::duplicate_email());
        }
        tables.users.insert(account.user.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.store.read()?.users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let tables = self.store.read()?;
        Ok(tables
            .users
            .values()
            .find(|account| account.user.email == *email)
            .cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.store.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id))
            .map(|account| account.user.clone())
            .collect())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut tables = self.store.write()?;
        let Some(account) = tables.users.get_mut(&user.id) else {
            return Ok(false);
        };
        account.user = User {
            email: account.user.email.clone(),
            created_at: account.user.created_at,
            ..user.clone()
        };
        Ok(true)
    }

    async fn update_password(
        &self,
        id: &UserId,
        hash: &HashedPassword,
    ) -> Result<bool, UserPersistenceError> {
        let mut tables = self.store.write()?;
        Ok(tables
            .users
            .get_mut(id)
            .map(|account| account.password_hash = hash.clone())
            .is_some())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.store.write()?.remove_user(id))
    }
}

#[derive(Debug, Clone)]
pub struct MemoryPropertyRepository {
    store: MemoryStore,
}

impl MemoryPropertyRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PropertyRepository for MemoryPropertyRepository {
    async fn insert(&self, property: &Property) -> Result<(), PropertyPersistenceError> {
        let mut tables = self.store.write()?;
        if !tables.users.contains_key(&property.host) {
            return Err(PropertyPersistenceError::query(format!(
                "host {} does not exist",
                property.host
            )));
        }
        tables.properties.insert(property.id, property.clone());
        Ok(())
    }

    async fn update(&self, property: &Property) -> Result<bool, PropertyPersistenceError> {
        let mut tables = self.store.write()?;
        let Some(stored) = tables.properties.get_mut(&property.id) else {
            return Ok(false);
        };
        *stored = property.clone();
        Ok(true)
    }

    async fn find_by_id(
        &self,
        id: &PropertyId,
    ) -> Result<Option<Property>, PropertyPersistenceError> {
        Ok(self.store.read()?.properties.get(id).cloned())
    }

    async fn find_many(
        &self,
        ids: &[PropertyId],
    ) -> Result<Vec<Property>, PropertyPersistenceError> {
        let tables = self.store.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.properties.get(id))
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<Property>, PropertyPersistenceError> {
        let tables = self.store.read()?;
        let matching = tables
            .properties
            .values()
            .filter(|property| filter.matches(property))
            .cloned()
            .collect();
        let mut found = newest_first_properties(matching);
        found.truncate(filter.limit);
        Ok(found)
    }

    async fn list_by_host(&self, host: &UserId) -> Result<Vec<Property>, PropertyPersistenceError> {
        let tables = self.store.read()?;
        Ok(newest_first_properties(
            tables
                .properties
                .values()
                .filter(|property| property.host == *host)
                .cloned()
                .collect(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct MemoryBookingRepository {
    store: MemoryStore,
}

impl MemoryBookingRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), BookingPersistenceError> {
        let mut tables = self.store.write()?;
        if !tables.users.contains_key(&booking.guest)
            || !tables.properties.contains_key(&booking.property)
        {
            return Err(BookingPersistenceError::query(format!(
                "booking {} references a missing guest or listing",
                booking.id
            )));
        }
        tables.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<bool, BookingPersistenceError> {
        let mut tables = self.store.write()?;
        let Some(stored) = tables.bookings.get_mut(&booking.id) else {
            return Ok(false);
        };
        stored.payment_status = booking.payment_status;
        stored.order_id.clone_from(&booking.order_id);
        stored.payment_id.clone_from(&booking.payment_id);
        stored.updated_at = booking.updated_at;
        Ok(true)
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingPersistenceError> {
        Ok(self.store.read()?.bookings.get(id).cloned())
    }

    async fn list_for_guest(&self, guest: &UserId) -> Result<Vec<Booking>, BookingPersistenceError> {
        let tables = self.store.read()?;
        Ok(newest_first_bookings(
            tables
                .bookings
                .values()
                .filter(|booking| booking.guest == *guest)
                .cloned()
                .collect(),
        ))
    }

    async fn list_for_properties(
        &self,
        properties: &[PropertyId],
    ) -> Result<Vec<Booking>, BookingPersistenceError> {
        let tables = self.store.read()?;
        Ok(newest_first_bookings(
            tables
                .bookings
                .values()
                .filter(|booking| properties.contains(&booking.property))
                .cloned()
                .collect(),
        ))
    }
}
