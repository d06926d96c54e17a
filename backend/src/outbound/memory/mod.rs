//! Process-local adapters for the repository ports.
//!
//! Used when no database URL is configured and by the end-to-end tests. All
//! three repositories share one [`MemoryStore`] so deleting a user cascades
//! to their listings and to every booking that references either.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Booking, BookingId, Property, PropertyId, UserAccount, UserId};

mod repositories;

pub use repositories::{MemoryBookingRepository, MemoryPropertyRepository, MemoryUserRepository};

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: HashMap<UserId, UserAccount>,
    pub properties: HashMap<PropertyId, Property>,
    pub bookings: HashMap<BookingId, Booking>,
}

impl Tables {
    /// Remove a user and everything hanging off them.
    pub(crate) fn remove_user(&mut self, id: &UserId) -> bool {
        if self.users.remove(id).is_none() {
            return false;
        }
        self.properties.retain(|_, property| property.host != *id);
        let properties = &self.properties;
        self.bookings.retain(|_, booking| {
            booking.guest != *id && properties.contains_key(&booking.property)
        });
        true
    }
}

/// Shared tables behind a read/write lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

/// The lock was poisoned by a panicking writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Poisoned;

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> MemoryUserRepository {
        MemoryUserRepository::new(self.clone())
    }

    pub fn properties(&self) -> MemoryPropertyRepository {
        MemoryPropertyRepository::new(self.clone())
    }

    pub fn bookings(&self) -> MemoryBookingRepository {
        MemoryBookingRepository::new(self.clone())
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, Poisoned> {
        self.tables.read().map_err(|_| Poisoned)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, Poisoned> {
        self.tables.write().map_err(|_| Poisoned)
    }
}

impl std::fmt::Display for Poisoned {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("in-memory store lock poisoned")
    }
}
