//! PostgreSQL-backed `BookingRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{BookingPersistenceError, BookingRepository};
use crate::domain::{Booking, BookingId, PropertyId, UserId};

use super::error_mapping::{map_pool_failure, map_query_failure};
use super::models::{BookingPaymentChangeset, BookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::bookings;

#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookingPersistenceError {
    map_pool_failure(error, BookingPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookingPersistenceError {
    map_query_failure(
        error,
        BookingPersistenceError::query,
        BookingPersistenceError::connection,
    )
}

fn rows_to_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, BookingPersistenceError> {
    rows.into_iter()
        .map(|row| Booking::try_from(row).map_err(BookingPersistenceError::query))
        .collect()
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), BookingPersistenceError> {
        let row = BookingRow::try_from(booking).map_err(BookingPersistenceError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(bookings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, booking: &Booking) -> Result<bool, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(bookings::table.filter(bookings::id.eq(booking.id.as_uuid())))
            .set(BookingPaymentChangeset::from(booking))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = bookings::table
            .filter(bookings::id.eq(id.as_uuid()))
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| Booking::try_from(row).map_err(BookingPersistenceError::query))
            .transpose()
    }

    async fn list_for_guest(&self, guest: &UserId) -> Result<Vec<Booking>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = bookings::table
            .filter(bookings::guest_id.eq(guest.as_uuid()))
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_bookings(rows)
    }

    async fn list_for_properties(
        &self,
        properties: &[PropertyId],
    ) -> Result<Vec<Booking>, BookingPersistenceError> {
        if properties.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<Uuid> = properties.iter().map(|id| *id.as_uuid()).collect();
        let rows = bookings::table
            .filter(bookings::property_id.eq_any(uuids))
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_bookings(rows)
    }
}
