//! PostgreSQL-backed `PropertyRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PropertyPersistenceError, PropertyRepository};
use crate::domain::{Property, PropertyFilter, PropertyId, UserId};

use super::error_mapping::{map_pool_failure, map_query_failure};
use super::models::PropertyRow;
use super::pool::{DbPool, PoolError};
use super::schema::properties;

#[derive(Clone)]
pub struct DieselPropertyRepository {
    pool: DbPool,
}

impl DieselPropertyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PropertyPersistenceError {
    map_pool_failure(error, PropertyPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PropertyPersistenceError {
    map_query_failure(
        error,
        PropertyPersistenceError::query,
        PropertyPersistenceError::connection,
    )
}

fn to_row(property: &Property) -> Result<PropertyRow, PropertyPersistenceError> {
    PropertyRow::try_from(property).map_err(PropertyPersistenceError::query)
}

fn rows_to_properties(rows: Vec<PropertyRow>) -> Result<Vec<Property>, PropertyPersistenceError> {
    rows.into_iter()
        .map(|row| Property::try_from(row).map_err(PropertyPersistenceError::query))
        .collect()
}

#[async_trait]
impl PropertyRepository for DieselPropertyRepository {
    async fn insert(&self, property: &Property) -> Result<(), PropertyPersistenceError> {
        let row = to_row(property)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(properties::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, property: &Property) -> Result<bool, PropertyPersistenceError> {
        let row = to_row(property)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(properties::table.filter(properties::id.eq(row.id)))
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(
        &self,
        id: &PropertyId,
    ) -> Result<Option<Property>, PropertyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = properties::table
            .filter(properties::id.eq(id.as_uuid()))
            .select(PropertyRow::as_select())
            .first::<PropertyRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| Property::try_from(row).map_err(PropertyPersistenceError::query))
            .transpose()
    }

    async fn find_many(
        &self,
        ids: &[PropertyId],
    ) -> Result<Vec<Property>, PropertyPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = properties::table
            .filter(properties::id.eq_any(uuids))
            .select(PropertyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_properties(rows)
    }

    async fn search(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<Property>, PropertyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = properties::table
            .select(PropertyRow::as_select())
            .order((properties::created_at.desc(), properties::id.desc()))
            .limit(i64::try_from(filter.limit).unwrap_or(i64::MAX))
            .into_boxed();
        if let Some(city) = &filter.city {
            query = query.filter(properties::city.eq(city.clone()));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(properties::property_type.eq(kind.as_str()));
        }
        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_properties(rows)
    }

    async fn list_by_host(&self, host: &UserId) -> Result<Vec<Property>, PropertyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = properties::table
            .filter(properties::host_id.eq(host.as_uuid()))
            .order((properties::created_at.desc(), properties::id.desc()))
            .select(PropertyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_properties(rows)
    }
}
