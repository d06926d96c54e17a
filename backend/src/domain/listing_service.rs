//! Listing domain service.
//!
//! Hosts create and edit listings; anyone may browse them. Uploaded photos
//! are pushed to the media store before the listing is written so a failed
//! upload never leaves a half-saved listing behind.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    LISTING_MEDIA_FOLDER, ListingService, ListingView, MediaStore, MediaUpload,
    PropertyRepository, UserRepository,
};
use crate::domain::{
    CompletionStatus, Error, HostSummary, Property, PropertyDraft, PropertyFilter, PropertyId,
    PropertyPatch, User, UserId,
};

/// Most photos accepted in a single create or update request.
pub const MAX_LISTING_UPLOADS: usize = 10;

/// Listing service implementing the driving port.
#[derive(Clone)]
pub struct ListingServiceImpl {
    properties: Arc<dyn PropertyRepository>,
    users: Arc<dyn UserRepository>,
    media: Arc<dyn MediaStore>,
    clock: Arc<dyn Clock>,
}

impl ListingServiceImpl {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        users: Arc<dyn UserRepository>,
        media: Arc<dyn MediaStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            properties,
            users,
            media,
            clock,
        }
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .find_by_id(id)
            .await?
            .map(|account| account.user))
    }

    async fn find_property(&self, id: &PropertyId) -> Result<Property, Error> {
        self.properties
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("property not found"))
    }

    async fn upload_all(&self, uploads: Vec<MediaUpload>) -> Result<Vec<String>, Error> {
        if uploads.len() > MAX_LISTING_UPLOADS {
            return Err(Error::invalid_field(
                "images",
                "too_many_images",
                format!("at most {MAX_LISTING_UPLOADS} images may be uploaded at once"),
            ));
        }
        for upload in &uploads {
            upload.ensure_image()?;
        }
        let mut urls = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let file_name = upload.file_name.clone();
            let url = self.media.upload(LISTING_MEDIA_FOLDER, upload).await?;
            debug!(%file_name, %url, "listing image uploaded");
            urls.push(url);
        }
        Ok(urls)
    }

    async fn view_for_owner(&self, property: Property) -> Result<ListingView, Error> {
        let has_account = self
            .find_user(&property.host)
            .await?
            .is_some_and(|host| host.has_payment_account());
        Ok(ListingView {
            completion: CompletionStatus::evaluate(&property, has_account),
            property,
            host: None,
        })
    }
}

fn host_summary(user: User) -> HostSummary {
    HostSummary {
        id: user.id,
        name: user.name,
        email: user.email,
        avatar: user.avatar,
    }
}

#[async_trait]
impl ListingService for ListingServiceImpl {
    async fn search(&self, filter: &PropertyFilter) -> Result<Vec<Property>, Error> {
        Ok(self.properties.search(filter).await?)
    }

    async fn get(&self, id: &PropertyId) -> Result<ListingView, Error> {
        let property = self.find_property(id).await?;
        let host = self.find_user(&property.host).await?;
        let has_account = host.as_ref().is_some_and(User::has_payment_account);
        Ok(ListingView {
            completion: CompletionStatus::evaluate(&property, has_account),
            property,
            host: host.map(host_summary),
        })
    }

    async fn list_for_host(&self, host: &UserId) -> Result<Vec<ListingView>, Error> {
        let has_account = self
            .find_user(host)
            .await?
            .is_some_and(|user| user.has_payment_account());
        let listings = self.properties.list_by_host(host).await?;
        Ok(listings
            .into_iter()
            .map(|property| ListingView {
                completion: CompletionStatus::evaluate(&property, has_account),
                property,
                host: None,
            })
            .collect())
    }

    async fn create(
        &self,
        host: &UserId,
        draft: PropertyDraft,
        uploads: Vec<MediaUpload>,
    ) -> Result<ListingView, Error> {
        let user = self
            .find_user(host)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if !user.is_host {
            return Err(Error::forbidden("only hosts can create listings"));
        }
        let uploaded = self.upload_all(uploads).await?;
        let property = draft.into_property(PropertyId::random(), user.id, uploaded, self.clock.utc());
        self.properties.insert(&property).await?;
        info!(property_id = %property.id, host_id = %user.id, "listing created");
        Ok(ListingView {
            completion: CompletionStatus::evaluate(&property, user.has_payment_account()),
            property,
            host: None,
        })
    }

    async fn update(
        &self,
        caller: &UserId,
        id: &PropertyId,
        patch: PropertyPatch,
        uploads: Vec<MediaUpload>,
    ) -> Result<ListingView, Error> {
        let mut property = self.find_property(id).await?;
        if property.host != *caller {
            return Err(Error::forbidden("only the listing owner can update it"));
        }
        let uploaded = self.upload_all(uploads).await?;
        patch.apply(&mut property, uploaded, self.clock.utc());
        if !self.properties.update(&property).await? {
            return Err(Error::not_found("property not found"));
        }
        info!(property_id = %property.id, "listing updated");
        self.view_for_owner(property).await
    }
}

#[cfg(test)]
mod tests;
