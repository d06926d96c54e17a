//! Driving port for listing use-cases.
use async_trait::async_trait;

use crate::domain::{
    CompletionStatus, Error, HostSummary, Property, PropertyDraft, PropertyFilter, PropertyId,
    PropertyPatch, UserId,
};

use super::MediaUpload;

/// A listing with its derived checklist.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingView {
    pub property: Property,
    pub completion: CompletionStatus,
    /// Present on the public detail view only.
    pub host: Option<HostSummary>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingService: Send + Sync {
    async fn search(&self, filter: &PropertyFilter) -> Result<Vec<Property>, Error>;

    async fn get(&self, id: &PropertyId) -> Result<ListingView, Error>;

    async fn list_for_host(&self, host: &UserId) -> Result<Vec<ListingView>, Error>;

    /// Create a listing owned by `host`. Uploads are stored before the
    /// listing is saved and appended after any submitted image URLs.
    async fn create(
        &self,
        host: &UserId,
        draft: PropertyDraft,
        uploads: Vec<MediaUpload>,
    ) -> Result<ListingView, Error>;

    /// Update a listing the caller owns.
    async fn update(
        &self,
        caller: &UserId,
        id: &PropertyId,
        patch: PropertyPatch,
        uploads: Vec<MediaUpload>,
    ) -> Result<ListingView, Error>;
}
