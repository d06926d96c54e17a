//! Tests for the listing service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MediaStoreError, MockMediaStore, MockPropertyRepository, MockUserRepository,
};
use crate::domain::service_fixtures::{self, FixtureClock, complete_villa};
use crate::domain::{ErrorCode, PaymentAccountId, PropertyFields, PropertyType};

fn make_service(
    properties: MockPropertyRepository,
    users: MockUserRepository,
    media: MockMediaStore,
) -> ListingServiceImpl {
    ListingServiceImpl::new(
        Arc::new(properties),
        Arc::new(users),
        Arc::new(media),
        Arc::new(FixtureClock),
    )
}

#[fixture]
fn host() -> User {
    let mut host = service_fixtures::user("Meera Pillai", "meera@example.com", true);
    host.payment_account = Some(PaymentAccountId::new("acc_meera").expect("account id"));
    host
}

fn users_returning(user: User) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(service_fixtures::account(user.clone()))));
    users
}

fn photo(name: &str) -> MediaUpload {
    MediaUpload {
        file_name: name.into(),
        content_type: Some("image/jpeg".into()),
        bytes: b"jpeg".to_vec(),
    }
}

fn draft() -> PropertyDraft {
    PropertyDraft::new(PropertyFields {
        name: Some("Hilltop Resort".into()),
        kind: Some(PropertyType::Resort),
        images: Some(vec!["https://img.example/first.jpg".into()]),
        ..PropertyFields::default()
    })
    .expect("valid draft")
}

#[rstest]
#[tokio::test]
async fn create_uploads_images_after_submitted_urls(host: User) {
    let host_id = host.id;
    let mut properties = MockPropertyRepository::new();
    properties
        .expect_insert()
        .withf(move |property| property.host == host_id && property.images.len() == 3)
        .times(1)
        .return_once(|_| Ok(()));
    let mut media = MockMediaStore::new();
    media
        .expect_upload()
        .withf(|folder, _| folder == LISTING_MEDIA_FOLDER)
        .times(2)
        .returning(|_, upload| Ok(format!("https://cdn.example/{}", upload.file_name)));

    let view = make_service(properties, users_returning(host), media)
        .create(&host_id, draft(), vec![photo("a.jpg"), photo("b.jpg")])
        .await
        .expect("listing created");

    assert_eq!(
        view.property.images,
        vec![
            "https://img.example/first.jpg".to_owned(),
            "https://cdn.example/a.jpg".to_owned(),
            "https://cdn.example/b.jpg".to_owned(),
        ]
    );
    assert!(view.completion.payment_account);
    assert!(!view.completion.complete);
}

#[tokio::test]
async fn guests_cannot_create_listings() {
    let guest = service_fixtures::user("Ravi Kumar", "ravi@example.com", false);
    let guest_id = guest.id;
    let mut properties = MockPropertyRepository::new();
    properties.expect_insert().never();

    let err = make_service(properties, users_returning(guest), MockMediaStore::new())
        .create(&guest_id, draft(), Vec::new())
        .await
        .expect_err("guest");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn too_many_uploads_are_rejected_before_storing(host: User) {
    let host_id = host.id;
    let mut media = MockMediaStore::new();
    media.expect_upload().never();
    let uploads = (0..=MAX_LISTING_UPLOADS)
        .map(|i| photo(&format!("{i}.jpg")))
        .collect();

    let err = make_service(MockPropertyRepository::new(), users_returning(host), media)
        .create(&host_id, draft(), uploads)
        .await
        .expect_err("too many");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn failed_upload_leaves_no_listing(host: User) {
    let host_id = host.id;
    let mut properties = MockPropertyRepository::new();
    properties.expect_insert().never();
    let mut media = MockMediaStore::new();
    media
        .expect_upload()
        .times(1)
        .return_once(|_, _| Err(MediaStoreError::transport("connection reset")));

    let err = make_service(properties, users_returning(host), media)
        .create(&host_id, draft(), vec![photo("a.jpg")])
        .await
        .expect_err("upload failed");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn only_the_owner_may_update(host: User) {
    let listing = complete_villa(host.id);
    let listing_id = listing.id;
    let mut properties = MockPropertyRepository::new();
    properties
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(listing)));
    properties.expect_update().never();

    let patch = PropertyPatch::new(PropertyFields::default()).expect("patch");
    let err = make_service(properties, MockUserRepository::new(), MockMediaStore::new())
        .update(&UserId::random(), &listing_id, patch, Vec::new())
        .await
        .expect_err("not owner");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_appends_uploads_to_existing_images(host: User) {
    let host_id = host.id;
    let listing = complete_villa(host_id);
    let listing_id = listing.id;
    let existing = listing.images.len();
    let mut properties = MockPropertyRepository::new();
    properties
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(listing)));
    properties
        .expect_update()
        .withf(move |property| property.images.len() == existing + 1)
        .times(1)
        .return_once(|_| Ok(true));
    let mut media = MockMediaStore::new();
    media
        .expect_upload()
        .times(1)
        .return_once(|_, _| Ok("https://cdn.example/new.jpg".to_owned()));

    let patch = PropertyPatch::new(PropertyFields {
        available: Some(false),
        ..PropertyFields::default()
    })
    .expect("patch");
    let view = make_service(properties, users_returning(host), media)
        .update(&host_id, &listing_id, patch, vec![photo("new.jpg")])
        .await
        .expect("updated");

    assert!(!view.property.available);
    assert_eq!(
        view.property.images.last().map(String::as_str),
        Some("https://cdn.example/new.jpg")
    );
    assert!(view.completion.complete);
}

#[rstest]
#[tokio::test]
async fn detail_view_carries_host_summary(host: User) {
    let listing = complete_villa(host.id);
    let listing_id = listing.id;
    let mut properties = MockPropertyRepository::new();
    properties
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(listing)));

    let view = make_service(properties, users_returning(host.clone()), MockMediaStore::new())
        .get(&listing_id)
        .await
        .expect("found");

    let summary = view.host.expect("host summary");
    assert_eq!(summary.email, host.email);
    assert!(view.completion.payment_account);
}

#[tokio::test]
async fn unknown_listing_is_not_found() {
    let mut properties = MockPropertyRepository::new();
    properties
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));

    let err = make_service(properties, MockUserRepository::new(), MockMediaStore::new())
        .get(&PropertyId::random())
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
