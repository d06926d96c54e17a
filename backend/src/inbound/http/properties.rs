//! Listing HTTP handlers.
//!
//! ```text
//! GET  /api/properties?city=Panaji&type=Villa
//! GET  /api/properties/my-properties
//! GET  /api/properties/{id}
//! POST /api/properties        (JSON or multipart)
//! PUT  /api/properties/{id}   (JSON or multipart)
//! ```

use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, PropertyDraft, PropertyFilter, PropertyPatch, PropertyType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing_form::{ListingPayload, read_listing_form};
use crate::inbound::http::responses::PropertyBody;
use crate::inbound::http::session::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_optional, parse_property_id};

/// Filters for the public listing index. Both match exactly.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// City, matched exactly.
    #[param(example = "Panaji")]
    pub city: Option<String>,
    /// Property type label such as `Villa`.
    #[serde(rename = "type")]
    #[param(rename = "type", example = "Villa")]
    pub kind: Option<String>,
}

impl TryFrom<ListingQuery> for PropertyFilter {
    type Error = Error;

    fn try_from(query: ListingQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            city: query.city.filter(|city| !city.is_empty()),
            kind: parse_optional::<PropertyType>(query.kind)?,
            ..Self::default()
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertiesResponse {
    pub properties: Vec<PropertyBody>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyResponse {
    pub property: PropertyBody,
}

/// Search listings, newest first, at most 100.
#[utoipa::path(
    get,
    path = "/api/properties",
    params(ListingQuery),
    responses(
        (status = 200, description = "Matching listings", body = PropertiesResponse),
        (status = 400, description = "Unknown property type", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["properties"],
    operation_id = "listProperties",
    security([])
)]
#[get("")]
pub async fn list_properties(
    state: web::Data<HttpState>,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<PropertiesResponse>> {
    let filter = PropertyFilter::try_from(query.into_inner())?;
    let properties = state.listings.search(&filter).await?;
    Ok(web::Json(PropertiesResponse {
        properties: properties.into_iter().map(PropertyBody::from).collect(),
    }))
}

/// The caller's listings with their completion status.
#[utoipa::path(
    get,
    path = "/api/properties/my-properties",
    responses(
        (status = 200, description = "Caller's listings", body = PropertiesResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["properties"],
    operation_id = "listMyProperties"
)]
#[get("/my-properties")]
pub async fn my_properties(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<PropertiesResponse>> {
    let views = state.listings.list_for_host(caller.user_id()).await?;
    Ok(web::Json(PropertiesResponse {
        properties: views.into_iter().map(PropertyBody::from).collect(),
    }))
}

/// Listing detail with host summary and completion status.
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing", body = PropertyResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["properties"],
    operation_id = "getProperty",
    security([])
)]
#[get("/{id}")]
pub async fn get_property(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PropertyResponse>> {
    let id = parse_property_id(&path.into_inner())?;
    let view = state.listings.get(&id).await?;
    Ok(web::Json(PropertyResponse {
        property: view.into(),
    }))
}

/// Create a listing. Accepts JSON or multipart with up to 10 `images` files.
#[utoipa::path(
    post,
    path = "/api/properties",
    request_body(content = ListingPayload, content_type = "application/json"),
    responses(
        (status = 201, description = "Listing created", body = PropertyResponse),
        (status = 400, description = "Invalid listing", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not a host", body = Error),
        (status = 503, description = "Media host unavailable", body = Error)
    ),
    tags = ["properties"],
    operation_id = "createProperty"
)]
#[post("")]
pub async fn create_property(
    state: web::Data<HttpState>,
    caller: Authenticated,
    req: HttpRequest,
    body: Bytes,
) -> ApiResult<HttpResponse> {
    let form = read_listing_form(&req, body).await?;
    let draft = PropertyDraft::new(form.fields)?;
    let view = state
        .listings
        .create(caller.user_id(), draft, form.uploads)
        .await?;
    Ok(HttpResponse::Created().json(PropertyResponse {
        property: view.into(),
    }))
}

/// Update a listing the caller owns. Uploaded images are appended.
#[utoipa::path(
    put,
    path = "/api/properties/{id}",
    params(("id" = String, Path, description = "Listing id")),
    request_body(content = ListingPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Listing updated", body = PropertyResponse),
        (status = 400, description = "Invalid listing", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the listing", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["properties"],
    operation_id = "updateProperty"
)]
#[put("/{id}")]
pub async fn update_property(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    req: HttpRequest,
    body: Bytes,
) -> ApiResult<web::Json<PropertyResponse>> {
    let id = parse_property_id(&path.into_inner())?;
    let form = read_listing_form(&req, body).await?;
    let patch = PropertyPatch::new(form.fields)?;
    let view = state
        .listings
        .update(caller.user_id(), &id, patch, form.uploads)
        .await?;
    Ok(web::Json(PropertyResponse {
        property: view.into(),
    }))
}
