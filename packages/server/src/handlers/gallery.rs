use axum::Json;
use axum::extract::{Path, State};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::instrument;

use crate::entity::image_asset;
use crate::error::{AppError, ErrorBody};
use crate::extractors::origin::RequestOrigin;
use crate::models::gallery::ImageItem;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/images/",
    tag = "Gallery",
    operation_id = "listPublishedImages",
    summary = "List published images",
    description = "Returns every published image as a JSON array, ordered by ascending \
        `display_order` with newer images first on ties. No pagination — the whole \
        published set is returned on every call. File references are resolved to \
        absolute URLs using the request's scheme and host.",
    responses(
        (status = 200, description = "Published images, possibly empty", body = Vec<ImageItem>),
    ),
)]
#[instrument(skip(state, origin))]
pub async fn list_images(
    State(state): State<AppState>,
    origin: RequestOrigin,
) -> Result<Json<Vec<ImageItem>>, AppError> {
    let images = image_asset::Entity::find_published()
        .all(&state.db)
        .await?;

    let items = images
        .into_iter()
        .map(|m| ImageItem::render(m, &origin))
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/images/{id}/",
    tag = "Gallery",
    operation_id = "getPublishedImage",
    summary = "Get a published image by ID",
    description = "Returns a single published image. An image that exists but is \
        unpublished is indistinguishable from one that does not exist: both are 404.",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image details", body = ImageItem),
        (status = 404, description = "Absent or unpublished (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, origin), fields(id))]
pub async fn get_image(
    State(state): State<AppState>,
    origin: RequestOrigin,
    Path(id): Path<i32>,
) -> Result<Json<ImageItem>, AppError> {
    let image = image_asset::Entity::find_published()
        .filter(image_asset::Column::Id.eq(id))
        .one(&state.db)
        .await?
        .ok_or_else(AppError::not_found)?;

    Ok(Json(ImageItem::render(image, &origin)))
}
