use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::storage::{BoxReader, MediaStore};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::image_asset;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthOperator;
use crate::extractors::json::AppJson;
use crate::models::image::*;
use crate::models::shared::escape_like;
use crate::state::AppState;
use crate::utils::filename::sanitize_upload_filename;

/// Logical prefix every stored image lives under.
pub const IMAGE_UPLOAD_PREFIX: &str = "uploads/images";

/// Body limit layer for image uploads (20MB).
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(20 * 1024 * 1024)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Images",
    operation_id = "createImage",
    summary = "Upload a new image",
    description = "Creates an image from a multipart form. The `file` field is required \
        and must carry a filename; optional `title`, `alt_text`, `is_published` and \
        `display_order` text fields fill in the metadata. New images default to \
        unpublished with display order 0. Body limit: 20 MB.",
    request_body(content_type = "multipart/form-data", description = "Image file with optional metadata fields"),
    responses(
        (status = 201, description = "Image created", body = ImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, operator, multipart), fields(operator = %operator.username))]
pub async fn create_image(
    operator: AuthOperator,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut stored: Option<String> = None;
    let mut meta = UploadMeta::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
                let filename = sanitize_upload_filename(&filename)
                    .map_err(|e| AppError::Validation(e.message().into()))?;

                stored = Some(
                    stream_field_to_media(
                        field,
                        &filename,
                        &*state.media,
                        state.config.storage.max_upload_size,
                    )
                    .await?,
                );
            }
            Some("title") => meta.title = text_field(field, "title").await?,
            Some("alt_text") => meta.alt_text = text_field(field, "alt_text").await?,
            Some("is_published") => {
                let value = text_field(field, "is_published").await?;
                meta.is_published = parse_bool_field("is_published", &value)?;
            }
            Some("display_order") => {
                let value = text_field(field, "display_order").await?;
                meta.display_order = value.trim().parse::<i32>().map_err(|_| {
                    AppError::Validation(format!("display_order must be an integer, got '{value}'"))
                })?;
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let file = stored.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    if let Err(e) = validate_upload_meta(&meta) {
        // Best effort.
        let _ = state.media.delete(&file).await;
        return Err(e);
    }

    let now = chrono::Utc::now();
    let new_image = image_asset::ActiveModel {
        file: Set(file.clone()),
        title: Set(meta.title),
        alt_text: Set(meta.alt_text),
        is_published: Set(meta.is_published),
        display_order: Set(meta.display_order),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = match new_image.insert(&state.db).await {
        Ok(model) => model,
        Err(e) => {
            // Best effort.
            let _ = state.media.delete(&file).await;
            return Err(e.into());
        }
    };

    tracing::info!(id = model.id, file = %model.file, "Created {}", model.display_title());

    Ok((StatusCode::CREATED, Json(ImageResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Images",
    operation_id = "listImages",
    summary = "List images with filters and search",
    description = "Returns all images regardless of publish state, in the canonical \
        presentation order (ascending `display_order`, newest first on ties). \
        Filterable by publish state and creation window; searchable by title and \
        alt text (case-insensitive).",
    params(ImageListQuery),
    responses(
        (status = 200, description = "List of images", body = Vec<ImageListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, operator, query), fields(operator = %operator.username))]
pub async fn list_images(
    operator: AuthOperator,
    State(state): State<AppState>,
    Query(query): Query<ImageListQuery>,
) -> Result<Json<Vec<ImageListItem>>, AppError> {
    let mut select = image_asset::Entity::find_ordered();

    if let Some(published) = query.published {
        select = select.filter(image_asset::Column::IsPublished.eq(published));
    }

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(image_asset::Column::Title)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(image_asset::Column::AltText)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }
    }

    if let Some(after) = query.created_after {
        select = select.filter(image_asset::Column::CreatedAt.gte(after));
    }
    if let Some(before) = query.created_before {
        select = select.filter(image_asset::Column::CreatedAt.lte(before));
    }

    let items = select
        .select_only()
        .column(image_asset::Column::Id)
        .column(image_asset::Column::Title)
        .column(image_asset::Column::IsPublished)
        .column(image_asset::Column::DisplayOrder)
        .column(image_asset::Column::CreatedAt)
        .into_model::<ImageListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Get an image by ID",
    description = "Returns the full management view of an image, including its stored \
        file path and publish state.",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image details", body = ImageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, operator), fields(id, operator = %operator.username))]
pub async fn get_image(
    operator: AuthOperator,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ImageResponse>, AppError> {
    let model = find_image(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Images",
    operation_id = "updateImage",
    summary = "Update an image's metadata",
    description = "Partially updates title, alt text, publish state or display order \
        using PATCH semantics — only provided fields are modified, and `updated_at` \
        is refreshed. An empty payload returns the current resource unchanged. The \
        stored file itself is immutable; upload a new image instead.",
    params(("id" = i32, Path, description = "Image ID")),
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "Image updated", body = ImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, operator, payload), fields(id, operator = %operator.username))]
pub async fn update_image(
    operator: AuthOperator,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    validate_update_image(&payload)?;

    if payload == UpdateImageRequest::default() {
        let existing = find_image(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_image(&txn, id).await?;
    let mut active: image_asset::ActiveModel = existing.into();

    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(alt_text) = payload.alt_text {
        active.alt_text = Set(alt_text);
    }
    if let Some(is_published) = payload.is_published {
        active.is_published = Set(is_published);
    }
    if let Some(display_order) = payload.display_order {
        active.display_order = Set(display_order);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Images",
    operation_id = "deleteImage",
    summary = "Delete an image",
    description = "Permanently deletes an image record along with its stored file.",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, operator), fields(id, operator = %operator.username))]
pub async fn delete_image(
    operator: AuthOperator,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let image = find_image(&state.db, id).await?;

    image_asset::Entity::delete_by_id(image.id)
        .exec(&state.db)
        .await?;

    // The record owns the blob: removing one removes the other.
    if let Err(e) = state.media.delete(&image.file).await {
        tracing::warn!("Failed to remove blob '{}': {}", image.file, e);
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn find_image<C: ConnectionTrait>(db: &C, id: i32) -> Result<image_asset::Model, AppError> {
    image_asset::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))
}

async fn text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

fn parse_bool_field(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(AppError::Validation(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

/// Stream a multipart field into the media store via a temp file.
async fn stream_field_to_media(
    mut field: axum::extract::multipart::Field<'_>,
    filename: &str,
    media: &dyn MediaStore,
    max_size: u64,
) -> Result<String, AppError> {
    let temp_path = std::env::temp_dir().join(format!("galerie-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

        let mut total_size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > max_size {
                return Err(AppError::Validation(format!(
                    "File exceeds maximum size of {max_size} bytes"
                )));
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;
        drop(temp_file);

        let file = tokio::fs::File::open(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
        let reader: BoxReader = Box::new(file);
        let stored = media.save_stream(filename, reader).await?;

        Ok(stored)
    }
    .await;

    // Best effort.
    let _ = tokio::fs::remove_file(&temp_path).await;

    result
}
