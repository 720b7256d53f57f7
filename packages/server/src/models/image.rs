use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::{validate_display_order, validate_display_string};

/// Full management view of an image, regardless of publish state.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    pub id: i32,
    /// Relative path of the stored blob (`uploads/images/...`).
    pub file: String,
    pub title: String,
    pub alt_text: String,
    pub is_published: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape for the management list: the columns an operator scans.
#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ImageListItem {
    pub id: i32,
    pub title: String,
    pub is_published: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ImageListQuery {
    /// Keep only published (`true`) or unpublished (`false`) images.
    pub published: Option<bool>,
    /// Case-insensitive substring match against title and alt text.
    pub search: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateImageRequest {
    pub title: Option<String>,
    pub alt_text: Option<String>,
    pub is_published: Option<bool>,
    pub display_order: Option<i32>,
}

/// Metadata fields accompanying an upload. Everything is optional; the
/// defaults describe a freshly created private image.
#[derive(Default)]
pub struct UploadMeta {
    pub title: String,
    pub alt_text: String,
    pub is_published: bool,
    pub display_order: i32,
}

impl From<crate::entity::image_asset::Model> for ImageResponse {
    fn from(m: crate::entity::image_asset::Model) -> Self {
        Self {
            id: m.id,
            file: m.file,
            title: m.title,
            alt_text: m.alt_text,
            is_published: m.is_published,
            display_order: m.display_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_upload_meta(meta: &UploadMeta) -> Result<(), AppError> {
    validate_display_string(&meta.title, "title")?;
    validate_display_string(&meta.alt_text, "alt_text")?;
    validate_display_order(meta.display_order)
}

pub fn validate_update_image(req: &UpdateImageRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_display_string(title, "title")?;
    }
    if let Some(ref alt_text) = req.alt_text {
        validate_display_string(alt_text, "alt_text")?;
    }
    if let Some(order) = req.display_order {
        validate_display_order(order)?;
    }
    Ok(())
}
