use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::image_asset;
use crate::extractors::origin::RequestOrigin;

/// Public item schema — exactly these six keys. Front ends bind to this
/// shape directly, so nothing may be added or removed without a contract
/// change on their side too.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageItem {
    pub id: i32,
    pub title: String,
    pub alt_text: String,
    pub display_order: i32,
    /// Absolute URL of the stored file, resolved against the request origin.
    #[schema(example = "https://gallery.example.com/media/uploads/images/sunrise.jpg")]
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl ImageItem {
    /// Render a stored image for the public feed, resolving its file
    /// reference against the inbound request's origin.
    pub fn render(m: image_asset::Model, origin: &RequestOrigin) -> Self {
        Self {
            id: m.id,
            title: m.title,
            alt_text: m.alt_text,
            display_order: m.display_order,
            url: origin.absolute_url(&format!("/media/{}", m.file)),
            created_at: m.created_at,
        }
    }
}
