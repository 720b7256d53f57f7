use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder, Select};
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image_asset")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Relative path of the stored blob, always under `uploads/images/`.
    pub file: String,

    pub title: String,
    pub alt_text: String,

    /// Images stay private until explicitly published.
    pub is_published: bool,

    /// Primary presentation sort key, never negative.
    pub display_order: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Title if set, otherwise a placeholder derived from the id.
    pub fn display_title(&self) -> String {
        if self.title.is_empty() {
            format!("Image {}", self.id)
        } else {
            self.title.clone()
        }
    }
}

impl Entity {
    /// All images in the canonical presentation order: ascending
    /// `display_order`, newest first on ties.
    pub fn find_ordered() -> Select<Entity> {
        Entity::find()
            .order_by_asc(Column::DisplayOrder)
            .order_by_desc(Column::CreatedAt)
    }

    /// Published images only, in the canonical presentation order.
    pub fn find_published() -> Select<Entity> {
        Entity::find_ordered().filter(Column::IsPublished.eq(true))
    }
}
