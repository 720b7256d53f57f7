use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::{image_asset, operator};
use crate::utils::hash;

/// Seed the bootstrap operator when the operator table is empty.
///
/// There is no self-registration: the management surface is a closed
/// operator tool, so the first credentials come from configuration.
pub async fn seed_bootstrap_operator(
    db: &DatabaseConnection,
    auth: &AuthConfig,
) -> Result<(), DbErr> {
    let existing = operator::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(());
    }

    let Some(bootstrap) = &auth.bootstrap else {
        tracing::warn!("No operators exist and no bootstrap operator is configured");
        return Ok(());
    };

    let password = hash::hash_password(&bootstrap.password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    let model = operator::ActiveModel {
        username: Set(bootstrap.username.clone()),
        password: Set(password),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = operator::Entity::insert(model)
        .on_conflict(
            OnConflict::column(operator::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => info!("Seeded bootstrap operator '{}'", bootstrap.username),
        Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for the published-listing query:
    // WHERE is_published ORDER BY display_order, created_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_image_asset_published_order")
        .table(image_asset::Entity)
        .col(image_asset::Column::IsPublished)
        .col(image_asset::Column::DisplayOrder)
        .col(image_asset::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_image_asset_published_order exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_image_asset_published_order: {}", e);
        }
    }

    Ok(())
}
