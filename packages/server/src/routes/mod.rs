use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(gallery_routes())
        .nest("/auth", auth_routes())
        .nest("/admin/images", image_routes())
}

/// Public read API. GET only — the router answers anything else with 405.
fn gallery_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::gallery::list_images))
        .routes(routes!(handlers::gallery::get_image))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn image_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::images::list_images,
            handlers::images::create_image
        ))
        .routes(routes!(
            handlers::images::get_image,
            handlers::images::update_image,
            handlers::images::delete_image
        ))
}
