use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};
use common_auth::{
    require_permission, RequiredPermission, DELETE_DRINKS, GET_DRINKS_DETAIL, POST_DRINKS,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::drink_handlers::{
    create_drink, delete_drink, list_drinks, list_drinks_detail, not_found, update_drink,
};

async fn health() -> &'static str {
    "ok"
}

async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        common_auth::metrics::gather(),
    )
}

pub fn build_router(state: AppState) -> Router {
    let guard = state.guard().clone();
    let guarded = move |permission: &'static str| {
        from_fn_with_state(RequiredPermission::new(guard.clone(), permission), require_permission)
    };

    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics))
        .route(
            "/drinks",
            get(list_drinks).merge(post(create_drink).route_layer(guarded(POST_DRINKS))),
        )
        .route(
            "/drinks-detail",
            get(list_drinks_detail).route_layer(guarded(GET_DRINKS_DETAIL)),
        )
        .route(
            "/drinks/:id",
            patch(update_drink)
                .route_layer(guarded(POST_DRINKS))
                .merge(axum::routing::delete(delete_drink).route_layer(guarded(DELETE_DRINKS))),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
