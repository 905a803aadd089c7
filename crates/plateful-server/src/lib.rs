use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use plateful_api::{auth, meals, reservations};

pub use plateful_api::auth::{AppState, AppStateInner};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/meals", get(meals::list_meals).post(meals::create_meal))
        .route("/meals/{id}/reserve", post(reservations::reserve_meal))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "plateful",
        "status": "ok",
    }))
}
