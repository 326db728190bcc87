pub mod error;
pub mod routes;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, get_service, patch, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use routes::{participants_api, roster, settings};

pub const BUILD_ID: &str = env!("ROSTER_BUILD_ID");

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub max_batch: i64,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/list", get(participants_api::list_handler))
        .route("/add", post(participants_api::add_handler))
        .route(
            "/:id/toggle-status",
            patch(participants_api::toggle_status_handler),
        );

    Router::new()
        // Pages
        .route("/", get(roster::roster_page))
        .route("/participants/:id/toggle", post(roster::toggle_form_handler))
        .route("/settings", get(settings::settings_page))
        .route("/settings/add", post(settings::add_form_handler))
        // JSON API
        .nest("/api/participants", api)
        // Static files
        .nest_service("/assets", get_service(ServeDir::new("assets")))
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

pub(crate) fn render_html(template: &impl Template) -> Response {
    match template.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!("Template render failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `path?k=v&...` with empty values left out.
pub(crate) fn link(path: &str, pairs: &[(&str, &str)]) -> String {
    let pairs: Vec<_> = pairs.iter().filter(|(_, v)| !v.is_empty()).collect();
    if pairs.is_empty() {
        return path.to_string();
    }
    match serde_urlencoded::to_string(&pairs) {
        Ok(qs) => format!("{}?{}", path, qs),
        Err(_) => path.to_string(),
    }
}
