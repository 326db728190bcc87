use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::services::participant_service::{self, ParticipantError};
use crate::services::roster_view_service::{self, SettingsView};
use crate::web::{link, render_html, AppState, BUILD_ID};

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub view: SettingsView,
    pub build_id: &'static str,
}

#[derive(Debug, Deserialize, Default)]
pub struct SettingsQuery {
    pub count: Option<String>,
    pub notice: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn settings_page(
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> impl IntoResponse {
    let count = parse_lenient(query.count.as_deref());
    let view = match roster_view_service::load_settings_view(
        &state.pool,
        count,
        query.notice.as_deref(),
        parse_lenient(query.from.as_deref()),
        parse_lenient(query.to.as_deref()),
    )
    .await
    {
        Ok(v) => v,
        Err(e) => {
            error!("Settings load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    render_html(&SettingsTemplate {
        view,
        build_id: BUILD_ID,
    })
}

// Hand-edited query strings fall back to defaults instead of a 400.
fn parse_lenient(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub count: String,
}

pub async fn add_form_handler(
    State(state): State<AppState>,
    Form(form): Form<AddForm>,
) -> impl IntoResponse {
    let result = match form.count.trim().parse::<i64>() {
        Ok(count) => participant_service::add_batch(&state.pool, count, state.max_batch).await,
        Err(_) => Err(ParticipantError::InvalidArgument(format!(
            "count {:?} is not an integer",
            form.count
        ))),
    };

    let target = match result {
        Ok(outcome) => link(
            "/settings",
            &[
                ("notice", "add_ok"),
                ("from", outcome.start.to_string().as_str()),
                ("to", outcome.end.to_string().as_str()),
            ],
        ),
        Err(e) => {
            warn!("Adding participants failed: {}", e);
            // Keep the operator's value on the stepper so they can correct it.
            link(
                "/settings",
                &[
                    ("notice", roster_view_service::notice_code(&e)),
                    ("count", form.count.trim()),
                ],
            )
        }
    };
    Redirect::to(&target).into_response()
}
