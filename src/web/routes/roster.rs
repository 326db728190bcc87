use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::services::participant_service::{self, ParticipantError};
use crate::services::roster_view_service::{self, RosterView};
use crate::web::{link, render_html, AppState, BUILD_ID};

#[derive(Template)]
#[template(path = "roster.html")]
pub struct RosterTemplate {
    pub view: RosterView,
    pub active_href: String,
    pub disabled_href: String,
    pub build_id: &'static str,
}

#[derive(Debug, Deserialize, Default)]
pub struct RosterQuery {
    pub tab: Option<String>,
    pub q: Option<String>,
    pub notice: Option<String>,
}

pub async fn roster_page(
    State(state): State<AppState>,
    Query(query): Query<RosterQuery>,
) -> impl IntoResponse {
    let view = match roster_view_service::load_roster_view(
        &state.pool,
        query.tab.as_deref(),
        query.q.as_deref(),
        query.notice.as_deref(),
    )
    .await
    {
        Ok(v) => v,
        Err(e) => {
            error!("Roster load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = RosterTemplate {
        active_href: link("/", &[("tab", "active"), ("q", view.query.as_str())]),
        disabled_href: link("/", &[("tab", "disabled"), ("q", view.query.as_str())]),
        view,
        build_id: BUILD_ID,
    };
    render_html(&template)
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub tab: Option<String>,
    pub q: Option<String>,
}

pub async fn toggle_form_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ToggleForm>,
) -> impl IntoResponse {
    let result = match id.trim().parse::<i64>() {
        Ok(number) => participant_service::toggle_status(&state.pool, number).await,
        Err(_) => Err(ParticipantError::NotFound(id.clone())),
    };

    let notice = match result {
        Ok(_) => "toggle_ok",
        Err(e) => {
            warn!("Toggle of participant {} failed: {}", id, e);
            roster_view_service::notice_code(&e)
        }
    };

    let tab = roster_view_service::RosterTab::parse(form.tab.as_deref()).key();
    let q = form.q.as_deref().unwrap_or("").trim();
    Redirect::to(&link("/", &[("tab", tab), ("q", q), ("notice", notice)])).into_response()
}
