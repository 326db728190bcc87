use sqlx::SqlitePool;

use crate::models::{ParticipantRow, ParticipantStatus};
use crate::services::participant_service::{self, ParticipantError};

pub const STEPPER_STEPS: [i64; 3] = [100, 10, 1];
pub const DEFAULT_STEPPER_VALUE: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterTab {
    Active,
    Disabled,
}

impl RosterTab {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("disabled") => Self::Disabled,
            _ => Self::Active,
        }
    }

    pub fn key(self) -> &'static str {
        self.status().as_str()
    }

    fn status(self) -> ParticipantStatus {
        match self {
            Self::Active => ParticipantStatus::Active,
            Self::Disabled => ParticipantStatus::Disabled,
        }
    }
}

pub struct RosterView {
    pub tab: &'static str,
    pub query: String,
    pub active_count: usize,
    pub disabled_count: usize,
    pub ids: Vec<i64>,
    pub notice: Option<Notice>,
}

pub struct StepLink {
    pub label: String,
    pub target: i64,
    pub disabled: bool,
}

pub struct SettingsView {
    pub total: i64,
    pub count: i64,
    pub decrements: Vec<StepLink>,
    pub increments: Vec<StepLink>,
    pub notice: Option<Notice>,
    pub added_range: Option<String>,
}

pub struct Notice {
    pub message: &'static str,
    pub is_error: bool,
}

/// Maps the short notice codes carried in redirect URLs to a banner.
pub fn notice_for(code: Option<&str>) -> Option<Notice> {
    let (message, is_error) = match code?.trim() {
        "toggle_ok" => ("Status updated", false),
        "add_ok" => ("Participants added", false),
        "invalid" => ("Count must be a positive number", true),
        "not_found" => ("Participant not found", true),
        "conflict" => ("Numbers were taken by another request, try again", true),
        "error" => ("Something went wrong", true),
        _ => return None,
    };
    Some(Notice { message, is_error })
}

pub fn notice_code(err: &ParticipantError) -> &'static str {
    match err {
        ParticipantError::InvalidArgument(_) => "invalid",
        ParticipantError::NotFound(_) => "not_found",
        ParticipantError::DuplicateKey => "conflict",
        ParticipantError::Store(_) => "error",
    }
}

/// Ids on `tab` whose decimal form contains `query`. A blank query keeps everything.
pub fn filter_ids(rows: &[ParticipantRow], tab: RosterTab, query: &str) -> Vec<i64> {
    let query = query.trim();
    rows.iter()
        .filter(|r| r.status == tab.status())
        .filter(|r| query.is_empty() || r.number.to_string().contains(query))
        .map(|r| r.number)
        .collect()
}

pub async fn load_roster_view(
    pool: &SqlitePool,
    tab: Option<&str>,
    query: Option<&str>,
    notice: Option<&str>,
) -> Result<RosterView, ParticipantError> {
    let rows = participant_service::list_participants(pool).await?;
    let tab = RosterTab::parse(tab);
    let query = query.unwrap_or("").trim().to_string();

    let active_count = filter_ids(&rows, RosterTab::Active, &query).len();
    let disabled_count = filter_ids(&rows, RosterTab::Disabled, &query).len();
    let ids = filter_ids(&rows, tab, &query);

    Ok(RosterView {
        tab: tab.key(),
        query,
        active_count,
        disabled_count,
        ids,
        notice: notice_for(notice),
    })
}

pub fn stepper_value(raw: Option<i64>) -> i64 {
    raw.unwrap_or(DEFAULT_STEPPER_VALUE).max(0)
}

pub fn build_stepper(count: i64) -> (Vec<StepLink>, Vec<StepLink>) {
    let decrements = STEPPER_STEPS
        .iter()
        .map(|&step| StepLink {
            label: format!("-{}", step),
            target: (count - step).max(0),
            disabled: count <= step,
        })
        .collect();
    let increments = STEPPER_STEPS
        .iter()
        .rev()
        .map(|&step| StepLink {
            label: format!("+{}", step),
            target: count.saturating_add(step),
            disabled: false,
        })
        .collect();
    (decrements, increments)
}

pub async fn load_settings_view(
    pool: &SqlitePool,
    count: Option<i64>,
    notice: Option<&str>,
    added_from: Option<i64>,
    added_to: Option<i64>,
) -> Result<SettingsView, ParticipantError> {
    let total = participant_service::count_participants(pool).await?;
    let count = stepper_value(count);
    let (decrements, increments) = build_stepper(count);
    let added_range = match (added_from, added_to) {
        (Some(from), Some(to)) => Some(format!("from {} to {}", from, to)),
        _ => None,
    };

    Ok(SettingsView {
        total,
        count,
        decrements,
        increments,
        notice: notice_for(notice),
        added_range,
    })
}
