use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Active,
    Disabled,
}

impl ParticipantStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Disabled,
            Self::Disabled => Self::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
        }
    }
}

// Persisted shape. `created_at`/`updated_at` are store bookkeeping and never leave the server.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    pub number: i64,
    pub status: ParticipantStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Public shape of a participant: `number` is exposed as `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub id: i64,
    pub status: ParticipantStatus,
}

impl From<ParticipantRow> for ParticipantDto {
    fn from(row: ParticipantRow) -> Self {
        Self {
            id: row.number,
            status: row.status,
        }
    }
}
