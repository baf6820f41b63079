use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Upper bound of the per-staff pace buffer, in minutes.
pub const MAX_EXTRA_MINUTES: i32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: Uuid,
    pub name: String,
    /// Added to the base duration of every service this person performs.
    pub extra_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    pub name: String,
    pub extra_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraMinutesRequest {
    pub extra_minutes: i32,
}

/// Public projection of a staff member for the booking page.
#[derive(Debug, Clone, Serialize)]
pub struct StaffSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<Staff> for StaffSummary {
    fn from(s: Staff) -> Self {
        Self { id: s.id, name: s.name }
    }
}
