use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRole;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<NaiveDate>,
}

/// Booked minutes for one staff member on the dashboard day.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaffLoad {
    pub staff_id: Option<Uuid>,
    pub staff_name: Option<String>,
    pub appointments: usize,
    pub booked_minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub role: UserRole,
    pub appointments_today: usize,
    pub upcoming_appointments: usize,
    /// Only present for owners and managers.
    pub total_customers: Option<usize>,
    pub total_staff: Option<usize>,
    pub load: Vec<StaffLoad>,
}
