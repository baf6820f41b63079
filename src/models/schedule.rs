use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::appointment::Appointment;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledAppointment {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub end_time: String,
    pub effective_duration: i64,
    /// True when the end time falls on the following calendar day.
    pub rolls_over: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffColumn {
    /// `None` is the unassigned column.
    pub staff_id: Option<Uuid>,
    pub staff_name: Option<String>,
    pub appointments: Vec<ScheduledAppointment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub columns: Vec<StaffColumn>,
}
