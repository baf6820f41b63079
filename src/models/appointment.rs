use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reference photo attached by the customer when booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspirationImage {
    pub name: String,
    /// Base64 payload, optionally prefixed with a `data:` URL header.
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub staff_id: Option<Uuid>,
    /// Name of the service at booking time, kept even if the service is renamed.
    pub service_name: String,
    pub date: NaiveDate,
    /// Zero-padded 24-hour `HH:MM`.
    pub start_time: String,
    /// Base duration copied from the service when booked. Staff extra minutes
    /// are never folded in here.
    pub duration_minutes: i32,
    #[sqlx(json)]
    pub images: Vec<InspirationImage>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully validated record handed to the store for insertion.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub customer_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub service_name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i32,
    pub images: Vec<InspirationImage>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub customer_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub service_name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub images: Vec<InspirationImage>,
    pub notes: Option<String>,
}

/// Partial update. `staffId: null` unassigns, an absent `staffId` leaves it untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[serde(default, deserialize_with = "present")]
    pub staff_id: Option<Option<Uuid>>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub notes: Option<String>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct AppointmentDateQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayViewQuery {
    pub date: NaiveDate,
    /// Restricts the view to one staff column.
    pub staff_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: String,
    pub customer: super::customer::CustomerInput,
    #[serde(default)]
    pub images: Vec<InspirationImage>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub appointment: Appointment,
    pub customer_id: Uuid,
    pub end_time: String,
    pub effective_duration: i64,
    pub deposit: Option<super::service::Deposit>,
}
