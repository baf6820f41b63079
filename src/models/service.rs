use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DepositMethod {
    Online,
    BankTransfer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub amount_cents: i64,
    pub method: DepositMethod,
}

/// One step of a pack service, performed in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackItem {
    pub name: String,
    pub duration_minutes: i32,
    pub staff_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub visible: bool,
    #[sqlx(json)]
    pub deposit: Option<Deposit>,
    #[sqlx(json)]
    pub pack: Vec<PackItem>,
    /// Weekdays the service can be booked on; empty means every day.
    #[sqlx(json)]
    pub available_days: Vec<Weekday>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn is_pack(&self) -> bool {
        !self.pack.is_empty()
    }

    pub fn is_available_on(&self, date: NaiveDate) -> bool {
        self.available_days.is_empty() || self.available_days.contains(&date.weekday())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub duration_minutes: i32,
    pub price_cents: i64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub deposit: Option<Deposit>,
    #[serde(default)]
    pub pack: Vec<PackItem>,
    #[serde(default)]
    pub available_days: Vec<Weekday>,
}

fn default_visible() -> bool {
    true
}
