//! Storage seam. One trait, two backends chosen once at startup:
//! [`postgres::PgStore`] (schema-per-salon Postgres) and
//! [`memory::MemoryStore`] (in-process, for local runs and tests).

pub mod memory;
pub mod postgres;

use chrono::NaiveDate;
use futures_util::future::BoxFuture;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    appointment::{Appointment, NewAppointment},
    business::{BusinessInfo, BusinessInfoInput},
    customer::{Customer, CustomerInput},
    location::{CreateLocationRequest, Location, UpdateLocationRequest},
    service::{Service, ServiceInput},
    staff::Staff,
    tenant::Salon,
    user::{NewUser, User},
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub trait SalonStore: Send + Sync {
    /// Short backend label for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>>;

    // ── Salons (tenants) ────────────────────────────────────────────────────
    fn list_salons(&self) -> BoxFuture<'_, StoreResult<Vec<Salon>>>;
    fn find_salon<'a>(&'a self, slug: &'a str) -> BoxFuture<'a, StoreResult<Option<Salon>>>;
    /// Registers the salon and provisions its storage.
    fn create_salon<'a>(&'a self, slug: &'a str, name: &'a str) -> BoxFuture<'a, StoreResult<Salon>>;
    fn deactivate_salon<'a>(&'a self, slug: &'a str) -> BoxFuture<'a, StoreResult<()>>;

    // ── Users ───────────────────────────────────────────────────────────────
    fn find_user_by_email<'a>(
        &'a self,
        tenant: &'a str,
        email: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<User>>>;
    fn create_user<'a>(&'a self, tenant: &'a str, user: &'a NewUser) -> BoxFuture<'a, StoreResult<User>>;

    // ── Customers ───────────────────────────────────────────────────────────
    fn list_customers<'a>(
        &'a self,
        tenant: &'a str,
        search: Option<&'a str>,
    ) -> BoxFuture<'a, StoreResult<Vec<Customer>>>;
    fn get_customer<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Customer>>;
    fn find_customer_by_phone<'a>(
        &'a self,
        tenant: &'a str,
        phone: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<Customer>>>;
    fn insert_customer<'a>(
        &'a self,
        tenant: &'a str,
        input: &'a CustomerInput,
    ) -> BoxFuture<'a, StoreResult<Customer>>;
    /// Overwrites every mutable column of an existing customer.
    fn save_customer<'a>(&'a self, tenant: &'a str, customer: &'a Customer) -> BoxFuture<'a, StoreResult<Customer>>;
    /// Also removes the customer's appointments.
    fn delete_customer<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>>;

    // ── Staff ───────────────────────────────────────────────────────────────
    fn list_staff<'a>(&'a self, tenant: &'a str) -> BoxFuture<'a, StoreResult<Vec<Staff>>>;
    fn get_staff<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Staff>>;
    fn insert_staff<'a>(
        &'a self,
        tenant: &'a str,
        name: &'a str,
        extra_minutes: i32,
    ) -> BoxFuture<'a, StoreResult<Staff>>;
    fn rename_staff<'a>(&'a self, tenant: &'a str, id: Uuid, name: &'a str) -> BoxFuture<'a, StoreResult<Staff>>;
    fn set_extra_minutes<'a>(
        &'a self,
        tenant: &'a str,
        id: Uuid,
        extra_minutes: i32,
    ) -> BoxFuture<'a, StoreResult<Staff>>;
    /// Appointments of the removed staff member become unassigned.
    fn delete_staff<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>>;

    // ── Services ────────────────────────────────────────────────────────────
    fn list_services<'a>(&'a self, tenant: &'a str, include_hidden: bool) -> BoxFuture<'a, StoreResult<Vec<Service>>>;
    fn get_service<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Service>>;
    fn insert_service<'a>(&'a self, tenant: &'a str, input: &'a ServiceInput) -> BoxFuture<'a, StoreResult<Service>>;
    fn update_service<'a>(
        &'a self,
        tenant: &'a str,
        id: Uuid,
        input: &'a ServiceInput,
    ) -> BoxFuture<'a, StoreResult<Service>>;
    fn delete_service<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>>;

    // ── Locations ───────────────────────────────────────────────────────────
    fn list_locations<'a>(&'a self, tenant: &'a str) -> BoxFuture<'a, StoreResult<Vec<Location>>>;
    fn insert_location<'a>(
        &'a self,
        tenant: &'a str,
        req: &'a CreateLocationRequest,
    ) -> BoxFuture<'a, StoreResult<Location>>;
    fn update_location<'a>(
        &'a self,
        tenant: &'a str,
        id: Uuid,
        req: &'a UpdateLocationRequest,
    ) -> BoxFuture<'a, StoreResult<Location>>;
    fn delete_location<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>>;

    // ── Business info ───────────────────────────────────────────────────────
    /// Returns `None` until the salon has saved its details once.
    fn get_business_info<'a>(&'a self, tenant: &'a str) -> BoxFuture<'a, StoreResult<Option<BusinessInfo>>>;
    fn save_business_info<'a>(
        &'a self,
        tenant: &'a str,
        input: &'a BusinessInfoInput,
    ) -> BoxFuture<'a, StoreResult<BusinessInfo>>;

    // ── Appointments ────────────────────────────────────────────────────────
    /// Ordered by date then start time.
    fn list_appointments<'a>(
        &'a self,
        tenant: &'a str,
        date: Option<NaiveDate>,
    ) -> BoxFuture<'a, StoreResult<Vec<Appointment>>>;
    fn get_appointment<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Appointment>>;
    fn insert_appointment<'a>(
        &'a self,
        tenant: &'a str,
        appointment: &'a NewAppointment,
    ) -> BoxFuture<'a, StoreResult<Appointment>>;
    /// Persists staff, date, start time and notes. Service name and base
    /// duration are immutable once booked.
    fn save_appointment<'a>(
        &'a self,
        tenant: &'a str,
        appointment: &'a Appointment,
    ) -> BoxFuture<'a, StoreResult<Appointment>>;
    fn delete_appointment<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>>;
}
