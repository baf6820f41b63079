use chrono::NaiveDate;
use futures_util::future::BoxFuture;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{SalonStore, StoreError, StoreResult};
use crate::{
    db::tenant::{provision_tenant_schema, schema_name},
    models::{
        appointment::{Appointment, NewAppointment},
        business::{BusinessInfo, BusinessInfoInput},
        customer::{Customer, CustomerInput},
        location::{CreateLocationRequest, Location, UpdateLocationRequest},
        service::{Service, ServiceInput},
        staff::Staff,
        tenant::Salon,
        user::{NewUser, User},
    },
};

/// Postgres backend: registry in `public.salons`, one schema per salon.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps constraint violations onto store errors the API can report.
fn classify(err: sqlx::Error, what: &'static str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(format!("{what} already exists"));
        }
        if db.is_foreign_key_violation() {
            return StoreError::NotFound(what);
        }
    }
    StoreError::Database(err)
}

/// `ILIKE` pattern matching `q` as a literal substring (`\` is the escape).
fn contains_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for c in q.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn expect_affected(rows: u64, what: &'static str) -> StoreResult<()> {
    if rows == 0 {
        Err(StoreError::NotFound(what))
    } else {
        Ok(())
    }
}

impl SalonStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
    }

    fn list_salons(&self) -> BoxFuture<'_, StoreResult<Vec<Salon>>> {
        Box::pin(async move {
            let salons = sqlx::query_as::<_, Salon>("SELECT * FROM public.salons ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
            Ok(salons)
        })
    }

    fn find_salon<'a>(&'a self, slug: &'a str) -> BoxFuture<'a, StoreResult<Option<Salon>>> {
        Box::pin(async move {
            let salon = sqlx::query_as::<_, Salon>("SELECT * FROM public.salons WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
            Ok(salon)
        })
    }

    fn create_salon<'a>(&'a self, slug: &'a str, name: &'a str) -> BoxFuture<'a, StoreResult<Salon>> {
        Box::pin(async move {
            let salon = sqlx::query_as::<_, Salon>(
                "INSERT INTO public.salons (id, slug, name)
                 VALUES ($1, $2, $3)
                 RETURNING *",
            )
            .bind(Uuid::new_v4())
            .bind(slug)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Salon"))?;

            provision_tenant_schema(&self.pool, slug).await?;
            Ok(salon)
        })
    }

    fn deactivate_salon<'a>(&'a self, slug: &'a str) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let result = sqlx::query("UPDATE public.salons SET is_active = FALSE WHERE slug = $1")
                .bind(slug)
                .execute(&self.pool)
                .await?;
            expect_affected(result.rows_affected(), "Salon")
        })
    }

    fn find_user_by_email<'a>(
        &'a self,
        tenant: &'a str,
        email: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<User>>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let user = sqlx::query_as::<_, User>(&format!(
                "SELECT * FROM {schema}.users WHERE LOWER(email) = LOWER($1) AND is_active = TRUE"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
            Ok(user)
        })
    }

    fn create_user<'a>(&'a self, tenant: &'a str, user: &'a NewUser) -> BoxFuture<'a, StoreResult<User>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let created = sqlx::query_as::<_, User>(&format!(
                "INSERT INTO {schema}.users (id, email, password_hash, name, role, staff_id)
                 VALUES ($1, LOWER($2), $3, $4, $5, $6)
                 RETURNING *"
            ))
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(user.role.to_string())
            .bind(user.staff_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "User"))?;
            Ok(created)
        })
    }

    fn list_customers<'a>(
        &'a self,
        tenant: &'a str,
        search: Option<&'a str>,
    ) -> BoxFuture<'a, StoreResult<Vec<Customer>>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let pattern = search.map(contains_pattern);
            let customers = sqlx::query_as::<_, Customer>(&format!(
                "SELECT * FROM {schema}.customers
                 WHERE $1::TEXT IS NULL
                    OR name ILIKE $1 ESCAPE '\\'
                    OR phone ILIKE $1 ESCAPE '\\'
                    OR email ILIKE $1 ESCAPE '\\'
                 ORDER BY name"
            ))
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
            Ok(customers)
        })
    }

    fn get_customer<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Customer>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Customer>(&format!("SELECT * FROM {schema}.customers WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StoreError::NotFound("Customer"))
        })
    }

    fn find_customer_by_phone<'a>(
        &'a self,
        tenant: &'a str,
        phone: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<Customer>>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let customer =
                sqlx::query_as::<_, Customer>(&format!("SELECT * FROM {schema}.customers WHERE phone = $1"))
                    .bind(phone)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(customer)
        })
    }

    fn insert_customer<'a>(
        &'a self,
        tenant: &'a str,
        input: &'a CustomerInput,
    ) -> BoxFuture<'a, StoreResult<Customer>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let customer = sqlx::query_as::<_, Customer>(&format!(
                "INSERT INTO {schema}.customers (id, name, phone, email, birthdate)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING *"
            ))
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(input.birthdate)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Customer"))?;
            Ok(customer)
        })
    }

    fn save_customer<'a>(&'a self, tenant: &'a str, customer: &'a Customer) -> BoxFuture<'a, StoreResult<Customer>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Customer>(&format!(
                "UPDATE {schema}.customers
                 SET name = $1, phone = $2, email = $3, birthdate = $4
                 WHERE id = $5
                 RETURNING *"
            ))
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(&customer.email)
            .bind(customer.birthdate)
            .bind(customer.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "Customer"))?
            .ok_or(StoreError::NotFound("Customer"))
        })
    }

    fn delete_customer<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            // FK CASCADE removes the customer's appointments
            let result = sqlx::query(&format!("DELETE FROM {schema}.customers WHERE id = $1"))
                .bind(id)
                .execute(&self.pool)
                .await?;
            expect_affected(result.rows_affected(), "Customer")
        })
    }

    fn list_staff<'a>(&'a self, tenant: &'a str) -> BoxFuture<'a, StoreResult<Vec<Staff>>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let staff = sqlx::query_as::<_, Staff>(&format!("SELECT * FROM {schema}.staff ORDER BY name"))
                .fetch_all(&self.pool)
                .await?;
            Ok(staff)
        })
    }

    fn get_staff<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Staff>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Staff>(&format!("SELECT * FROM {schema}.staff WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StoreError::NotFound("Staff member"))
        })
    }

    fn insert_staff<'a>(
        &'a self,
        tenant: &'a str,
        name: &'a str,
        extra_minutes: i32,
    ) -> BoxFuture<'a, StoreResult<Staff>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let staff = sqlx::query_as::<_, Staff>(&format!(
                "INSERT INTO {schema}.staff (id, name, extra_minutes)
                 VALUES ($1, $2, $3)
                 RETURNING *"
            ))
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(extra_minutes)
            .fetch_one(&self.pool)
            .await?;
            Ok(staff)
        })
    }

    fn rename_staff<'a>(&'a self, tenant: &'a str, id: Uuid, name: &'a str) -> BoxFuture<'a, StoreResult<Staff>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Staff>(&format!(
                "UPDATE {schema}.staff SET name = $1 WHERE id = $2 RETURNING *"
            ))
            .bind(name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Staff member"))
        })
    }

    fn set_extra_minutes<'a>(
        &'a self,
        tenant: &'a str,
        id: Uuid,
        extra_minutes: i32,
    ) -> BoxFuture<'a, StoreResult<Staff>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Staff>(&format!(
                "UPDATE {schema}.staff SET extra_minutes = $1 WHERE id = $2 RETURNING *"
            ))
            .bind(extra_minutes)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Staff member"))
        })
    }

    fn delete_staff<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            // FK ON DELETE SET NULL unassigns appointments and user links
            let result = sqlx::query(&format!("DELETE FROM {schema}.staff WHERE id = $1"))
                .bind(id)
                .execute(&self.pool)
                .await?;
            expect_affected(result.rows_affected(), "Staff member")
        })
    }

    fn list_services<'a>(&'a self, tenant: &'a str, include_hidden: bool) -> BoxFuture<'a, StoreResult<Vec<Service>>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let services = sqlx::query_as::<_, Service>(&format!(
                "SELECT * FROM {schema}.services WHERE visible = TRUE OR $1 ORDER BY name"
            ))
            .bind(include_hidden)
            .fetch_all(&self.pool)
            .await?;
            Ok(services)
        })
    }

    fn get_service<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Service>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Service>(&format!("SELECT * FROM {schema}.services WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StoreError::NotFound("Service"))
        })
    }

    fn insert_service<'a>(&'a self, tenant: &'a str, input: &'a ServiceInput) -> BoxFuture<'a, StoreResult<Service>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let service = sqlx::query_as::<_, Service>(&format!(
                "INSERT INTO {schema}.services
                    (id, name, description, image_url, duration_minutes, price_cents,
                     visible, deposit, pack, available_days)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                 RETURNING *"
            ))
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.duration_minutes)
            .bind(input.price_cents)
            .bind(input.visible)
            .bind(Json(&input.deposit))
            .bind(Json(&input.pack))
            .bind(Json(&input.available_days))
            .fetch_one(&self.pool)
            .await?;
            Ok(service)
        })
    }

    fn update_service<'a>(
        &'a self,
        tenant: &'a str,
        id: Uuid,
        input: &'a ServiceInput,
    ) -> BoxFuture<'a, StoreResult<Service>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Service>(&format!(
                "UPDATE {schema}.services
                 SET name = $1, description = $2, image_url = $3, duration_minutes = $4,
                     price_cents = $5, visible = $6, deposit = $7, pack = $8, available_days = $9
                 WHERE id = $10
                 RETURNING *"
            ))
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.duration_minutes)
            .bind(input.price_cents)
            .bind(input.visible)
            .bind(Json(&input.deposit))
            .bind(Json(&input.pack))
            .bind(Json(&input.available_days))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Service"))
        })
    }

    fn delete_service<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let result = sqlx::query(&format!("DELETE FROM {schema}.services WHERE id = $1"))
                .bind(id)
                .execute(&self.pool)
                .await?;
            expect_affected(result.rows_affected(), "Service")
        })
    }

    fn list_locations<'a>(&'a self, tenant: &'a str) -> BoxFuture<'a, StoreResult<Vec<Location>>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let locations =
                sqlx::query_as::<_, Location>(&format!("SELECT * FROM {schema}.locations ORDER BY name"))
                    .fetch_all(&self.pool)
                    .await?;
            Ok(locations)
        })
    }

    fn insert_location<'a>(
        &'a self,
        tenant: &'a str,
        req: &'a CreateLocationRequest,
    ) -> BoxFuture<'a, StoreResult<Location>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let location = sqlx::query_as::<_, Location>(&format!(
                "INSERT INTO {schema}.locations (id, name, address, phone, email, staff_count, active)
                 VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, TRUE))
                 RETURNING *"
            ))
            .bind(Uuid::new_v4())
            .bind(&req.name)
            .bind(&req.address)
            .bind(&req.phone)
            .bind(&req.email)
            .bind(req.staff_count)
            .bind(req.active)
            .fetch_one(&self.pool)
            .await?;
            Ok(location)
        })
    }

    fn update_location<'a>(
        &'a self,
        tenant: &'a str,
        id: Uuid,
        req: &'a UpdateLocationRequest,
    ) -> BoxFuture<'a, StoreResult<Location>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Location>(&format!(
                "UPDATE {schema}.locations
                 SET name        = COALESCE($1, name),
                     address     = COALESCE($2, address),
                     phone       = COALESCE($3, phone),
                     email       = COALESCE($4, email),
                     staff_count = COALESCE($5, staff_count),
                     active      = COALESCE($6, active)
                 WHERE id = $7
                 RETURNING *"
            ))
            .bind(&req.name)
            .bind(&req.address)
            .bind(&req.phone)
            .bind(&req.email)
            .bind(req.staff_count)
            .bind(req.active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Location"))
        })
    }

    fn delete_location<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let result = sqlx::query(&format!("DELETE FROM {schema}.locations WHERE id = $1"))
                .bind(id)
                .execute(&self.pool)
                .await?;
            expect_affected(result.rows_affected(), "Location")
        })
    }

    fn get_business_info<'a>(&'a self, tenant: &'a str) -> BoxFuture<'a, StoreResult<Option<BusinessInfo>>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let info = sqlx::query_as::<_, BusinessInfo>(&format!(
                "SELECT name, tagline, phone, email, address, instagram, facebook, opening_hours, updated_at
                 FROM {schema}.business_info WHERE id = 1"
            ))
            .fetch_optional(&self.pool)
            .await?;
            Ok(info)
        })
    }

    fn save_business_info<'a>(
        &'a self,
        tenant: &'a str,
        input: &'a BusinessInfoInput,
    ) -> BoxFuture<'a, StoreResult<BusinessInfo>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let info = sqlx::query_as::<_, BusinessInfo>(&format!(
                "INSERT INTO {schema}.business_info
                    (id, name, tagline, phone, email, address, instagram, facebook, opening_hours)
                 VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    tagline = EXCLUDED.tagline,
                    phone = EXCLUDED.phone,
                    email = EXCLUDED.email,
                    address = EXCLUDED.address,
                    instagram = EXCLUDED.instagram,
                    facebook = EXCLUDED.facebook,
                    opening_hours = EXCLUDED.opening_hours
                 RETURNING name, tagline, phone, email, address, instagram, facebook, opening_hours, updated_at"
            ))
            .bind(&input.name)
            .bind(&input.tagline)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.instagram)
            .bind(&input.facebook)
            .bind(&input.opening_hours)
            .fetch_one(&self.pool)
            .await?;
            Ok(info)
        })
    }

    fn list_appointments<'a>(
        &'a self,
        tenant: &'a str,
        date: Option<NaiveDate>,
    ) -> BoxFuture<'a, StoreResult<Vec<Appointment>>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let appointments = sqlx::query_as::<_, Appointment>(&format!(
                "SELECT * FROM {schema}.appointments
                 WHERE $1::DATE IS NULL OR date = $1
                 ORDER BY date, start_time"
            ))
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
            Ok(appointments)
        })
    }

    fn get_appointment<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Appointment>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Appointment>(&format!("SELECT * FROM {schema}.appointments WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StoreError::NotFound("Appointment"))
        })
    }

    fn insert_appointment<'a>(
        &'a self,
        tenant: &'a str,
        appointment: &'a NewAppointment,
    ) -> BoxFuture<'a, StoreResult<Appointment>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let created = sqlx::query_as::<_, Appointment>(&format!(
                "INSERT INTO {schema}.appointments
                    (id, customer_id, staff_id, service_name, date, start_time,
                     duration_minutes, images, notes)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 RETURNING *"
            ))
            .bind(Uuid::new_v4())
            .bind(appointment.customer_id)
            .bind(appointment.staff_id)
            .bind(&appointment.service_name)
            .bind(appointment.date)
            .bind(&appointment.start_time)
            .bind(appointment.duration_minutes)
            .bind(Json(&appointment.images))
            .bind(&appointment.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Customer or staff member"))?;
            Ok(created)
        })
    }

    fn save_appointment<'a>(
        &'a self,
        tenant: &'a str,
        appointment: &'a Appointment,
    ) -> BoxFuture<'a, StoreResult<Appointment>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            sqlx::query_as::<_, Appointment>(&format!(
                "UPDATE {schema}.appointments
                 SET staff_id = $1, date = $2, start_time = $3, notes = $4
                 WHERE id = $5
                 RETURNING *"
            ))
            .bind(appointment.staff_id)
            .bind(appointment.date)
            .bind(&appointment.start_time)
            .bind(&appointment.notes)
            .bind(appointment.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "Staff member"))?
            .ok_or(StoreError::NotFound("Appointment"))
        })
    }

    fn delete_appointment<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let schema = schema_name(tenant);
            let result = sqlx::query(&format!("DELETE FROM {schema}.appointments WHERE id = $1"))
                .bind(id)
                .execute(&self.pool)
                .await?;
            expect_affected(result.rows_affected(), "Appointment")
        })
    }
}
