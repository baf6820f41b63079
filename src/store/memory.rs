use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use futures_util::future::BoxFuture;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SalonStore, StoreError, StoreResult};
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

#[derive(Default)]
struct SalonData {
    users: Vec<User>,
    customers: Vec<Customer>,
    staff: Vec<Staff>,
    services: Vec<Service>,
    locations: Vec<Location>,
    business: Option<BusinessInfo>,
    appointments: Vec<Appointment>,
}

#[derive(Default)]
struct Inner {
    salons: Vec<Salon>,
    data: HashMap<String, SalonData>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn salon<'a>(inner: &'a Inner, tenant: &str) -> StoreResult<&'a SalonData> {
    inner.data.get(tenant).ok_or(StoreError::NotFound("Salon"))
}

fn salon_mut<'a>(inner: &'a mut Inner, tenant: &str) -> StoreResult<&'a mut SalonData> {
    inner.data.get_mut(tenant).ok_or(StoreError::NotFound("Salon"))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl SalonStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn list_salons(&self) -> BoxFuture<'_, StoreResult<Vec<Salon>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            let mut salons = inner.salons.clone();
            salons.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(salons)
        })
    }

    fn find_salon<'a>(&'a self, slug: &'a str) -> BoxFuture<'a, StoreResult<Option<Salon>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(inner.salons.iter().find(|s| s.slug == slug).cloned())
        })
    }

    fn create_salon<'a>(&'a self, slug: &'a str, name: &'a str) -> BoxFuture<'a, StoreResult<Salon>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            if inner.salons.iter().any(|s| s.slug == slug) {
                return Err(StoreError::Conflict(format!("Salon '{slug}' already exists")));
            }
            let salon = Salon {
                id: Uuid::new_v4(),
                slug: slug.to_string(),
                name: name.to_string(),
                is_active: true,
                created_at: Utc::now(),
            };
            inner.salons.push(salon.clone());
            inner.data.insert(slug.to_string(), SalonData::default());
            Ok(salon)
        })
    }

    fn deactivate_salon<'a>(&'a self, slug: &'a str) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let salon = inner
                .salons
                .iter_mut()
                .find(|s| s.slug == slug)
                .ok_or(StoreError::NotFound("Salon"))?;
            salon.is_active = false;
            Ok(())
        })
    }

    fn find_user_by_email<'a>(
        &'a self,
        tenant: &'a str,
        email: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<User>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(salon(&inner, tenant)?
                .users
                .iter()
                .find(|u| u.is_active && u.email.eq_ignore_ascii_case(email))
                .cloned())
        })
    }

    fn create_user<'a>(&'a self, tenant: &'a str, user: &'a NewUser) -> BoxFuture<'a, StoreResult<User>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            if data.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
                return Err(StoreError::Conflict(format!("User '{}' already exists", user.email)));
            }
            let created = User {
                id: Uuid::new_v4(),
                email: user.email.to_lowercase(),
                password_hash: user.password_hash.clone(),
                name: user.name.clone(),
                role: user.role.to_string(),
                staff_id: user.staff_id,
                is_active: true,
                created_at: Utc::now(),
            };
            data.users.push(created.clone());
            Ok(created)
        })
    }

    fn list_customers<'a>(
        &'a self,
        tenant: &'a str,
        search: Option<&'a str>,
    ) -> BoxFuture<'a, StoreResult<Vec<Customer>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            let needle = search.map(str::to_lowercase);
            let mut customers: Vec<Customer> = salon(&inner, tenant)?
                .customers
                .iter()
                .filter(|c| match &needle {
                    Some(n) => {
                        contains_ci(&c.name, n)
                            || contains_ci(&c.phone, n)
                            || c.email.as_deref().is_some_and(|e| contains_ci(e, n))
                    }
                    None => true,
                })
                .cloned()
                .collect();
            customers.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(customers)
        })
    }

    fn get_customer<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Customer>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            salon(&inner, tenant)?
                .customers
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(StoreError::NotFound("Customer"))
        })
    }

    fn find_customer_by_phone<'a>(
        &'a self,
        tenant: &'a str,
        phone: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<Customer>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(salon(&inner, tenant)?.customers.iter().find(|c| c.phone == phone).cloned())
        })
    }

    fn insert_customer<'a>(
        &'a self,
        tenant: &'a str,
        input: &'a CustomerInput,
    ) -> BoxFuture<'a, StoreResult<Customer>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            if data.customers.iter().any(|c| c.phone == input.phone) {
                return Err(StoreError::Conflict(format!("Phone {} already registered", input.phone)));
            }
            let now = Utc::now();
            let customer = Customer {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                phone: input.phone.clone(),
                email: input.email.clone(),
                birthdate: input.birthdate,
                created_at: now,
                updated_at: now,
            };
            data.customers.push(customer.clone());
            Ok(customer)
        })
    }

    fn save_customer<'a>(&'a self, tenant: &'a str, customer: &'a Customer) -> BoxFuture<'a, StoreResult<Customer>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            if data.customers.iter().any(|c| c.phone == customer.phone && c.id != customer.id) {
                return Err(StoreError::Conflict(format!("Phone {} already registered", customer.phone)));
            }
            let existing = data
                .customers
                .iter_mut()
                .find(|c| c.id == customer.id)
                .ok_or(StoreError::NotFound("Customer"))?;
            existing.name = customer.name.clone();
            existing.phone = customer.phone.clone();
            existing.email = customer.email.clone();
            existing.birthdate = customer.birthdate;
            existing.updated_at = Utc::now();
            Ok(existing.clone())
        })
    }

    fn delete_customer<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            let before = data.customers.len();
            data.customers.retain(|c| c.id != id);
            if data.customers.len() == before {
                return Err(StoreError::NotFound("Customer"));
            }
            data.appointments.retain(|a| a.customer_id != id);
            Ok(())
        })
    }

    fn list_staff<'a>(&'a self, tenant: &'a str) -> BoxFuture<'a, StoreResult<Vec<Staff>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            let mut staff = salon(&inner, tenant)?.staff.clone();
            staff.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(staff)
        })
    }

    fn get_staff<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Staff>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            salon(&inner, tenant)?
                .staff
                .iter()
                .find(|s| s.id == id)
                .cloned()
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
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            let now = Utc::now();
            let staff = Staff {
                id: Uuid::new_v4(),
                name: name.to_string(),
                extra_minutes,
                created_at: now,
                updated_at: now,
            };
            data.staff.push(staff.clone());
            Ok(staff)
        })
    }

    fn rename_staff<'a>(&'a self, tenant: &'a str, id: Uuid, name: &'a str) -> BoxFuture<'a, StoreResult<Staff>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let staff = salon_mut(&mut inner, tenant)?
                .staff
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(StoreError::NotFound("Staff member"))?;
            staff.name = name.to_string();
            staff.updated_at = Utc::now();
            Ok(staff.clone())
        })
    }

    fn set_extra_minutes<'a>(
        &'a self,
        tenant: &'a str,
        id: Uuid,
        extra_minutes: i32,
    ) -> BoxFuture<'a, StoreResult<Staff>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let staff = salon_mut(&mut inner, tenant)?
                .staff
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(StoreError::NotFound("Staff member"))?;
            staff.extra_minutes = extra_minutes;
            staff.updated_at = Utc::now();
            Ok(staff.clone())
        })
    }

    fn delete_staff<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            let before = data.staff.len();
            data.staff.retain(|s| s.id != id);
            if data.staff.len() == before {
                return Err(StoreError::NotFound("Staff member"));
            }
            for appointment in data.appointments.iter_mut().filter(|a| a.staff_id == Some(id)) {
                appointment.staff_id = None;
            }
            for user in data.users.iter_mut().filter(|u| u.staff_id == Some(id)) {
                user.staff_id = None;
            }
            Ok(())
        })
    }

    fn list_services<'a>(&'a self, tenant: &'a str, include_hidden: bool) -> BoxFuture<'a, StoreResult<Vec<Service>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            let mut services: Vec<Service> = salon(&inner, tenant)?
                .services
                .iter()
                .filter(|s| include_hidden || s.visible)
                .cloned()
                .collect();
            services.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(services)
        })
    }

    fn get_service<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Service>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            salon(&inner, tenant)?
                .services
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or(StoreError::NotFound("Service"))
        })
    }

    fn insert_service<'a>(&'a self, tenant: &'a str, input: &'a ServiceInput) -> BoxFuture<'a, StoreResult<Service>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            let now = Utc::now();
            let service = Service {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                description: input.description.clone(),
                image_url: input.image_url.clone(),
                duration_minutes: input.duration_minutes,
                price_cents: input.price_cents,
                visible: input.visible,
                deposit: input.deposit.clone(),
                pack: input.pack.clone(),
                available_days: input.available_days.clone(),
                created_at: now,
                updated_at: now,
            };
            data.services.push(service.clone());
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
            let mut inner = self.inner.write().await;
            let service = salon_mut(&mut inner, tenant)?
                .services
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(StoreError::NotFound("Service"))?;
            service.name = input.name.clone();
            service.description = input.description.clone();
            service.image_url = input.image_url.clone();
            service.duration_minutes = input.duration_minutes;
            service.price_cents = input.price_cents;
            service.visible = input.visible;
            service.deposit = input.deposit.clone();
            service.pack = input.pack.clone();
            service.available_days = input.available_days.clone();
            service.updated_at = Utc::now();
            Ok(service.clone())
        })
    }

    fn delete_service<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            let before = data.services.len();
            data.services.retain(|s| s.id != id);
            if data.services.len() == before {
                return Err(StoreError::NotFound("Service"));
            }
            Ok(())
        })
    }

    fn list_locations<'a>(&'a self, tenant: &'a str) -> BoxFuture<'a, StoreResult<Vec<Location>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            let mut locations = salon(&inner, tenant)?.locations.clone();
            locations.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(locations)
        })
    }

    fn insert_location<'a>(
        &'a self,
        tenant: &'a str,
        req: &'a CreateLocationRequest,
    ) -> BoxFuture<'a, StoreResult<Location>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            let now = Utc::now();
            let location = Location {
                id: Uuid::new_v4(),
                name: req.name.clone(),
                address: req.address.clone(),
                phone: req.phone.clone(),
                email: req.email.clone(),
                staff_count: req.staff_count,
                active: req.active.unwrap_or(true),
                created_at: now,
                updated_at: now,
            };
            data.locations.push(location.clone());
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
            let mut inner = self.inner.write().await;
            let location = salon_mut(&mut inner, tenant)?
                .locations
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or(StoreError::NotFound("Location"))?;
            if let Some(name) = &req.name {
                location.name = name.clone();
            }
            if req.address.is_some() {
                location.address = req.address.clone();
            }
            if req.phone.is_some() {
                location.phone = req.phone.clone();
            }
            if req.email.is_some() {
                location.email = req.email.clone();
            }
            if let Some(count) = req.staff_count {
                location.staff_count = count;
            }
            if let Some(active) = req.active {
                location.active = active;
            }
            location.updated_at = Utc::now();
            Ok(location.clone())
        })
    }

    fn delete_location<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            let before = data.locations.len();
            data.locations.retain(|l| l.id != id);
            if data.locations.len() == before {
                return Err(StoreError::NotFound("Location"));
            }
            Ok(())
        })
    }

    fn get_business_info<'a>(&'a self, tenant: &'a str) -> BoxFuture<'a, StoreResult<Option<BusinessInfo>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(salon(&inner, tenant)?.business.clone())
        })
    }

    fn save_business_info<'a>(
        &'a self,
        tenant: &'a str,
        input: &'a BusinessInfoInput,
    ) -> BoxFuture<'a, StoreResult<BusinessInfo>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            let info = BusinessInfo {
                name: input.name.clone(),
                tagline: input.tagline.clone(),
                phone: input.phone.clone(),
                email: input.email.clone(),
                address: input.address.clone(),
                instagram: input.instagram.clone(),
                facebook: input.facebook.clone(),
                opening_hours: input.opening_hours.clone(),
                updated_at: Some(Utc::now()),
            };
            data.business = Some(info.clone());
            Ok(info)
        })
    }

    fn list_appointments<'a>(
        &'a self,
        tenant: &'a str,
        date: Option<NaiveDate>,
    ) -> BoxFuture<'a, StoreResult<Vec<Appointment>>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            let mut appointments: Vec<Appointment> = salon(&inner, tenant)?
                .appointments
                .iter()
                .filter(|a| date.map_or(true, |d| a.date == d))
                .cloned()
                .collect();
            appointments.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
            Ok(appointments)
        })
    }

    fn get_appointment<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<Appointment>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            salon(&inner, tenant)?
                .appointments
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or(StoreError::NotFound("Appointment"))
        })
    }

    fn insert_appointment<'a>(
        &'a self,
        tenant: &'a str,
        appointment: &'a NewAppointment,
    ) -> BoxFuture<'a, StoreResult<Appointment>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            if !data.customers.iter().any(|c| c.id == appointment.customer_id) {
                return Err(StoreError::NotFound("Customer"));
            }
            if let Some(staff_id) = appointment.staff_id {
                if !data.staff.iter().any(|s| s.id == staff_id) {
                    return Err(StoreError::NotFound("Staff"));
                }
            }
            let now = Utc::now();
            let created = Appointment {
                id: Uuid::new_v4(),
                customer_id: appointment.customer_id,
                staff_id: appointment.staff_id,
                service_name: appointment.service_name.clone(),
                date: appointment.date,
                start_time: appointment.start_time.clone(),
                duration_minutes: appointment.duration_minutes,
                images: appointment.images.clone(),
                notes: appointment.notes.clone(),
                created_at: now,
                updated_at: now,
            };
            data.appointments.push(created.clone());
            Ok(created)
        })
    }

    fn save_appointment<'a>(
        &'a self,
        tenant: &'a str,
        appointment: &'a Appointment,
    ) -> BoxFuture<'a, StoreResult<Appointment>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let existing = salon_mut(&mut inner, tenant)?
                .appointments
                .iter_mut()
                .find(|a| a.id == appointment.id)
                .ok_or(StoreError::NotFound("Appointment"))?;
            existing.staff_id = appointment.staff_id;
            existing.date = appointment.date;
            existing.start_time = appointment.start_time.clone();
            existing.notes = appointment.notes.clone();
            existing.updated_at = Utc::now();
            Ok(existing.clone())
        })
    }

    fn delete_appointment<'a>(&'a self, tenant: &'a str, id: Uuid) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let data = salon_mut(&mut inner, tenant)?;
            let before = data.appointments.len();
            data.appointments.retain(|a| a.id != id);
            if data.appointments.len() == before {
                return Err(StoreError::NotFound("Appointment"));
            }
            Ok(())
        })
    }
}
