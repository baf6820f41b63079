use chrono::NaiveDate;
use uuid::Uuid;

use super::schedule;
use crate::{
    error::ApiResult,
    models::{
        appointment::Appointment,
        auth::AuthenticatedUser,
        dashboard::{DashboardSummary, StaffLoad},
        staff::Staff,
    },
    store::SalonStore,
};

/// Per-staff booked minutes for one day, using effective durations.
pub fn staff_load(date: NaiveDate, appointments: &[Appointment], roster: &[Staff]) -> Vec<StaffLoad> {
    let mut load: Vec<StaffLoad> = Vec::new();
    for appointment in appointments.iter().filter(|a| a.date == date) {
        let minutes = schedule::effective_duration(appointment, roster);
        match load.iter_mut().find(|l| l.staff_id == appointment.staff_id) {
            Some(entry) => {
                entry.appointments += 1;
                entry.booked_minutes += minutes;
            }
            None => load.push(StaffLoad {
                staff_id: appointment.staff_id,
                staff_name: appointment
                    .staff_id
                    .and_then(|id| roster.iter().find(|s| s.id == id))
                    .map(|s| s.name.clone()),
                appointments: 1,
                booked_minutes: minutes,
            }),
        }
    }
    load.sort_by(|a, b| b.booked_minutes.cmp(&a.booked_minutes));
    load
}

pub struct DashboardService;

impl DashboardService {
    /// Owners and managers get salon-wide totals; staff only see their own
    /// appointments and load.
    pub async fn summary(store: &dyn SalonStore, user: &AuthenticatedUser, date: NaiveDate) -> ApiResult<DashboardSummary> {
        let tenant = user.tenant.as_str();
        let roster = store.list_staff(tenant).await?;
        let mut appointments = store.list_appointments(tenant, None).await?;

        let scope: Option<Option<Uuid>> = (!user.can_manage()).then_some(user.staff_id);
        if let Some(own) = scope {
            appointments.retain(|a| own.is_some() && a.staff_id == own);
        }

        let appointments_today = appointments.iter().filter(|a| a.date == date).count();
        let upcoming_appointments = appointments.iter().filter(|a| a.date > date).count();
        let load = staff_load(date, &appointments, &roster);

        let (total_customers, total_staff) = if user.can_manage() {
            (Some(store.list_customers(tenant, None).await?.len()), Some(roster.len()))
        } else {
            (None, None)
        };

        Ok(DashboardSummary {
            date,
            role: user.role,
            appointments_today,
            upcoming_appointments,
            total_customers,
            total_staff,
            load,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{appointment::NewAppointment, customer::CustomerInput, user::UserRole},
        store::memory::MemoryStore,
    };

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    fn new_appt(customer_id: Uuid, staff_id: Option<Uuid>, date: NaiveDate) -> NewAppointment {
        NewAppointment {
            customer_id,
            staff_id,
            service_name: "Cut".into(),
            date,
            start_time: "10:00".into(),
            duration_minutes: 30,
            images: vec![],
            notes: None,
        }
    }

    #[tokio::test]
    async fn managers_see_totals_staff_see_their_own() {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();
        let c = store
            .insert_customer("bella", &CustomerInput { name: "Lea".into(), phone: "0611".into(), ..Default::default() })
            .await
            .unwrap();
        let ana = store.insert_staff("bella", "Ana", 10).await.unwrap();
        let bea = store.insert_staff("bella", "Bea", 0).await.unwrap();
        store.insert_appointment("bella", &new_appt(c.id, Some(ana.id), day())).await.unwrap();
        store.insert_appointment("bella", &new_appt(c.id, Some(ana.id), day())).await.unwrap();
        store.insert_appointment("bella", &new_appt(c.id, Some(bea.id), day())).await.unwrap();
        store
            .insert_appointment("bella", &new_appt(c.id, None, day().succ_opt().unwrap()))
            .await
            .unwrap();

        let owner = AuthenticatedUser { user_id: Uuid::new_v4(), tenant: "bella".into(), role: UserRole::Owner, staff_id: None };
        let summary = DashboardService::summary(&store, &owner, day()).await.unwrap();
        assert_eq!(summary.appointments_today, 3);
        assert_eq!(summary.upcoming_appointments, 1);
        assert_eq!(summary.total_customers, Some(1));
        assert_eq!(summary.total_staff, Some(2));
        assert_eq!(summary.load[0].staff_id, Some(ana.id));
        assert_eq!(summary.load[0].booked_minutes, 80);

        let stylist = AuthenticatedUser { role: UserRole::Staff, staff_id: Some(bea.id), ..owner };
        let summary = DashboardService::summary(&store, &stylist, day()).await.unwrap();
        assert_eq!(summary.appointments_today, 1);
        assert_eq!(summary.upcoming_appointments, 0);
        assert_eq!(summary.total_customers, None);
        assert_eq!(summary.load.len(), 1);
        assert_eq!(summary.load[0].booked_minutes, 30);
    }
}
