use chrono::NaiveDate;
use uuid::Uuid;

use super::{booking::validate_images, schedule};
use crate::{
    error::{ApiError, ApiResult},
    models::{
        appointment::{Appointment, CreateAppointmentRequest, NewAppointment, UpdateAppointmentRequest},
        schedule::DaySchedule,
        staff::Staff,
    },
    store::SalonStore,
};

fn ensure_on_roster(staff_id: Option<Uuid>, roster: &[Staff]) -> ApiResult<()> {
    match staff_id {
        Some(id) if !roster.iter().any(|s| s.id == id) => Err(ApiError::NotFound("Staff")),
        _ => Ok(()),
    }
}

pub struct AppointmentService;

impl AppointmentService {
    pub async fn list(store: &dyn SalonStore, tenant: &str, date: Option<NaiveDate>) -> ApiResult<Vec<Appointment>> {
        Ok(store.list_appointments(tenant, date).await?)
    }

    pub async fn get(store: &dyn SalonStore, tenant: &str, id: Uuid) -> ApiResult<Appointment> {
        Ok(store.get_appointment(tenant, id).await?)
    }

    /// Back-office booking: the caller supplies the snapshot fields directly.
    pub async fn create(store: &dyn SalonStore, tenant: &str, req: CreateAppointmentRequest) -> ApiResult<Appointment> {
        if req.service_name.trim().is_empty() {
            return Err(ApiError::validation("Service name is required"));
        }
        if req.duration_minutes <= 0 {
            return Err(ApiError::validation("Duration must be positive"));
        }
        schedule::parse_start_time(&req.start_time)?;
        validate_images(&req.images)?;
        ensure_on_roster(req.staff_id, &store.list_staff(tenant).await?)?;

        Ok(store
            .insert_appointment(
                tenant,
                &NewAppointment {
                    customer_id: req.customer_id,
                    staff_id: req.staff_id,
                    service_name: req.service_name.trim().to_string(),
                    date: req.date,
                    start_time: req.start_time,
                    duration_minutes: req.duration_minutes,
                    images: req.images,
                    notes: req.notes,
                },
            )
            .await?)
    }

    /// Reassigns, moves or annotates an appointment. The booked service name
    /// and base duration never change here.
    pub async fn update(
        store: &dyn SalonStore,
        tenant: &str,
        id: Uuid,
        req: UpdateAppointmentRequest,
    ) -> ApiResult<Appointment> {
        let mut appointment = store.get_appointment(tenant, id).await?;

        if let Some(staff_id) = req.staff_id {
            ensure_on_roster(staff_id, &store.list_staff(tenant).await?)?;
            appointment.staff_id = staff_id;
        }
        if let Some(date) = req.date {
            appointment.date = date;
        }
        if let Some(start_time) = req.start_time {
            schedule::parse_start_time(&start_time)?;
            appointment.start_time = start_time;
        }
        if let Some(notes) = req.notes {
            appointment.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }

        Ok(store.save_appointment(tenant, &appointment).await?)
    }

    pub async fn delete(store: &dyn SalonStore, tenant: &str, id: Uuid) -> ApiResult<()> {
        Ok(store.delete_appointment(tenant, id).await?)
    }

    /// Day view grouped by staff, resolved against the current roster.
    pub async fn day_view(
        store: &dyn SalonStore,
        tenant: &str,
        date: NaiveDate,
        only_staff: Option<Uuid>,
    ) -> ApiResult<DaySchedule> {
        let roster = store.list_staff(tenant).await?;
        let mut appointments = store.list_appointments(tenant, Some(date)).await?;
        if let Some(staff_id) = only_staff {
            appointments.retain(|a| a.staff_id == Some(staff_id));
        }
        Ok(schedule::day_schedule(date, appointments, &roster)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::customer::CustomerInput, store::memory::MemoryStore};

    async fn setup() -> (MemoryStore, Uuid, Staff) {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();
        let customer = store
            .insert_customer("bella", &CustomerInput { name: "Lea".into(), phone: "0611".into(), ..Default::default() })
            .await
            .unwrap();
        let ana = store.insert_staff("bella", "Ana", 15).await.unwrap();
        (store, customer.id, ana)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    fn create_req(customer_id: Uuid, staff_id: Option<Uuid>) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            customer_id,
            staff_id,
            service_name: "Cut".into(),
            date: day(),
            start_time: "14:00".into(),
            duration_minutes: 30,
            images: vec![],
            notes: None,
        }
    }

    #[tokio::test]
    async fn day_view_reflects_live_extra_minutes() {
        let (store, customer_id, ana) = setup().await;
        AppointmentService::create(&store, "bella", create_req(customer_id, Some(ana.id))).await.unwrap();

        let view = AppointmentService::day_view(&store, "bella", day(), None).await.unwrap();
        assert_eq!(view.columns[0].appointments[0].end_time, "14:45");

        store.set_extra_minutes("bella", ana.id, 30).await.unwrap();
        let view = AppointmentService::day_view(&store, "bella", day(), None).await.unwrap();
        assert_eq!(view.columns[0].appointments[0].end_time, "15:00");
        assert_eq!(view.columns[0].appointments[0].appointment.duration_minutes, 30);
    }

    #[tokio::test]
    async fn reassigning_changes_end_time_only() {
        let (store, customer_id, ana) = setup().await;
        let appt = AppointmentService::create(&store, "bella", create_req(customer_id, Some(ana.id))).await.unwrap();

        let moved = AppointmentService::update(
            &store,
            "bella",
            appt.id,
            UpdateAppointmentRequest { staff_id: Some(None), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(moved.staff_id, None);
        assert_eq!(moved.duration_minutes, 30);
        assert_eq!(moved.service_name, "Cut");

        let view = AppointmentService::day_view(&store, "bella", day(), None).await.unwrap();
        assert_eq!(view.columns.len(), 1);
        assert_eq!(view.columns[0].staff_id, None);
        assert_eq!(view.columns[0].appointments[0].end_time, "14:30");
    }

    #[tokio::test]
    async fn rejects_bad_input() {
        let (store, customer_id, _) = setup().await;
        let mut req = create_req(customer_id, Some(Uuid::new_v4()));
        assert!(matches!(
            AppointmentService::create(&store, "bella", req).await,
            Err(ApiError::NotFound("Staff"))
        ));

        req = create_req(customer_id, None);
        req.start_time = "25:00".into();
        assert!(matches!(
            AppointmentService::create(&store, "bella", req).await,
            Err(ApiError::Schedule(_))
        ));
    }
}
