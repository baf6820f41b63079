//! Public booking flow: validates a request from the booking page and turns it
//! into a stored appointment for a (possibly new) customer.

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use uuid::Uuid;

use super::{customers::CustomerService, schedule};
use crate::{
    error::{ApiError, ApiResult},
    models::{
        appointment::{Appointment, BookingConfirmation, BookingRequest, InspirationImage, NewAppointment},
        customer::{Customer, CustomerInput},
        service::Service,
    },
    store::{SalonStore, StoreError},
};

pub const MAX_IMAGES: usize = 5;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Service not found")]
    ServiceNotFound,

    #[error("Service is not available on {weekday} {date}")]
    NotAvailableOn { date: NaiveDate, weekday: chrono::Weekday },

    #[error("Unknown staff member")]
    UnknownStaff,

    #[error("At most 5 images can be attached")]
    TooManyImages,

    #[error("Image '{0}' is not valid base64")]
    InvalidImage(String),

    #[error("Every image needs a name")]
    UnnamedImage,

    #[error("Image '{0}' exceeds 5 MiB")]
    ImageTooLarge(String),
}

impl BookingError {
    pub fn status(&self) -> StatusCode {
        match self {
            BookingError::ServiceNotFound => StatusCode::NOT_FOUND,
            BookingError::ImageTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Strips an optional `data:<mime>;base64,` header.
fn payload(data: &str) -> &str {
    match data.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, body)| body),
        None => data,
    }
}

pub fn validate_images(images: &[InspirationImage]) -> Result<(), BookingError> {
    if images.len() > MAX_IMAGES {
        return Err(BookingError::TooManyImages);
    }
    for image in images {
        if image.name.trim().is_empty() {
            return Err(BookingError::UnnamedImage);
        }
        let decoded = STANDARD
            .decode(payload(&image.data).trim())
            .map_err(|_| BookingError::InvalidImage(image.name.clone()))?;
        if decoded.len() > MAX_IMAGE_BYTES {
            return Err(BookingError::ImageTooLarge(image.name.clone()));
        }
    }
    Ok(())
}

fn check_available(service: &Service, date: NaiveDate) -> Result<(), BookingError> {
    if service.is_available_on(date) {
        Ok(())
    } else {
        Err(BookingError::NotAvailableOn { date, weekday: date.weekday() })
    }
}

/// Upserts the customer, then stores the appointment for them. A customer
/// created here is removed again when the appointment cannot be stored.
async fn persist(
    store: &dyn SalonStore,
    tenant: &str,
    customer: &CustomerInput,
    mut draft: NewAppointment,
) -> ApiResult<(Customer, Appointment)> {
    let (customer, created) = CustomerService::upsert_by_phone(store, tenant, customer).await?;
    draft.customer_id = customer.id;

    match store.insert_appointment(tenant, &draft).await {
        Ok(appointment) => Ok((customer, appointment)),
        Err(e) => {
            if created {
                if let Err(cleanup) = store.delete_customer(tenant, customer.id).await {
                    tracing::warn!("could not remove customer {} after failed booking: {cleanup}", customer.id);
                }
            }
            Err(e.into())
        }
    }
}

pub struct BookingService;

impl BookingService {
    pub async fn book(store: &dyn SalonStore, tenant: &str, req: BookingRequest) -> ApiResult<BookingConfirmation> {
        let service = match store.get_service(tenant, req.service_id).await {
            Ok(s) if s.visible => s,
            Ok(_) | Err(StoreError::NotFound(_)) => return Err(BookingError::ServiceNotFound.into()),
            Err(e) => return Err(e.into()),
        };
        check_available(&service, req.date)?;

        let roster = store.list_staff(tenant).await?;
        if let Some(staff_id) = req.staff_id {
            if !roster.iter().any(|s| s.id == staff_id) {
                return Err(BookingError::UnknownStaff.into());
            }
        }
        validate_images(&req.images)?;

        let effective_duration =
            i64::from(service.duration_minutes) + i64::from(schedule::extra_minutes_for(req.staff_id, &roster));
        let (end, _) = schedule::advance(&req.start_time, effective_duration)?;
        let end_time = end.format("%H:%M").to_string();

        let draft = NewAppointment {
            customer_id: Uuid::nil(),
            staff_id: req.staff_id,
            service_name: service.name.clone(),
            date: req.date,
            start_time: req.start_time,
            duration_minutes: service.duration_minutes,
            images: req.images,
            notes: req.notes.filter(|n| !n.trim().is_empty()),
        };
        let (customer, appointment) = persist(store, tenant, &req.customer, draft).await?;

        tracing::info!(
            tenant,
            appointment = %appointment.id,
            "booking created for {} at {}",
            appointment.date,
            appointment.start_time
        );

        Ok(BookingConfirmation {
            effective_duration,
            customer_id: customer.id,
            end_time,
            deposit: service.deposit,
            appointment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::service::{Deposit, DepositMethod, ServiceInput},
        store::memory::MemoryStore,
    };
    use chrono::Weekday;

    fn image(name: &str, data: &str) -> InspirationImage {
        InspirationImage { name: name.into(), data: data.into() }
    }

    #[test]
    fn images_accept_plain_and_data_url_base64() {
        let ok = vec![image("a.png", "aGVsbG8="), image("b.jpg", "data:image/jpeg;base64,aGVsbG8=")];
        assert_eq!(validate_images(&ok), Ok(()));
    }

    #[test]
    fn images_are_bounded() {
        let six = vec![image("x", "aGVsbG8="); 6];
        assert_eq!(validate_images(&six), Err(BookingError::TooManyImages));
        assert_eq!(validate_images(&[image(" ", "aGVsbG8=")]), Err(BookingError::UnnamedImage));
        assert_eq!(
            validate_images(&[image("x", "not base64!")]),
            Err(BookingError::InvalidImage("x".into()))
        );

        let big = STANDARD.encode(vec![0u8; MAX_IMAGE_BYTES + 1]);
        assert_eq!(validate_images(&[image("big", &big)]), Err(BookingError::ImageTooLarge("big".into())));
    }

    async fn salon() -> (MemoryStore, Service) {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();
        let service = store
            .insert_service(
                "bella",
                &ServiceInput {
                    name: "Balayage".into(),
                    description: None,
                    image_url: None,
                    duration_minutes: 90,
                    price_cents: 12000,
                    visible: true,
                    deposit: Some(Deposit { amount_cents: 3000, method: DepositMethod::BankTransfer }),
                    pack: vec![],
                    available_days: vec![Weekday::Tue, Weekday::Sat],
                },
            )
            .await
            .unwrap();
        (store, service)
    }

    fn request(service_id: Uuid, date: NaiveDate, staff_id: Option<Uuid>) -> BookingRequest {
        BookingRequest {
            service_id,
            staff_id,
            date,
            start_time: "10:00".into(),
            customer: CustomerInput { name: "Lea".into(), phone: "0611223344".into(), ..Default::default() },
            images: vec![],
            notes: None,
        }
    }

    #[tokio::test]
    async fn books_with_snapshot_and_extra_minutes() {
        let (store, service) = salon().await;
        let ana = store.insert_staff("bella", "Ana", 15).await.unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();

        let confirmation = BookingService::book(&store, "bella", request(service.id, tuesday, Some(ana.id)))
            .await
            .unwrap();
        assert_eq!(confirmation.appointment.service_name, "Balayage");
        assert_eq!(confirmation.appointment.duration_minutes, 90);
        assert_eq!(confirmation.effective_duration, 105);
        assert_eq!(confirmation.end_time, "11:45");
        assert_eq!(confirmation.deposit.map(|d| d.amount_cents), Some(3000));
    }

    #[tokio::test]
    async fn rejects_unavailable_day_and_unknown_staff() {
        let (store, service) = salon().await;
        let wednesday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let err = BookingService::book(&store, "bella", request(service.id, wednesday, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Booking(BookingError::NotAvailableOn { weekday: Weekday::Wed, .. })));

        let tuesday = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        let err = BookingService::book(&store, "bella", request(service.id, tuesday, Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Booking(BookingError::UnknownStaff)));
        assert!(store.list_customers("bella", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hidden_services_cannot_be_booked() {
        let (store, service) = salon().await;
        let hidden = ServiceInput {
            name: service.name.clone(),
            description: None,
            image_url: None,
            duration_minutes: service.duration_minutes,
            price_cents: service.price_cents,
            visible: false,
            deposit: None,
            pack: vec![],
            available_days: vec![],
        };
        store.update_service("bella", service.id, &hidden).await.unwrap();

        let tuesday = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        let err = BookingService::book(&store, "bella", request(service.id, tuesday, None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_start_time_is_rejected() {
        let (store, service) = salon().await;
        let tuesday = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        let mut req = request(service.id, tuesday, None);
        req.start_time = "9:30".into();
        let err = BookingService::book(&store, "bella", req).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn booking_on_last_representable_date() {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();
        let service = store
            .insert_service(
                "bella",
                &ServiceInput {
                    name: "Late colour".into(),
                    description: None,
                    image_url: None,
                    duration_minutes: 90,
                    price_cents: 9000,
                    visible: true,
                    deposit: None,
                    pack: vec![],
                    available_days: vec![],
                },
            )
            .await
            .unwrap();

        let mut req = request(service.id, NaiveDate::MAX, None);
        req.start_time = "23:50".into();
        let confirmation = BookingService::book(&store, "bella", req).await.unwrap();
        assert_eq!(confirmation.end_time, "01:20");

        let view = crate::services::appointments::AppointmentService::day_view(&store, "bella", NaiveDate::MAX, None)
            .await
            .unwrap();
        let scheduled = &view.columns[0].appointments[0];
        assert_eq!(scheduled.end_time, "01:20");
        assert!(scheduled.rolls_over);
    }

    #[tokio::test]
    async fn failed_insert_removes_customer_it_created() {
        let (store, service) = salon().await;
        let tuesday = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        let draft = NewAppointment {
            customer_id: Uuid::nil(),
            staff_id: Some(Uuid::new_v4()),
            service_name: service.name.clone(),
            date: tuesday,
            start_time: "10:00".into(),
            duration_minutes: service.duration_minutes,
            images: vec![],
            notes: None,
        };
        let input = CustomerInput { name: "Lea".into(), phone: "0611223344".into(), ..Default::default() };

        let err = persist(&store, "bella", &input, draft.clone()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Staff")));
        assert!(store.list_customers("bella", None).await.unwrap().is_empty());

        // An existing customer is kept.
        store.insert_customer("bella", &input).await.unwrap();
        assert!(persist(&store, "bella", &input, draft).await.is_err());
        assert_eq!(store.list_customers("bella", None).await.unwrap().len(), 1);
    }
}
