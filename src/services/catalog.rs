use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::service::{Service, ServiceInput},
    store::SalonStore,
};

/// Checks a service definition before it is stored.
pub fn validate_service(input: &ServiceInput) -> ApiResult<()> {
    if input.name.trim().is_empty() {
        return Err(ApiError::validation("Service name is required"));
    }
    if input.duration_minutes <= 0 {
        return Err(ApiError::validation("Duration must be positive"));
    }
    if input.price_cents < 0 {
        return Err(ApiError::validation("Price cannot be negative"));
    }
    if let Some(deposit) = &input.deposit {
        if deposit.amount_cents <= 0 {
            return Err(ApiError::validation("Deposit amount must be positive"));
        }
    }
    for item in &input.pack {
        if item.name.trim().is_empty() || item.duration_minutes <= 0 {
            return Err(ApiError::validation("Each pack item needs a name and a positive duration"));
        }
    }
    Ok(())
}

pub struct CatalogService;

impl CatalogService {
    pub async fn list(store: &dyn SalonStore, tenant: &str, include_hidden: bool) -> ApiResult<Vec<Service>> {
        Ok(store.list_services(tenant, include_hidden).await?)
    }

    pub async fn get(store: &dyn SalonStore, tenant: &str, id: Uuid) -> ApiResult<Service> {
        Ok(store.get_service(tenant, id).await?)
    }

    pub async fn create(store: &dyn SalonStore, tenant: &str, input: &ServiceInput) -> ApiResult<Service> {
        validate_service(input)?;
        Ok(store.insert_service(tenant, input).await?)
    }

    /// Existing appointments keep the name and duration they were booked with.
    pub async fn update(store: &dyn SalonStore, tenant: &str, id: Uuid, input: &ServiceInput) -> ApiResult<Service> {
        validate_service(input)?;
        Ok(store.update_service(tenant, id, input).await?)
    }

    pub async fn delete(store: &dyn SalonStore, tenant: &str, id: Uuid) -> ApiResult<()> {
        Ok(store.delete_service(tenant, id).await?)
    }
}
