use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::location::{CreateLocationRequest, Location, UpdateLocationRequest},
    store::SalonStore,
};

pub struct LocationService;

impl LocationService {
    pub async fn list(store: &dyn SalonStore, tenant: &str) -> ApiResult<Vec<Location>> {
        Ok(store.list_locations(tenant).await?)
    }

    pub async fn create(store: &dyn SalonStore, tenant: &str, req: &CreateLocationRequest) -> ApiResult<Location> {
        if req.name.trim().is_empty() {
            return Err(ApiError::validation("Location name is required"));
        }
        if req.staff_count < 0 {
            return Err(ApiError::validation("Staff count cannot be negative"));
        }
        Ok(store.insert_location(tenant, req).await?)
    }

    pub async fn update(
        store: &dyn SalonStore,
        tenant: &str,
        id: Uuid,
        req: &UpdateLocationRequest,
    ) -> ApiResult<Location> {
        if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ApiError::validation("Location name is required"));
        }
        if req.staff_count.is_some_and(|n| n < 0) {
            return Err(ApiError::validation("Staff count cannot be negative"));
        }
        Ok(store.update_location(tenant, id, req).await?)
    }

    pub async fn delete(store: &dyn SalonStore, tenant: &str, id: Uuid) -> ApiResult<()> {
        Ok(store.delete_location(tenant, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn create(name: &str, staff_count: i32) -> CreateLocationRequest {
        CreateLocationRequest {
            name: name.into(),
            address: Some("12 rue des Lilas".into()),
            phone: Some("0102030405".into()),
            email: None,
            staff_count,
            active: None,
        }
    }

    async fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();
        store
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let store = store().await;
        assert!(matches!(
            LocationService::create(&store, "bella", &create("  ", 2)).await,
            Err(ApiError::Validation(_))
        ));

        let loc = LocationService::create(&store, "bella", &create("Bastille", 2)).await.unwrap();
        let blank = UpdateLocationRequest { name: Some(String::new()), ..Default::default() };
        assert!(matches!(
            LocationService::update(&store, "bella", loc.id, &blank).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn rejects_negative_staff_count() {
        let store = store().await;
        assert!(matches!(
            LocationService::create(&store, "bella", &create("Bastille", -1)).await,
            Err(ApiError::Validation(_))
        ));

        let loc = LocationService::create(&store, "bella", &create("Bastille", 2)).await.unwrap();
        let negative = UpdateLocationRequest { staff_count: Some(-3), ..Default::default() };
        assert!(matches!(
            LocationService::update(&store, "bella", loc.id, &negative).await,
            Err(ApiError::Validation(_))
        ));
        assert_eq!(LocationService::list(&store, "bella").await.unwrap()[0].staff_count, 2);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let store = store().await;
        let loc = LocationService::create(&store, "bella", &create("Bastille", 2)).await.unwrap();
        assert!(loc.active);

        let updated = LocationService::update(
            &store,
            "bella",
            loc.id,
            &UpdateLocationRequest { staff_count: Some(4), active: Some(false), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(updated.staff_count, 4);
        assert!(!updated.active);
        assert_eq!(updated.name, "Bastille");
        assert_eq!(updated.address, loc.address);
        assert_eq!(updated.phone, loc.phone);
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let store = store().await;
        assert!(matches!(
            LocationService::delete(&store, "bella", Uuid::new_v4()).await,
            Err(ApiError::NotFound("Location"))
        ));

        let loc = LocationService::create(&store, "bella", &create("Bastille", 2)).await.unwrap();
        LocationService::delete(&store, "bella", loc.id).await.unwrap();
        assert!(LocationService::list(&store, "bella").await.unwrap().is_empty());
    }
}
