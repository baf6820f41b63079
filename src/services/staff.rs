use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::staff::{CreateStaffRequest, Staff, MAX_EXTRA_MINUTES},
    store::SalonStore,
};

/// Out-of-range values are clamped rather than rejected.
pub fn clamp_extra_minutes(value: i32) -> i32 {
    value.clamp(0, MAX_EXTRA_MINUTES)
}

pub struct StaffService;

impl StaffService {
    pub async fn list(store: &dyn SalonStore, tenant: &str) -> ApiResult<Vec<Staff>> {
        Ok(store.list_staff(tenant).await?)
    }

    pub async fn create(store: &dyn SalonStore, tenant: &str, req: &CreateStaffRequest) -> ApiResult<Staff> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Staff name is required"));
        }
        let extra = clamp_extra_minutes(req.extra_minutes.unwrap_or(0));
        Ok(store.insert_staff(tenant, name, extra).await?)
    }

    pub async fn rename(store: &dyn SalonStore, tenant: &str, id: Uuid, name: &str) -> ApiResult<Staff> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Staff name is required"));
        }
        Ok(store.rename_staff(tenant, id, name).await?)
    }

    /// Takes effect on every existing appointment of this staff member the
    /// next time a schedule is rendered.
    pub async fn set_extra_minutes(store: &dyn SalonStore, tenant: &str, id: Uuid, value: i32) -> ApiResult<Staff> {
        let clamped = clamp_extra_minutes(value);
        if clamped != value {
            tracing::debug!("extra minutes {value} clamped to {clamped} for staff {id}");
        }
        Ok(store.set_extra_minutes(tenant, id, clamped).await?)
    }

    pub async fn delete(store: &dyn SalonStore, tenant: &str, id: Uuid) -> ApiResult<()> {
        Ok(store.delete_staff(tenant, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn clamps_into_range() {
        assert_eq!(clamp_extra_minutes(-5), 0);
        assert_eq!(clamp_extra_minutes(0), 0);
        assert_eq!(clamp_extra_minutes(25), 25);
        assert_eq!(clamp_extra_minutes(60), 60);
        assert_eq!(clamp_extra_minutes(90), 60);
    }

    #[tokio::test]
    async fn create_and_adjust() {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();

        let ana = StaffService::create(
            &store,
            "bella",
            &CreateStaffRequest { name: " Ana ".into(), extra_minutes: Some(120) },
        )
        .await
        .unwrap();
        assert_eq!(ana.name, "Ana");
        assert_eq!(ana.extra_minutes, 60);

        let ana = StaffService::set_extra_minutes(&store, "bella", ana.id, -1).await.unwrap();
        assert_eq!(ana.extra_minutes, 0);

        assert!(matches!(
            StaffService::rename(&store, "bella", ana.id, "  ").await,
            Err(ApiError::Validation(_))
        ));
    }
}
