use crate::{
    error::{ApiError, ApiResult},
    middleware::tenant::is_valid_slug,
    models::{
        tenant::{CreateSalonRequest, Salon},
        user::UserRole,
    },
    services::auth::AuthService,
    store::SalonStore,
};

pub struct TenantService;

impl TenantService {
    pub async fn list(store: &dyn SalonStore) -> ApiResult<Vec<Salon>> {
        Ok(store.list_salons().await?)
    }

    /// Registers a salon, provisions its storage and creates the owner account.
    pub async fn create(store: &dyn SalonStore, req: &CreateSalonRequest) -> ApiResult<Salon> {
        let slug = req.slug.trim().to_lowercase();
        if !is_valid_slug(&slug) {
            return Err(ApiError::validation(
                "Slug must be 2-63 lowercase letters, digits or hyphens",
            ));
        }
        if req.name.trim().is_empty() {
            return Err(ApiError::validation("Salon name is required"));
        }
        if req.owner_password.len() < 8 {
            return Err(ApiError::validation("Password must be at least 8 characters"));
        }

        let salon = store.create_salon(&slug, req.name.trim()).await?;
        AuthService::create_account(
            store,
            &slug,
            &req.owner_email,
            &req.owner_name,
            &req.owner_password,
            UserRole::Owner,
            None,
        )
        .await
        .map_err(|e| ApiError::Store(e.into()))?;

        tracing::info!("salon {slug} created");
        Ok(salon)
    }

    pub async fn deactivate(store: &dyn SalonStore, slug: &str) -> ApiResult<()> {
        store.deactivate_salon(slug).await?;
        tracing::info!("salon {slug} deactivated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn request(slug: &str) -> CreateSalonRequest {
        CreateSalonRequest {
            slug: slug.into(),
            name: "Bella".into(),
            owner_email: "owner@bella.test".into(),
            owner_name: "Owner".into(),
            owner_password: "correct-horse".into(),
        }
    }

    #[tokio::test]
    async fn creates_salon_with_owner() {
        let store = MemoryStore::new();
        let salon = TenantService::create(&store, &request("Bella")).await.unwrap();
        assert_eq!(salon.slug, "bella");
        let owner = store.find_user_by_email("bella", "owner@bella.test").await.unwrap().unwrap();
        assert_eq!(owner.role, "owner");

        assert!(matches!(TenantService::create(&store, &request("bella")).await, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn rejects_bad_slugs() {
        let store = MemoryStore::new();
        assert!(matches!(
            TenantService::create(&store, &request("bad_slug")).await,
            Err(ApiError::Validation(_))
        ));
    }
}
