use crate::{
    error::{ApiError, ApiResult},
    models::business::{BusinessInfo, BusinessInfoInput},
    store::SalonStore,
};

pub struct BusinessService;

impl BusinessService {
    /// Saved details, or a blank record carrying the salon name until the
    /// owner fills them in.
    pub async fn get(store: &dyn SalonStore, tenant: &str) -> ApiResult<BusinessInfo> {
        if let Some(info) = store.get_business_info(tenant).await? {
            return Ok(info);
        }
        let salon = store.find_salon(tenant).await?.ok_or(ApiError::NotFound("Salon"))?;
        Ok(BusinessInfo { name: salon.name, ..Default::default() })
    }

    pub async fn save(store: &dyn SalonStore, tenant: &str, input: &BusinessInfoInput) -> ApiResult<BusinessInfo> {
        if input.name.trim().is_empty() {
            return Err(ApiError::validation("Business name is required"));
        }
        Ok(store.save_business_info(tenant, input).await?)
    }
}
