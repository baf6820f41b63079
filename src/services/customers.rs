use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::customer::{Customer, CustomerInput, UpdateCustomerRequest},
    store::SalonStore,
};

/// Canonical phone form used as the de-duplication key: separators removed,
/// a leading `+` kept.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        if c.is_ascii_digit() || (i == 0 && c == '+') {
            out.push(c);
        }
    }
    out
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Additive merge: incoming values replace stored ones only when non-blank.
pub fn merge_customer(existing: &Customer, incoming: &UpdateCustomerRequest) -> Customer {
    let mut merged = existing.clone();
    if let Some(name) = non_blank(incoming.name.as_deref()) {
        merged.name = name;
    }
    if let Some(phone) = non_blank(incoming.phone.as_deref()) {
        merged.phone = normalize_phone(&phone);
    }
    if let Some(email) = non_blank(incoming.email.as_deref()) {
        merged.email = Some(email);
    }
    if incoming.birthdate.is_some() {
        merged.birthdate = incoming.birthdate;
    }
    merged
}

fn validate(input: &CustomerInput) -> ApiResult<CustomerInput> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Customer name is required"));
    }
    let phone = normalize_phone(&input.phone);
    if phone.trim_start_matches('+').len() < 6 {
        return Err(ApiError::validation("A valid phone number is required"));
    }
    Ok(CustomerInput {
        name: name.to_string(),
        phone,
        email: non_blank(input.email.as_deref()),
        birthdate: input.birthdate,
    })
}

pub struct CustomerService;

impl CustomerService {
    pub async fn list(store: &dyn SalonStore, tenant: &str, search: Option<&str>) -> ApiResult<Vec<Customer>> {
        let search = search.map(str::trim).filter(|q| !q.is_empty());
        Ok(store.list_customers(tenant, search).await?)
    }

    pub async fn get(store: &dyn SalonStore, tenant: &str, id: Uuid) -> ApiResult<Customer> {
        Ok(store.get_customer(tenant, id).await?)
    }

    /// Finds the customer by phone and merges the incoming fields, or creates
    /// a new record. Returns the customer and whether it was created.
    pub async fn upsert_by_phone(
        store: &dyn SalonStore,
        tenant: &str,
        input: &CustomerInput,
    ) -> ApiResult<(Customer, bool)> {
        let input = validate(input)?;
        match store.find_customer_by_phone(tenant, &input.phone).await? {
            Some(existing) => {
                let patch = UpdateCustomerRequest {
                    name: Some(input.name),
                    phone: None,
                    email: input.email,
                    birthdate: input.birthdate,
                };
                let merged = merge_customer(&existing, &patch);
                if merged == existing {
                    return Ok((existing, false));
                }
                Ok((store.save_customer(tenant, &merged).await?, false))
            }
            None => Ok((store.insert_customer(tenant, &input).await?, true)),
        }
    }

    pub async fn update(
        store: &dyn SalonStore,
        tenant: &str,
        id: Uuid,
        req: &UpdateCustomerRequest,
    ) -> ApiResult<Customer> {
        let existing = store.get_customer(tenant, id).await?;
        let merged = merge_customer(&existing, req);
        if merged.phone.trim_start_matches('+').len() < 6 {
            return Err(ApiError::validation("A valid phone number is required"));
        }
        Ok(store.save_customer(tenant, &merged).await?)
    }

    pub async fn delete(store: &dyn SalonStore, tenant: &str, id: Uuid) -> ApiResult<()> {
        Ok(store.delete_customer(tenant, id).await?)
    }

    /// CSV export of the customer list, one row per customer.
    pub fn export_csv(customers: &[Customer]) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["id", "name", "phone", "email", "birthdate", "created_at"])?;
        for c in customers {
            writer.write_record([
                c.id.to_string(),
                c.name.clone(),
                c.phone.clone(),
                c.email.clone().unwrap_or_default(),
                c.birthdate.map(|d| d.to_string()).unwrap_or_default(),
                c.created_at.to_rfc3339(),
            ])?;
        }
        let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("csv flush failed: {e}"))?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::{NaiveDate, Utc};

    fn stored(email: Option<&str>) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: "Lea Martin".to_string(),
            phone: "+33611223344".to_string(),
            email: email.map(str::to_string),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone(" +33 6 11-22.33 44 "), "+33611223344");
        assert_eq!(normalize_phone("(555) 010-2030"), "5550102030");
        assert_eq!(normalize_phone("06+12"), "0612");
    }

    #[test]
    fn blank_fields_never_overwrite() {
        let existing = stored(Some("lea@example.com"));
        let merged = merge_customer(
            &existing,
            &UpdateCustomerRequest {
                name: Some("   ".into()),
                phone: Some(String::new()),
                email: Some(String::new()),
                birthdate: None,
            },
        );
        assert_eq!(merged, existing);
    }

    #[test]
    fn non_blank_fields_fill_in() {
        let existing = stored(None);
        let merged = merge_customer(
            &existing,
            &UpdateCustomerRequest {
                name: None,
                phone: None,
                email: Some(" lea@example.com ".into()),
                birthdate: None,
            },
        );
        assert_eq!(merged.email.as_deref(), Some("lea@example.com"));
        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.birthdate, existing.birthdate);
    }

    #[tokio::test]
    async fn upsert_reuses_customer_by_phone() {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();

        let first = CustomerInput {
            name: "Lea".into(),
            phone: "06 11 22 33 44".into(),
            email: Some("lea@example.com".into()),
            birthdate: None,
        };
        let (created, is_new) = CustomerService::upsert_by_phone(&store, "bella", &first).await.unwrap();
        assert!(is_new);
        assert_eq!(created.phone, "0611223344");

        let second = CustomerInput {
            name: "Lea M.".into(),
            phone: "0611223344".into(),
            email: None,
            birthdate: NaiveDate::from_ymd_opt(1991, 1, 1),
        };
        let (updated, is_new) = CustomerService::upsert_by_phone(&store, "bella", &second).await.unwrap();
        assert!(!is_new);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Lea M.");
        assert_eq!(updated.email.as_deref(), Some("lea@example.com"));
        assert_eq!(updated.birthdate, NaiveDate::from_ymd_opt(1991, 1, 1));
        assert_eq!(store.list_customers("bella", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_requires_name_and_phone() {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();
        let missing_phone = CustomerInput { name: "Lea".into(), ..Default::default() };
        assert!(matches!(
            CustomerService::upsert_by_phone(&store, "bella", &missing_phone).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let csv = CustomerService::export_csv(&[stored(Some("lea@example.com"))]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("id,name,phone,email,birthdate,created_at"));
        let row = lines.next().unwrap();
        assert!(row.contains("Lea Martin,+33611223344,lea@example.com,1990-04-02"));
        assert_eq!(lines.next(), None);
    }
}
