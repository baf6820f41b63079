use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::{
    models::{
        auth::Claims,
        user::{LoginResponse, NewUser, User, UserRole},
    },
    store::SalonStore,
};

/// bcrypt cost for dashboard passwords.
const PASSWORD_COST: u32 = 10;

pub struct AuthService;

impl AuthService {
    /// Verifies credentials and issues an access token scoped to `tenant`.
    pub async fn login(
        store: &dyn SalonStore,
        tenant: &str,
        email: &str,
        password: &str,
        jwt_secret: &str,
        access_ttl: u64,
    ) -> anyhow::Result<LoginResponse> {
        let user = store
            .find_user_by_email(tenant, &email.trim().to_lowercase())
            .await?
            .ok_or_else(|| anyhow::anyhow!("Invalid credentials"))?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|_| anyhow::anyhow!("Invalid credentials"))?;
        if !valid {
            anyhow::bail!("Invalid credentials");
        }

        let access_token = Self::generate_access_token(&user, tenant, jwt_secret, access_ttl)?;

        let salon_name = store
            .find_salon(tenant)
            .await?
            .map(|s| s.name)
            .unwrap_or_else(|| tenant.to_string());

        Ok(LoginResponse {
            access_token,
            user: user.into(),
            salon_name,
        })
    }

    pub fn generate_access_token(
        user: &User,
        tenant: &str,
        secret: &str,
        ttl_seconds: u64,
    ) -> anyhow::Result<String> {
        let role: UserRole = user.role.parse()?;
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            tenant: tenant.to_string(),
            role,
            staff_id: user.staff_id.map(|id| id.to_string()),
            iat: now,
            exp: now + ttl_seconds as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Creates a dashboard account with a freshly hashed password.
    pub async fn create_account(
        store: &dyn SalonStore,
        tenant: &str,
        email: &str,
        name: &str,
        password: &str,
        role: UserRole,
        staff_id: Option<uuid::Uuid>,
    ) -> anyhow::Result<User> {
        if password.len() < 8 {
            anyhow::bail!("Password must be at least 8 characters");
        }
        let password_hash = bcrypt::hash(password, PASSWORD_COST)?;
        let user = store
            .create_user(
                tenant,
                &NewUser {
                    email: email.trim().to_lowercase(),
                    password_hash,
                    name: name.trim().to_string(),
                    role,
                    staff_id,
                },
            )
            .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{middleware::auth::decode_access_token, store::memory::MemoryStore};

    #[tokio::test]
    async fn login_round_trips_claims() {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();
        let stylist = store.insert_staff("bella", "Ana", 0).await.unwrap();
        AuthService::create_account(
            &store,
            "bella",
            "Ana@Bella.test",
            "Ana",
            "correct-horse",
            UserRole::Staff,
            Some(stylist.id),
        )
        .await
        .unwrap();

        let res = AuthService::login(&store, "bella", "ana@bella.test", "correct-horse", "s3cret", 60)
            .await
            .unwrap();
        assert_eq!(res.salon_name, "Bella");

        let user = decode_access_token(&res.access_token, "s3cret").unwrap();
        assert_eq!(user.tenant, "bella");
        assert_eq!(user.role, UserRole::Staff);
        assert_eq!(user.staff_id, Some(stylist.id));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();
        AuthService::create_account(&store, "bella", "o@b.test", "Owner", "correct-horse", UserRole::Owner, None)
            .await
            .unwrap();

        let err = AuthService::login(&store, "bella", "o@b.test", "nope", "s3cret", 60)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn short_passwords_are_refused() {
        let store = MemoryStore::new();
        store.create_salon("bella", "Bella").await.unwrap();
        assert!(
            AuthService::create_account(&store, "bella", "o@b.test", "Owner", "short", UserRole::Owner, None)
                .await
                .is_err()
        );
    }
}
