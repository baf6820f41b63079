use sqlx::PgPool;

/// Provision a per-salon PostgreSQL schema with all required tables.
/// Every statement is idempotent, so this also upgrades existing salons.
pub async fn provision_tenant_schema(pool: &PgPool, slug: &str) -> anyhow::Result<()> {
    let schema = schema_name(slug);

    sqlx::raw_sql(&format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\""))
        .execute(pool)
        .await?;

    // --- Staff ---
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".staff (
            id             UUID PRIMARY KEY,
            name           VARCHAR(128) NOT NULL,
            extra_minutes  INTEGER NOT NULL DEFAULT 0 CHECK (extra_minutes BETWEEN 0 AND 60),
            created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    // --- Users (dashboard accounts) ---
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".users (
            id             UUID PRIMARY KEY,
            email          VARCHAR(255) UNIQUE NOT NULL,
            password_hash  TEXT NOT NULL,
            name           VARCHAR(128) NOT NULL,
            role           VARCHAR(16) NOT NULL DEFAULT 'staff',
            staff_id       UUID REFERENCES "{schema}".staff(id) ON DELETE SET NULL,
            is_active      BOOLEAN NOT NULL DEFAULT TRUE,
            created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    // --- Customers ---
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".customers (
            id          UUID PRIMARY KEY,
            name        VARCHAR(128) NOT NULL,
            phone       VARCHAR(32) UNIQUE NOT NULL,
            email       VARCHAR(255),
            birthdate   DATE,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    // --- Services (catalog) ---
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".services (
            id                UUID PRIMARY KEY,
            name              VARCHAR(128) NOT NULL,
            description       TEXT,
            image_url         TEXT,
            duration_minutes  INTEGER NOT NULL CHECK (duration_minutes >= 0),
            price_cents       BIGINT NOT NULL DEFAULT 0,
            visible           BOOLEAN NOT NULL DEFAULT TRUE,
            deposit           JSONB NOT NULL DEFAULT 'null',
            pack              JSONB NOT NULL DEFAULT '[]',
            available_days    JSONB NOT NULL DEFAULT '[]',
            created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    // --- Locations ---
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".locations (
            id           UUID PRIMARY KEY,
            name         VARCHAR(128) NOT NULL,
            address      TEXT,
            phone        VARCHAR(32),
            email        VARCHAR(255),
            staff_count  INTEGER NOT NULL DEFAULT 0,
            active       BOOLEAN NOT NULL DEFAULT TRUE,
            created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    // --- Business info (single row) ---
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".business_info (
            id             SMALLINT PRIMARY KEY DEFAULT 1 CHECK (id = 1),
            name           VARCHAR(128) NOT NULL,
            tagline        TEXT,
            phone          VARCHAR(32),
            email          VARCHAR(255),
            address        TEXT,
            instagram      TEXT,
            facebook       TEXT,
            opening_hours  TEXT,
            updated_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    // --- Appointments ---
    // service_name is a snapshot, deliberately not a foreign key.
    sqlx::raw_sql(&format!(
        r#"CREATE TABLE IF NOT EXISTS "{schema}".appointments (
            id                UUID PRIMARY KEY,
            customer_id       UUID NOT NULL REFERENCES "{schema}".customers(id) ON DELETE CASCADE,
            staff_id          UUID REFERENCES "{schema}".staff(id) ON DELETE SET NULL,
            service_name      VARCHAR(128) NOT NULL,
            date              DATE NOT NULL,
            start_time        VARCHAR(5) NOT NULL,
            duration_minutes  INTEGER NOT NULL CHECK (duration_minutes >= 0),
            images            JSONB NOT NULL DEFAULT '[]',
            notes             TEXT,
            created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#
    ))
    .execute(pool)
    .await?;

    sqlx::raw_sql(&format!(
        r#"CREATE INDEX IF NOT EXISTS appointments_date_idx ON "{schema}".appointments (date, start_time)"#
    ))
    .execute(pool)
    .await?;

    // --- updated_at trigger function ---
    sqlx::raw_sql(&format!(
        r#"CREATE OR REPLACE FUNCTION "{schema}".update_updated_at()
           RETURNS TRIGGER AS $fn$
           BEGIN NEW.updated_at = NOW(); RETURN NEW; END;
           $fn$ LANGUAGE plpgsql"#
    ))
    .execute(pool)
    .await?;

    // --- Triggers (one per table, idempotent via DROP IF EXISTS + CREATE) ---
    for table in &["staff", "customers", "services", "locations", "business_info", "appointments"] {
        let trigger = format!("{table}_updated_at");
        sqlx::raw_sql(&format!(
            r#"DROP TRIGGER IF EXISTS "{trigger}" ON "{schema}"."{table}";
               CREATE TRIGGER "{trigger}"
               BEFORE UPDATE ON "{schema}"."{table}"
               FOR EACH ROW EXECUTE FUNCTION "{schema}".update_updated_at()"#
        ))
        .execute(pool)
        .await?;
    }

    tracing::info!("Provisioned tenant schema: {schema}");
    Ok(())
}

/// Returns the PostgreSQL schema name for a given salon slug.
pub fn schema_name(slug: &str) -> String {
    format!("salon_{}", slug.to_lowercase().replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use super::schema_name;

    #[test]
    fn schema_name_is_sql_identifier_safe() {
        assert_eq!(schema_name("Studio-Nord"), "salon_studio_nord");
        assert_eq!(schema_name("bella"), "salon_bella");
    }
}
