//! Demo salon seed script
//!
//! Seeds a `demo` salon with a small but realistic data set: an owner and a
//! manager account, three stylists with different paces, a service catalogue
//! (including a pack and a deposit-backed service), customers and a week of
//! appointments.
//!
//! Usage:
//!   DATABASE_URL=... ./seed-demo --password Demo2024! --reset
//!
//! Without a database URL the data is seeded into an in-memory store and only
//! the summary is printed, which is handy as a smoke test.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Utc, Weekday};
use clap::Parser;

use salonbook_api::{
    db,
    models::{
        appointment::NewAppointment,
        business::BusinessInfoInput,
        customer::CustomerInput,
        location::CreateLocationRequest,
        service::{Deposit, DepositMethod, PackItem, ServiceInput},
        user::UserRole,
    },
    services::{auth::AuthService, schedule},
    store::{memory::MemoryStore, postgres::PgStore, SalonStore},
};

#[derive(Debug, Parser)]
#[command(name = "seed-demo", about = "Seed a demo salon")]
struct Args {
    /// PostgreSQL connection string; omit to seed an in-memory store.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Salon slug to create.
    #[arg(long, default_value = "demo")]
    slug: String,

    /// Password for every demo account.
    #[arg(long, env = "DEMO_PASSWORD", default_value = "Demo2024!")]
    password: String,

    /// Drop the existing demo salon first (Postgres only).
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("=== Seed Demo Salon ===");

    let store: Box<dyn SalonStore> = match args.database_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => {
            let pool = db::create_pool(url).await.context("Failed to connect to database")?;
            db::run_migrations(&pool).await?;
            if args.reset {
                println!("Dropping existing '{}' salon...", args.slug);
                let schema = db::tenant::schema_name(&args.slug);
                sqlx::raw_sql(&format!("DROP SCHEMA IF EXISTS \"{schema}\" CASCADE"))
                    .execute(&pool)
                    .await
                    .context("Failed to drop demo schema")?;
                sqlx::query("DELETE FROM public.salons WHERE slug = $1")
                    .bind(&args.slug)
                    .execute(&pool)
                    .await
                    .context("Failed to delete demo salon")?;
            }
            Box::new(PgStore::new(pool))
        }
        None => {
            println!("No DATABASE_URL, seeding an in-memory store");
            Box::new(MemoryStore::new())
        }
    };

    seed(store.as_ref(), &args.slug, &args.password).await?;

    println!("=== Done: log in as owner@{}.test / {} ===", args.slug, args.password);
    Ok(())
}

async fn seed(store: &dyn SalonStore, slug: &str, password: &str) -> Result<()> {
    let tenant = slug;

    println!("Creating salon...");
    store
        .create_salon(tenant, "Studio Lumière (Demo)")
        .await
        .context("Failed to create salon (use --reset to recreate)")?;

    store
        .save_business_info(
            tenant,
            &BusinessInfoInput {
                name: "Studio Lumière".into(),
                tagline: Some("Colour, cuts and care".into()),
                phone: Some("+33 1 23 45 67 89".into()),
                email: Some(format!("hello@{slug}.test")),
                address: Some("12 rue des Lilas, Paris".into()),
                instagram: Some("@studiolumiere".into()),
                facebook: None,
                opening_hours: Some("Tue-Sat 09:00-19:00".into()),
            },
        )
        .await?;

    store
        .insert_location(
            tenant,
            &CreateLocationRequest {
                name: "Studio Lumière Bastille".into(),
                address: Some("12 rue des Lilas, Paris".into()),
                phone: None,
                email: None,
                staff_count: 3,
                active: Some(true),
            },
        )
        .await?;

    println!("Creating staff and accounts...");
    let mut roster = Vec::new();
    for (name, extra) in [("Camille", 0), ("Inès", 15), ("Hugo", 30)] {
        roster.push(store.insert_staff(tenant, name, extra).await?);
    }

    AuthService::create_account(store, tenant, &format!("owner@{slug}.test"), "Salon Owner", password, UserRole::Owner, None)
        .await?;
    AuthService::create_account(store, tenant, &format!("manager@{slug}.test"), "Front Desk", password, UserRole::Manager, None)
        .await?;
    AuthService::create_account(
        store,
        tenant,
        &format!("camille@{slug}.test"),
        "Camille",
        password,
        UserRole::Staff,
        Some(roster[0].id),
    )
    .await?;

    println!("Creating services...");
    let catalogue = [
        ServiceInput {
            name: "Cut & blow-dry".into(),
            description: Some("Wash, cut and styling".into()),
            image_url: None,
            duration_minutes: 45,
            price_cents: 4500,
            visible: true,
            deposit: None,
            pack: vec![],
            available_days: vec![],
        },
        ServiceInput {
            name: "Balayage".into(),
            description: Some("Hand-painted highlights".into()),
            image_url: None,
            duration_minutes: 150,
            price_cents: 16000,
            visible: true,
            deposit: Some(Deposit { amount_cents: 4000, method: DepositMethod::BankTransfer }),
            pack: vec![],
            available_days: vec![Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat],
        },
        ServiceInput {
            name: "Bridal pack".into(),
            description: Some("Trial, styling and make-up".into()),
            image_url: None,
            duration_minutes: 180,
            price_cents: 32000,
            visible: true,
            deposit: Some(Deposit { amount_cents: 10000, method: DepositMethod::Online }),
            pack: vec![
                PackItem { name: "Hair trial".into(), duration_minutes: 60, staff_name: Some("Inès".into()) },
                PackItem { name: "Styling".into(), duration_minutes: 90, staff_name: Some("Inès".into()) },
                PackItem { name: "Make-up".into(), duration_minutes: 30, staff_name: None },
            ],
            available_days: vec![Weekday::Sat],
        },
        ServiceInput {
            name: "Keratin treatment".into(),
            description: None,
            image_url: None,
            duration_minutes: 120,
            price_cents: 18000,
            visible: false,
            deposit: None,
            pack: vec![],
            available_days: vec![],
        },
    ];
    let mut services = Vec::new();
    for input in &catalogue {
        services.push(store.insert_service(tenant, input).await?);
    }

    println!("Creating customers...");
    let mut customers = Vec::new();
    for (name, phone) in [
        ("Léa Martin", "0611223344"),
        ("Chloé Bernard", "0622334455"),
        ("Manon Petit", "0633445566"),
        ("Sarah Durand", "0644556677"),
        ("Emma Leroy", "0655667788"),
    ] {
        customers.push(
            store
                .insert_customer(tenant, &CustomerInput { name: name.into(), phone: phone.into(), ..Default::default() })
                .await?,
        );
    }

    println!("Creating appointments...");
    let today = Utc::now().date_naive();
    let slots = ["09:00", "10:30", "13:00", "15:30"];
    let mut created = 0;
    for offset in 0..7 {
        let date = today + Duration::days(offset);
        if date.weekday() == Weekday::Sun || date.weekday() == Weekday::Mon {
            continue;
        }
        for (i, start) in slots.iter().enumerate() {
            let service = &services[(offset as usize + i) % 2];
            let customer = &customers[(offset as usize * slots.len() + i) % customers.len()];
            let staff = &roster[i % roster.len()];
            store
                .insert_appointment(
                    tenant,
                    &NewAppointment {
                        customer_id: customer.id,
                        staff_id: Some(staff.id),
                        service_name: service.name.clone(),
                        date,
                        start_time: start.to_string(),
                        duration_minutes: service.duration_minutes,
                        images: vec![],
                        notes: None,
                    },
                )
                .await?;
            created += 1;
        }
    }

    let todays = store.list_appointments(tenant, Some(today)).await?;
    let day = schedule::day_schedule(today, todays, &roster)?;
    println!(
        "  {} appointments seeded, {} staff column(s) today",
        created,
        day.columns.len()
    );
    Ok(())
}
