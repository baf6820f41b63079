use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use salonbook_api::{
    config::{Config, StorageConfig},
    middleware::rate_limit::RateLimiter,
    models::user::UserRole,
    routes,
    services::auth::AuthService,
    store::{memory::MemoryStore, SalonStore},
    AppState,
};

const ADMIN_KEY: &str = "test-admin-key";
const PASSWORD: &str = "correct-horse";
const TUESDAY: &str = "2024-05-14";

fn config() -> Config {
    Config {
        storage: StorageConfig::Memory,
        redis_url: None,
        jwt_secret: "test-secret".into(),
        jwt_expiry_seconds: 3600,
        host: "127.0.0.1".into(),
        port: 0,
        super_admin_key: ADMIN_KEY.into(),
        app_base_url: "http://localhost".into(),
        max_body_bytes: 32 * 1024 * 1024,
    }
}

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        store: store.clone(),
        rate_limiter: RateLimiter::disabled(),
        config: Arc::new(config()),
    };
    (routes::router(state), store)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    tenant: Option<&str>,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = tenant {
        builder = builder.header("X-Tenant", t);
    }
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    if uri.starts_with("/super-admin") {
        builder = builder.header("X-Super-Admin-Key", ADMIN_KEY);
    }
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_salon(app: &Router, slug: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/super-admin/salons",
        None,
        None,
        Some(json!({
            "slug": slug,
            "name": format!("Salon {slug}"),
            "owner_email": format!("owner@{slug}.test"),
            "owner_name": "Owner",
            "owner_password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    login(app, slug, &format!("owner@{slug}.test")).await
}

async fn login(app: &Router, slug: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        Some(slug),
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_staff(app: &Router, slug: &str, token: &str, name: &str, extra: i64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/staff",
        Some(slug),
        Some(token),
        Some(json!({ "name": name, "extraMinutes": extra })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_service(app: &Router, slug: &str, token: &str, duration: i64, visible: bool) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/services",
        Some(slug),
        Some(token),
        Some(json!({
            "name": "Cut",
            "durationMinutes": duration,
            "priceCents": 3500,
            "visible": visible,
            "deposit": { "amountCents": 1000, "method": "online" },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

fn booking(service_id: &str, staff_id: Option<&str>, start: &str) -> Value {
    json!({
        "serviceId": service_id,
        "staffId": staff_id,
        "date": TUESDAY,
        "startTime": start,
        "customer": { "name": "Lea", "phone": "06 11 22 33 44", "email": "lea@example.com" },
        "images": [{ "name": "look.jpg", "data": "data:image/jpeg;base64,aGVsbG8=" }],
    })
}

#[tokio::test]
async fn health_reports_storage() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/health", None, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn booking_flow_and_day_view() {
    let (app, _) = app();
    let token = create_salon(&app, "bella").await;
    let ana = create_staff(&app, "bella", &token, "Ana", 15).await;
    let service = create_service(&app, "bella", &token, 30, true).await;

    let (status, body) = send(&app, "POST", "/public/bookings", Some("bella"), None, Some(booking(&service, Some(&ana), "14:00"))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["endTime"], "14:45");
    assert_eq!(body["effectiveDuration"], 45);
    assert_eq!(body["appointment"]["durationMinutes"], 30);
    assert_eq!(body["appointment"]["serviceName"], "Cut");
    assert_eq!(body["deposit"]["amountCents"], 1000);

    let uri = format!("/appointments/day?date={TUESDAY}");
    let (status, body) = send(&app, "GET", &uri, Some("bella"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["columns"][0]["appointments"][0];
    assert_eq!(body["columns"][0]["staffName"], "Ana");
    assert_eq!(entry["startTime"], "14:00");
    assert_eq!(entry["endTime"], "14:45");
    assert_eq!(entry["rollsOver"], false);

    // Raising the pace buffer moves the end of the existing booking, clamped at 60.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/staff/{ana}/extra-minutes"),
        Some("bella"),
        Some(&token),
        Some(json!({ "extraMinutes": 90 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extraMinutes"], 60);

    let (_, body) = send(&app, "GET", &uri, Some("bella"), Some(&token), None).await;
    let entry = &body["columns"][0]["appointments"][0];
    assert_eq!(entry["endTime"], "15:30");
    assert_eq!(entry["durationMinutes"], 30);
}

#[tokio::test]
async fn renaming_a_service_keeps_booked_name() {
    let (app, _) = app();
    let token = create_salon(&app, "bella").await;
    let service = create_service(&app, "bella", &token, 30, true).await;
    send(&app, "POST", "/public/bookings", Some("bella"), None, Some(booking(&service, None, "10:00"))).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/services/{service}"),
        Some("bella"),
        Some(&token),
        Some(json!({ "name": "Signature cut", "durationMinutes": 60, "priceCents": 5000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/appointments?date={TUESDAY}"), Some("bella"), Some(&token), None).await;
    assert_eq!(body[0]["serviceName"], "Cut");
    assert_eq!(body[0]["durationMinutes"], 30);
}

#[tokio::test]
async fn booking_rejections() {
    let (app, _) = app();
    let token = create_salon(&app, "bella").await;
    let hidden = create_service(&app, "bella", &token, 30, false).await;
    let visible = create_service(&app, "bella", &token, 30, true).await;

    let (status, _) = send(&app, "POST", "/public/bookings", Some("bella"), None, Some(booking(&hidden, None, "10:00"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/public/bookings", Some("bella"), None, Some(booking(&visible, None, "7:00"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let ghost = uuid::Uuid::new_v4().to_string();
    let (status, _) = send(&app, "POST", "/public/bookings", Some("bella"), None, Some(booking(&visible, Some(&ghost), "10:00"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, services) = send(&app, "GET", "/public/services", Some("bella"), None, None).await;
    assert_eq!(services.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn customers_merge_by_phone() {
    let (app, _) = app();
    let token = create_salon(&app, "bella").await;

    let (status, first) = send(
        &app,
        "POST",
        "/customers",
        Some("bella"),
        Some(&token),
        Some(json!({ "name": "Lea", "phone": "0611223344", "email": "lea@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, second) = send(
        &app,
        "POST",
        "/customers",
        Some("bella"),
        Some(&token),
        Some(json!({ "name": "Lea Martin", "phone": "06.11.22.33.44", "email": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["name"], "Lea Martin");
    assert_eq!(second["email"], "lea@example.com");

    let (_, found) = send(&app, "GET", "/customers?q=martin", Some("bella"), Some(&token), None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn tokens_are_bound_to_their_salon() {
    let (app, _) = app();
    let bella = create_salon(&app, "bella").await;
    create_salon(&app, "nova").await;

    let (status, _) = send(&app, "GET", "/customers", Some("nova"), Some(&bella), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/customers", Some("bella"), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_accounts_are_read_only() {
    let (app, store) = app();
    let owner = create_salon(&app, "bella").await;
    let ana = store.insert_staff("bella", "Ana", 0).await.unwrap();
    AuthService::create_account(store.as_ref(), "bella", "ana@bella.test", "Ana", PASSWORD, UserRole::Staff, Some(ana.id))
        .await
        .unwrap();
    let token = login(&app, "bella", "ana@bella.test").await;

    let (status, _) = send(&app, "GET", "/staff", Some("bella"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/staff", Some("bella"), Some(&token), Some(json!({ "name": "Bea" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", &format!("/dashboard?date={TUESDAY}"), Some("bella"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "staff");
    assert_eq!(body["totalCustomers"], Value::Null);

    let (_, body) = send(&app, "GET", &format!("/dashboard?date={TUESDAY}"), Some("bella"), Some(&owner), None).await;
    assert_eq!(body["totalStaff"], 1);
}

#[tokio::test]
async fn tenant_resolution_errors() {
    let (app, _) = app();
    create_salon(&app, "bella").await;

    let (status, _) = send(&app, "GET", "/public/info", None, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/public/info", Some("ghost"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/public/info", Some("bella"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Salon bella");

    let (status, _) = send(&app, "DELETE", "/super-admin/salons/bella", None, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/public/info", Some("bella"), None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn super_admin_requires_key() {
    let (app, _) = app();
    let request = Request::builder()
        .uri("/super-admin/salons")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customer_export_is_csv() {
    let (app, _) = app();
    let token = create_salon(&app, "bella").await;
    send(
        &app,
        "POST",
        "/customers",
        Some("bella"),
        Some(&token),
        Some(json!({ "name": "Lea", "phone": "0611223344" })),
    )
    .await;

    let request = Request::builder()
        .uri("/customers/export")
        .header("X-Tenant", "bella")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.lines().nth(1).unwrap().contains("Lea,0611223344"));
}

#[tokio::test]
async fn locations_crud() {
    let (app, _) = app();
    let token = create_salon(&app, "bella").await;

    let (status, created) = send(
        &app,
        "POST",
        "/locations",
        Some("bella"),
        Some(&token),
        Some(json!({ "name": "Bastille", "address": "12 rue des Lilas", "staffCount": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/locations/{id}"),
        Some("bella"),
        Some(&token),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["active"], false);
    assert_eq!(updated["address"], "12 rue des Lilas");
    assert_eq!(updated["staffCount"], 3);

    let (status, _) = send(&app, "POST", "/locations", Some("bella"), Some(&token), Some(json!({ "name": " " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "DELETE", &format!("/locations/{id}"), Some("bella"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/locations/{id}"), Some("bella"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
