use std::sync::Arc;

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_gauge, register_gauge_vec, CounterVec, Gauge, GaugeVec};
use tracing::{info, warn};

use crate::store::SalonStore;

lazy_static! {
    // ── Event counters ──────────────────────────────────────────────────────
    pub static ref BOOKINGS_COUNTER: CounterVec = register_counter_vec!(
        "api_bookings_total",
        "Public booking attempts by tenant and outcome",
        &["tenant", "outcome"]
    ).unwrap();

    pub static ref LOGINS_COUNTER: CounterVec = register_counter_vec!(
        "api_logins_total",
        "Login attempts by tenant and status",
        &["tenant", "status"]
    ).unwrap();

    // ── Business metrics ────────────────────────────────────────────────────
    pub static ref APPOINTMENTS_GAUGE: GaugeVec = register_gauge_vec!(
        "salon_appointments_total",
        "Stored appointments by tenant",
        &["tenant"]
    ).unwrap();

    pub static ref TENANTS_GAUGE: Gauge = register_gauge!(
        "salon_tenants_active_total",
        "Number of active salons"
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(store: Arc<dyn SalonStore>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = collect(store.as_ref()).await {
                warn!("Metrics: collection failed: {}", e);
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
        }
    });
}

async fn collect(store: &dyn SalonStore) -> anyhow::Result<()> {
    let salons: Vec<_> = store.list_salons().await?.into_iter().filter(|s| s.is_active).collect();
    TENANTS_GAUGE.set(salons.len() as f64);

    for salon in &salons {
        match store.list_appointments(&salon.slug, None).await {
            Ok(appointments) => APPOINTMENTS_GAUGE
                .with_label_values(&[&salon.slug])
                .set(appointments.len() as f64),
            Err(e) => warn!("Metrics: appointment count failed for {}: {}", salon.slug, e),
        }
    }

    info!("Metrics: collected for {} salon(s)", salons.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{appointment::NewAppointment, customer::CustomerInput},
        store::memory::MemoryStore,
    };
    use chrono::NaiveDate;

    #[tokio::test]
    async fn collect_counts_active_salons() {
        let store = MemoryStore::new();
        store.create_salon("metrics-a", "A").await.unwrap();
        store.create_salon("metrics-b", "B").await.unwrap();
        store.deactivate_salon("metrics-b").await.unwrap();

        let customer = store
            .insert_customer("metrics-a", &CustomerInput { name: "Lea".into(), phone: "0611".into(), ..Default::default() })
            .await
            .unwrap();
        store
            .insert_appointment(
                "metrics-a",
                &NewAppointment {
                    customer_id: customer.id,
                    staff_id: None,
                    service_name: "Cut".into(),
                    date: NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
                    start_time: "10:00".into(),
                    duration_minutes: 30,
                    images: vec![],
                    notes: None,
                },
            )
            .await
            .unwrap();

        collect(&store).await.unwrap();
        assert_eq!(TENANTS_GAUGE.get(), 1.0);
        assert_eq!(APPOINTMENTS_GAUGE.with_label_values(&["metrics-a"]).get(), 1.0);
    }
}
