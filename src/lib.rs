//! CareConnect core — a local-first clinic management backend.
//!
//! Patients book appointments with doctors through a four-stage wizard
//! (`booking`), doctors accept or decline requests and admins read
//! aggregate statistics (`portal`, `reports`), and a health-assistant
//! client proxies chat to a remote generative-language service
//! (`assistant`). All records live in a local key/value store (`db`)
//! standing in for a real backend; `core_state` carries the logged-in
//! session across the app.

pub mod assistant;
pub mod booking;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod payment;
pub mod portal;
pub mod reports;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for an embedding application. Call once at startup.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("CareConnect core v{}", config::APP_VERSION);
}
