use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "CareConnect";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/CareConnect/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("CareConnect")
}

/// Default store location inside the data directory
pub fn db_path() -> PathBuf {
    app_data_dir().join("careconnect.db")
}

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    "info,careconnect=debug".to_string()
}
