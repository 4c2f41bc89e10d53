// user-table - resilient, searchable, sortable user directory
//
// This is the library crate containing the acquisition pipeline, view derivation
// and session state. The binary crate (main.rs) runs a single session and logs the result.

pub mod config;
pub mod controller;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use controller::UserTableSession;
pub use models::{AcquisitionResult, AppState, Settings, SortConfig, SortDirection, SortField, User};
pub use services::TableView;
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
