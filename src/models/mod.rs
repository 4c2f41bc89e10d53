//! Data models for the user table.
//!
//! - [`User`]: a record as received on the wire (extra fields ignored)
//! - [`SortConfig`]: the active column and direction
//! - [`AppState`]: the session state owned by [`StateManager`](crate::state::StateManager),
//!   made of an [`AcquisitionResult`], a [`SearchState`] and a [`SortConfig`]
//! - [`Settings`]: runtime configuration loaded by [`ConfigManager`](crate::config::ConfigManager)
//!
//! Records are shared as [`Records`] (`Arc<[User]>`) and are never mutated after
//! acquisition; a new acquisition replaces the whole set.

pub mod app_state;
pub mod settings;
pub mod user;

pub use app_state::{AcquisitionResult, AppState, Records, SearchState};
pub use settings::{DEFAULT_API_URL, DEFAULT_FALLBACK_PATH, Settings};
pub use user::{Company, SortConfig, SortDirection, SortField, User};
