//! Services module - data acquisition and view derivation.
//!
//! Nothing in here knows about sessions, liveness or subscribers; the
//! [`controller`](crate::controller) layer decides when these run and whether
//! their results still apply.
//!
//! # Components
//!
//! - [`fetch_with_timeout`]: a single GET raced against a timer
//! - [`FallbackDataSource`]: remote tier first, bundled JSON second, each tried once
//!   per cycle. Only a fallback failure surfaces, as [`AcquireError`]
//! - [`filter_users`] / [`sort_users`]: pure, order-preserving filter and stable sort
//! - [`ViewComposer`]: memoised filter-then-sort producing a [`TableView`]
//!
//! # Usage Example
//!
//! ```ignore
//! use user_table::services::{FallbackDataSource, LocalSource, RemoteSource};
//!
//! let remote = RemoteSource::new(url, Duration::from_secs(8))?;
//! let source = FallbackDataSource::new(remote, LocalSource::new("data/users.json"));
//!
//! match source.acquire().await {
//!     Ok(acquisition) => println!("{} users from {}", acquisition.users.len(), acquisition.tier),
//!     Err(e) => eprintln!("{}", e), // "Fallback load failed: ..."
//! }
//! ```

pub mod data_source;
pub mod fetcher;
pub mod table;
pub mod view;

pub use data_source::{
    AcquireError, Acquisition, FallbackDataSource, LocalSource, RecordSource, RemoteSource,
    SourceError, Tier, first_available,
};
pub use fetcher::{DEFAULT_TIMEOUT, fetch_with_timeout};
pub use table::{SortKey, filter_users, matches_term, sort_users, sort_value};
pub use view::{TableView, ViewComposer};
