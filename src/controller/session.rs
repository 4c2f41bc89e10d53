use super::acquisition::AcquisitionController;
use super::debounce::Debouncer;
use crate::models::{AcquisitionResult, Settings, SortConfig, SortField};
use crate::services::{FallbackDataSource, LocalSource, RemoteSource, TableView};
use crate::state::{StateChange, StateManager};
use anyhow::{Context, Result};
use reqwest::Url;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// One interactive table session.
///
/// Wires the acquisition controller and the search debouncer to a shared
/// [`StateManager`] and exposes the user interactions: start, retry, typing
/// in the search box, clicking a column header and dismissing the view.
///
/// Dropping the session tears it down: pending results and commits are discarded.
///
/// # Example
/// ```ignore
/// let session = UserTableSession::from_settings(&settings)?;
/// session.start().await?;
///
/// session.on_search_input("bret");
/// session.sort_by(SortField::Name);
///
/// if let Some(view) = session.view() {
///     println!("{}", view.summary());
/// }
/// ```
pub struct UserTableSession {
    state: StateManager,
    acquisition: AcquisitionController,
    debouncer: Debouncer,
}

impl UserTableSession {
    pub fn new(source: FallbackDataSource, debounce_window: Duration) -> Self {
        let state = StateManager::new();
        Self {
            acquisition: AcquisitionController::new(state.clone(), source),
            debouncer: Debouncer::new(debounce_window),
            state,
        }
    }

    /// Build a session from settings: remote API tier, bundled JSON fallback
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let endpoint = Url::parse(&settings.api_url)
            .with_context(|| format!("Invalid API URL: {}", settings.api_url))?;

        let remote = RemoteSource::new(endpoint, settings.remote_timeout())
            .context("Failed to build HTTP client")?;
        let local = LocalSource::new(&settings.fallback_path);

        tracing::info!(
            "Session configured: api={}, fallback={}, timeout={}ms, debounce={}ms",
            settings.api_url,
            settings.fallback_path,
            settings.remote_timeout_ms,
            settings.debounce_ms
        );

        Ok(Self::new(
            FallbackDataSource::new(remote, local),
            settings.debounce_window(),
        ))
    }

    /// Begin the initial acquisition
    pub fn start(&self) -> JoinHandle<()> {
        self.acquisition.activate()
    }

    /// User-initiated retry: restarts the full remote-then-local cycle from `Loading`
    pub fn retry(&self) -> JoinHandle<()> {
        tracing::info!("Retry requested");
        self.acquisition.activate()
    }

    /// Keystroke in the search box
    ///
    /// The raw input is updated immediately; the committed term follows once
    /// the input has been quiet for the debounce window.
    pub fn on_search_input(&self, value: impl Into<String>) {
        let value = value.into();
        self.state.set_search_input(value.clone());

        let state = self.state.clone();
        self.debouncer.schedule(move || {
            // Newer input may have landed after the debouncer let this through
            if state.commit_pending_search(value.clone()).is_some() {
                tracing::debug!("Committed search term {:?}", value);
                state.metrics().record_search_commit();
            }
        });
    }

    /// Column header click
    pub fn sort_by(&self, field: SortField) -> Vec<StateChange> {
        self.state.toggle_sort(field)
    }

    /// Replace the ordering outright
    pub fn set_sort(&self, config: SortConfig) -> Vec<StateChange> {
        self.state.set_sort(config)
    }

    /// Current rows, or `None` while loading or after a failed cycle
    pub fn view(&self) -> Option<TableView> {
        self.state.view()
    }

    pub fn acquisition(&self) -> AcquisitionResult {
        self.state.read(|s| s.acquisition.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state.subscribe()
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// The view was dismissed: discard any in-flight acquisition or search commit
    pub fn teardown(&self) {
        self.acquisition.teardown();
        self.debouncer.shut_down();
    }
}

impl Drop for UserTableSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
