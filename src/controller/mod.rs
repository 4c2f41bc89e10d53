// Controller module - session lifecycle and async scheduling
//
// This module contains:
// - AcquisitionController: runs fetch cycles and applies only still-current results
// - Debouncer: cancel-and-replace scheduling for search commits
// - Liveness/CycleToken: the validity flag both of them check before applying effects
// - UserTableSession: wires everything to a StateManager for one table view

pub mod acquisition;
pub mod debounce;
pub mod liveness;
pub mod session;

pub use acquisition::AcquisitionController;
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use liveness::{CycleToken, Liveness};
pub use session::UserTableSession;
