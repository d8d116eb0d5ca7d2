//! Detail view coordination

pub mod coordinator;
pub mod state;

pub use coordinator::{SelectOutcome, ViewSyncCoordinator};
pub use state::{Selection, ViewPhase, ViewState};
