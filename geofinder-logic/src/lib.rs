mod controller;
mod location;
mod settings;
mod state;
#[cfg(test)]
mod tests;
mod ui_state;

pub use controller::{LocationController, StateUpdateSender};
pub use location::{LocationFix, LocationService, PositionError};
pub use settings::PositionOptions;
pub use state::{LocationErrorKind, LocationEvent, LocationFailure, LocationState};
pub use ui_state::{FixUiState, LocationUiState};
