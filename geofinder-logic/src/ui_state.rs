use serde::{Deserialize, Serialize};

use crate::state::{LocationErrorKind, LocationState};

const LOCATE_LABEL: &str = "Rileva la mia posizione";
const REFRESH_LABEL: &str = "Aggiorna Posizione";
const LOCATE_HINT: &str = "Cliccando il pulsante qui sotto, il browser ti chiederà il permesso di accedere alla tua posizione attuale.";
const REFRESH_HINT: &str = "Vuoi aggiornare la tua posizione?";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, specta::Type)]
/// A fix ready for display
pub struct FixUiState {
    /// Latitude to 6 decimal places
    pub latitude: String,
    /// Longitude to 6 decimal places
    pub longitude: String,
    /// Accuracy radius rounded to whole meters
    pub accuracy_meters: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, specta::Type)]
/// Subset of [LocationState] formatted for the UI
pub struct LocationUiState {
    pub busy: bool,
    pub fix: Option<FixUiState>,
    pub error_kind: Option<LocationErrorKind>,
    pub error_message: Option<String>,
    /// Text for the request button
    pub action_label: String,
    /// Text shown above the request button
    pub hint: String,
}

impl From<&LocationState> for LocationUiState {
    fn from(state: &LocationState) -> Self {
        let fix = state.fix.map(|fix| FixUiState {
            latitude: format!("{:.6}", fix.latitude),
            longitude: format!("{:.6}", fix.longitude),
            accuracy_meters: fix.accuracy.round(),
        });

        let (action_label, hint) = if fix.is_some() {
            (REFRESH_LABEL, REFRESH_HINT)
        } else {
            (LOCATE_LABEL, LOCATE_HINT)
        };

        Self {
            busy: state.busy,
            fix,
            error_kind: state.error_kind(),
            error_message: state.error_message().map(str::to_string),
            action_label: action_label.to_string(),
            hint: hint.to_string(),
        }
    }
}
