use std::{marker::PhantomData, sync::Arc};

use geofinder_logic::{LocationController, StateUpdateSender};
use log::error;
use serde::{Deserialize, Serialize};
use tauri::AppHandle;
use tauri_specta::Event;

use crate::location::TauriLocation;

/// The location state has changed
#[derive(Serialize, Deserialize, Clone, Default, Debug, specta::Type, tauri_specta::Event)]
pub struct LocationStateUpdate;

pub struct TauriStateUpdateSender<E: Clone + Default + Event + Serialize>(
    AppHandle,
    PhantomData<E>,
);

impl<E: Serialize + Clone + Default + Event> TauriStateUpdateSender<E> {
    pub fn new(app: &AppHandle) -> Self {
        Self(app.clone(), PhantomData)
    }
}

impl<E: Serialize + Clone + Default + Event + Send + Sync> StateUpdateSender
    for TauriStateUpdateSender<E>
{
    fn send_update(&self) {
        if let Err(why) = E::default().emit(&self.0) {
            error!("Error sending location state update to UI: {why:?}");
        }
    }
}

pub type Controller =
    LocationController<TauriLocation, TauriStateUpdateSender<LocationStateUpdate>>;

pub type ControllerHandle = Arc<Controller>;

pub fn mk_controller(app: &AppHandle) -> ControllerHandle {
    let location = TauriLocation::new(app.clone());
    let state_updates = TauriStateUpdateSender::new(app);
    Arc::new(Controller::new(location, state_updates))
}
