mod location;
mod state;

use geofinder_logic::{LocationState, LocationUiState};
use log::LevelFilter;
use tauri::{Manager, State};
use tauri_specta::{ErrorHandlingMode, collect_commands, collect_events};

use std::result::Result as StdResult;

use crate::state::{ControllerHandle, LocationStateUpdate, mk_controller};

type Result<T = (), E = String> = StdResult<T, E>;

#[tauri::command]
#[specta::specta]
/// Ask the platform for the current location. Returns once the request is sent, a
/// [LocationStateUpdate] event fires when the state changes.
async fn request_location(controller: State<'_, ControllerHandle>) -> Result {
    controller.request_location().await;
    Ok(())
}

#[tauri::command]
#[specta::specta]
/// Get the raw location state, call after receiving an update event
async fn get_location_state(controller: State<'_, ControllerHandle>) -> Result<LocationState> {
    Ok(controller.get_state().await)
}

#[tauri::command]
#[specta::specta]
/// Get the location state formatted for display, call after receiving an update event
async fn get_location_ui_state(
    controller: State<'_, ControllerHandle>,
) -> Result<LocationUiState> {
    Ok(controller.get_ui_state().await)
}

pub fn mk_specta() -> tauri_specta::Builder {
    tauri_specta::Builder::<tauri::Wry>::new()
        .error_handling(ErrorHandlingMode::Throw)
        .commands(collect_commands![
            request_location,
            get_location_state,
            get_location_ui_state,
        ])
        .events(collect_events![LocationStateUpdate])
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let builder = mk_specta();

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(LevelFilter::Debug)
                .build(),
        )
        .plugin(tauri_plugin_geolocation::init())
        .invoke_handler(builder.invoke_handler())
        .setup(move |app| {
            builder.mount_events(app);
            let controller = mk_controller(app.handle());
            app.manage(controller);
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
