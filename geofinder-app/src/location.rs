use geofinder_logic::{LocationFix, LocationService, PositionError, PositionOptions};
use log::error;
use tauri::{AppHandle, Runtime, plugin::PermissionState};
use tauri_plugin_geolocation::{
    Error as GeolocationError, Geolocation, GeolocationExt,
    PositionOptions as PluginPositionOptions,
};

pub struct TauriLocation(AppHandle);

impl TauriLocation {
    pub fn new(app: AppHandle) -> Self {
        Self(app)
    }
}

/// The plugin only hands back error messages, check if the user denied access before falling
/// back to guessing from the message.
fn classify_error<R: Runtime>(geo: &Geolocation<R>, why: &GeolocationError) -> PositionError {
    let denied = geo
        .check_permissions()
        .is_ok_and(|status| matches!(status.location, PermissionState::Denied));

    if denied {
        PositionError::PermissionDenied
    } else {
        PositionError::from_platform_message(&why.to_string())
    }
}

impl LocationService for TauriLocation {
    fn is_supported(&self) -> bool {
        // The plugin only talks to real location services on Android and iOS
        cfg!(mobile)
    }

    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<LocationFix, PositionError> {
        let app = self.0.clone();
        let options = PluginPositionOptions {
            enable_high_accuracy: options.high_accuracy,
            timeout: options.timeout_ms,
            maximum_age: options.max_cached_age_ms,
        };

        // Blocks until the OS answers
        let res = tokio::task::spawn_blocking(move || {
            let geo = app.geolocation();
            geo.get_current_position(Some(options))
                .map_err(|why| classify_error(geo, &why))
        })
        .await;

        match res {
            Ok(Ok(pos)) => Ok(LocationFix {
                latitude: pos.coords.latitude,
                longitude: pos.coords.longitude,
                accuracy: pos.coords.accuracy,
            }),
            Ok(Err(why)) => Err(why),
            Err(why) => {
                error!("Location task failed: {why:?}");
                Err(PositionError::Unknown(why.to_string()))
            }
        }
    }
}
