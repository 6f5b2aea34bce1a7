use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::RwLock;

use crate::{
    location::LocationService,
    settings::PositionOptions,
    state::{LocationEvent, LocationState},
    ui_state::LocationUiState,
};

pub trait StateUpdateSender: Send + Sync {
    fn send_update(&self);
}

/// The current state along with the generation of the latest request. Every request bumps the
/// generation so answers to older requests can be recognized and dropped.
#[derive(Default)]
struct TrackedState {
    state: LocationState,
    generation: u64,
}

/// Owns the lifecycle of location requests, asks the platform via [LocationService] and turns
/// its answers into [LocationState] transitions, notifying the UI through [StateUpdateSender]
/// after each one.
pub struct LocationController<L: LocationService, S: StateUpdateSender> {
    state: RwLock<TrackedState>,
    location: L,
    state_update_sender: S,
    options: PositionOptions,
}

impl<L: LocationService, S: StateUpdateSender> LocationController<L, S> {
    pub fn new(location: L, state_update_sender: S) -> Self {
        Self {
            state: RwLock::new(TrackedState::default()),
            location,
            state_update_sender,
            options: PositionOptions::DEFAULT,
        }
    }

    pub async fn get_state(&self) -> LocationState {
        self.state.read().await.state.clone()
    }

    pub async fn get_ui_state(&self) -> LocationUiState {
        LocationUiState::from(&self.state.read().await.state)
    }

    /// Start a request, returns the generation to resolve it with, or `None` if the platform
    /// can't query location (in which case the state is already terminal).
    async fn dispatch(&self) -> Option<u64> {
        let mut tracked = self.state.write().await;
        tracked.generation += 1;

        let generation = if self.location.is_supported() {
            debug!("Dispatching location request {}", tracked.generation);
            tracked.state = tracked.state.transition(LocationEvent::Dispatched);
            Some(tracked.generation)
        } else {
            warn!("Location isn't supported on this platform");
            tracked.state = tracked.state.transition(LocationEvent::Unsupported);
            None
        };

        drop(tracked);
        self.state_update_sender.send_update();
        generation
    }

    /// Wait for the platform to answer the request started as `generation` and apply the answer
    async fn resolve(&self, generation: u64) {
        let res = self.location.current_position(self.options).await;

        match &res {
            Ok(fix) => info!(
                "Got location fix ({}, {}) within {}m",
                fix.latitude, fix.longitude, fix.accuracy
            ),
            Err(why) => warn!("Failed to get location: {why}"),
        }

        let mut tracked = self.state.write().await;

        if tracked.generation != generation {
            debug!(
                "Discarding result of request {generation}, request {} superseded it",
                tracked.generation
            );
            return;
        }

        tracked.state = tracked.state.transition(LocationEvent::Resolved(res));
        drop(tracked);
        self.state_update_sender.send_update();
    }

    /// Request the current location. Returns as soon as the request has been sent, the outcome
    /// shows up in the state later.
    pub async fn request_location(self: &Arc<Self>)
    where
        Self: 'static,
    {
        if let Some(generation) = self.dispatch().await {
            let controller = self.clone();
            tokio::spawn(async move {
                controller.resolve(generation).await;
            });
        }
    }

    /// Request the current location and wait for the outcome
    pub async fn locate(&self) -> LocationState {
        if let Some(generation) = self.dispatch().await {
            self.resolve(generation).await;
        }
        self.get_state().await
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        location::{LocationFix, PositionError},
        state::{LocationErrorKind, LocationFailure},
        tests::{CountingSender, MockLocation, settle},
    };

    use super::*;
    use tokio::test;

    type TestController = LocationController<MockLocation, CountingSender>;

    const FIX: LocationFix = LocationFix {
        latitude: 45.0,
        longitude: 9.0,
        accuracy: 12.3,
    };

    fn mk_controller(location: MockLocation) -> Arc<TestController> {
        Arc::new(TestController::new(location, CountingSender::default()))
    }

    fn assert_exclusive(state: &LocationState) {
        assert!(
            state.fix.is_none() || state.error.is_none(),
            "State has both a fix and an error: {state:?}"
        );
    }

    #[test]
    async fn test_starts_idle() {
        let controller = mk_controller(MockLocation::default());
        assert!(controller.get_state().await.is_idle());
    }

    #[test]
    async fn test_unsupported_makes_no_call() {
        let controller = mk_controller(MockLocation::unsupported());

        controller.request_location().await;

        let state = controller.get_state().await;
        assert_eq!(
            state,
            LocationState {
                fix: None,
                error: Some(LocationFailure::from(LocationErrorKind::Unsupported)),
                busy: false,
            }
        );

        settle().await;

        assert_eq!(controller.location.calls(), 0);
        assert_eq!(controller.state_update_sender.count(), 1);
    }

    #[test]
    async fn test_busy_before_resolution() {
        let controller = mk_controller(MockLocation::default());
        let answer = controller.location.script().await;

        controller.request_location().await;

        let state = controller.get_state().await;
        assert!(state.busy, "Not busy right after dispatch");
        assert_eq!(state.error, None);

        settle().await;

        assert_eq!(controller.location.calls(), 1);
        assert!(controller.get_state().await.busy, "No longer busy while pending");

        answer.send(Ok(FIX)).expect("Failed to answer");
        settle().await;

        assert_eq!(
            controller.get_state().await,
            LocationState {
                fix: Some(FIX),
                error: None,
                busy: false,
            }
        );
        assert_eq!(controller.state_update_sender.count(), 2);
    }

    #[test]
    async fn test_failure_codes() {
        let cases = [
            ("permission-denied", LocationErrorKind::PermissionDenied),
            ("position-unavailable", LocationErrorKind::PositionUnavailable),
            ("timeout", LocationErrorKind::Timeout),
            ("some-future-code", LocationErrorKind::Unknown),
        ];

        for (code, kind) in cases {
            let controller = mk_controller(MockLocation::default());
            controller
                .location
                .script_now(Err(PositionError::from_code(code)))
                .await;

            let state = controller.locate().await;

            assert_eq!(state.error_kind(), Some(kind), "Wrong kind for {code}");
            assert!(
                !state.error_message().unwrap_or_default().is_empty(),
                "No message for {code}"
            );
            assert_eq!(state.fix, None);
            assert!(!state.busy, "Still busy after {code}");
        }
    }

    #[test]
    async fn test_double_request_no_flicker() {
        let controller = mk_controller(MockLocation::default());
        let first = controller.location.script().await;
        let second = controller.location.script().await;

        controller.request_location().await;
        controller.request_location().await;

        assert!(controller.get_state().await.busy);

        settle().await;
        assert_eq!(controller.location.calls(), 2);

        // The first request answering now is stale, so nothing should change
        first
            .send(Err(PositionError::Timeout))
            .expect("Failed to answer");
        settle().await;

        let state = controller.get_state().await;
        assert!(state.busy, "Stale answer ended the newer request");
        assert_eq!(state.error, None);

        second.send(Ok(FIX)).expect("Failed to answer");
        settle().await;

        assert_eq!(controller.get_state().await.fix, Some(FIX));
    }

    #[test]
    async fn test_late_stale_answer_ignored() {
        let controller = mk_controller(MockLocation::default());
        let first = controller.location.script().await;
        let second = controller.location.script().await;

        controller.request_location().await;
        controller.request_location().await;
        settle().await;

        second.send(Ok(FIX)).expect("Failed to answer");
        settle().await;
        first
            .send(Err(PositionError::PermissionDenied))
            .expect("Failed to answer");
        settle().await;

        let state = controller.get_state().await;
        assert_eq!(state.fix, Some(FIX));
        assert_eq!(state.error, None);
        assert!(!state.busy);
    }

    #[test]
    async fn test_unsupported_supersedes_pending() {
        let controller = mk_controller(MockLocation::default());
        let answer = controller.location.script().await;

        controller.request_location().await;
        settle().await;

        controller.location.set_supported(false);
        controller.request_location().await;

        answer.send(Ok(FIX)).expect("Failed to answer");
        settle().await;

        let state = controller.get_state().await;
        assert_eq!(state.error_kind(), Some(LocationErrorKind::Unsupported));
        assert_eq!(state.fix, None);
        assert_eq!(controller.location.calls(), 1);
    }

    #[test]
    async fn test_fix_and_error_exclusive() {
        let controller = mk_controller(MockLocation::default());
        let outcomes = [
            Ok(FIX),
            Err(PositionError::Timeout),
            Ok(FIX),
            Ok(FIX),
            Err(PositionError::PermissionDenied),
            Err(PositionError::Unknown("x".to_string())),
            Ok(FIX),
        ];

        for outcome in outcomes {
            let answer = controller.location.script().await;
            controller.request_location().await;
            assert_exclusive(&controller.get_state().await);
            settle().await;
            answer.send(outcome).expect("Failed to answer");
            settle().await;
            let state = controller.get_state().await;
            assert_exclusive(&state);
            assert!(!state.busy);
        }

        assert_eq!(controller.location.calls(), 7);
    }

    #[test]
    async fn test_recovers_after_failure() {
        let controller = mk_controller(MockLocation::default());

        controller
            .location
            .script_now(Err(PositionError::PositionUnavailable))
            .await;
        let state = controller.locate().await;
        assert_eq!(
            state.error_kind(),
            Some(LocationErrorKind::PositionUnavailable)
        );

        controller.location.script_now(Ok(FIX)).await;
        let state = controller.locate().await;
        assert_eq!(state.fix, Some(FIX));
        assert_eq!(state.error, None);

        let ui = controller.get_ui_state().await;
        assert!(ui.fix.is_some());
        assert_eq!(ui.error_message, None);
    }
}
