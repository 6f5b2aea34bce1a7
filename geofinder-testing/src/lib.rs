use geofinder_logic::{LocationFix, LocationState, PositionError};
use interprocess::local_socket::{GenericNamespaced, Name, ToNsName};
use serde::{Deserialize, Serialize};

pub mod prelude {
    pub use anyhow::{Context, anyhow, bail};
    pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
}

pub use prelude::*;

pub fn get_socket_name(base_name: String) -> Result<Name<'static>> {
    base_name
        .to_ns_name::<GenericNamespaced>()
        .context("Failed to parse socket name")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// What the scripted platform should answer a pending query with
pub enum ScriptedAnswer {
    Fix(LocationFix),
    /// A platform error code, e.g. `permission-denied`
    Error(String),
}

impl From<ScriptedAnswer> for Result<LocationFix, PositionError> {
    fn from(val: ScriptedAnswer) -> Self {
        match val {
            ScriptedAnswer::Fix(fix) => Ok(fix),
            ScriptedAnswer::Error(code) => Err(PositionError::from_code(&code)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TestingRequest {
    /// Same as the user pressing the locate button
    RequestLocation,
    /// Answer the oldest query the platform hasn't answered yet
    Resolve(ScriptedAnswer),
    /// Toggle whether the platform reports location support
    SetSupported(bool),
    GetState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TestingResponse {
    Complete,
    State(LocationState),
    /// Pushed whenever the controller changes state
    StateUpdate(LocationState),
    NothingPending,
    Error(String),
}

impl TestingResponse {
    /// Whether this response is a reply to a request, as opposed to a pushed update
    pub fn is_reply(&self) -> bool {
        !matches!(self, Self::StateUpdate(_))
    }
}

impl From<anyhow::Error> for TestingResponse {
    fn from(value: anyhow::Error) -> Self {
        TestingResponse::Error(value.to_string())
    }
}
