use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::PositionOptions;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, specta::Type)]
/// A single successful position reading from the platform
pub struct LocationFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Radius in meters of the 1-sigma confidence circle around the coordinates, as reported by
    /// the platform
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, specta::Type)]
/// Why the platform couldn't produce a position
pub enum PositionError {
    /// The user declined (or revoked) location access
    PermissionDenied,
    /// The platform tried but couldn't determine a position
    PositionUnavailable,
    /// The time budget in [PositionOptions] ran out
    Timeout,
    /// Anything else, contains whatever code or message the platform gave us
    Unknown(String),
}

impl PositionError {
    /// Parse one of the platform error codes (`permission-denied`, `position-unavailable`,
    /// `timeout`), anything unrecognized becomes [PositionError::Unknown]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "permission-denied" => Self::PermissionDenied,
            "position-unavailable" => Self::PositionUnavailable,
            "timeout" => Self::Timeout,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Map the numeric codes used by the W3C Geolocation API
    pub fn from_w3c_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Best effort classification of a free-form platform error message, for platforms that
    /// only hand back strings.
    pub fn from_platform_message(msg: &str) -> Self {
        let lower = msg.to_lowercase();
        if lower.contains("denied") || lower.contains("permission") {
            Self::PermissionDenied
        } else if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout
        } else if lower.contains("unavailable")
            || lower.contains("disabled")
            || lower.contains("not available")
        {
            Self::PositionUnavailable
        } else {
            Self::Unknown(msg.to_string())
        }
    }

    /// The platform code this error represents
    pub fn code(&self) -> &str {
        match self {
            Self::PermissionDenied => "permission-denied",
            Self::PositionUnavailable => "position-unavailable",
            Self::Timeout => "timeout",
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown ({code})"),
            other => f.write_str(other.code()),
        }
    }
}

/// A platform's location querying capability
pub trait LocationService: Send + Sync {
    /// Whether this platform can query location at all, checked before every request
    fn is_supported(&self) -> bool;

    /// Query the current position, the returned future must resolve exactly once, either with
    /// a fix or an error.
    fn current_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<LocationFix, PositionError>> + Send;
}
