use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, specta::Type)]
/// Options passed to the platform when asking for the current position
pub struct PositionOptions {
    /// Ask the platform to use the most precise source it has (GPS over network)
    pub high_accuracy: bool,
    /// Time budget for the platform to produce a position, in milliseconds
    pub timeout_ms: u32,
    /// Oldest cached position the platform may hand back, in milliseconds. Zero means always
    /// take a fresh reading.
    pub max_cached_age_ms: u32,
}

impl PositionOptions {
    /// The options every request uses, these aren't user configurable
    pub const DEFAULT: Self = Self {
        high_accuracy: true,
        timeout_ms: 10_000,
        max_cached_age_ms: 0,
    };

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.into())
    }

    pub fn max_cached_age(&self) -> Duration {
        Duration::from_millis(self.max_cached_age_ms.into())
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = PositionOptions::default();
        assert!(opts.high_accuracy);
        assert_eq!(opts.timeout(), Duration::from_secs(10));
        assert_eq!(opts.max_cached_age(), Duration::ZERO);
    }
}
