//! Tracker configuration persistence
//!
//! The config types live in `quarry-types` so the UI shell can share
//! them; this module adds load/save on top.

use quarry_types::TrackerConfig;

/// Extension trait for config persistence.
pub trait TrackerConfigExt {
    fn load() -> Self;
    fn save(self);
}

impl TrackerConfigExt for TrackerConfig {
    fn load() -> Self {
        confy::load("quarry", "config").unwrap_or_default()
    }

    fn save(self) {
        if let Err(err) = confy::store("quarry", "config", self) {
            tracing::warn!(%err, "failed to save configuration");
        }
    }
}
