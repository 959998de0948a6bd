use serde::{Deserialize, Serialize};

/// Global application settings, a single document in the settings collection.
///
/// Reads synthesize defaults for anything absent, so callers always see a
/// fully populated value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub registration_open: bool,
    pub announcement: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registration_open: true,
            announcement: String::new(),
        }
    }
}
