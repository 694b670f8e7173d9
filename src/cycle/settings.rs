//! Asset Cycle Settings
//!
//! ```rust,ignore
//! let settings = CycleSettings {
//!     assets: vec!["crate.prefab".into(), "atlas.prefab".into()],
//!     hold_ms: 500,
//!     ..Default::default()
//! };
//!
//! // or from JSON: { "assets": ["crate.prefab"], "hold_ms": 500 }
//! let settings = CycleSettings::from_file("cycle.json")?;
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Configuration of the load → display → dispose loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleSettings {
    /// Asset urls, visited in order and then from the start again
    pub assets: Vec<String>,
    /// How long each asset stays attached to the scene
    pub hold_ms: u64,
    /// Loads taking longer than this fail with `Error::LoadTimeout`
    pub load_timeout_ms: Option<u64>,
    /// Stop after this many completed cycles; `None` loops until cancelled
    pub max_cycles: Option<u64>,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            hold_ms: 2000,
            load_timeout_ms: None,
            max_cycles: None,
        }
    }
}

impl CycleSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.assets.is_empty() {
            return Err(Error::InvalidSettings("asset list is empty".to_string()));
        }
        if self.hold_ms == 0 {
            return Err(Error::InvalidSettings("hold_ms must be greater than 0".to_string()));
        }
        if self.load_timeout_ms == Some(0) {
            return Err(Error::InvalidSettings(
                "load_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    #[must_use]
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }
}
