use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{InputDevice, Language};

/// Default PSNR threshold in dB. A region is considered on screen above it.
pub const DEFAULT_THRESHOLD: f64 = 30.0;

/// Frames between two debug dumps
pub const DEFAULT_DEBUG_INTERVAL: u64 = 120;

/// User-facing configuration of the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: Language,
    pub input_device: InputDevice,
    /// Similarity score a region has to exceed to be considered visible
    pub threshold: f64,
    /// Enables periodic score logging and sample dumps
    pub debug: bool,
    pub debug_interval: u64,
    /// Where debug samples are written. Nothing is written when unset.
    pub debug_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            input_device: InputDevice::default(),
            threshold: DEFAULT_THRESHOLD,
            debug: false,
            debug_interval: DEFAULT_DEBUG_INTERVAL,
            debug_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                "No settings found at {}. Using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!(
            "Loaded settings: language={:?} device={:?} threshold={}",
            settings.language,
            settings.input_device,
            settings.threshold
        );
        Ok(settings)
    }

    /// Whether switching to `other` needs a different template set.
    pub fn needs_reload(&self, other: &Settings) -> bool {
        self.language != other.language || self.input_device != other.input_device
    }
}
