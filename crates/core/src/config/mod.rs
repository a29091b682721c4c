use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, SoundboardError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub canvas: CanvasConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            canvas: CanvasConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads a configuration file serialized as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|err| SoundboardError::msg(format!("invalid configuration: {err}")))
    }
}

/// Configuration specific to the audio subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Capacity of the tap ring buffer that feeds the visualizer, in samples.
    pub tap_capacity: usize,
    /// Volume applied to the first session before the slider is touched.
    pub initial_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            tap_capacity: 8_192,
            initial_volume: 1.0,
        }
    }
}

/// Displayed size and pixel density of the waveform surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 120.0,
            device_pixel_ratio: 1.0,
        }
    }
}
