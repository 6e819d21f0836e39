//! Player settings
//!
//! Persisted in LocalStorage as JSON.

use serde::{Deserialize, Serialize};

use crate::input::InputTuning;
use crate::sim::GameConfig;

/// Which flavour of the game to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Camera-driven paddle with lives and progressive rows
    #[default]
    HandTracked,
    /// One ball, full grid from the start
    Classic,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::HandTracked => "Hand tracked",
            Variant::Classic => "Classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hand" | "hand tracked" | "hand-tracked" => Some(Variant::HandTracked),
            "classic" => Some(Variant::Classic),
            _ => None,
        }
    }

    /// Gameplay tuning for this variant
    pub fn config(&self) -> GameConfig {
        match self {
            Variant::HandTracked => GameConfig::hand_tracked(),
            Variant::Classic => GameConfig::classic(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,
    /// Last name entered for the high score table
    pub player_name: String,
    /// Hand position remap and smoothing
    pub input: InputTuning,
    /// Opacity of the mirrored camera preview (0.0 - 1.0)
    pub camera_opacity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::HandTracked,
            player_name: String::new(),
            input: InputTuning::default(),
            camera_opacity: 0.45,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "palm_breaker_settings";

    /// Name to pre-fill in the score prompt
    pub fn default_player_name(&self) -> &str {
        if self.player_name.trim().is_empty() {
            "Anonymous"
        } else {
            &self.player_name
        }
    }

    /// Camera opacity limited to its valid range
    pub fn effective_camera_opacity(&self) -> f32 {
        self.camera_opacity.clamp(0.0, 1.0)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings not persisted natively ({})", Self::STORAGE_KEY);
    }
}
