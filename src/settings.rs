//! Game settings and preferences
//!
//! Persisted separately from high scores under their own storage key.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{Storage, load_json, save_json};
use crate::sim::car::{CAR_SKINS, CarSkin};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence everything
    pub muted: bool,
    /// Background music on/off
    pub music: bool,

    // === HUD ===
    pub show_minimap: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Game ===
    /// Index into the skin table of the last car picked
    pub skin: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            music: true,

            show_minimap: true,
            show_fps: false,

            skin: 0,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "road_rush_settings";

    /// Effective gain for sound effects
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective gain for music
    pub fn music_gain(&self) -> f32 {
        if self.muted || !self.music {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Last chosen skin (falls back to the first if the index is stale)
    pub fn car_skin(&self) -> CarSkin {
        CarSkin::by_index(self.skin)
    }

    /// Remember a skin by name
    pub fn remember_skin(&mut self, skin: CarSkin) {
        self.skin = CAR_SKINS.iter().position(|s| *s == skin).unwrap_or(0);
    }

    /// Load settings, falling back to defaults on a missing or bad entry
    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<Settings>(storage, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &dyn Storage) -> Result<(), StorageError> {
        save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_round_trip() {
        let storage = MemoryStorage::new();
        let mut settings = Settings::default();
        settings.muted = true;
        settings.remember_skin(CAR_SKINS[3]);
        settings.save(&storage).unwrap();

        let loaded = Settings::load(&storage);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.car_skin().name, "Orange");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let storage = MemoryStorage::new();
        storage
            .set(Settings::STORAGE_KEY, r#"{"muted":true}"#)
            .unwrap();
        let loaded = Settings::load(&storage);
        assert!(loaded.muted);
        assert!(loaded.show_minimap);
    }

    #[test]
    fn test_gains() {
        let mut settings = Settings::default();
        assert!((settings.sfx_gain() - 0.8).abs() < 1e-6);
        settings.music = false;
        assert_eq!(settings.music_gain(), 0.0);
        settings.muted = true;
        assert_eq!(settings.sfx_gain(), 0.0);
    }

    #[test]
    fn test_stale_skin_is_sanitized() {
        let settings = Settings {
            skin: 99,
            ..Default::default()
        };
        assert_eq!(settings.car_skin(), CAR_SKINS[0]);
    }

    #[test]
    fn test_old_cadence_field_is_ignored() {
        let storage = MemoryStorage::new();
        storage
            .set(Settings::STORAGE_KEY, r#"{"target_fps":15.0,"skin":2}"#)
            .unwrap();
        let loaded = Settings::load(&storage);
        assert_eq!(loaded.skin, 2);
        assert_eq!(loaded, Settings { skin: 2, ..Default::default() });
    }
}
