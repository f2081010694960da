//! Player settings and preferences
//!
//! Persisted separately from the best score, as JSON.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound effects on/off (no gameplay effect)
    pub sound_on: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Reduced motion (no shake or glow cues)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_on: true,
            master_volume: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "mochi_cafe_settings";

    /// Flip sound on/off, returns the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_on = !self.sound_on;
        self.sound_on
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Whether shake/glow cues should play
    pub fn effective_motion(&self) -> bool {
        !self.reduced_motion
    }

    /// Toggle button label
    pub fn sound_label(&self) -> &'static str {
        if self.sound_on {
            "🔊 Sound: On"
        } else {
            "🔈 Sound: Off"
        }
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode settings: {}", e);
                return;
            }
        };
        match store.set(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_missing_or_corrupt() {
        assert_eq!(Settings::load(&MemoryStore::new()), Settings::default());
        let store = MemoryStore::with_entry(Settings::STORAGE_KEY, "{not json");
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        assert!(!settings.toggle_sound());
        settings.set_master_volume(3.0);
        settings.save(&mut store);

        let loaded = Settings::load(&store);
        assert!(!loaded.sound_on);
        assert_eq!(loaded.master_volume, 1.0);
        assert_eq!(loaded.sound_label(), "🔈 Sound: Off");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let store = MemoryStore::with_entry(Settings::STORAGE_KEY, r#"{"sound_on":false}"#);
        let loaded = Settings::load(&store);
        assert!(!loaded.sound_on);
        assert!(loaded.effective_motion());
    }
}
