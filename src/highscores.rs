//! Best score tracking
//!
//! Persisted as a plain integer under one key.

use crate::persistence::KeyValueStore;

/// Best score ever achieved on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore(pub u64);

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "mochi_cafe_best_score";

    /// Read the stored best; missing, corrupt or unreadable values count as 0
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(score) => {
                    log::info!("Loaded best score {}", score);
                    BestScore(score)
                }
                Err(_) => {
                    log::warn!("Ignoring corrupt best score {:?}", raw);
                    BestScore(0)
                }
            },
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                BestScore(0)
            }
            Err(e) => {
                log::warn!("Failed to read best score: {}", e);
                BestScore(0)
            }
        }
    }

    /// Record a finished session's score.
    ///
    /// Writes only when `score` beats the stored best. Returns the best after
    /// recording.
    pub fn record<S: KeyValueStore + ?Sized>(store: &mut S, score: u64) -> Self {
        let best = Self::load(store);
        if score <= best.0 {
            return best;
        }

        match store.set(Self::STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New best score {} (was {})", score, best.0),
            Err(e) => log::warn!("Failed to save best score: {}", e),
        }
        BestScore(score)
    }
}
