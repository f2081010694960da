//! Audio system using Web Audio API
//!
//! Procedurally generated tones - no external files needed!

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One short synthesized note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub freq: f32,
    /// Seconds
    pub duration: f64,
    pub waveform: Waveform,
    /// Seconds after the effect starts
    pub delay: f64,
}

impl Tone {
    const fn new(freq: f32, duration: f64, waveform: Waveform) -> Self {
        Self {
            freq,
            duration,
            waveform,
            delay: 0.0,
        }
    }

    const fn delayed(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Order served - bright two-note chime
    Serve,
    /// Wrong item on the tray - buzz
    WrongItem,
    /// Customer walked out
    CustomerLeft,
    /// Out of lives
    GameOver,
}

const SERVE_TONES: [Tone; 2] = [
    Tone::new(620.0, 0.08, Waveform::Triangle),
    Tone::new(860.0, 0.07, Waveform::Sine).delayed(0.05),
];
const WRONG_ITEM_TONES: [Tone; 1] = [Tone::new(240.0, 0.12, Waveform::Square)];
const CUSTOMER_LEFT_TONES: [Tone; 1] = [Tone::new(180.0, 0.2, Waveform::Sawtooth)];
const GAME_OVER_TONES: [Tone; 2] = [
    Tone::new(330.0, 0.15, Waveform::Triangle),
    Tone::new(220.0, 0.3, Waveform::Triangle).delayed(0.15),
];

impl SoundEffect {
    /// Feedback sound for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Served { .. } => Some(SoundEffect::Serve),
            GameEvent::WrongItem { .. } => Some(SoundEffect::WrongItem),
            GameEvent::CustomerLeft { .. } => Some(SoundEffect::CustomerLeft),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::CustomerArrived { .. } => None,
        }
    }

    /// Notes making up this effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Serve => &SERVE_TONES,
            SoundEffect::WrongItem => &WRONG_ITEM_TONES,
            SoundEffect::CustomerLeft => &CUSTOMER_LEFT_TONES,
            SoundEffect::GameOver => &GAME_OVER_TONES,
        }
    }
}

/// Single gate for every sound the game makes
pub fn is_audible(muted: bool, master_volume: f32) -> bool {
    !muted && master_volume > 0.0
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Waveform, is_audible};

    /// Envelope peak gain at full volume
    const PEAK_GAIN: f32 = 0.05;
    /// Exponential ramps can't reach zero
    const SILENT_GAIN: f32 = 0.0001;

    impl From<Waveform> for OscillatorType {
        fn from(w: Waveform) -> Self {
            match w {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            }
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 1.0,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if !is_audible(self.muted, self.master_volume) {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                self.play_tone(ctx, tone);
            }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short blip with a fast exponential attack and release
        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, tone.waveform.into()) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;
            let peak = (PEAK_GAIN * self.master_volume).max(SILENT_GAIN);

            gain.gain().set_value_at_time(SILENT_GAIN, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(peak, t + 0.01)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(SILENT_GAIN, t + tone.duration)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration + 0.02).ok();
        }
    }
}
