//! Text-to-speech output
//!
//! Speaks each announcement through the platform screen-reader voice
//! (Windows SAPI, macOS AVSpeechSynthesizer, Linux Speech Dispatcher).
//! - Every new announcement interrupts the previous one
//! - Mute toggle, rate and volume steps
//! - Bounded history of what was said, for replay
//!
//! Without the `speech` feature the speaker only keeps history.

use crate::config::TtsConfig;
use anyhow::Result;
use std::collections::VecDeque;

#[cfg(feature = "speech")]
use tts::Tts;

/// Backend rate/volume limits, queried from the engine on first use
#[cfg(feature = "speech")]
#[derive(Debug, Clone, Copy, PartialEq)]
struct BackendRanges {
    min_rate: f32,
    max_rate: f32,
    min_volume: f32,
    max_volume: f32,
}

#[cfg(feature = "speech")]
impl Default for BackendRanges {
    fn default() -> Self {
        // Updated during initialization
        Self {
            min_rate: 0.1,
            max_rate: 10.0,
            min_volume: 0.0,
            max_volume: 1.0,
        }
    }
}

#[cfg(feature = "speech")]
impl BackendRanges {
    /// Most backends use 1.0 as normal speed, so just clamp to their range
    fn rate(&self, config_rate: f32) -> f32 {
        config_rate.clamp(self.min_rate, self.max_rate)
    }

    /// Config volume is 0.0 to 1.0; map it onto the backend's range
    fn volume(&self, config_volume: f32) -> f32 {
        let clamped = config_volume.clamp(0.0, 1.0);
        self.min_volume + clamped * (self.max_volume - self.min_volume)
    }
}

pub struct Speaker {
    #[cfg(feature = "speech")]
    engine: Option<Tts>,
    enabled: bool,
    muted: bool,
    #[cfg(feature = "speech")]
    voice: Option<String>,
    rate: f32,
    volume: f32,
    #[cfg(feature = "speech")]
    ranges: BackendRanges,
    history: VecDeque<String>,
    max_history: usize,
}

impl Speaker {
    pub fn new(config: &TtsConfig) -> Self {
        Self {
            #[cfg(feature = "speech")]
            engine: None,
            enabled: config.enabled,
            muted: false,
            #[cfg(feature = "speech")]
            voice: config.voice.clone(),
            rate: config.rate,
            volume: config.volume,
            #[cfg(feature = "speech")]
            ranges: BackendRanges::default(),
            history: VecDeque::new(),
            max_history: config.history_size.max(1),
        }
    }

    /// Initialize the TTS engine (lazy initialization)
    #[cfg(feature = "speech")]
    fn ensure_initialized(&mut self) -> Result<()> {
        if self.engine.is_some() {
            return Ok(());
        }
        tracing::info!("Initializing TTS engine...");
        let mut tts = Tts::default()?;

        self.ranges = BackendRanges {
            min_rate: tts.min_rate(),
            max_rate: tts.max_rate(),
            min_volume: tts.min_volume(),
            max_volume: tts.max_volume(),
        };
        tracing::info!("TTS backend ranges: {:?}", self.ranges);

        let _ = tts.set_rate(self.ranges.rate(self.rate));
        let _ = tts.set_volume(self.ranges.volume(self.volume));

        if let Some(wanted) = self.voice.as_deref() {
            match tts.voices() {
                Ok(voices) => match voices.iter().find(|v| v.name() == wanted) {
                    Some(voice) => {
                        let _ = tts.set_voice(voice);
                    }
                    None => tracing::warn!("TTS voice '{}' not found, using default", wanted),
                },
                Err(e) => tracing::warn!("Could not list TTS voices: {}", e),
            }
        }

        self.engine = Some(tts);
        tracing::info!("TTS engine initialized");
        Ok(())
    }

    /// Record `text` and speak it, cutting off whatever was being said
    pub fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if self.history.len() >= self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(text.to_string());

        if !self.enabled || self.muted {
            return Ok(());
        }
        self.say(text)
    }

    /// Say the most recent announcement again
    pub fn repeat_last(&mut self) -> Result<()> {
        match self.history.back().cloned() {
            Some(text) if self.enabled && !self.muted => self.say(&text),
            _ => Ok(()),
        }
    }

    #[cfg(feature = "speech")]
    fn say(&mut self, text: &str) -> Result<()> {
        self.ensure_initialized()?;
        if let Some(engine) = self.engine.as_mut() {
            tracing::debug!("Speaking: {}", text);
            engine.speak(text, true)?;
        }
        Ok(())
    }

    #[cfg(not(feature = "speech"))]
    fn say(&mut self, text: &str) -> Result<()> {
        tracing::debug!("Speech unavailable (built without `speech`): {}", text);
        Ok(())
    }

    /// Stop current speech
    pub fn stop(&mut self) -> Result<()> {
        #[cfg(feature = "speech")]
        if let Some(engine) = self.engine.as_mut() {
            engine.stop()?;
        }
        Ok(())
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.muted {
            tracing::info!("TTS muted");
            let _ = self.stop();
        } else {
            tracing::info!("TTS unmuted");
        }
        self.muted
    }


    /// Step the rate by `delta`, kept within 0.5 to 2.0
    pub fn adjust_rate(&mut self, delta: f32) -> Result<()> {
        self.rate = (self.rate + delta).clamp(0.5, 2.0);
        #[cfg(feature = "speech")]
        if let Some(engine) = self.engine.as_mut() {
            engine.set_rate(self.ranges.rate(self.rate))?;
        }
        tracing::info!("TTS rate set to {}", self.rate);
        Ok(())
    }

    /// Step the volume by `delta`, kept within 0.0 to 1.0
    pub fn adjust_volume(&mut self, delta: f32) -> Result<()> {
        self.volume = (self.volume + delta).clamp(0.0, 1.0);
        #[cfg(feature = "speech")]
        if let Some(engine) = self.engine.as_mut() {
            engine.set_volume(self.ranges.volume(self.volume))?;
        }
        tracing::info!("TTS volume set to {}", self.volume);
        Ok(())
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}
