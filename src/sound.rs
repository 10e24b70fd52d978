//! Sound cues for navigation feedback
//!
//! Each [`Cue`] maps to a file in the sounds directory. Repeats of the same
//! cue inside the cooldown window are skipped so holding a key down does not
//! pile up overlapping clicks. Playback needs the `sound` feature; without it
//! cues are only logged.

use crate::config::SoundConfig;
use crate::core::input_result::Cue;
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

#[cfg(feature = "sound")]
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

pub struct CuePlayer {
    #[cfg(feature = "sound")]
    output: Option<(OutputStream, OutputStreamHandle)>,
    enabled: bool,
    #[cfg(feature = "sound")]
    volume: f32,
    files: HashMap<Cue, PathBuf>,
    last_played: HashMap<Cue, Instant>,
    cooldown: Duration,
}

impl CuePlayer {
    pub fn new(config: &SoundConfig, sounds_dir: &Path) -> Self {
        let files = [
            (Cue::Move, &config.move_cue),
            (Cue::Click, &config.click_cue),
            (Cue::Reject, &config.reject_cue),
        ]
        .into_iter()
        .map(|(cue, file)| (cue, sounds_dir.join(file)))
        .collect();

        Self {
            #[cfg(feature = "sound")]
            output: open_output(config.enabled),
            enabled: config.enabled,
            #[cfg(feature = "sound")]
            volume: config.volume.clamp(0.0, 1.0),
            files,
            last_played: HashMap::new(),
            cooldown: Duration::from_millis(config.cooldown_ms),
        }
    }

    /// Switch cues on or off. Returns whether they are now on.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        #[cfg(feature = "sound")]
        if self.enabled && self.output.is_none() {
            self.output = open_output(true);
        }
        debug!("Cue player enabled: {}", self.enabled);
        self.enabled
    }

    /// Check and arm the cooldown for `cue`
    fn take_slot(&mut self, cue: Cue, now: Instant) -> bool {
        if let Some(last) = self.last_played.get(&cue) {
            if now.duration_since(*last) < self.cooldown {
                return false;
            }
        }
        self.last_played.insert(cue, now);
        true
    }

    pub fn play(&mut self, cue: Cue) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if !self.take_slot(cue, Instant::now()) {
            debug!("Cue '{}' is on cooldown, skipping", cue.name());
            return Ok(());
        }
        let Some(path) = self.files.get(&cue) else {
            return Ok(());
        };
        self.play_file(path)
    }

    #[cfg(feature = "sound")]
    fn play_file(&self, path: &Path) -> Result<()> {
        use std::fs::File;
        use std::io::BufReader;

        let Some((_, handle)) = self.output.as_ref() else {
            return Ok(());
        };

        // A missing or broken file is not worth interrupting navigation for
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Failed to open sound file {:?}: {}", path, e);
                return Ok(());
            }
        };
        let source = match Decoder::new(BufReader::new(file)) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Failed to decode sound file {:?}: {}", path, e);
                return Ok(());
            }
        };

        let sink = Sink::try_new(handle)?;
        sink.set_volume(self.volume);
        sink.append(source);
        sink.detach(); // Play in background
        debug!("Playing {:?} at volume {}", path, self.volume);
        Ok(())
    }

    #[cfg(not(feature = "sound"))]
    fn play_file(&self, path: &Path) -> Result<()> {
        debug!("Sound unavailable (built without `sound`): {:?}", path);
        Ok(())
    }
}

#[cfg(feature = "sound")]
fn open_output(enabled: bool) -> Option<(OutputStream, OutputStreamHandle)> {
    if !enabled {
        return None;
    }
    match OutputStream::try_default() {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::warn!("No audio output, cues disabled: {}", e);
            None
        }
    }
}

/// Create the sounds directory if it doesn't exist
pub fn ensure_sounds_directory(sounds_dir: &Path) -> Result<PathBuf> {
    if !sounds_dir.exists() {
        std::fs::create_dir_all(sounds_dir)?;
        debug!("Created sounds directory: {:?}", sounds_dir);
    }
    Ok(sounds_dir.to_path_buf())
}
