//! User configuration: `~/.colony-access/config.toml`.
//!
//! The embedded default file is written out on first run; every field has a
//! serde default so hand-edited partial files still load.

mod keybind_validator;

pub use keybind_validator::{
    auto_fix_keybinds, validate_keybinds, ValidationIssue, ValidationResult, ValidationSeverity,
};

use crate::core::menu_actions::{key_event_to_string, normalize_keybind, NavCommand};
use crate::nav::Hints;
use crate::scan::ScanOptions;
use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanOptions,
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub keybinds: NavKeybinds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub voice: Option<String>, // None = system default
    #[serde(default = "default_tts_rate")]
    pub rate: f32, // 0.5 to 2.0, 1.0 = normal
    #[serde(default = "default_tts_volume")]
    pub volume: f32, // 0.0 to 1.0
    #[serde(default = "default_tts_history_size")]
    pub history_size: usize,
}

fn default_tts_enabled() -> bool {
    false // Opt-in
}

fn default_tts_rate() -> f32 {
    1.0
}

fn default_tts_volume() -> f32 {
    1.0
}

fn default_tts_history_size() -> usize {
    50
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: default_tts_enabled(),
            voice: None,
            rate: default_tts_rate(),
            volume: default_tts_volume(),
            history_size: default_tts_history_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_sound_enabled")]
    pub enabled: bool,
    #[serde(default = "default_sound_volume")]
    pub volume: f32, // Master volume (0.0 to 1.0)
    #[serde(default = "default_sound_cooldown")]
    pub cooldown_ms: u64, // Between two plays of the same cue
    #[serde(default = "default_move_cue")]
    pub move_cue: String,
    #[serde(default = "default_click_cue")]
    pub click_cue: String,
    #[serde(default = "default_reject_cue")]
    pub reject_cue: String,
}

fn default_sound_enabled() -> bool {
    true
}

fn default_sound_volume() -> f32 {
    0.7
}

fn default_sound_cooldown() -> u64 {
    80
}

fn default_move_cue() -> String {
    "move.wav".to_string()
}

fn default_click_cue() -> String {
    "click.wav".to_string()
}

fn default_reject_cue() -> String {
    "reject.wav".to_string()
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_sound_enabled(),
            volume: default_sound_volume(),
            cooldown_ms: default_sound_cooldown(),
            move_cue: default_move_cue(),
            click_cue: default_click_cue(),
            reject_cue: default_reject_cue(),
        }
    }
}

/// Where announcements go besides speech
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Copy every announcement to the clipboard (for external screen readers)
    #[serde(default)]
    pub clipboard: bool,
    /// Print announcements to stdout
    #[serde(default = "default_echo")]
    pub echo: bool,
}

fn default_echo() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            clipboard: false,
            echo: default_echo(),
        }
    }
}

/// Keys driving every navigator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavKeybinds {
    #[serde(default = "default_next")]
    pub next: String,
    #[serde(default = "default_previous")]
    pub previous: String,
    #[serde(default = "default_drill_down")]
    pub drill_down: String,
    #[serde(default = "default_go_back")]
    pub go_back: String,
    #[serde(default = "default_close")]
    pub close: String,
    #[serde(default = "default_increase")]
    pub increase: String,
    #[serde(default = "default_decrease")]
    pub decrease: String,
    #[serde(default = "default_increase_more")]
    pub increase_more: String,
    #[serde(default = "default_decrease_more")]
    pub decrease_more: String,
    #[serde(default = "default_repeat")]
    pub repeat: String,
    /// Step used by increase_more/decrease_more
    #[serde(default = "default_large_step")]
    pub large_step: i32,
}

fn default_next() -> String {
    "Down".to_string()
}

fn default_previous() -> String {
    "Up".to_string()
}

fn default_drill_down() -> String {
    "Enter".to_string()
}

fn default_go_back() -> String {
    "Esc".to_string()
}

fn default_close() -> String {
    "Ctrl+w".to_string()
}

fn default_increase() -> String {
    "Right".to_string()
}

fn default_decrease() -> String {
    "Left".to_string()
}

fn default_increase_more() -> String {
    "Shift+Right".to_string()
}

fn default_decrease_more() -> String {
    "Shift+Left".to_string()
}

fn default_repeat() -> String {
    "r".to_string()
}

fn default_large_step() -> i32 {
    10
}

impl Default for NavKeybinds {
    fn default() -> Self {
        Self {
            next: default_next(),
            previous: default_previous(),
            drill_down: default_drill_down(),
            go_back: default_go_back(),
            close: default_close(),
            increase: default_increase(),
            decrease: default_decrease(),
            increase_more: default_increase_more(),
            decrease_more: default_decrease_more(),
            repeat: default_repeat(),
            large_step: default_large_step(),
        }
    }
}

impl NavKeybinds {
    /// (binding, command) pairs in match order
    fn bindings(&self) -> [(&str, NavCommand); 10] {
        let step = self.large_step.max(1);
        [
            (self.next.as_str(), NavCommand::Next),
            (self.previous.as_str(), NavCommand::Previous),
            (self.drill_down.as_str(), NavCommand::DrillDown),
            (self.go_back.as_str(), NavCommand::GoBack),
            (self.close.as_str(), NavCommand::Close),
            (self.increase.as_str(), NavCommand::Adjust(1)),
            (self.decrease.as_str(), NavCommand::Adjust(-1)),
            (self.increase_more.as_str(), NavCommand::Adjust(step)),
            (self.decrease_more.as_str(), NavCommand::Adjust(-step)),
            (self.repeat.as_str(), NavCommand::Repeat),
        ]
    }

    /// Resolve a key press to a navigation command
    pub fn resolve(&self, key: KeyEvent) -> Option<NavCommand> {
        let key_str = key_event_to_string(key);
        if key_str.is_empty() {
            return None;
        }
        self.bindings()
            .into_iter()
            .find(|(bind, _)| !bind.trim().is_empty() && normalize_keybind(bind) == key_str)
            .map(|(_, command)| command)
    }

    /// Key names as spoken in announcements
    pub fn hints(&self) -> Hints {
        Hints {
            next: spoken_key(&self.next),
            previous: spoken_key(&self.previous),
            drill_down: spoken_key(&self.drill_down),
            go_back: spoken_key(&self.go_back),
            increase: spoken_key(&self.increase),
            decrease: spoken_key(&self.decrease),
        }
    }
}

/// "Esc" reads badly; everything else is spoken as written
fn spoken_key(bind: &str) -> String {
    normalize_keybind(bind)
        .split('+')
        .map(|part| match part {
            "Esc" => "Escape",
            "Ctrl" => "Control",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Config {
    /// Load `path`, or the profile config.toml, writing defaults on first run
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                Self::extract_defaults()?;
                Self::config_path()?
            }
        };

        let contents = fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {:?}", config_path))?;
        let mut config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {:?}", config_path))?;
        tracing::info!("Loaded config from {:?}", config_path);

        config.check_keybinds();
        Ok(config)
    }

    /// Validate keybinds, restoring defaults for critical ones left empty
    fn check_keybinds(&mut self) {
        let validation = validate_keybinds(&self.keybinds);
        if validation.has_errors() {
            tracing::warn!("Keybind validation found {} errors", validation.errors().len());
            for error in validation.errors() {
                tracing::warn!("  {}", error.message());
            }
            let fixed = auto_fix_keybinds(&mut self.keybinds, &validation.issues);
            if fixed > 0 {
                tracing::info!("Auto-fixed {} keybind issues", fixed);
            }
        }
        for warning in validation.warnings() {
            tracing::warn!("Keybind warning: {}", warning.message());
        }
    }

    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Write the embedded default config.toml if none exists yet
    pub fn extract_defaults() -> Result<()> {
        let dir = Self::base_dir()?;
        fs::create_dir_all(&dir).context(format!("Failed to create {:?}", dir))?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write config.toml")?;
            tracing::info!("Extracted config.toml to {:?}", config_path);
        }
        Ok(())
    }

    /// Base directory (~/.colony-access/).
    /// Can be overridden with the COLONY_ACCESS_DIR environment variable.
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var("COLONY_ACCESS_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".colony-access"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Directory holding the cue sound files
    pub fn sounds_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("sounds"))
    }
}
