//! cpu-partyparrot configuration persistence (htoprc-style key=value format)
//!
//! Saves/loads settings to `<config dir>/cpu-partyparrot/partyparrotrc`
//! (`%APPDATA%` on Windows, `$XDG_CONFIG_HOME` or `~/.config` on Linux).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::animation::{
    DelayRange, FrameSequence, DEFAULT_FRAME_PREFIX, DEFAULT_MAX_FRAME_DELAY_MS,
    DEFAULT_MIN_FRAME_DELAY_MS,
};
use crate::animator::{AnimatorSettings, DEFAULT_SAMPLE_INTERVAL_MS};
use crate::system::TickSourceKind;

const APP_DIR: &str = "cpu-partyparrot";
const RC_FILE: &str = "partyparrotrc";
const LOG_FILE: &str = "partyparrot.log";

/// Keys on a full-size deck (5 x 3)
pub const MAX_KEYS: usize = 15;

/// Directory holding the rc file and the preview log
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Get the config file path: <config dir>/cpu-partyparrot/partyparrotrc
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(RC_FILE))
}

/// Default log file for the terminal preview
pub fn default_log_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(LOG_FILE))
}

/// Persistable settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyParrotConfig {
    pub sample_interval_ms: u64,
    pub min_frame_delay_ms: u64,
    pub max_frame_delay_ms: u64,
    pub frame_prefix: String,
    pub tick_source: TickSourceKind,
    /// Keys shown when the preview starts
    pub initial_keys: usize,
}

impl Default for PartyParrotConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            min_frame_delay_ms: DEFAULT_MIN_FRAME_DELAY_MS,
            max_frame_delay_ms: DEFAULT_MAX_FRAME_DELAY_MS,
            frame_prefix: DEFAULT_FRAME_PREFIX.to_string(),
            tick_source: TickSourceKind::Native,
            initial_keys: 3,
        }
    }
}

impl PartyParrotConfig {
    /// Load config from the default location, returning defaults if the file doesn't exist
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load config from `path`, returning defaults if it can't be read
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                tracing::debug!(path = %path.display(), "no config loaded: {}", e);
                Self::default()
            }
        }
    }

    /// Parse rc text. Unknown keys and bad values are ignored.
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "sample_interval_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.sample_interval_ms = v.clamp(200, 10000);
                    }
                }
                "min_frame_delay_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.min_frame_delay_ms = v.clamp(1, 5000);
                    }
                }
                "max_frame_delay_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.max_frame_delay_ms = v.clamp(1, 5000);
                    }
                }
                "frame_prefix" => {
                    if !value.is_empty() {
                        cfg.frame_prefix = value.to_string();
                    }
                }
                "tick_source" => {
                    if let Some(kind) = TickSourceKind::from_name(value) {
                        cfg.tick_source = kind;
                    }
                }
                "initial_keys" => {
                    if let Ok(v) = value.parse::<usize>() {
                        cfg.initial_keys = v.min(MAX_KEYS);
                    }
                }
                _ => {} // Ignore unknown keys
            }
        }

        if cfg.min_frame_delay_ms > cfg.max_frame_delay_ms {
            std::mem::swap(&mut cfg.min_frame_delay_ms, &mut cfg.max_frame_delay_ms);
        }
        cfg
    }

    /// Render as rc text
    pub fn to_rc(&self) -> String {
        let lines = [
            "# cpu-partyparrot configuration file".to_string(),
            String::new(),
            format!("sample_interval_ms={}", self.sample_interval_ms),
            format!("min_frame_delay_ms={}", self.min_frame_delay_ms),
            format!("max_frame_delay_ms={}", self.max_frame_delay_ms),
            format!("frame_prefix={}", self.frame_prefix),
            format!("tick_source={}", self.tick_source.name()),
            format!("initial_keys={}", self.initial_keys),
        ];
        lines.join("\n") + "\n"
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = config_path().context("Could not determine config path")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        fs::write(path, self.to_rc())
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    pub fn animator_settings(&self) -> AnimatorSettings {
        AnimatorSettings {
            sample_interval: Duration::from_millis(self.sample_interval_ms),
            frame_delay: DelayRange::new(
                Duration::from_millis(self.min_frame_delay_ms),
                Duration::from_millis(self.max_frame_delay_ms),
            ),
        }
    }

    pub fn frames(&self) -> FrameSequence {
        FrameSequence::new(&self.frame_prefix)
    }
}
