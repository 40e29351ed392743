//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Remux output settings.
    #[serde(default)]
    pub remux: RemuxSettings,
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Directory shown when the previous session ended.
    #[serde(default)]
    pub last_directory: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            logs_folder: default_logs_folder(),
            last_directory: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level written to the log files.
    #[serde(default)]
    pub level: LogLevel,

    /// Keep tool output out of the session log unless a command fails.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tool output lines to show in the tail after a failure.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Log the ffmpeg command one option per line.
    #[serde(default = "default_true")]
    pub show_options_pretty: bool,

    /// Log the ffmpeg command as a JSON array.
    #[serde(default)]
    pub show_options_json: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            show_options_pretty: true,
            show_options_json: false,
        }
    }
}

impl LoggingSettings {
    /// Session logger configuration derived from these settings.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            compact: self.compact,
            error_tail: self.error_tail as usize,
            show_timestamps: true,
        }
    }
}

/// External tool executables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// ffprobe executable name or path.
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,

    /// ffmpeg executable name or path.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffprobe: default_ffprobe(),
            ffmpeg: default_ffmpeg(),
        }
    }
}

/// Remux output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemuxSettings {
    /// Inserted before the extension of the input name.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Clear the default disposition of the first output subtitle.
    #[serde(default = "default_true")]
    pub clear_subtitle_default: bool,

    /// Overwrite an existing output file.
    #[serde(default)]
    pub overwrite: bool,

    /// Kill probe/remux after this many seconds (0 = wait indefinitely).
    #[serde(default)]
    pub timeout_secs: u64,
}

fn default_output_suffix() -> String {
    "_remux".to_string()
}

impl Default for RemuxSettings {
    fn default() -> Self {
        Self {
            output_suffix: default_output_suffix(),
            clear_subtitle_default: true,
            overwrite: false,
            timeout_secs: 0,
        }
    }
}

/// Configuration sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Logging,
    Tools,
    Remux,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Tools => "tools",
            ConfigSection::Remux => "remux",
        }
    }

    /// Get all sections.
    pub fn all() -> &'static [ConfigSection] {
        &[
            ConfigSection::Paths,
            ConfigSection::Logging,
            ConfigSection::Tools,
            ConfigSection::Remux,
        ]
    }
}
