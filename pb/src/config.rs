//! promptbox configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::prompt::{
    ControllerSettings, DEFAULT_CLOSE_DELAY, DEFAULT_PENDING_NOTICE, DEFAULT_WIDE_BREAKPOINT, InputKind, Theme,
    ThemeConfig, WidthHint,
};

/// Main promptbox configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Prompt behavior
    pub prompt: PromptSettingsConfig,

    /// On-screen notices
    pub notices: NoticesConfig,

    /// Prompt colors
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .promptbox.yml
        let local_config = PathBuf::from(".promptbox.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/promptbox/promptbox.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("promptbox").join("promptbox.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed; the full load reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".promptbox.yml")];
                if let Some(config_dir) = dirs::config_dir() {
                    paths.push(config_dir.join("promptbox").join("promptbox.yml"));
                }
                paths
            }
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Resolve into controller settings, validating colors and widths
    pub fn controller_settings(&self) -> Result<ControllerSettings> {
        let theme = Theme::from_config(&self.theme).context("Invalid theme")?;
        let input_width: WidthHint = self.prompt.input_width.parse().context("Invalid prompt.input-width")?;

        Ok(ControllerSettings {
            close_delay: Duration::from_millis(self.prompt.close_delay_ms),
            pending_notice: self.prompt.pending_notice.clone(),
            input_kind: InputKind::parse(&self.prompt.input_kind),
            input_width,
            wide_breakpoint: self.prompt.wide_breakpoint,
            theme,
        })
    }

    /// Serialize as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}

/// Prompt behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettingsConfig {
    /// Delay between hiding a prompt and allowing the next one
    #[serde(rename = "close-delay-ms")]
    pub close_delay_ms: u64,

    /// Notice shown when a prompt is requested while one is pending
    #[serde(rename = "pending-notice")]
    pub pending_notice: String,

    /// Default input kind (text, password, number, email, ...)
    #[serde(rename = "input-kind")]
    pub input_kind: String,

    /// Default input width (N% or N columns)
    #[serde(rename = "input-width")]
    pub input_width: String,

    /// Terminal width from which the wide prompt box is used
    #[serde(rename = "wide-breakpoint")]
    pub wide_breakpoint: u16,
}

impl Default for PromptSettingsConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: DEFAULT_CLOSE_DELAY.as_millis() as u64,
            pending_notice: DEFAULT_PENDING_NOTICE.to_string(),
            input_kind: "text".to_string(),
            input_width: "90%".to_string(),
            wide_breakpoint: DEFAULT_WIDE_BREAKPOINT,
        }
    }
}

/// On-screen notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticesConfig {
    /// How long a notice stays visible
    #[serde(rename = "duration-ms")]
    pub duration_ms: u64,
}

impl Default for NoticesConfig {
    fn default() -> Self {
        Self { duration_ms: 3000 }
    }
}

impl NoticesConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
