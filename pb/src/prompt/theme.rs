//! Prompt colors
//!
//! Colors come from the config file as strings (`#RRGGBB`, named colors or
//! ANSI indices) and may be overridden per prompt.

use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::PromptError;

/// Color settings as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ThemeConfig {
    /// Box background
    pub front: String,
    /// Message text
    pub label: String,
    /// Input text
    pub input: String,
    /// Line under the input
    pub border: String,
    pub button_bg: String,
    pub button_fg: String,
    pub button_hover: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            front: "#FFFFEF".to_string(),
            label: "#1A1A1A".to_string(),
            input: "#262626".to_string(),
            border: "gray".to_string(),
            button_bg: "#305165".to_string(),
            button_fg: "#FFFFEF".to_string(),
            button_hover: "#191919".to_string(),
        }
    }
}

/// Per-prompt color overrides; empty strings are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeOverrides {
    pub front: Option<String>,
    pub label: Option<String>,
    pub input: Option<String>,
    pub border: Option<String>,
}

impl ThemeOverrides {
    pub fn is_empty(&self) -> bool {
        [&self.front, &self.label, &self.input, &self.border]
            .iter()
            .all(|c| c.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

/// Resolved colors used by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub front: Color,
    pub label: Color,
    pub input: Color,
    pub border: Color,
    pub button_bg: Color,
    pub button_fg: Color,
    pub button_hover: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            front: Color::Rgb(0xFF, 0xFF, 0xEF),
            label: Color::Rgb(0x1A, 0x1A, 0x1A),
            input: Color::Rgb(0x26, 0x26, 0x26),
            border: Color::Gray,
            button_bg: Color::Rgb(0x30, 0x51, 0x65),
            button_fg: Color::Rgb(0xFF, 0xFF, 0xEF),
            button_hover: Color::Rgb(0x19, 0x19, 0x19),
        }
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Result<Self, PromptError> {
        debug!(?config, "Theme::from_config: called");
        Ok(Self {
            front: parse_color(&config.front)?,
            label: parse_color(&config.label)?,
            input: parse_color(&config.input)?,
            border: parse_color(&config.border)?,
            button_bg: parse_color(&config.button_bg)?,
            button_fg: parse_color(&config.button_fg)?,
            button_hover: parse_color(&config.button_hover)?,
        })
    }

    /// Apply per-prompt overrides on top of this theme
    pub fn with_overrides(&self, overrides: &ThemeOverrides) -> Result<Self, PromptError> {
        if overrides.is_empty() {
            return Ok(*self);
        }
        debug!(?overrides, "Theme::with_overrides: called");
        let mut theme = *self;
        apply(&mut theme.front, &overrides.front)?;
        apply(&mut theme.label, &overrides.label)?;
        apply(&mut theme.input, &overrides.input)?;
        apply(&mut theme.border, &overrides.border)?;
        Ok(theme)
    }
}

fn apply(slot: &mut Color, value: &Option<String>) -> Result<(), PromptError> {
    if let Some(value) = value
        && !value.trim().is_empty()
    {
        *slot = parse_color(value)?;
    }
    Ok(())
}

/// Parse a color string
pub fn parse_color(value: &str) -> Result<Color, PromptError> {
    Color::from_str(value.trim()).map_err(|_| PromptError::InvalidColor(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_default_theme() {
        let theme = Theme::from_config(&ThemeConfig::default()).unwrap();
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#305165").unwrap(), Color::Rgb(0x30, 0x51, 0x65));
        assert_eq!(parse_color("red").unwrap(), Color::Red);
        assert!(matches!(parse_color("not-a-color"), Err(PromptError::InvalidColor(_))));
    }

    #[test]
    fn test_overrides_apply_only_when_non_empty() {
        let base = Theme::default();
        let overrides = ThemeOverrides {
            front: Some("#000000".to_string()),
            label: Some("".to_string()),
            input: None,
            border: Some("  ".to_string()),
        };
        let theme = base.with_overrides(&overrides).unwrap();
        assert_eq!(theme.front, Color::Rgb(0, 0, 0));
        assert_eq!(theme.label, base.label);
        assert_eq!(theme.input, base.input);
        assert_eq!(theme.border, base.border);
    }

    #[test]
    fn test_overrides_invalid_color() {
        let overrides = ThemeOverrides {
            border: Some("chartreuse-ish".to_string()),
            ..Default::default()
        };
        assert!(Theme::default().with_overrides(&overrides).is_err());
    }

    #[test]
    fn test_overrides_is_empty() {
        assert!(ThemeOverrides::default().is_empty());
        assert!(
            ThemeOverrides {
                label: Some(String::new()),
                ..Default::default()
            }
            .is_empty()
        );
        assert!(
            !ThemeOverrides {
                label: Some("blue".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
