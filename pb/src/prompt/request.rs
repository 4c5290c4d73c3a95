//! Prompt request types
//!
//! A prompt is requested either with a bare message or with a full
//! [`PromptConfig`]. Both forms funnel through [`PromptRequest`], so the
//! controller never has to guess what kind of argument it was handed.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::error::PromptError;
use super::field::FieldOptions;
use super::theme::ThemeOverrides;

/// Continuation invoked with the submitted value
pub type ResultSink = Box<dyn FnOnce(String) + Send + 'static>;

/// Semantic type of the main input field
///
/// The controller treats this as an opaque tag; only the view and the
/// input field look at it (masking, key filtering).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Text,
    Password,
    Number,
    Email,
    /// Any other tag, kept verbatim
    Other(String),
}

impl InputKind {
    /// Parse a kind tag; empty input falls back to `text`
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Self::Text,
            "password" => Self::Password,
            "number" => Self::Number,
            "email" => Self::Email,
            _ => Self::Other(tag.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Number => "number",
            Self::Email => "email",
            Self::Other(tag) => tag,
        }
    }

    /// Whether the field content is masked on screen
    pub fn is_masked(&self) -> bool {
        matches!(self, Self::Password)
    }

    /// Whether a typed character is accepted by this kind of field
    pub fn accepts(&self, c: char) -> bool {
        match self {
            Self::Number => c.is_ascii_digit() || matches!(c, '-' | '.' | 'e' | 'E'),
            _ => !c.is_control(),
        }
    }
}

impl FromStr for InputKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Width of the input field inside the prompt box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthHint {
    /// Percentage of the box's inner width (1-100)
    Percent(u16),
    /// Absolute width in terminal columns
    Columns(u16),
}

impl Default for WidthHint {
    fn default() -> Self {
        Self::Percent(90)
    }
}

impl WidthHint {
    /// Resolve to a concrete column count within `available` columns
    pub fn resolve(self, available: u16) -> u16 {
        if available == 0 {
            return 0;
        }
        let width = match self {
            Self::Percent(p) => (u32::from(available) * u32::from(p) / 100) as u16,
            Self::Columns(c) => c,
        };
        width.clamp(1, available)
    }
}

impl FromStr for WidthHint {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let invalid = || PromptError::InvalidWidth(s.to_string());

        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: u16 = percent.trim().parse().map_err(|_| invalid())?;
            if value == 0 || value > 100 {
                return Err(invalid());
            }
            return Ok(Self::Percent(value));
        }

        let columns = trimmed.strip_suffix("ch").unwrap_or(trimmed);
        let value: u16 = columns.trim().parse().map_err(|_| invalid())?;
        if value == 0 {
            return Err(invalid());
        }
        Ok(Self::Columns(value))
    }
}

impl fmt::Display for WidthHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{}%", p),
            Self::Columns(c) => write!(f, "{}", c),
        }
    }
}

/// Full set of options for one prompt
///
/// `input_kind` and `input_width` left as `None` take the controller's
/// configured defaults.
#[derive(Default)]
pub struct PromptConfig {
    pub message: String,
    pub input_kind: Option<InputKind>,
    pub callback: Option<ResultSink>,
    pub auxiliary_markup: Option<String>,
    pub field_options: FieldOptions,
    pub input_width: Option<WidthHint>,
    pub theme: ThemeOverrides,
}

impl PromptConfig {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Build from the older positional form: message, kind, callback, properties
    pub fn from_positional(
        message: impl Into<String>,
        input_kind: Option<&str>,
        callback: Option<ResultSink>,
        field_options: Option<FieldOptions>,
    ) -> Self {
        Self {
            message: message.into(),
            input_kind: input_kind.map(InputKind::parse),
            callback,
            field_options: field_options.unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn with_input_kind(mut self, kind: InputKind) -> Self {
        self.input_kind = Some(kind);
        self
    }

    pub fn with_callback(mut self, callback: impl FnOnce(String) + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn with_auxiliary_markup(mut self, markup: impl Into<String>) -> Self {
        self.auxiliary_markup = Some(markup.into());
        self
    }

    pub fn with_field_options(mut self, options: FieldOptions) -> Self {
        self.field_options = options;
        self
    }

    pub fn with_input_width(mut self, width: WidthHint) -> Self {
        self.input_width = Some(width);
        self
    }

    pub fn with_theme(mut self, theme: ThemeOverrides) -> Self {
        self.theme = theme;
        self
    }
}

impl fmt::Debug for PromptConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptConfig")
            .field("message", &self.message)
            .field("input_kind", &self.input_kind)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .field("auxiliary_markup", &self.auxiliary_markup)
            .field("field_options", &self.field_options)
            .field("input_width", &self.input_width)
            .field("theme", &self.theme)
            .finish()
    }
}

/// What a caller hands to [`PromptController::open`](super::PromptController::open)
#[derive(Debug)]
pub enum PromptRequest {
    /// Plain message, every other option at its default
    Message(String),
    /// Full options object
    Options(PromptConfig),
    /// Nothing usable was supplied; opening is a silent no-op
    Absent,
}

impl PromptRequest {
    /// Normalize into a config, or `None` for an absent request
    pub fn into_config(self) -> Option<PromptConfig> {
        debug!(?self, "PromptRequest::into_config: called");
        match self {
            Self::Message(message) => Some(PromptConfig::new(message)),
            Self::Options(config) => Some(config),
            Self::Absent => None,
        }
    }
}

impl From<&str> for PromptRequest {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for PromptRequest {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<PromptConfig> for PromptRequest {
    fn from(config: PromptConfig) -> Self {
        Self::Options(config)
    }
}

impl<T: Into<PromptRequest>> From<Option<T>> for PromptRequest {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_parse() {
        assert_eq!(InputKind::parse("text"), InputKind::Text);
        assert_eq!(InputKind::parse(""), InputKind::Text);
        assert_eq!(InputKind::parse("PASSWORD"), InputKind::Password);
        assert_eq!(InputKind::parse("number"), InputKind::Number);
        assert_eq!(InputKind::parse("date"), InputKind::Other("date".to_string()));
        assert_eq!(InputKind::parse("date").as_str(), "date");
    }

    #[test]
    fn test_input_kind_accepts() {
        assert!(InputKind::Number.accepts('7'));
        assert!(InputKind::Number.accepts('-'));
        assert!(!InputKind::Number.accepts('+'));
        assert!(InputKind::Number.accepts('e'));
        assert!(!InputKind::Number.accepts('a'));
        assert!(InputKind::Text.accepts('a'));
        assert!(!InputKind::Text.accepts('\u{7}'));
        assert!(InputKind::Password.is_masked());
        assert!(!InputKind::Email.is_masked());
    }

    #[test]
    fn test_width_hint_parse() {
        assert_eq!("90%".parse::<WidthHint>(), Ok(WidthHint::Percent(90)));
        assert_eq!(" 50 % ".parse::<WidthHint>(), Ok(WidthHint::Percent(50)));
        assert_eq!("30".parse::<WidthHint>(), Ok(WidthHint::Columns(30)));
        assert_eq!("24ch".parse::<WidthHint>(), Ok(WidthHint::Columns(24)));
        assert_eq!("".parse::<WidthHint>(), Ok(WidthHint::Percent(90)));
    }

    #[test]
    fn test_width_hint_parse_invalid() {
        assert!("0%".parse::<WidthHint>().is_err());
        assert!("150%".parse::<WidthHint>().is_err());
        assert!("wide".parse::<WidthHint>().is_err());
        assert!("0".parse::<WidthHint>().is_err());
    }

    #[test]
    fn test_width_hint_resolve() {
        assert_eq!(WidthHint::Percent(90).resolve(40), 36);
        assert_eq!(WidthHint::Percent(1).resolve(10), 1);
        assert_eq!(WidthHint::Columns(100).resolve(40), 40);
        assert_eq!(WidthHint::Columns(12).resolve(40), 12);
        assert_eq!(WidthHint::Columns(12).resolve(0), 0);
    }

    #[test]
    fn test_request_conversions() {
        assert!(matches!(PromptRequest::from("hi"), PromptRequest::Message(m) if m == "hi"));
        assert!(matches!(
            PromptRequest::from(PromptConfig::new("opts")),
            PromptRequest::Options(c) if c.message == "opts"
        ));
        assert!(matches!(PromptRequest::from(None::<&str>), PromptRequest::Absent));
        assert!(matches!(PromptRequest::from(Some("x".to_string())), PromptRequest::Message(_)));
        assert!(PromptRequest::Absent.into_config().is_none());
    }

    #[test]
    fn test_from_positional() {
        let config = PromptConfig::from_positional("Pin:", Some("password"), None, None);
        assert_eq!(config.message, "Pin:");
        assert_eq!(config.input_kind, Some(InputKind::Password));
        assert!(config.callback.is_none());
        assert_eq!(config.field_options, FieldOptions::default());
    }
}
