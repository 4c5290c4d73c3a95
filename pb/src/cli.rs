//! CLI command definitions and subcommands

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::debug;

use crate::prompt::{FieldOptions, InputKind, PromptConfig, PromptError, ThemeOverrides, WidthHint};

/// promptbox - modal text prompt for the terminal
#[derive(Parser)]
#[command(
    name = "pb",
    about = "Modal text prompt for the terminal",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to demo)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask one question and print the answer
    Ask(AskArgs),

    /// Interactive playground (default)
    Demo,

    /// Print the effective configuration as YAML
    Config,
}

/// Options for a single prompt
#[derive(Debug, Clone, Default, Args)]
pub struct AskArgs {
    /// Label shown above the input
    pub message: String,

    /// Input kind (text, password, number, email, ...)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Control markup shown before the input; its value prefixes the answer
    #[arg(short, long, value_name = "MARKUP")]
    pub before: Option<String>,

    /// Hint shown while the input is empty
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Initial input value
    #[arg(long)]
    pub value: Option<String>,

    /// Maximum number of characters
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Make the input read-only
    #[arg(long)]
    pub read_only: bool,

    /// Input width (N% of the box or N columns)
    #[arg(short, long)]
    pub width: Option<String>,

    /// Extra input attribute; may be repeated
    #[arg(short, long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Box background color
    #[arg(long)]
    pub front: Option<String>,

    /// Label color
    #[arg(long)]
    pub label: Option<String>,

    /// Input text color
    #[arg(long)]
    pub input: Option<String>,

    /// Border color
    #[arg(long)]
    pub border: Option<String>,
}

impl AskArgs {
    /// Build the prompt options, validating field attributes and width
    pub fn to_prompt_config(&self) -> Result<PromptConfig, PromptError> {
        debug!(message = %self.message, "AskArgs::to_prompt_config: called");

        let mut map = Map::new();
        for field in &self.fields {
            let (key, value) = parse_field(field)?;
            map.insert(key, value);
        }
        let mut options = FieldOptions::from_map(&map)?;

        if let Some(placeholder) = &self.placeholder {
            options.placeholder = Some(placeholder.clone());
        }
        if let Some(value) = &self.value {
            options.value = Some(value.clone());
        }
        if let Some(max_length) = self.max_length {
            options.max_length = Some(max_length);
        }
        if self.read_only {
            options.read_only = true;
        }

        let mut config = PromptConfig::new(self.message.clone())
            .with_field_options(options)
            .with_theme(ThemeOverrides {
                front: self.front.clone(),
                label: self.label.clone(),
                input: self.input.clone(),
                border: self.border.clone(),
            });

        if let Some(kind) = &self.kind {
            config = config.with_input_kind(InputKind::parse(kind));
        }
        if let Some(markup) = &self.before {
            config = config.with_auxiliary_markup(markup.clone());
        }
        if let Some(width) = &self.width {
            config = config.with_input_width(width.parse::<WidthHint>()?);
        }

        Ok(config)
    }
}

/// Split `KEY=VALUE`; the value is JSON when it parses as JSON, else a string
fn parse_field(field: &str) -> Result<(String, Value), PromptError> {
    let Some((key, raw)) = field.split_once('=') else {
        return Err(PromptError::InvalidFieldOption {
            name: field.to_string(),
            expected: "KEY=VALUE",
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(PromptError::InvalidFieldOption {
            name: field.to_string(),
            expected: "KEY=VALUE",
        });
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn ask(args: &[&str]) -> AskArgs {
        match parse(args).command {
            Some(Command::Ask(ask)) => ask,
            other => panic!("expected ask, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = parse(&["pb"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["pb", "config", "--log-level", "debug", "-c", "x.yml"]);
        assert!(matches!(cli.command, Some(Command::Config)));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }

    #[test]
    fn test_ask_to_config() {
        let args = ask(&[
            "pb",
            "ask",
            "Enter name:",
            "--kind",
            "password",
            "--before",
            "<input value='Mr. '>",
            "--placeholder",
            "surname",
            "--width",
            "20",
            "--border",
            "red",
        ]);
        let config = args.to_prompt_config().unwrap();

        assert_eq!(config.message, "Enter name:");
        assert_eq!(config.input_kind, Some(InputKind::Password));
        assert_eq!(config.auxiliary_markup.as_deref(), Some("<input value='Mr. '>"));
        assert_eq!(config.field_options.placeholder.as_deref(), Some("surname"));
        assert_eq!(config.input_width, Some(WidthHint::Columns(20)));
        assert_eq!(config.theme.border.as_deref(), Some("red"));
        assert!(config.theme.front.is_none());
    }

    #[test]
    fn test_field_flags() {
        let args = ask(&[
            "pb",
            "ask",
            "Code:",
            "--field",
            "maxLength=6",
            "--field",
            "readonly=true",
            "-f",
            "placeholder=123456",
        ]);
        let options = args.to_prompt_config().unwrap().field_options;

        assert_eq!(options.max_length, Some(6));
        assert!(options.read_only);
        // JSON numbers are accepted where text is expected
        assert_eq!(options.placeholder.as_deref(), Some("123456"));
    }

    #[test]
    fn test_explicit_flags_override_fields() {
        let args = ask(&["pb", "ask", "Q", "--field", "max-length=3", "--max-length", "8"]);
        assert_eq!(args.to_prompt_config().unwrap().field_options.max_length, Some(8));
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let args = ask(&["pb", "ask", "Q", "--field", "onclick=alert(1)"]);
        assert_eq!(
            args.to_prompt_config().unwrap_err(),
            PromptError::UnsupportedFieldOption("onclick".to_string())
        );

        let args = ask(&["pb", "ask", "Q", "--field", "placeholder"]);
        assert!(matches!(
            args.to_prompt_config(),
            Err(PromptError::InvalidFieldOption { .. })
        ));

        let args = ask(&["pb", "ask", "Q", "--width", "200%"]);
        assert!(matches!(args.to_prompt_config(), Err(PromptError::InvalidWidth(_))));
    }

    #[test]
    fn test_parse_field_values() {
        assert_eq!(parse_field("value=Mr. ").unwrap(), ("value".to_string(), Value::String("Mr. ".to_string())));
        assert_eq!(parse_field("readonly=false").unwrap().1, Value::Bool(false));
        assert!(parse_field("=x").is_err());
    }
}
