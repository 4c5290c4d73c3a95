//! TUI host state
//!
//! Pure data structures for the screen behind the prompt. No rendering
//! logic here.

use tracing::debug;

use crate::prompt::{InputKind, PendingPrompt, PromptConfig};

/// How the TUI was launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostMode {
    /// Interactive playground with an answer history
    #[default]
    Demo,
    /// Single prompt; exit once it is answered or dismissed
    Ask,
}

/// Canned prompts available in demo mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Plain text (`n`)
    Text,
    /// Password (`p`)
    Password,
    /// Text with a title selector before it (`t`)
    Titled,
}

impl Preset {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'n' => Some(Self::Text),
            'p' => Some(Self::Password),
            't' => Some(Self::Titled),
            _ => None,
        }
    }

    pub fn config(self) -> PromptConfig {
        debug!(?self, "Preset::config: called");
        match self {
            Self::Text => PromptConfig::new("What is your name?"),
            Self::Password => PromptConfig::new("Enter a passphrase:").with_input_kind(InputKind::Password),
            Self::Titled => PromptConfig::new("Enter your surname:").with_auxiliary_markup(
                "<select><option value='Mr. '>Mr.</option><option value='Ms. '>Ms.</option>\
                 <option value='Dr. '>Dr.</option></select>",
            ),
        }
    }
}

/// How a prompt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Answered(String),
    Cancelled,
}

impl AnswerOutcome {
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Answered(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

/// Finished prompt shown in the history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub message: String,
    pub masked: bool,
    pub outcome: AnswerOutcome,
}

/// Prompt opened by the app, waiting for the runner to pick up its future
#[derive(Debug)]
pub struct OpenedPrompt {
    pub message: String,
    pub masked: bool,
    pub pending: PendingPrompt,
}

/// Main host state
#[derive(Debug, Default)]
pub struct AppState {
    pub mode: HostMode,
    /// Finished prompts, oldest first
    pub history: Vec<HistoryEntry>,
    /// First history row shown
    pub scroll: usize,
    /// Notices visible this frame
    pub notices: Vec<String>,
    /// Prompts opened since the runner last looked
    pub opened: Vec<OpenedPrompt>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(mode: HostMode) -> Self {
        debug!(?mode, "AppState::new: called");
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        debug!(message = %entry.message, answered = entry.outcome.answer().is_some(), "AppState::record: called");
        self.history.push(entry);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll + 1 < self.history.len() {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.history.len().saturating_sub(1);
    }
}
