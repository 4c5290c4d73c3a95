//! Terminal host for prompts
//!
//! Provides a full-screen host that shows prompts over a history of answers:
//! - `demo`: open canned prompts with n/p/t and watch the single-flight guard
//! - `ask`: show one prompt and return its answer

mod app;
mod events;
mod runner;
pub mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::{TuiRunner, answer_outcome};
pub use state::{AnswerOutcome, AppState, HostMode, Preset};

use std::io::{self, Stdout};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::notice::NoticeBoard;
use crate::prompt::{ControllerSettings, PromptConfig};

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Restores the terminal even on early return or error
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore();
    }
}

/// Run the interactive demo host
pub async fn run_demo(settings: ControllerSettings, notices: NoticeBoard) -> Result<()> {
    debug!("run_demo: called");
    let terminal = init()?;
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(terminal, HostMode::Demo, settings, notices);
    runner.run().await?;
    Ok(())
}

/// Show a single prompt and return how it ended
///
/// `None` means the user aborted the host with Ctrl+C.
pub async fn run_ask(
    config: PromptConfig,
    settings: ControllerSettings,
    notices: NoticeBoard,
) -> Result<Option<AnswerOutcome>> {
    debug!(message = %config.message, "run_ask: called");
    let terminal = init()?;
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(terminal, HostMode::Ask, settings, notices);
    if !runner.open(config) {
        eyre::bail!("Prompt could not be opened");
    }
    runner.run().await
}
