//! TUI application - event handling and state management
//!
//! The App owns the host state and the prompt controller and routes
//! keyboard and mouse events between them. It does not do any rendering;
//! that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tracing::{debug, info, trace};

use crate::prompt::{EventOutcome, OpenOutcome, PromptController, PromptRequest, SessionPhase};

use super::state::{AnswerOutcome, AppState, HistoryEntry, HostMode, OpenedPrompt, Preset};

/// TUI application
#[derive(Debug)]
pub struct App {
    /// Host state
    state: AppState,
    /// The prompt shown over the host screen
    controller: PromptController,
}

impl App {
    /// Create a new application instance
    pub fn new(mode: HostMode, controller: PromptController) -> Self {
        debug!(?mode, "App::new: called");
        Self {
            state: AppState::new(mode),
            controller,
        }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        trace!("App::state: called");
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        trace!("App::state_mut: called");
        &mut self.state
    }

    pub fn controller(&self) -> &PromptController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PromptController {
        &mut self.controller
    }

    /// Open a prompt; its future is queued for the runner
    pub fn open_prompt(&mut self, request: impl Into<PromptRequest>) -> bool {
        debug!("App::open_prompt: called");
        match self.controller.open(request) {
            OpenOutcome::Opened(pending) => {
                let (message, masked) = self
                    .controller
                    .session()
                    .map(|s| (s.message().to_string(), s.input_kind().is_masked()))
                    .unwrap_or_default();
                info!(%message, "App::open_prompt: prompt opened");
                self.state.opened.push(OpenedPrompt {
                    message,
                    masked,
                    pending,
                });
                true
            }
            OpenOutcome::Rejected => {
                debug!("App::open_prompt: rejected, prompt already pending");
                false
            }
            OpenOutcome::Ignored => false,
        }
    }

    /// Hand queued prompt futures to the caller
    pub fn take_opened(&mut self) -> Vec<OpenedPrompt> {
        std::mem::take(&mut self.state.opened)
    }

    /// Record how a prompt ended
    pub fn record_answer(&mut self, message: String, masked: bool, outcome: AnswerOutcome) {
        debug!(%message, "App::record_answer: called");
        self.state.record(HistoryEntry {
            message,
            masked,
            outcome,
        });
        if self.state.mode == HostMode::Ask {
            debug!("App::record_answer: ask mode, quitting");
            self.state.should_quit = true;
        }
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("App::handle_key: Ctrl+C force quit");
            return true;
        }

        if self.controller.phase() == SessionPhase::Open {
            if key.code == KeyCode::Char('n') && key.modifiers.contains(KeyModifiers::CONTROL) {
                debug!("App::handle_key: Ctrl+N requests another prompt");
                self.open_prompt(Preset::Text.config());
                return false;
            }
            let outcome = self.controller.handle_key(key);
            debug!(?outcome, "App::handle_key: routed to prompt");
            return false;
        }

        match self.state.mode {
            HostMode::Demo => self.handle_demo_key(key),
            HostMode::Ask => false,
        }
    }

    /// Handle key on the host screen
    fn handle_demo_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_demo_key: called");
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                debug!("App::handle_demo_key: quit");
                return true;
            }
            KeyCode::Char(c) if Preset::from_key(c).is_some() => {
                if let Some(preset) = Preset::from_key(c) {
                    self.open_prompt(preset.config());
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll(|state| state.scroll_down()),
            KeyCode::Char('k') | KeyCode::Up => self.scroll(|state| state.scroll_up()),
            KeyCode::Char('g') | KeyCode::Home => self.scroll(|state| state.scroll_to_top()),
            KeyCode::Char('G') | KeyCode::End => self.scroll(|state| state.scroll_to_bottom()),
            _ => {
                debug!("App::handle_demo_key: unhandled key");
            }
        }
        false
    }

    /// Handle a mouse event
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        trace!(?mouse, "App::handle_mouse: called");
        if self.controller.handle_mouse(mouse) != EventOutcome::Ignored {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll(|state| state.scroll_down()),
            MouseEventKind::ScrollUp => self.scroll(|state| state.scroll_up()),
            _ => {}
        }
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "App::handle_resize: called");
        self.controller.resize(width, height);
    }

    fn scroll(&mut self, action: impl FnOnce(&mut AppState)) {
        if self.controller.scroll_locked() {
            debug!("App::scroll: scrolling locked by prompt");
            return;
        }
        action(&mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::notice::NoticeBoard;
    use crate::prompt::{ControllerSettings, PromptConfig};

    fn app_with_board(mode: HostMode) -> (App, NoticeBoard) {
        let board = NoticeBoard::default();
        let controller = PromptController::new(Arc::new(board.clone()));
        (App::new(mode, controller), board)
    }

    fn press(app: &mut App, c: char) -> bool {
        app.handle_key(KeyEvent::from(KeyCode::Char(c)))
    }

    #[test]
    fn test_preset_key_opens_prompt() {
        let (mut app, _) = app_with_board(HostMode::Demo);
        press(&mut app, 'n');
        assert_eq!(app.controller().phase(), SessionPhase::Open);
        assert_eq!(app.controller().session().unwrap().message(), "What is your name?");
        assert_eq!(app.take_opened().len(), 1);
        assert!(app.take_opened().is_empty());
    }

    #[test]
    fn test_keys_route_to_open_prompt() {
        let (mut app, _) = app_with_board(HostMode::Demo);
        press(&mut app, 'n');
        // 'q' is typed into the prompt instead of quitting
        assert!(!press(&mut app, 'q'));
        assert_eq!(app.controller().session().unwrap().input().value(), "q");
    }

    #[test]
    fn test_ctrl_n_in_prompt_posts_notice() {
        let (mut app, board) = app_with_board(HostMode::Demo);
        press(&mut app, 'p');
        app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));

        assert_eq!(board.len(), 1);
        assert_eq!(app.controller().session().unwrap().message(), "Enter a passphrase:");
        assert_eq!(app.take_opened().len(), 1);
    }

    #[test]
    fn test_open_while_closing_is_rejected() {
        let (mut app, board) = app_with_board(HostMode::Demo);
        press(&mut app, 'n');
        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert_eq!(app.controller().phase(), SessionPhase::Closing);

        // Host keys work again, but the guard still holds
        press(&mut app, 'n');
        assert_eq!(board.len(), 1);
        assert_eq!(app.controller().phase(), SessionPhase::Closing);
    }

    #[test]
    fn test_scroll_locked_while_prompt_open() {
        let (mut app, _) = app_with_board(HostMode::Demo);
        for i in 0..5 {
            app.state_mut().record(HistoryEntry {
                message: format!("q{}", i),
                masked: false,
                outcome: AnswerOutcome::Cancelled,
            });
        }
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.state().scroll, 1);

        press(&mut app, 'n');
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.state().scroll, 1);
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _) = app_with_board(HostMode::Demo);
        assert!(press(&mut app, 'q'));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_record_answer_in_ask_mode_quits() {
        let settings = ControllerSettings {
            close_delay: Duration::ZERO,
            ..Default::default()
        };
        let controller = PromptController::with_settings(Arc::new(NoticeBoard::default()), settings);
        let mut app = App::new(HostMode::Ask, controller);
        assert!(app.open_prompt(PromptConfig::new("Token:")));

        // Host keys do nothing in ask mode
        app.controller_mut().cancel();
        assert!(!press(&mut app, 'q'));

        app.record_answer("Token:".to_string(), false, AnswerOutcome::Cancelled);
        assert!(app.state().should_quit);
        assert_eq!(app.state().history.len(), 1);
    }
}
