//! TUI Runner - main loop that owns the terminal
//!
//! The TuiRunner is responsible for:
//! - Dispatching terminal events to the App
//! - Awaiting prompt futures and recording their answers
//! - Finishing prompt teardown once the close delay has elapsed
//! - Expiring notices and redrawing

use std::time::Duration;

use eyre::Result;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::notice::NoticeBoard;
use crate::prompt::{ControllerSettings, PromptConfig, PromptController, PromptError};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{AnswerOutcome, HostMode, OpenedPrompt};
use super::views;

/// Poll interval for terminal events; also the notice refresh rate
const TICK_RATE: Duration = Duration::from_millis(100);

/// A resolved prompt future
#[derive(Debug)]
struct Answer {
    message: String,
    masked: bool,
    result: Result<String, PromptError>,
}

/// Map a prompt result to what the host records
pub fn answer_outcome(result: Result<String, PromptError>) -> AnswerOutcome {
    match result {
        Ok(value) => AnswerOutcome::Answered(value),
        Err(PromptError::Cancelled) => AnswerOutcome::Cancelled,
        Err(e) => {
            warn!(error = %e, "answer_outcome: prompt ended without an answer");
            AnswerOutcome::Cancelled
        }
    }
}

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,
    /// Shared with the controller, which posts to it
    notices: NoticeBoard,
    answer_tx: mpsc::UnboundedSender<Answer>,
    answer_rx: mpsc::UnboundedReceiver<Answer>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, mode: HostMode, settings: ControllerSettings, notices: NoticeBoard) -> Self {
        debug!(?mode, "TuiRunner::new: called");
        let controller = PromptController::with_settings(std::sync::Arc::new(notices.clone()), settings);
        let (answer_tx, answer_rx) = mpsc::unbounded_channel();
        Self {
            app: App::new(mode, controller),
            terminal,
            event_handler: EventHandler::new(TICK_RATE),
            notices,
            answer_tx,
            answer_rx,
        }
    }

    /// Open a prompt before the loop starts
    pub fn open(&mut self, config: PromptConfig) -> bool {
        self.app.open_prompt(config)
    }

    /// Run until the user quits; in ask mode, until the prompt ends
    ///
    /// Returns how the last prompt ended in ask mode, `None` otherwise or
    /// when the user aborted.
    pub async fn run(&mut self) -> Result<Option<AnswerOutcome>> {
        debug!("TuiRunner::run: called");
        let size = self.terminal.size()?;
        self.app.handle_resize(size.width, size.height);

        loop {
            self.spawn_waiters();
            self.app.state_mut().notices = self.notices.active(Instant::now());

            self.terminal.draw(|frame| views::render(&self.app, frame))?;

            let deadline = self.app.controller().teardown_deadline();

            tokio::select! {
                event = self.event_handler.next() => {
                    match event? {
                        Event::Tick => {}
                        Event::Key(key) => {
                            if self.app.handle_key(key) {
                                debug!("TuiRunner::run: quit requested");
                                return Ok(None);
                            }
                        }
                        Event::Mouse(mouse) => self.app.handle_mouse(mouse),
                        Event::Resize(width, height) => self.app.handle_resize(width, height),
                    }
                }
                Some(answer) = self.answer_rx.recv() => {
                    self.handle_answer(answer);
                }
                _ = async {
                    match deadline {
                        Some(deadline) => sleep_until(deadline).await,
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    self.app.controller_mut().poll_teardown(Instant::now());
                }
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        let outcome = match self.app.state().mode {
            HostMode::Ask => self.app.state().history.last().map(|entry| entry.outcome.clone()),
            HostMode::Demo => None,
        };
        debug!(?outcome, "TuiRunner::run: exiting");
        Ok(outcome)
    }

    /// Await each newly opened prompt on its own task
    fn spawn_waiters(&mut self) {
        for OpenedPrompt {
            message,
            masked,
            pending,
        } in self.app.take_opened()
        {
            debug!(%message, "TuiRunner::spawn_waiters: awaiting prompt");
            let tx = self.answer_tx.clone();
            tokio::spawn(async move {
                let result = pending.await;
                let _ = tx.send(Answer {
                    message,
                    masked,
                    result,
                });
            });
        }
    }

    fn handle_answer(&mut self, answer: Answer) {
        let outcome = answer_outcome(answer.result);
        info!(message = %answer.message, answered = outcome.answer().is_some(), "TuiRunner::handle_answer: prompt ended");
        self.app.record_answer(answer.message, answer.masked, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_outcome() {
        assert_eq!(
            answer_outcome(Ok("Mr. Smith".to_string())),
            AnswerOutcome::Answered("Mr. Smith".to_string())
        );
        assert_eq!(answer_outcome(Err(PromptError::Cancelled)), AnswerOutcome::Cancelled);
        assert_eq!(answer_outcome(Err(PromptError::ControllerDropped)), AnswerOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_waiter_forwards_result() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = PromptController::new(std::sync::Arc::new(NoticeBoard::default()));
        let pending = controller.open("Name?").into_pending().unwrap();

        tokio::spawn(async move {
            let result = pending.await;
            let _ = tx.send(Answer {
                message: "Name?".to_string(),
                masked: false,
                result,
            });
        });

        controller.cancel();
        let answer = rx.recv().await.unwrap();
        assert_eq!(answer.result, Err(PromptError::Cancelled));
    }
}
