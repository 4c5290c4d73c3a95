//! PromptController - single-flight modal input session
//!
//! The controller owns at most one [`PromptSession`]. It moves through
//! three phases:
//!
//! ```text
//! Closed --open()--> Open --submit()/cancel()--> Closing --deadline--> Closed
//! ```
//!
//! The single-flight guard covers both `Open` and `Closing`: a prompt cannot
//! be reopened until the close delay has elapsed and the host event loop has
//! called [`PromptController::poll_teardown`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::notice::Notifier;

use super::auxiliary::{AuxiliaryControl, AuxiliaryWidget};
use super::error::PromptError;
use super::field::InputField;
use super::layout::{DEFAULT_WIDE_BREAKPOINT, PromptButton, PromptLayout};
use super::request::{InputKind, PromptRequest, WidthHint};
use super::session::{Focus, PromptSession};
use super::theme::Theme;

/// Delay between hiding a prompt and tearing it down
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(200);

/// Notice shown when a prompt is requested while one is pending
pub const DEFAULT_PENDING_NOTICE: &str = "A data entry is pending";

/// Controller-wide settings
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub close_delay: Duration,
    pub pending_notice: String,
    pub input_kind: InputKind,
    pub input_width: WidthHint,
    pub wide_breakpoint: u16,
    pub theme: Theme,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            close_delay: DEFAULT_CLOSE_DELAY,
            pending_notice: DEFAULT_PENDING_NOTICE.to_string(),
            input_kind: InputKind::Text,
            input_width: WidthHint::default(),
            wide_breakpoint: DEFAULT_WIDE_BREAKPOINT,
            theme: Theme::default(),
        }
    }
}

/// Observable phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Closed,
    Open,
    Closing,
}

#[derive(Debug)]
enum Phase {
    Closed,
    Open(Box<PromptSession>),
    Closing { deadline: Instant },
}

/// Result of an open request
#[derive(Debug)]
pub enum OpenOutcome {
    /// A new session is on screen; the future resolves with its result
    Opened(PendingPrompt),
    /// A session was already pending; the user was notified
    Rejected,
    /// Nothing usable was requested
    Ignored,
}

impl OpenOutcome {
    pub fn is_opened(&self) -> bool {
        matches!(self, Self::Opened(_))
    }

    pub fn into_pending(self) -> Option<PendingPrompt> {
        match self {
            Self::Opened(pending) => Some(pending),
            _ => None,
        }
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The value was delivered and the prompt is closing
    Submitted(String),
    /// The input was empty; focus went back to the input
    Empty,
    /// No prompt is open
    NotOpen,
}

/// What a key or mouse event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The open prompt handled the event
    Consumed,
    /// The event submitted the prompt
    Submitted,
    /// The event dismissed the prompt
    Cancelled,
    /// No prompt is open; the host may handle the event
    Ignored,
}

/// Future resolving to the submitted value of one session
///
/// Resolves to `Err(PromptError::Cancelled)` when the user dismisses the
/// prompt, and to `Err(PromptError::ControllerDropped)` if the controller
/// goes away first.
#[derive(Debug)]
pub struct PendingPrompt {
    rx: oneshot::Receiver<Result<String, PromptError>>,
}

impl PendingPrompt {
    /// Non-blocking check for a result
    pub fn try_result(&mut self) -> Option<Result<String, PromptError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(PromptError::ControllerDropped)),
        }
    }
}

impl Future for PendingPrompt {
    type Output = Result<String, PromptError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(PromptError::ControllerDropped)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Manages one modal prompt at a time
pub struct PromptController {
    phase: Phase,
    notifier: Arc<dyn Notifier>,
    settings: ControllerSettings,
    viewport: Rect,
    /// Host scrolling suppressed while a prompt is visible
    scroll_locked: bool,
    /// Scroll lock value to restore on close
    saved_scroll_lock: Option<bool>,
}

impl PromptController {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self::with_settings(notifier, ControllerSettings::default())
    }

    pub fn with_settings(notifier: Arc<dyn Notifier>, settings: ControllerSettings) -> Self {
        debug!(?settings, "PromptController::with_settings: called");
        Self {
            phase: Phase::Closed,
            notifier,
            settings,
            viewport: Rect::new(0, 0, 80, 24),
            scroll_locked: false,
            saved_scroll_lock: None,
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn phase(&self) -> SessionPhase {
        match self.phase {
            Phase::Closed => SessionPhase::Closed,
            Phase::Open(_) => SessionPhase::Open,
            Phase::Closing { .. } => SessionPhase::Closing,
        }
    }

    /// Single-flight guard: set from open until teardown completes
    pub fn is_open(&self) -> bool {
        !matches!(self.phase, Phase::Closed)
    }

    /// The visible session, if any
    pub fn session(&self) -> Option<&PromptSession> {
        match &self.phase {
            Phase::Open(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut PromptSession> {
        match &mut self.phase {
            Phase::Open(session) => Some(session),
            _ => None,
        }
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Set the host's own scroll lock; restored to this value after a prompt
    pub fn set_scroll_locked(&mut self, locked: bool) {
        debug!(locked, "PromptController::set_scroll_locked: called");
        match self.saved_scroll_lock {
            Some(_) => self.saved_scroll_lock = Some(locked),
            None => self.scroll_locked = locked,
        }
    }

    /// Request a new prompt
    pub fn open(&mut self, request: impl Into<PromptRequest>) -> OpenOutcome {
        let Some(config) = request.into().into_config() else {
            debug!("PromptController::open: absent request, ignoring");
            return OpenOutcome::Ignored;
        };

        if self.is_open() {
            info!(phase = ?self.phase(), "PromptController::open: prompt pending, rejecting");
            self.notifier.notify(&self.settings.pending_notice);
            return OpenOutcome::Rejected;
        }

        debug!(message = %config.message, "PromptController::open: opening session");

        let theme = match self.settings.theme.with_overrides(&config.theme) {
            Ok(theme) => theme,
            Err(e) => {
                warn!(error = %e, "PromptController::open: ignoring invalid theme override");
                self.settings.theme
            }
        };

        let kind = config.input_kind.unwrap_or_else(|| self.settings.input_kind.clone());
        let input_width = config.input_width.unwrap_or(self.settings.input_width);
        let auxiliary = config.auxiliary_markup.as_deref().map(AuxiliaryControl::parse);
        let layout = PromptLayout::compute(
            self.viewport,
            auxiliary.is_some(),
            input_width,
            self.settings.wide_breakpoint,
        );

        let (tx, rx) = oneshot::channel();
        let session = PromptSession {
            message: config.message,
            input: InputField::new(kind, &config.field_options),
            auxiliary,
            focus: Focus::Input,
            input_width,
            theme,
            layout,
            hovered: None,
            callback: config.callback,
            resolver: Some(tx),
        };

        self.saved_scroll_lock = Some(self.scroll_locked);
        self.scroll_locked = true;
        self.phase = Phase::Open(Box::new(session));

        OpenOutcome::Opened(PendingPrompt { rx })
    }

    /// Submit the current input
    pub fn submit(&mut self) -> SubmitOutcome {
        let Some(session) = self.session_mut() else {
            debug!("PromptController::submit: no open session");
            return SubmitOutcome::NotOpen;
        };

        if session.input.is_empty() {
            debug!("PromptController::submit: empty input, refocusing");
            session.focus = Focus::Input;
            return SubmitOutcome::Empty;
        }

        let Some(mut session) = self.begin_close() else {
            return SubmitOutcome::NotOpen;
        };
        let result = session.compose_result();
        info!(result_len = result.len(), "PromptController::submit: delivering result");
        session.deliver(&result);
        SubmitOutcome::Submitted(result)
    }

    /// Dismiss the prompt without a result
    pub fn cancel(&mut self) -> bool {
        debug!("PromptController::cancel: called");
        self.close()
    }

    /// Hide the prompt and schedule teardown
    ///
    /// An unresolved session resolves as cancelled. Returns false if no
    /// prompt was open.
    pub fn close(&mut self) -> bool {
        match self.begin_close() {
            Some(mut session) => {
                session.dismiss();
                true
            }
            None => false,
        }
    }

    /// When the closing prompt may be torn down
    pub fn teardown_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Closing { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Finish teardown if the close delay has elapsed at `now`
    pub fn poll_teardown(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Closing { deadline } if now >= deadline => {
                debug!("PromptController::poll_teardown: teardown complete");
                self.phase = Phase::Closed;
                true
            }
            _ => false,
        }
    }

    /// Recompute geometry for a new viewport size
    pub fn resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "PromptController::resize: called");
        self.viewport = Rect::new(0, 0, width, height);
        let wide_breakpoint = self.settings.wide_breakpoint;
        let viewport = self.viewport;
        if let Some(session) = self.session_mut() {
            session.layout = PromptLayout::compute(
                viewport,
                session.auxiliary.is_some(),
                session.input_width,
                wide_breakpoint,
            );
        }
    }

    /// Route a key press to the open prompt
    pub fn handle_key(&mut self, key: KeyEvent) -> EventOutcome {
        let Some(session) = self.session_mut() else {
            return EventOutcome::Ignored;
        };
        if key.kind == KeyEventKind::Release {
            return EventOutcome::Consumed;
        }
        debug!(?key, focus = ?session.focus, "PromptController::handle_key: called");

        match key.code {
            KeyCode::Enter => {
                return match self.submit() {
                    SubmitOutcome::Submitted(_) => EventOutcome::Submitted,
                    _ => EventOutcome::Consumed,
                };
            }
            KeyCode::Esc => {
                self.cancel();
                return EventOutcome::Cancelled;
            }
            KeyCode::Tab | KeyCode::BackTab => session.toggle_focus(),
            _ => match session.focus {
                Focus::Input => edit_field(&mut session.input, key),
                Focus::Auxiliary => match session.auxiliary.as_mut().and_then(AuxiliaryControl::widget_mut) {
                    Some(AuxiliaryWidget::Field(field)) => edit_field(field, key),
                    Some(AuxiliaryWidget::Select(select)) => match key.code {
                        KeyCode::Down | KeyCode::Right | KeyCode::Char(' ') => select.select_next(),
                        KeyCode::Up | KeyCode::Left => select.select_prev(),
                        _ => {}
                    },
                    None => session.focus = Focus::Input,
                },
            },
        }
        EventOutcome::Consumed
    }

    /// Route a mouse event to the open prompt
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> EventOutcome {
        let Some(session) = self.session_mut() else {
            return EventOutcome::Ignored;
        };
        let button = session.layout.button_at(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Moved => {
                session.hovered = button;
                EventOutcome::Consumed
            }
            MouseEventKind::Down(MouseButton::Left) => {
                debug!(?button, column = mouse.column, row = mouse.row, "PromptController::handle_mouse: click");
                match button {
                    Some(PromptButton::Send) => match self.submit() {
                        SubmitOutcome::Submitted(_) => EventOutcome::Submitted,
                        _ => EventOutcome::Consumed,
                    },
                    Some(PromptButton::Cancel) => {
                        self.cancel();
                        EventOutcome::Cancelled
                    }
                    None => {
                        let position = Position::new(mouse.column, mouse.row);
                        if session.layout.input.contains(position) {
                            session.focus = Focus::Input;
                        } else if session.layout.auxiliary.is_some_and(|r| r.contains(position))
                            && session.auxiliary.as_ref().is_some_and(AuxiliaryControl::is_focusable)
                        {
                            session.focus = Focus::Auxiliary;
                        }
                        EventOutcome::Consumed
                    }
                }
            }
            _ => EventOutcome::Consumed,
        }
    }

    /// Take the open session out, restore host state and start the close timer
    fn begin_close(&mut self) -> Option<Box<PromptSession>> {
        let Phase::Open(_) = self.phase else {
            debug!(phase = ?self.phase(), "PromptController::begin_close: nothing to close");
            return None;
        };

        if let Some(saved) = self.saved_scroll_lock.take() {
            self.scroll_locked = saved;
        }

        let next = if self.settings.close_delay.is_zero() {
            Phase::Closed
        } else {
            Phase::Closing {
                deadline: Instant::now() + self.settings.close_delay,
            }
        };
        debug!(delay = ?self.settings.close_delay, "PromptController::begin_close: closing");

        match std::mem::replace(&mut self.phase, next) {
            Phase::Open(session) => Some(session),
            _ => None,
        }
    }
}

impl std::fmt::Debug for PromptController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptController")
            .field("phase", &self.phase)
            .field("settings", &self.settings)
            .field("viewport", &self.viewport)
            .field("scroll_locked", &self.scroll_locked)
            .finish()
    }
}

fn edit_field(field: &mut InputField, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            field.insert(c);
        }
        KeyCode::Backspace => {
            field.backspace();
        }
        KeyCode::Delete => {
            field.delete();
        }
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Home => field.move_home(),
        KeyCode::End => field.move_end(),
        _ => {}
    }
}
