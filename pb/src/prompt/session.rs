//! One open prompt session

use std::fmt;

use tokio::sync::oneshot;
use tracing::debug;

use super::auxiliary::AuxiliaryControl;
use super::error::PromptError;
use super::field::InputField;
use super::layout::{PromptButton, PromptLayout};
use super::request::{InputKind, ResultSink, WidthHint};
use super::theme::Theme;

/// Which control has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Auxiliary,
}

/// State of the prompt currently on screen
pub struct PromptSession {
    pub(super) message: String,
    pub(super) input: InputField,
    pub(super) auxiliary: Option<AuxiliaryControl>,
    pub(super) focus: Focus,
    pub(super) input_width: WidthHint,
    pub(super) theme: Theme,
    pub(super) layout: PromptLayout,
    pub(super) hovered: Option<PromptButton>,
    pub(super) callback: Option<ResultSink>,
    pub(super) resolver: Option<oneshot::Sender<Result<String, PromptError>>>,
}

impl PromptSession {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn input_kind(&self) -> &InputKind {
        self.input.kind()
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputField {
        &mut self.input
    }

    pub fn auxiliary(&self) -> Option<&AuxiliaryControl> {
        self.auxiliary.as_ref()
    }

    pub fn auxiliary_mut(&mut self) -> Option<&mut AuxiliaryControl> {
        self.auxiliary.as_mut()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn layout(&self) -> &PromptLayout {
        &self.layout
    }

    pub fn hovered(&self) -> Option<PromptButton> {
        self.hovered
    }

    /// Move focus between the input and a focusable auxiliary control
    pub fn toggle_focus(&mut self) {
        let can_focus_aux = self.auxiliary.as_ref().is_some_and(AuxiliaryControl::is_focusable);
        self.focus = match self.focus {
            Focus::Input if can_focus_aux => Focus::Auxiliary,
            _ => Focus::Input,
        };
        debug!(focus = ?self.focus, "PromptSession::toggle_focus: focus moved");
    }

    /// Auxiliary value (if exposed) followed by the input value
    pub fn compose_result(&self) -> String {
        let prefix = self.auxiliary.as_ref().and_then(AuxiliaryControl::value).unwrap_or_default();
        format!("{}{}", prefix, self.input.value())
    }

    /// Deliver the result to the callback and the pending future
    pub(super) fn deliver(&mut self, result: &str) {
        debug!(result_len = result.len(), "PromptSession::deliver: called");
        if let Some(callback) = self.callback.take() {
            debug!("PromptSession::deliver: invoking callback");
            callback(result.to_string());
        }
        if let Some(resolver) = self.resolver.take()
            && resolver.send(Ok(result.to_string())).is_err()
        {
            debug!("PromptSession::deliver: pending prompt was dropped by the caller");
        }
    }

    /// Resolve the pending future as cancelled, if still unresolved
    pub(super) fn dismiss(&mut self) {
        self.callback = None;
        if let Some(resolver) = self.resolver.take() {
            debug!("PromptSession::dismiss: resolving as cancelled");
            let _ = resolver.send(Err(PromptError::Cancelled));
        }
    }
}

impl fmt::Debug for PromptSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptSession")
            .field("message", &self.message)
            .field("input_kind", self.input.kind())
            .field("input_len", &self.input.len())
            .field("auxiliary", &self.auxiliary.is_some())
            .field("focus", &self.focus)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
