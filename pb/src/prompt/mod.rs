//! Modal text prompt
//!
//! A [`PromptController`] shows at most one prompt at a time. Opening a
//! prompt returns a [`PendingPrompt`] future that resolves with the entered
//! text (prefixed by the auxiliary control's value, if any), or with
//! [`PromptError::Cancelled`] when the user dismisses it.

mod auxiliary;
mod controller;
mod error;
mod field;
mod layout;
mod request;
mod session;
mod theme;

pub use auxiliary::{AuxiliaryControl, AuxiliaryWidget, SelectControl, SelectOption};
pub use controller::{
    ControllerSettings, DEFAULT_CLOSE_DELAY, DEFAULT_PENDING_NOTICE, EventOutcome, OpenOutcome, PendingPrompt,
    PromptController, SessionPhase, SubmitOutcome,
};
pub use error::PromptError;
pub use field::{FieldOptions, InputField, MASK_CHAR};
pub use layout::{CANCEL_LABEL, DEFAULT_WIDE_BREAKPOINT, PromptButton, PromptLayout, SEND_LABEL};
pub use request::{InputKind, PromptConfig, PromptRequest, ResultSink, WidthHint};
pub use session::{Focus, PromptSession};
pub use theme::{Theme, ThemeConfig, ThemeOverrides, parse_color};
