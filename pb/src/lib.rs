//! promptbox - modal text prompt for the terminal
//!
//! A prompt in the spirit of `window.prompt`: one labelled input field in a
//! bordered box over a dimmed screen, with Send and Cancel buttons. Results
//! are delivered without blocking, through a future and an optional
//! callback.
//!
//! # Core Concepts
//!
//! - **Single flight**: a controller shows at most one prompt; further
//!   requests are rejected with a notice until the previous one has been
//!   torn down
//! - **Deferred teardown**: a closed prompt disappears at once, but the
//!   controller stays busy for a short close delay
//! - **Auxiliary prefix**: an optional control before the input (text,
//!   select) whose value prefixes the submitted answer
//!
//! # Modules
//!
//! - [`prompt`] - Controller, session, input field and auxiliary controls
//! - [`notice`] - Notifier seam and on-screen notice board
//! - [`tui`] - Terminal host running prompts
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod notice;
pub mod prompt;
pub mod tui;

pub use config::Config;
pub use notice::{LogNotifier, NoticeBoard, Notifier};
pub use prompt::{
    ControllerSettings, OpenOutcome, PendingPrompt, PromptConfig, PromptController, PromptError, PromptRequest,
    SessionPhase, SubmitOutcome,
};
