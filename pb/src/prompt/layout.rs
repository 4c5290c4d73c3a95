//! Prompt geometry
//!
//! Recomputed on open and on every viewport resize. Purely presentational.

use ratatui::layout::{Position, Rect};
use tracing::trace;

use super::request::WidthHint;

/// Box width on viewports at least `wide_breakpoint` columns wide
pub const WIDE_BOX_WIDTH: u16 = 50;

/// Box width on narrower viewports
pub const NARROW_BOX_WIDTH: u16 = 36;

/// Default viewport width separating narrow from wide
pub const DEFAULT_WIDE_BREAKPOINT: u16 = 100;

pub const SEND_LABEL: &str = " Send ";
pub const CANCEL_LABEL: &str = " Cancel ";

/// Clickable parts of the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptButton {
    Send,
    Cancel,
}

/// Screen areas of an open prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PromptLayout {
    /// Full-screen backdrop
    pub overlay: Rect,
    /// Bordered box
    pub front: Rect,
    pub label: Rect,
    pub auxiliary: Option<Rect>,
    pub input: Rect,
    /// Line drawn under the input
    pub underline: Rect,
    pub send_button: Rect,
    pub cancel_button: Rect,
}

impl PromptLayout {
    pub fn compute(viewport: Rect, has_auxiliary: bool, input_width: WidthHint, wide_breakpoint: u16) -> Self {
        trace!(?viewport, has_auxiliary, ?input_width, wide_breakpoint, "PromptLayout::compute: called");
        let box_width = if viewport.width >= wide_breakpoint {
            WIDE_BOX_WIDTH
        } else {
            NARROW_BOX_WIDTH
        }
        .min(viewport.width);

        // border, label, [auxiliary], input, underline, buttons, border
        let box_height = (6 + u16::from(has_auxiliary)).min(viewport.height);

        let front = Rect::new(
            viewport.x + viewport.width.saturating_sub(box_width) / 2,
            viewport.y + viewport.height.saturating_sub(box_height) / 2,
            box_width,
            box_height,
        );

        // One column of border plus one of padding on each side
        let inner_x = front.x.saturating_add(2);
        let inner_width = front.width.saturating_sub(4);
        let row = |offset: u16| front.y.saturating_add(1 + offset);

        let label = Rect::new(inner_x, row(0), inner_width, 1);
        let auxiliary = has_auxiliary.then(|| Rect::new(inner_x, row(1), inner_width, 1));
        let input_row = row(1 + u16::from(has_auxiliary));

        let width = input_width.resolve(inner_width);
        let input_x = inner_x + inner_width.saturating_sub(width) / 2;
        let input = Rect::new(input_x, input_row, width, 1);
        let underline = Rect::new(input_x, input_row.saturating_add(1), width, 1);

        let send_width = SEND_LABEL.len() as u16;
        let cancel_width = CANCEL_LABEL.len() as u16;
        let buttons_width = send_width + 1 + cancel_width;
        let buttons_x = inner_x + inner_width.saturating_sub(buttons_width) / 2;
        let buttons_row = input_row.saturating_add(2);
        let send_button = Rect::new(buttons_x, buttons_row, send_width, 1);
        let cancel_button = Rect::new(buttons_x + send_width + 1, buttons_row, cancel_width, 1);

        Self {
            overlay: viewport,
            front,
            label,
            auxiliary,
            input,
            underline,
            send_button,
            cancel_button,
        }
    }

    /// Which button, if any, is under a screen position
    pub fn button_at(&self, column: u16, row: u16) -> Option<PromptButton> {
        let position = Position::new(column, row);
        if self.send_button.contains(position) {
            Some(PromptButton::Send)
        } else if self.cancel_button.contains(position) {
            Some(PromptButton::Cancel)
        } else {
            None
        }
    }
}
