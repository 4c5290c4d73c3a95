//! TUI views and rendering
//!
//! All rendering logic is contained here. Views draw the host screen and the
//! open prompt from the App, but never modify state.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::trace;

use crate::prompt::{
    AuxiliaryControl, AuxiliaryWidget, CANCEL_LABEL, Focus, InputField, PromptButton, PromptSession, SEND_LABEL, SessionPhase, Theme,
};

use super::app::App;
use super::state::{AnswerOutcome, AppState, HistoryEntry, HostMode};

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const ANSWERED: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const CANCELLED: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const NOTICE_BG: Color = Color::Rgb(255, 215, 0); // Gold
    pub const NOTICE_FG: Color = Color::Black;
    pub const DIM: Color = Color::DarkGray;
}

/// Main render function
pub fn render(app: &App, frame: &mut Frame) {
    let state = app.state();
    let phase = app.controller().phase();
    trace!(?phase, "render: called");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // History
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, phase, frame, chunks[0]);
    render_history(state, frame, chunks[1]);
    render_footer(state, phase, frame, chunks[2]);

    if let Some(session) = app.controller().session() {
        render_prompt(session, frame);
    }

    render_notices(&state.notices, frame, frame.area());
}

fn render_header(state: &AppState, phase: SessionPhase, frame: &mut Frame, area: Rect) {
    trace!("render_header: called");
    let (indicator, indicator_color) = match phase {
        SessionPhase::Closed => ("○", colors::DIM),
        SessionPhase::Open => ("●", colors::ANSWERED),
        SessionPhase::Closing => ("◌", Color::Yellow),
    };
    let mode = match state.mode {
        HostMode::Demo => "demo",
        HostMode::Ask => "ask",
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(indicator, Style::default().fg(indicator_color)),
        Span::styled(
            " promptbox",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::raw(mode),
        Span::styled(format!("  answers: {}", state.history.len()), Style::default().fg(colors::DIM)),
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn history_line(entry: &HistoryEntry) -> Line<'_> {
    let outcome = match &entry.outcome {
        AnswerOutcome::Answered(_) if entry.masked => {
            Span::styled("••••••", Style::default().fg(colors::ANSWERED))
        }
        AnswerOutcome::Answered(value) => Span::styled(value.as_str(), Style::default().fg(colors::ANSWERED)),
        AnswerOutcome::Cancelled => Span::styled("(cancelled)", Style::default().fg(colors::CANCELLED)),
    };
    Line::from(vec![
        Span::raw(" "),
        Span::raw(entry.message.as_str()),
        Span::styled(" → ", Style::default().fg(colors::DIM)),
        outcome,
    ])
}

fn render_history(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!(scroll = state.scroll, "render_history: called");
    let block = Block::default().borders(Borders::ALL).title(" Answers ");

    if state.history.is_empty() {
        let hint = match state.mode {
            HostMode::Demo => "No prompts answered yet. Press n, p or t to open one.",
            HostMode::Ask => "",
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(colors::DIM))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = state.history.iter().skip(state.scroll).map(history_line).collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(state: &AppState, phase: SessionPhase, frame: &mut Frame, area: Rect) {
    trace!("render_footer: called");
    let binds: &[(&str, &str)] = match (phase, state.mode) {
        (SessionPhase::Open, _) => &[
            ("Enter", "send"),
            ("Esc", "cancel"),
            ("Tab", "switch field"),
            ("Ctrl+N", "another prompt"),
        ],
        (_, HostMode::Demo) => &[
            ("n", "name"),
            ("p", "password"),
            ("t", "titled"),
            ("j/k", "scroll"),
            ("q", "quit"),
        ],
        (_, HostMode::Ask) => &[("Ctrl+C", "abort")],
    };

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in binds {
        spans.push(Span::styled(*key, Style::default().fg(colors::KEYBIND)));
        spans.push(Span::raw(format!(" {}  ", action)));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draw the open prompt over the host screen
fn render_prompt(session: &PromptSession, frame: &mut Frame) {
    let screen = frame.area();
    let layout = session.layout();
    let theme = session.theme();
    trace!(?layout.front, "render_prompt: called");

    let clip = |rect: Rect| rect.intersection(screen);

    frame
        .buffer_mut()
        .set_style(clip(layout.overlay), Style::default().add_modifier(Modifier::DIM));

    let front = clip(layout.front);
    frame.render_widget(Clear, front);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.front));
    frame.render_widget(block, front);

    let label = Paragraph::new(session.message()).style(
        Style::default()
            .fg(theme.label)
            .bg(theme.front)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(label, clip(layout.label));

    if let (Some(control), Some(area)) = (session.auxiliary(), layout.auxiliary) {
        let focused = session.focus() == Focus::Auxiliary;
        render_auxiliary(control, focused, theme, frame, clip(area));
    }

    let input_focused = session.focus() == Focus::Input;
    let input_area = clip(layout.input);
    render_field(session.input(), input_focused, theme, frame, input_area);

    let underline_color = if input_focused { theme.input } else { theme.border };
    let underline = "─".repeat(usize::from(layout.underline.width));
    frame.render_widget(
        Paragraph::new(underline).style(Style::default().fg(underline_color).bg(theme.front)),
        clip(layout.underline),
    );

    render_button(
        SEND_LABEL,
        session.hovered() == Some(PromptButton::Send),
        theme,
        frame,
        clip(layout.send_button),
    );
    render_button(
        CANCEL_LABEL,
        session.hovered() == Some(PromptButton::Cancel),
        theme,
        frame,
        clip(layout.cancel_button),
    );
}

/// Draw a text field; places the terminal cursor when focused
fn render_field(field: &InputField, focused: bool, theme: &Theme, frame: &mut Frame, area: Rect) {
    if area.is_empty() {
        return;
    }

    if field.is_empty()
        && let Some(placeholder) = field.placeholder()
    {
        let hint = Paragraph::new(placeholder).style(
            Style::default()
                .fg(colors::DIM)
                .bg(theme.front)
                .add_modifier(Modifier::ITALIC),
        );
        frame.render_widget(hint, area);
        if focused {
            frame.set_cursor_position(Position::new(area.x, area.y));
        }
        return;
    }

    let (text, cursor) = field.visible(area.width);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(theme.input).bg(theme.front)),
        area,
    );
    if focused && !field.is_read_only() {
        let x = area.x.saturating_add(cursor).min(area.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, area.y));
    }
}

fn render_auxiliary(control: &AuxiliaryControl, focused: bool, theme: &Theme, frame: &mut Frame, mut area: Rect) {
    trace!(focused, "render_auxiliary: called");

    if let Some(lead) = control.lead() {
        let style = Style::default()
            .fg(theme.label)
            .bg(theme.front)
            .add_modifier(Modifier::ITALIC);
        // Lead-in alone takes the whole row; before a widget it keeps a gap
        let width = match control.widget() {
            Some(_) => u16::try_from(Span::raw(lead).width())
                .unwrap_or(u16::MAX)
                .saturating_add(1)
                .min(area.width),
            None => area.width,
        };
        frame.render_widget(Paragraph::new(lead).style(style), Rect { width, ..area });
        area = Rect {
            x: area.x.saturating_add(width),
            width: area.width - width,
            ..area
        };
    }
    if area.is_empty() {
        return;
    }

    match control.widget() {
        Some(AuxiliaryWidget::Field(field)) => render_field(field, focused, theme, frame, area),
        Some(AuxiliaryWidget::Select(select)) => {
            let label = select.selected().map(|o| o.label.as_str()).unwrap_or("");
            let mut style = Style::default().fg(theme.input).bg(theme.front);
            if focused {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let line = Line::from(vec![Span::raw("◂ "), Span::raw(label), Span::raw(" ▸")]);
            frame.render_widget(Paragraph::new(line).style(style), area);
        }
        None => {}
    }
}

fn render_button(label: &str, hovered: bool, theme: &Theme, frame: &mut Frame, area: Rect) {
    let bg = if hovered { theme.button_hover } else { theme.button_bg };
    let style = Style::default().fg(theme.button_fg).bg(bg).add_modifier(Modifier::BOLD);
    frame.render_widget(Paragraph::new(label).style(style), area);
}

/// Toasts stacked in the top-right corner
fn render_notices(notices: &[String], frame: &mut Frame, area: Rect) {
    if notices.is_empty() {
        return;
    }
    trace!(count = notices.len(), "render_notices: called");

    for (i, message) in notices.iter().enumerate() {
        let width = u16::try_from(message.chars().count())
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(area.width);
        let row = area
            .y
            .saturating_add(u16::try_from(i).unwrap_or(u16::MAX).saturating_add(1));
        if row >= area.bottom() {
            break;
        }
        let toast = Rect::new(area.right().saturating_sub(width.saturating_add(1)), row, width, 1).intersection(area);
        frame.render_widget(Clear, toast);
        frame.render_widget(
            Paragraph::new(format!("  {}  ", message))
                .style(Style::default().fg(colors::NOTICE_FG).bg(colors::NOTICE_BG)),
            toast,
        );
    }
}
