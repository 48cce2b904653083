use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::session::Role;
use crate::tui::app::App;
use crate::tui::input::InputMode;

/// Spinner animation frames (Braille pattern)
const SPINNER: &[char] = &['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let selector_height = if app.show_selector { 2 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3),               // Header
            Constraint::Min(5),                  // Chat
            Constraint::Length(3),               // Input
            Constraint::Length(selector_height), // Model / key pool footer
            Constraint::Length(1),               // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_chat(frame, chunks[1], app);
    render_input(frame, chunks[2], app);
    if app.show_selector {
        render_selector(frame, chunks[3], app);
    }
    render_status_bar(frame, chunks[4], app);
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let summary = app.selector.active_summary();
    let header_text = vec![Line::from(vec![
        Span::styled(
            "AI 秘書",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Model: "),
        Span::styled(summary.display_name, Style::default().fg(Color::Green)),
    ])];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// Build the timeline lines, newest last
fn chat_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for msg in app.session.timeline().messages() {
        let (label, color) = match msg.role {
            Role::User => ("You", Color::Blue),
            Role::Assistant => ("Secretary", Color::Green),
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", label),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                msg.created_at.format("%H:%M").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        for line in msg.content.lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::from(""));
    }

    if app.session.is_pending() {
        let frame_char = SPINNER[app.spinner_tick as usize % SPINNER.len()];
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", frame_char),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                app.session.locale().thinking(),
                Style::default()
                    .fg(Color::Rgb(150, 150, 150))
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    lines
}

/// Render the chat area, pinned to the newest message unless scrolled back
fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let paragraph = Paragraph::new(chat_lines(app)).wrap(Wrap { trim: false });

    // Row count comes from the same word wrapper that renders the paragraph
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let rows = u16::try_from(paragraph.line_count(inner_width)).unwrap_or(u16::MAX);
    let max_offset = rows.saturating_sub(inner_height);
    let offset = max_offset.saturating_sub(app.scroll_back);

    let paragraph = paragraph
        .block(
            Block::default()
                .title(" Chat ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .scroll((offset, 0));

    frame.render_widget(paragraph, area);
}

/// Render the input area
fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.session.locale();
    let (text, style, title, border) = match app.input_mode {
        InputMode::Credential => (
            "*".repeat(app.credential_input.chars().count()),
            Style::default().fg(Color::White),
            " API key (Enter to apply, empty = key rotation, Esc to cancel) ",
            Color::Yellow,
        ),
        InputMode::Message if app.session.is_pending() => (
            app.session.draft().to_string(),
            Style::default().fg(Color::DarkGray),
            " Message (waiting for reply) ",
            Color::DarkGray,
        ),
        InputMode::Message if app.session.draft().is_empty() => (
            locale.input_placeholder().to_string(),
            Style::default().fg(Color::DarkGray),
            " Message (Enter to send • Esc to quit) ",
            Color::Blue,
        ),
        InputMode::Message => (
            app.session.draft().to_string(),
            Style::default().fg(Color::White),
            " Message (Enter to send • Esc to quit) ",
            Color::Blue,
        ),
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    );
    frame.render_widget(input, area);

    if !app.session.is_pending() || app.input_mode == InputMode::Credential {
        let typed = match app.input_mode {
            InputMode::Credential => app.credential_input.chars().count(),
            InputMode::Message => Line::from(app.session.draft()).width(),
        };
        let typed = u16::try_from(typed).unwrap_or(u16::MAX);
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(typed)
            .min(area.x + area.width.saturating_sub(2));
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

/// Render the model and key pool footer
fn render_selector(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.session.locale();
    let summary = app.selector.active_summary();
    let has_override = app.selector.selection().override_credential.is_some();

    let key_source = if has_override {
        Span::styled(" | custom key", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ({} keys)", summary.display_name, summary.key_count),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                " | {}: {} | {}: {}",
                locale.strategy_caption(),
                summary.strategy_label,
                locale.keys_caption(),
                summary.key_count
            )),
            key_source,
        ]),
        Line::from(Span::styled(
            locale.memory_hint(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status_text = if let Some(status) = &app.status_message {
        status.clone()
    } else if app.session.is_pending() {
        "Waiting for reply...".to_string()
    } else {
        "Ready".to_string()
    };

    let spans = vec![
        Span::styled(
            " CHAT ",
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(status_text),
        Span::raw(" | "),
        Span::styled("Tab: model", Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled("Ctrl+K: API key", Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled("Ctrl+C: quit", Style::default().fg(Color::DarkGray)),
    ];

    let status_bar = Paragraph::new(vec![Line::from(spans)])
        .style(Style::default().bg(Color::Black))
        .block(Block::default());

    frame.render_widget(status_bar, area);
}
