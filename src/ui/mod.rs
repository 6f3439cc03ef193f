pub mod client_editor;
pub mod client_wizard;
pub mod clients;

use tui::{
    backend::Backend,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Outcome of the last backend call, shown in a one-line gutter on the
/// active screen. Every screen surfaces failures through this; nothing is
/// log-only from the user's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusLine {
    Info(String),
    Error(String),
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        StatusLine::Info(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusLine::Error(text.into())
    }
}

/// Render the status gutter for a screen. An empty paragraph keeps the
/// layout stable when there is nothing to report.
pub fn render_status<B: Backend>(frame: &mut Frame<B>, status: Option<&StatusLine>, area: Rect) {
    let (text, style) = match status {
        Some(StatusLine::Info(text)) => (text.as_str(), Style::default().fg(Color::Green)),
        Some(StatusLine::Error(text)) => (text.as_str(), Style::default().fg(Color::Red)),
        None => ("", Style::default()),
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

/// Placeholder frame shown while a screen's state is still being fetched.
pub fn render_loading<B: Backend>(frame: &mut Frame<B>) {
    let paragraph = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, frame.size());
}
