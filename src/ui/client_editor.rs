use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Client, REGIONS};
use crate::ui::{render_status, StatusLine};

pub enum ClientEditorAction {
    Cancel,
    Save(Client),
}

#[derive(Clone, PartialEq, Copy)]
pub enum EditorField {
    Name,
    Age,
    Region,
}

/// Form state over a loaded record. `id`, `avatar` and `email` pass through
/// to the saved record untouched; the update is always a full replace.
pub struct ClientEditorState {
    client: Client,
    pub name: String,
    pub age: String,
    pub region: String,
    pub current_field: EditorField,
    pub editing: bool,
    pub status: Option<StatusLine>,
}

impl ClientEditorState {
    pub fn from_existing(client: Client) -> Self {
        Self {
            name: client.name.clone(),
            age: client.age.to_string(),
            region: client.region.clone(),
            client,
            current_field: EditorField::Name,
            editing: false,
            status: None,
        }
    }

    pub fn client_id(&self) -> i32 {
        self.client.id
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            EditorField::Name => EditorField::Age,
            EditorField::Age => EditorField::Region,
            EditorField::Region => EditorField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            EditorField::Name => EditorField::Region,
            EditorField::Age => EditorField::Name,
            EditorField::Region => EditorField::Age,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            EditorField::Name => match key {
                KeyCode::Char(c) => {
                    self.name.push(c);
                }
                KeyCode::Backspace => {
                    self.name.pop();
                }
                _ => {}
            },
            EditorField::Age => match key {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    self.age.push(c);
                }
                KeyCode::Backspace => {
                    self.age.pop();
                }
                _ => {}
            },
            EditorField::Region => match key {
                KeyCode::Left => self.cycle_region(-1),
                KeyCode::Right => self.cycle_region(1),
                _ => {}
            },
        }
    }

    // A record loaded with a label outside the enumeration keeps it until
    // the user cycles onto a known one.
    fn cycle_region(&mut self, step: isize) {
        let len = REGIONS.len() as isize;
        let next = match REGIONS.iter().position(|r| r.label == self.region) {
            Some(i) => (i as isize + step).rem_euclid(len),
            None => 0,
        };
        self.region = REGIONS[next as usize].label.to_string();
    }

    /// The full record to send, or `None` while the form is invalid.
    pub fn record(&self) -> Option<Client> {
        if self.name.trim().is_empty() {
            return None;
        }
        let age = self.age.parse().ok()?;

        Some(Client {
            id: self.client.id,
            name: self.name.clone(),
            age,
            region: self.region.clone(),
            avatar: self.client.avatar.clone(),
            email: self.client.email.clone(),
        })
    }
}

pub fn render_client_editor<B: Backend>(f: &mut Frame<B>, state: &mut ClientEditorState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new(format!("Edit Client #{}", state.client_id()))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    render_status(f, state.status.as_ref(), chunks[2]);

    let help_text = if state.editing {
        match state.current_field {
            EditorField::Region => "Left/Right - Choose region | Enter/Esc - Done",
            _ => "Enter - Save field | Esc - Cancel editing",
        }
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save changes | Esc - Back"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut ClientEditorState, area: Rect) {
    let region_value = if state.editing && state.current_field == EditorField::Region {
        format!("< {} >", state.region)
    } else {
        state.region.clone()
    };

    let fields = [
        ("Name", state.name.clone()),
        ("Age", state.age.clone()),
        ("Region", region_value),
    ];

    let items: Vec<ListItem> = fields
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            let content = if i == state.current_field as usize && state.editing {
                Spans::from(vec![
                    Span::styled(
                        format!("{}: ", name),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        format!(
                            "{}{}",
                            value,
                            if state.current_field == EditorField::Region {
                                ""
                            } else {
                                "|"
                            }
                        ),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if i == state.current_field as usize {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", name), style),
                    Span::raw(value.clone()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Client Details"))
        .highlight_style(Style::default().fg(Color::Yellow));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ClientEditorState) -> Result<Option<ClientEditorAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(ClientEditorAction::Cancel));
                }
            }
            KeyCode::Enter => {
                state.toggle_editing();
            }
            KeyCode::Up if !state.editing => {
                state.previous_field();
            }
            KeyCode::Down if !state.editing => {
                state.next_field();
            }
            KeyCode::Char('s') if !state.editing => {
                if let Some(record) = state.record() {
                    return Ok(Some(ClientEditorAction::Save(record)));
                }
            }
            _ if state.editing => {
                state.edit_current_field(key.code);
            }
            _ => {}
        }
    }

    Ok(None)
}
