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

use crate::models::{Client, NewClient, REGIONS};
use crate::ui::{render_status, StatusLine};

pub enum ClientWizardAction {
    Cancel,
    Save(NewClient),
}

/// Values carried from the list screen to pre-populate the form.
///
/// `nom`/`prenom` travel separately when the caller knows them; `name` is
/// the combined display form served by the backend, split on the first
/// whitespace when nothing better is available. `region` is a label,
/// resolved against the static region table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prefill {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub name: Option<String>,
    pub age: Option<String>,
    pub region: Option<String>,
}

impl Prefill {
    /// Parameters for duplicating an existing record into the form.
    pub fn from_record(client: &Client) -> Self {
        Self {
            name: Some(client.name.clone()),
            age: Some(client.age.to_string()),
            region: Some(client.region.clone()),
            ..Default::default()
        }
    }
}

/// Split a combined display name on the first whitespace. The remainder
/// stays intact, so multi-word surnames survive the round trip.
fn split_full_name(name: &str) -> (String, String) {
    match name.trim().split_once(char::is_whitespace) {
        Some((nom, prenom)) => (nom.to_string(), prenom.trim_start().to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}

#[derive(Clone, PartialEq, Copy)]
pub enum WizardField {
    Nom,
    Prenom,
    Age,
    Region,
}

pub struct ClientWizardState {
    pub nom: String,
    pub prenom: String,
    pub age: String,
    pub region: Option<usize>, // index into REGIONS
    pub current_field: WizardField,
    pub editing: bool,
    pub status: Option<StatusLine>,
}

impl ClientWizardState {
    pub fn new() -> Self {
        Self {
            nom: String::new(),
            prenom: String::new(),
            age: String::new(),
            region: None,
            current_field: WizardField::Nom,
            editing: false,
            status: None,
        }
    }

    /// Build the form from navigation parameters. Explicit `nom`/`prenom`
    /// win over the combined name; an unmatched region label leaves the
    /// selection empty.
    pub fn from_params(params: Prefill) -> Self {
        let (split_nom, split_prenom) = params
            .name
            .as_deref()
            .map(split_full_name)
            .unwrap_or_default();

        Self {
            nom: params.nom.unwrap_or(split_nom),
            prenom: params.prenom.unwrap_or(split_prenom),
            age: params.age.unwrap_or_default(),
            region: params
                .region
                .as_deref()
                .and_then(|label| REGIONS.iter().position(|r| r.label == label)),
            current_field: WizardField::Nom,
            editing: false,
            status: None,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            WizardField::Nom => WizardField::Prenom,
            WizardField::Prenom => WizardField::Age,
            WizardField::Age => WizardField::Region,
            WizardField::Region => WizardField::Nom,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            WizardField::Nom => WizardField::Region,
            WizardField::Prenom => WizardField::Nom,
            WizardField::Age => WizardField::Prenom,
            WizardField::Region => WizardField::Age,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            WizardField::Nom => edit_text_field(&mut self.nom, key),
            WizardField::Prenom => edit_text_field(&mut self.prenom, key),
            WizardField::Age => edit_numeric_field(&mut self.age, key),
            WizardField::Region => match key {
                KeyCode::Left => self.cycle_region_previous(),
                KeyCode::Right => self.cycle_region_next(),
                _ => {}
            },
        }
    }

    fn cycle_region_next(&mut self) {
        self.region = Some(match self.region {
            Some(i) => (i + 1) % REGIONS.len(),
            None => 0,
        });
    }

    fn cycle_region_previous(&mut self) {
        self.region = Some(match self.region {
            Some(0) | None => REGIONS.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// Presence-only validation, matching the required inputs of the form.
    pub fn is_valid(&self) -> bool {
        !self.nom.is_empty() && !self.prenom.is_empty() && !self.age.is_empty()
    }

    /// The creation payload in the backend's wire shape.
    pub fn payload(&self) -> NewClient {
        NewClient {
            nom: self.nom.clone(),
            prenom: self.prenom.clone(),
            age: self.age.clone(),
            region_id: self
                .region
                .map(|i| REGIONS[i].id.to_string())
                .unwrap_or_default(),
        }
    }

    fn region_label(&self) -> &'static str {
        self.region.map(|i| REGIONS[i].label).unwrap_or("")
    }
}

fn edit_text_field(value: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) => {
            value.push(c);
        }
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

// Digits only, the widget-level equivalent of a numeric input.
fn edit_numeric_field(value: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() => {
            value.push(c);
        }
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

pub fn render_client_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ClientWizardState) {
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

    let title = Paragraph::new("New Client")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // Form fields
    render_form(f, state, chunks[1]);

    render_status(f, state.status.as_ref(), chunks[2]);

    // Help text
    let help_text = if state.editing {
        match state.current_field {
            WizardField::Region => "Left/Right - Choose region | Enter/Esc - Done",
            _ => "Enter - Save field | Esc - Cancel editing",
        }
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save client | Esc - Cancel"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut ClientWizardState, area: Rect) {
    let region_value = if state.editing && state.current_field == WizardField::Region {
        format!("< {} >", state.region_label())
    } else {
        state.region_label().to_string()
    };

    let fields = [
        ("Nom", state.nom.clone()),
        ("Prenom", state.prenom.clone()),
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
                            if state.current_field == WizardField::Region {
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

pub fn handle_input(state: &mut ClientWizardState) -> Result<Option<ClientWizardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(ClientWizardAction::Cancel));
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
                if state.is_valid() {
                    return Ok(Some(ClientWizardAction::Save(state.payload())));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefill_splits_combined_name_and_resolves_region() {
        let state = ClientWizardState::from_params(Prefill {
            name: Some("Ali Ben".to_string()),
            age: Some("30".to_string()),
            region: Some("Tunis".to_string()),
            ..Default::default()
        });

        assert_eq!(state.nom, "Ali");
        assert_eq!(state.prenom, "Ben");
        assert_eq!(state.age, "30");
        assert_eq!(
            state.payload(),
            NewClient {
                nom: "Ali".to_string(),
                prenom: "Ben".to_string(),
                age: "30".to_string(),
                region_id: "2".to_string(),
            }
        );
    }

    #[test]
    fn prefill_keeps_multiword_surname_intact() {
        let state = ClientWizardState::from_params(Prefill {
            name: Some("Ali Ben Salah".to_string()),
            ..Default::default()
        });

        assert_eq!(state.nom, "Ali");
        assert_eq!(state.prenom, "Ben Salah");
    }

    #[test]
    fn prefill_prefers_explicit_nom_prenom() {
        let state = ClientWizardState::from_params(Prefill {
            nom: Some("Salima".to_string()),
            prenom: Some("Ben Salah".to_string()),
            name: Some("Ignored Name".to_string()),
            ..Default::default()
        });

        assert_eq!(state.nom, "Salima");
        assert_eq!(state.prenom, "Ben Salah");
    }

    #[test]
    fn prefill_with_unknown_region_leaves_selection_empty() {
        let state = ClientWizardState::from_params(Prefill {
            name: Some("Ali Ben".to_string()),
            region: Some("Atlantis".to_string()),
            ..Default::default()
        });

        assert_eq!(state.region, None);
        assert_eq!(state.payload().region_id, "");
    }

    #[test]
    fn prefill_from_record_duplicates_the_row() {
        let client = Client {
            id: 7,
            name: "Sami Trabelsi".to_string(),
            age: 40,
            region: "Gafsa".to_string(),
            avatar: None,
            email: None,
        };

        let state = ClientWizardState::from_params(Prefill::from_record(&client));
        assert_eq!(state.nom, "Sami");
        assert_eq!(state.prenom, "Trabelsi");
        assert_eq!(state.age, "40");
        assert_eq!(state.payload().region_id, "3");
    }

    #[test]
    fn payload_uses_the_wire_field_names() {
        let state = ClientWizardState::from_params(Prefill {
            name: Some("Ali Ben".to_string()),
            age: Some("30".to_string()),
            region: Some("Tunis".to_string()),
            ..Default::default()
        });

        let body = serde_json::to_value(state.payload()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "nom": "Ali",
                "prenom": "Ben",
                "age": "30",
                "ID_region": "2",
            })
        );
    }

    #[test]
    fn validation_requires_presence_only() {
        let mut state = ClientWizardState::new();
        assert!(!state.is_valid());

        state.nom = "Ali".to_string();
        state.prenom = "Ben".to_string();
        assert!(!state.is_valid());

        state.age = "30".to_string();
        assert!(state.is_valid());

        // Region stays optional, as in the original form.
        assert_eq!(state.region, None);
    }

    #[test]
    fn age_field_accepts_digits_only() {
        let mut state = ClientWizardState::new();
        state.current_field = WizardField::Age;
        state.editing = true;

        state.edit_current_field(KeyCode::Char('3'));
        state.edit_current_field(KeyCode::Char('x'));
        state.edit_current_field(KeyCode::Char('0'));
        assert_eq!(state.age, "30");

        state.edit_current_field(KeyCode::Backspace);
        assert_eq!(state.age, "3");
    }

    #[test]
    fn region_cycles_through_the_enumeration() {
        let mut state = ClientWizardState::new();
        state.current_field = WizardField::Region;
        state.editing = true;

        state.edit_current_field(KeyCode::Right);
        assert_eq!(state.payload().region_id, "1");

        state.edit_current_field(KeyCode::Left);
        state.edit_current_field(KeyCode::Left);
        assert_eq!(state.payload().region_id, "4");
    }
}
