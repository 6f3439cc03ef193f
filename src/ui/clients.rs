use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::Client;
use crate::ui::{render_status, StatusLine};

// Represents the state of the client list screen
pub struct ClientsState {
    clients: Vec<Client>,
    filter_value: String,
    filtering: bool,
    table_state: TableState,
    show_delete_confirmation: bool,
    status: Option<StatusLine>,
}

impl ClientsState {
    pub fn new(clients: Vec<Client>) -> Self {
        let mut table_state = TableState::default();
        if !clients.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            clients,
            filter_value: String::new(),
            filtering: false,
            table_state,
            show_delete_confirmation: false,
            status: None,
        }
    }

    pub fn with_status(mut self, status: Option<StatusLine>) -> Self {
        self.status = status;
        self
    }

    pub fn set_status(&mut self, status: Option<StatusLine>) {
        self.status = status;
    }

    /// The rows currently visible under the active filter, in load order.
    pub fn visible(&self) -> Vec<&Client> {
        filter_clients(&self.clients, &self.filter_value)
    }

    pub fn next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.table_state
            .selected()
            .and_then(|i| self.visible().get(i).copied())
    }

    pub fn selected_client_id(&self) -> Option<i32> {
        self.selected_client().map(|c| c.id)
    }

    pub fn start_filter(&mut self) {
        self.filtering = true;
    }

    pub fn stop_filter(&mut self) {
        self.filtering = false;
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_value.push(c);
        self.clamp_selection();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_value.pop();
        self.clamp_selection();
    }

    // Selection indexes into the filtered rows, so every filter edit has to
    // pull it back in bounds.
    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        let selection = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(i) if i < len => Some(i),
            _ => Some(0),
        };
        self.table_state.select(selection);
    }
}

/// Subsequence of `clients` whose name contains `query` case-insensitively,
/// in original order. A blank or whitespace-only query yields everything.
pub fn filter_clients<'a>(clients: &'a [Client], query: &str) -> Vec<&'a Client> {
    if query.trim().is_empty() {
        return clients.iter().collect();
    }

    let needle = query.to_lowercase();
    clients
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .collect()
}

pub enum ClientAction {
    Exit,
    NewClient,
    DuplicateClient(Client), // Pre-fills the create screen from this record
    EditClient(i32),         // Contains client_id
    DeleteClient(i32),       // Contains client_id
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, state: &mut ClientsState) {
    let size = frame.size();

    // Create the layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    // Search box
    let search_text = format!(
        "{}{}",
        state.filter_value,
        if state.filtering { "|" } else { "" }
    );
    let search_style = if state.filtering {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(Block::default().title("Search by name").borders(Borders::ALL));
    frame.render_widget(search, chunks[0]);

    // Create and render the clients table
    let visible = filter_clients(&state.clients, &state.filter_value);
    let rows: Vec<Row> = visible
        .iter()
        .map(|client| {
            Row::new(vec![
                Cell::from(client.name.as_str()),
                Cell::from(client.age.to_string()),
                Cell::from(client.region.as_str()),
            ])
        })
        .collect();

    let clients_table = Table::new(rows)
        .header(
            Row::new(vec!["NAME", "AGE", "REGION"])
                .style(Style::default().add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().title("Clients").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Percentage(45),
            Constraint::Percentage(15),
            Constraint::Percentage(40),
        ]);

    frame.render_stateful_widget(clients_table, chunks[1], &mut state.table_state);

    render_status(frame, state.status.as_ref(), chunks[2]);

    // Create and render the buttons
    let buttons_text = if state.filtering {
        "Type to filter | <Enter/Esc> Done".to_string()
    } else if state.selected_client().is_some() {
        "<N> New | <E/Enter> Edit | <C> Duplicate | <D> Delete | </> Filter | <Q> Quit".to_string()
    } else {
        "<N> New | </> Filter | <Q> Quit".to_string()
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[3]);

    // Render delete confirmation popup if needed
    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size);
    }
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Are you sure you want to delete this client?"),
        Spans::from(""),
        Spans::from("The record will be removed from the backend."),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn handle_input(state: &mut ClientsState) -> Result<Option<ClientAction>> {
    if let Event::Key(key) = event::read()? {
        if state.filtering {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => state.stop_filter(),
                KeyCode::Backspace => state.pop_filter_char(),
                KeyCode::Char(c) => state.push_filter_char(c),
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if state.show_delete_confirmation {
                    state.toggle_delete_confirmation();
                } else {
                    return Ok(Some(ClientAction::Exit));
                }
            }
            KeyCode::Char('/') => {
                if !state.show_delete_confirmation {
                    state.start_filter();
                }
            }
            KeyCode::Char('n') => {
                if state.show_delete_confirmation {
                    state.toggle_delete_confirmation();
                } else {
                    return Ok(Some(ClientAction::NewClient));
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if !state.show_delete_confirmation {
                    if let Some(id) = state.selected_client_id() {
                        return Ok(Some(ClientAction::EditClient(id)));
                    }
                }
            }
            KeyCode::Char('c') => {
                if !state.show_delete_confirmation {
                    if let Some(client) = state.selected_client() {
                        return Ok(Some(ClientAction::DuplicateClient(client.clone())));
                    }
                }
            }
            KeyCode::Char('d') => {
                if !state.show_delete_confirmation && state.selected_client().is_some() {
                    state.toggle_delete_confirmation();
                }
            }
            KeyCode::Char('y') => {
                if state.show_delete_confirmation {
                    if let Some(id) = state.selected_client_id() {
                        state.toggle_delete_confirmation();
                        return Ok(Some(ClientAction::DeleteClient(id)));
                    }
                }
            }
            KeyCode::Down => {
                if !state.show_delete_confirmation {
                    state.next();
                }
            }
            KeyCode::Up => {
                if !state.show_delete_confirmation {
                    state.previous();
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i32, name: &str, age: i32, region: &str) -> Client {
        Client {
            id,
            name: name.to_string(),
            age,
            region: region.to_string(),
            avatar: None,
            email: None,
        }
    }

    fn sample() -> Vec<Client> {
        vec![
            record(1, "Ali Ben", 30, "Tunis"),
            record(2, "Sami Trabelsi", 40, "Gafsa"),
            record(3, "Salima Ben Salah", 25, "Kef"),
        ]
    }

    #[test]
    fn blank_query_returns_all_in_order() {
        let clients = sample();
        let visible = filter_clients(&clients, "");
        let ids: Vec<i32> = visible.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn whitespace_query_returns_all() {
        let clients = sample();
        assert_eq!(filter_clients(&clients, "   ").len(), 3);
    }

    #[test]
    fn filter_is_case_insensitive_contains() {
        let clients = sample();
        let visible = filter_clients(&clients, "SALI");
        let ids: Vec<i32> = visible.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3]);

        let visible = filter_clients(&clients, "ben");
        let ids: Vec<i32> = visible.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn filter_without_match_is_empty() {
        let clients = sample();
        assert!(filter_clients(&clients, "xyz").is_empty());
    }

    #[test]
    fn loaded_collection_renders_one_row_per_record() {
        let state = ClientsState::new(vec![record(1, "Ali", 30, "Tunis")]);
        let visible = state.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Ali");
        assert_eq!(visible[0].age, 30);
        assert_eq!(visible[0].region, "Tunis");
    }

    #[test]
    fn selection_tracks_filtered_rows() {
        let mut state = ClientsState::new(sample());
        state.next();
        state.next();
        assert_eq!(state.selected_client_id(), Some(3));

        // Narrowing the filter pulls the selection back in bounds.
        state.push_filter_char('s');
        state.push_filter_char('a');
        state.push_filter_char('m');
        assert_eq!(state.selected_client_id(), Some(2));
    }

    #[test]
    fn selection_clears_when_filter_matches_nothing() {
        let mut state = ClientsState::new(sample());
        state.push_filter_char('z');
        assert_eq!(state.selected_client(), None);

        // Deleting the dead character brings the rows and a selection back.
        state.pop_filter_char();
        assert_eq!(state.selected_client_id(), Some(1));
    }

    #[test]
    fn navigation_wraps_around() {
        let mut state = ClientsState::new(sample());
        state.previous();
        assert_eq!(state.selected_client_id(), Some(3));
        state.next();
        assert_eq!(state.selected_client_id(), Some(1));
    }

    #[test]
    fn empty_collection_has_no_selection() {
        let mut state = ClientsState::new(Vec::new());
        state.next();
        assert_eq!(state.selected_client(), None);
    }
}
