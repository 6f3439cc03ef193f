use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use client_admin::api::ApiClient;
use client_admin::config;
use client_admin::ui::{
    self,
    client_editor::{
        handle_input as handle_client_editor_input, render_client_editor, ClientEditorAction,
        ClientEditorState,
    },
    client_wizard::{
        handle_input as handle_client_wizard_input, render_client_wizard, ClientWizardAction,
        ClientWizardState, Prefill,
    },
    clients::{handle_input as handle_clients_input, render_clients, ClientAction, ClientsState},
    StatusLine,
};

#[derive(Parser)]
#[command(name = "client-admin", about = "Terminal front-end for the client records backend")]
struct Args {
    /// Override the backend base URL from configuration
    #[arg(long)]
    base_url: Option<String>,
}

// Represents the current screen in the app
enum AppScreen {
    Clients,
    ClientWizard,
    ClientEditor(i32), // Contains client_id
}

// Main application state
struct AppState {
    api: ApiClient,
    screen: AppScreen,
    clients_state: Option<ClientsState>,
    client_wizard_state: Option<ClientWizardState>,
    client_editor_state: Option<ClientEditorState>,
}

impl AppState {
    fn new(api: ApiClient) -> Self {
        Self {
            api,
            screen: AppScreen::Clients,
            clients_state: None,
            client_wizard_state: None,
            client_editor_state: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = config::init()?;
    if let Some(base_url) = args.base_url {
        config.api_base_url = base_url;
    }

    let api = ApiClient::new(&config)?;
    println!("Connecting to backend at {}...", api.base_url());

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state; the client list is fetched on the first pass
    // through the loop, after a loading frame has been drawn
    let mut app_state = AppState::new(api);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| {
            match app_state.screen {
                AppScreen::Clients => {
                    if let Some(state) = &mut app_state.clients_state {
                        render_clients(f, state);
                    } else {
                        ui::render_loading(f);
                    }
                }
                AppScreen::ClientWizard => {
                    if let Some(state) = &mut app_state.client_wizard_state {
                        render_client_wizard(f, state);
                    }
                }
                AppScreen::ClientEditor(_) => {
                    if let Some(state) = &mut app_state.client_editor_state {
                        render_client_editor(f, state);
                    } else {
                        ui::render_loading(f);
                    }
                }
            }
        })?;

        // Load the current screen's data if it is still pending, otherwise
        // handle input for it
        let should_quit = match app_state.screen {
            AppScreen::Clients => {
                if app_state.clients_state.is_none() {
                    load_clients_screen(app_state, None).await?;
                    false
                } else {
                    handle_clients_screen(app_state).await?
                }
            }
            AppScreen::ClientWizard => handle_client_wizard_screen(app_state).await?,
            AppScreen::ClientEditor(client_id) => {
                if app_state.client_editor_state.is_none() {
                    load_client_editor_screen(app_state, client_id).await?;
                    false
                } else {
                    handle_client_editor_screen(app_state).await?
                }
            }
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

async fn load_clients_screen(app_state: &mut AppState, status: Option<StatusLine>) -> Result<()> {
    // A failed fetch still materializes the screen; the error lands in the
    // status line
    let state = match app_state.api.list_clients().await {
        Ok(clients) => ClientsState::new(clients).with_status(status),
        Err(err) => {
            log::error!("failed to load clients: {err}");
            ClientsState::new(Vec::new()).with_status(Some(StatusLine::error(format!(
                "Failed to load clients: {err}"
            ))))
        }
    };

    app_state.clients_state = Some(state);
    app_state.screen = AppScreen::Clients;

    Ok(())
}

async fn handle_clients_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.clients_state {
        match handle_clients_input(state)? {
            Some(ClientAction::Exit) => {
                return Ok(true);
            }
            Some(ClientAction::NewClient) => {
                app_state.client_wizard_state = Some(ClientWizardState::new());
                app_state.screen = AppScreen::ClientWizard;
            }
            Some(ClientAction::DuplicateClient(client)) => {
                app_state.client_wizard_state =
                    Some(ClientWizardState::from_params(Prefill::from_record(&client)));
                app_state.screen = AppScreen::ClientWizard;
            }
            Some(ClientAction::EditClient(client_id)) => {
                // The record itself is fetched on the next pass through the
                // loop, behind a loading frame
                app_state.client_editor_state = None;
                app_state.screen = AppScreen::ClientEditor(client_id);
            }
            Some(ClientAction::DeleteClient(client_id)) => {
                match app_state.api.delete_client(client_id).await {
                    Ok(()) => {
                        // Re-fetch the collection; no optimistic local removal
                        load_clients_screen(
                            app_state,
                            Some(StatusLine::info("Client deleted successfully")),
                        )
                        .await?;
                    }
                    Err(err) => {
                        log::error!("failed to delete client {client_id}: {err}");
                        state.set_status(Some(StatusLine::error(format!(
                            "Failed to delete client {client_id}: {err}"
                        ))));
                    }
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn load_client_editor_screen(app_state: &mut AppState, client_id: i32) -> Result<()> {
    match app_state.api.get_client(client_id).await {
        Ok(client) => {
            app_state.client_editor_state = Some(ClientEditorState::from_existing(client));
        }
        Err(err) => {
            // Fall back to the list rather than a screen that can never load
            log::error!("failed to load client {client_id}: {err}");
            load_clients_screen(
                app_state,
                Some(StatusLine::error(format!(
                    "Failed to load client {client_id}: {err}"
                ))),
            )
            .await?;
        }
    }

    Ok(())
}

async fn handle_client_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.client_wizard_state {
        match handle_client_wizard_input(state)? {
            Some(ClientWizardAction::Cancel) => {
                // Go back to the client list
                load_clients_screen(app_state, None).await?;
            }
            Some(ClientWizardAction::Save(input)) => {
                match app_state.api.create_client(&input).await {
                    Ok(()) => {
                        load_clients_screen(
                            app_state,
                            Some(StatusLine::info("Client added successfully")),
                        )
                        .await?;
                    }
                    Err(err) => {
                        // Stay on the form; nothing typed is lost
                        log::error!("failed to create client: {err}");
                        state.status = Some(StatusLine::error(format!(
                            "Failed to create client: {err}"
                        )));
                    }
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_client_editor_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.client_editor_state {
        match handle_client_editor_input(state)? {
            Some(ClientEditorAction::Cancel) => {
                // Go back to the client list
                load_clients_screen(app_state, None).await?;
            }
            Some(ClientEditorAction::Save(record)) => {
                match app_state.api.update_client(&record).await {
                    Ok(()) => {
                        load_clients_screen(
                            app_state,
                            Some(StatusLine::info("Client updated successfully")),
                        )
                        .await?;
                    }
                    Err(err) => {
                        log::error!("failed to update client {}: {err}", record.id);
                        state.status = Some(StatusLine::error(format!(
                            "Failed to update client: {err}"
                        )));
                    }
                }
            }
            None => {}
        }
    }

    Ok(false)
}
