//! Jotter TUI
//!
//! Terminal user interface over the annotation store.
//!
//! ## Layout
//!
//! Three-pane layout:
//! - Left: Texts (the log, newest first)
//! - Middle: Favorites
//! - Right: Important
//!
//! A ★ marks texts and favorites whose source text is important.
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - h/l or ←/→: Switch focus between panes
//! - Tab: Cycle through panes
//! - g/G: Jump to first/last
//! - q: Quit
//!
//! ## Commands
//!
//! - a: Record a text
//! - f: Add the selected text to favorites
//! - s: Toggle important for the selected text or favorite
//! - i: Mark the selected text or favorite important
//! - d: Delete / remove the selected entry (asks y/n)
//! - C: Clear the focused pane (asks y/n)
//! - e: Export texts
//! - y: Copy the selected entry
//! - ?: Help

mod app;
mod surface;
mod ui;

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::{debug, info};

use jotter_core::{
    Collection, Config, DestructiveAction, JsonFilePersistence, Outcome, Persistence, Store,
};

use app::{ActivePane, App, InputMode};
use surface::TuiUi;

type TuiStore<P> = Store<P, TuiUi>;

/// Run the TUI application
pub fn run(config: &Config) -> Result<()> {
    let mut store = Store::open(
        JsonFilePersistence::from_config(config),
        TuiUi::new(config.export_dir()),
        config.into(),
    );
    info!("TUI started with data in {:?}", config.data_dir);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new();

    // Run app
    let result = run_app(&mut terminal, &mut app, &mut store);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_app<B: Backend, P: Persistence>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &mut TuiStore<P>,
) -> Result<()> {
    loop {
        // Check for status message timeout
        store.ui_mut().check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app, store.ui()))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            // Only handle key press events (not release)
            if key.kind != KeyEventKind::Press {
                continue;
            }

            handle_key(app, store, key.code, key.modifiers);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Dispatch one key press by input mode
fn handle_key<P: Persistence>(
    app: &mut App,
    store: &mut TuiStore<P>,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    // If help is showing, any key dismisses it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, store, code, modifiers),
        InputMode::Insert => handle_insert_mode(app, store, code, modifiers),
        InputMode::Confirm => handle_confirm_mode(app, store, code),
    }

    app.clamp_selection(store.ui());
}

/// Handle key events in normal mode
fn handle_normal_mode<P: Persistence>(
    app: &mut App,
    store: &mut TuiStore<P>,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    let collection = app.active_pane.collection();
    let selected = app.current_id(store.ui());

    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(store.ui()),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.prev_pane(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.next_pane(),
        KeyCode::Char('g') => app.move_to_first(),
        KeyCode::Char('G') => app.move_to_last(store.ui()),

        // Record a text
        KeyCode::Char('a') => {
            app.enter_insert_mode();
        }

        KeyCode::Char('f') => match (app.active_pane, selected) {
            (ActivePane::Texts, Some(id)) => {
                store.add_to_favorites(id);
            }
            (ActivePane::Texts, None) => {}
            _ => store.ui_mut().set_status("Select a text to favorite"),
        },

        KeyCode::Char('s') => {
            if let Some(id) = selected {
                match app.active_pane {
                    ActivePane::Texts => {
                        store.toggle_important(id);
                    }
                    ActivePane::Favorites => {
                        store.toggle_favorite_important(id);
                    }
                    ActivePane::Important => {
                        // Unmarking from here acts on the source text
                        let origin = store.get(Collection::Important, id).map(|e| e.origin());
                        if let Some(origin) = origin {
                            store.toggle_important(origin);
                        }
                    }
                }
            }
        }

        KeyCode::Char('i') => {
            if let Some(id) = selected {
                match app.active_pane {
                    ActivePane::Texts => {
                        store.add_to_important(id);
                    }
                    ActivePane::Favorites => {
                        store.add_favorite_to_important(id);
                    }
                    ActivePane::Important => {}
                }
            }
        }

        KeyCode::Char('d') => {
            if let Some(id) = selected {
                let action = match app.active_pane {
                    ActivePane::Texts => DestructiveAction::DeletePrimary(id),
                    ActivePane::Favorites => DestructiveAction::RemoveFavorite(id),
                    ActivePane::Important => DestructiveAction::RemoveImportant(id),
                };
                ask(app, store, action);
            }
        }

        KeyCode::Char('C') => {
            ask(app, store, DestructiveAction::Clear(collection));
        }

        KeyCode::Char('e') => {
            store.export_primary();
        }

        KeyCode::Char('y') => {
            if let Some(id) = selected {
                store.copy_entry(collection, id);
            }
        }

        // Help
        KeyCode::Char('?') => {
            app.toggle_help();
        }

        _ => {}
    }
}

/// Start a two-phase confirmation; nothing changes until y is pressed
fn ask<P: Persistence>(app: &mut App, store: &mut TuiStore<P>, action: DestructiveAction) {
    match store.request_confirmation(action) {
        Ok(request) => app.begin_confirmation(request),
        Err(outcome) => debug!("No confirmation needed for {:?}: {:?}", action, outcome),
    }
}

/// Handle key events while typing a new text
fn handle_insert_mode<P: Persistence>(
    app: &mut App,
    store: &mut TuiStore<P>,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    match code {
        // Cancel input, keeping the draft
        KeyCode::Esc => {
            app.exit_input_mode();
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.exit_input_mode();
        }

        // Record the text
        KeyCode::Enter => {
            let content = store.ui().input.clone();
            if let Outcome::Added { .. } = store.add_primary(&content) {
                app.exit_input_mode();
                app.active_pane = ActivePane::Texts;
                app.move_to_first();
            }
        }

        // Text input
        KeyCode::Char(c) => store.ui_mut().insert_char(c),
        KeyCode::Backspace => store.ui_mut().delete_char(),
        KeyCode::Left => store.ui_mut().cursor_left(),
        KeyCode::Right => store.ui_mut().cursor_right(),

        _ => {}
    }
}

/// Handle the y/n answer to a pending confirmation
fn handle_confirm_mode<P: Persistence>(app: &mut App, store: &mut TuiStore<P>, code: KeyCode) {
    let Some(request) = app.pending_confirmation.take() else {
        app.exit_input_mode();
        return;
    };

    let accepted = matches!(code, KeyCode::Char('y') | KeyCode::Char('Y'));
    if let Outcome::Declined = store.resolve_confirmation(request.token, accepted) {
        store.ui_mut().set_status("Cancelled");
    }
    app.exit_input_mode();
}
