//! City picker - tui-autocomplete demo
//!
//! The app owns the query and filters a fixed city list itself; the field
//! only shows whatever matches it is handed.
//! - Typing updates the query, matches are recomputed in the reducer
//! - Down/Up (or Ctrl+N/Ctrl+P) move the highlight, Enter picks
//! - Matches are paged in as the list scrolls near its end
//!
//! Keys: / = focus the field, Esc = stop editing, q = quit (while not editing)

use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tui_autocomplete::{
    format_key_for_display, process_raw_event, spawn_event_poller, AutocompleteConfig,
    AutocompleteField, AutocompleteProps, AutocompleteSettings, Component, EndEditing, EventKind,
    FieldKeys, ItemContext, KeySet, Platform, RawEvent, TextInputOptions,
};

const CITIES: &[&str] = &[
    "Amsterdam", "Ankara", "Athens", "Auckland", "Bangkok", "Barcelona", "Beijing", "Belgrade",
    "Berlin", "Bern", "Bogotá", "Bratislava", "Brussels", "Bucharest", "Budapest", "Buenos Aires",
    "Cairo", "Cape Town", "Caracas", "Chicago", "Copenhagen", "Dakar", "Delhi", "Dublin",
    "Edinburgh", "Helsinki", "Istanbul", "Jakarta", "Kyiv", "Lagos", "Lima", "Lisbon",
    "Ljubljana", "London", "Los Angeles", "Madrid", "Manila", "Melbourne", "Mexico City", "Milan",
    "Montreal", "Moscow", "Mumbai", "Nairobi", "Oslo", "Paris", "Porto", "Prague", "Riga", "Rome",
    "Santiago", "São Paulo", "Seoul", "Singapore", "Sofia", "Stockholm", "Sydney", "Tallinn",
    "Tokyo", "Toronto", "Vienna", "Vilnius", "Warsaw", "Zagreb", "Zürich",
];

const PAGE_SIZE: usize = 8;

#[derive(Parser, Debug)]
#[command(name = "city-picker")]
#[command(about = "Pick a city with the tui-autocomplete field")]
struct Args {
    /// Style variant: android (inline list) or ios (overlay list)
    #[arg(long, short)]
    platform: Option<Platform>,

    /// JSON settings file for the field
    #[arg(long, short)]
    settings: Option<PathBuf>,

    /// Never show the suggestion list
    #[arg(long)]
    hide_results: bool,
}

// ============================================================================
// State
// ============================================================================

#[derive(Default)]
struct AppState {
    query: String,
    /// Every city matching the query
    all_matches: Vec<String>,
    /// The page of matches handed to the field
    shown: Rc<Vec<String>>,
    picked: Option<String>,
    results_visible: bool,
    status: String,
}

impl AppState {
    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.all_matches = if needle.is_empty() {
            Vec::new()
        } else {
            CITIES
                .iter()
                .filter(|city| city.to_lowercase().contains(&needle))
                .map(|city| city.to_string())
                .collect()
        };
        self.shown = Rc::new(self.all_matches.iter().take(PAGE_SIZE).cloned().collect());
    }
}

// ============================================================================
// Actions and reducer
// ============================================================================

#[derive(Debug, Clone)]
enum AppAction {
    Query(String),
    Pick(usize),
    Submit(String),
    EndEditing(EndEditing),
    ShowResults(bool),
    LoadMore(usize),
    Quit,
}

/// Apply an action, returning whether the screen needs a redraw
fn reducer(state: &mut AppState, action: AppAction) -> bool {
    match action {
        AppAction::Query(query) => {
            state.query = query;
            state.refilter();
            true
        }
        AppAction::Pick(index) => {
            let Some(city) = state.shown.get(index).cloned() else {
                return false;
            };
            state.status = format!("Picked {city}");
            state.query = city.clone();
            state.picked = Some(city);
            state.refilter();
            true
        }
        AppAction::Submit(text) => {
            state.status = format!("Submitted {text:?}");
            true
        }
        AppAction::EndEditing(end) => {
            state.status = format!("Editing ended ({:?}) with {:?}", end.reason, end.text);
            true
        }
        AppAction::ShowResults(visible) => {
            let changed = state.results_visible != visible;
            state.results_visible = visible;
            changed
        }
        AppAction::LoadMore(shown) => {
            if shown >= state.all_matches.len() {
                return false;
            }
            let end = (shown + PAGE_SIZE).min(state.all_matches.len());
            tracing::debug!(shown, end, "loading more matches");
            state.shown = Rc::new(state.all_matches[..end].to_vec());
            true
        }
        AppAction::Quit => false,
    }
}

// ============================================================================
// Field setup
// ============================================================================

fn build_field(args: &Args) -> io::Result<AutocompleteField<Vec<String>, AppAction>> {
    let mut settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            AutocompleteSettings::from_json(&json).map_err(io::Error::other)?
        }
        None => AutocompleteSettings {
            input: TextInputOptions {
                placeholder: "Type a city…".into(),
                auto_focus: true,
                ..Default::default()
            },
            ..Default::default()
        },
    };
    settings.hide_results |= args.hide_results;

    let config = AutocompleteConfig::builder()
        .settings(settings)
        .key_extractor(|city: &String, _| city.clone())
        .render_item(|city: &String, ctx: ItemContext| {
            let marker = if ctx.highlighted { "› " } else { "  " };
            Line::from(vec![Span::raw(marker), Span::raw(city.clone())])
        })
        .on_change_text(AppAction::Query)
        .on_select(AppAction::Pick)
        .on_submit_editing(AppAction::Submit)
        .on_end_editing(AppAction::EndEditing)
        .on_show_results(AppAction::ShowResults)
        .on_end_reached(AppAction::LoadMore)
        .build()
        .map_err(io::Error::other)?;

    if let Some(platform) = args.platform {
        if let Err(current) = Platform::select(platform) {
            tracing::warn!(requested = platform.name(), current = current.name(), "platform already selected");
        }
    }
    Ok(AutocompleteField::new(config, Rc::new(Vec::new())))
}

/// First binding of a key set, formatted for the help line
fn key_hint(keys: &KeySet) -> String {
    keys.first()
        .map(|binding| format_key_for_display(binding.source()))
        .unwrap_or_else(|| "-".to_string())
}

fn help_line(keys: &FieldKeys) -> String {
    format!(
        " /: edit  {}/{}: move  {}: pick  Esc: stop editing  q: quit",
        key_hint(&keys.next),
        key_hint(&keys.previous),
        key_hint(&keys.accept),
    )
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let field = build_field(&args)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, field).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut field: AutocompleteField<Vec<String>, AppAction>,
) -> io::Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let mut state = AppState::default();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
    let cancel_token = CancellationToken::new();
    let _handle = spawn_event_poller(
        event_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel_token.clone(),
    );

    let mut should_render = true;

    loop {
        if should_render {
            terminal.draw(|frame| {
                let [title, body, status] = Layout::vertical([
                    Constraint::Length(1),
                    Constraint::Fill(1),
                    Constraint::Length(1),
                ])
                .areas(frame.area());

                frame.render_widget(
                    Paragraph::new(format!(" City picker ({})", field.platform().name()))
                        .style(Style::default().fg(Color::Cyan)),
                    title,
                );
                let help = if state.status.is_empty() {
                    help_line(&field.config().keys)
                } else {
                    format!(" {}", state.status)
                };
                frame.render_widget(
                    Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
                    status,
                );

                // Drawn last so an overlay list covers the status line
                let props = AutocompleteProps {
                    data: Rc::clone(&state.shown),
                    value: &state.query,
                };
                field.render(frame, body, props);
            })?;
            should_render = false;

            for action in field.drain_actions() {
                let _ = action_tx.send(action);
            }
        }

        tokio::select! {
            Some(raw_event) = event_rx.recv() => {
                let event = process_raw_event(raw_event);

                if let EventKind::Key(key) = &event {
                    let quit = key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL);
                    if quit || (!field.is_focused() && key.code == KeyCode::Char('q')) {
                        let _ = action_tx.send(AppAction::Quit);
                        continue;
                    }
                    if !field.is_focused() && key.code == KeyCode::Char('/') {
                        field.focus();
                        should_render = true;
                        continue;
                    }
                }
                if matches!(event, EventKind::Resize(..)) {
                    should_render = true;
                }

                let props = AutocompleteProps {
                    data: Rc::clone(&state.shown),
                    value: &state.query,
                };
                for action in field.handle_event(&event, props) {
                    let _ = action_tx.send(action);
                }
                // Cursor and highlight live in the field
                should_render = true;
            }

            Some(action) = action_rx.recv() => {
                if matches!(action, AppAction::Quit) {
                    break;
                }
                should_render |= reducer(&mut state, action);
            }
        }
    }

    cancel_token.cancel();
    Ok(())
}
