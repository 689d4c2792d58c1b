//! Catalog browser TUI main loop.

mod card;
mod debounce;
/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedSender};

use self::state::{App, BrowseOptions, Effect, Fetched, InputMode, Tab};
use cinetui_api::catalog::{CatalogApi, CatalogClient, DEFAULT_PAGE_SIZE, SearchParams};

/// Timer tick driving the debouncers and the status message expiry.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the catalog browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser(client: CatalogClient, options: BrowseOptions) -> Result<()> {
    let mut app = App::new(options);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, client).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
///
/// Selects over three sources: terminal input, completions of spawned
/// fetch tasks, and the timer tick. Fetches never block the loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: CatalogClient,
) -> Result<()> {
    let client = Arc::new(client);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("failed to draw TUI")?;

        let effects = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    handle_key(app, key.code, key.modifiers, Instant::now())
                }
                Some(Ok(_)) => Vec::new(),
                Some(Err(error)) => {
                    return Err(error).context("failed to read terminal event");
                }
                None => return Ok(()),
            },
            Some(fetched) = rx.recv() => app.handle_fetched(fetched, Instant::now()),
            _ = tick.tick() => app.tick(Instant::now()),
        };

        for effect in effects {
            run_effect(&client, &tx, effect);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Routes a key press, returning any fetch work it produced.
fn handle_key(app: &mut App, key: KeyCode, modifiers: KeyModifiers, now: Instant) -> Vec<Effect> {
    if app.modal_open() {
        return handle_modal_input(app, key);
    }
    if app.input_mode == InputMode::Editing {
        return handle_editing_input(app, key, now);
    }
    handle_normal_input(app, key, modifiers, now)
}

/// Handles key input while the detail overlay is open.
fn handle_modal_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => app.close_modal(),
        KeyCode::Char('f') => return app.toggle_modal_favorite().into_iter().collect(),
        KeyCode::Char('o') => return app.open_modal_link().into_iter().collect(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_modal_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_modal_down(),
        _ => {}
    }
    Vec::new()
}

/// Handles key input while typing a search keyword.
fn handle_editing_input(app: &mut App, key: KeyCode, now: Instant) -> Vec<Effect> {
    match key {
        KeyCode::Esc => app.cancel_search_entry(),
        KeyCode::Enter => return app.submit_search(now).into_iter().collect(),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
    Vec::new()
}

/// Handles key input in normal navigation mode.
fn handle_normal_input(
    app: &mut App,
    key: KeyCode,
    modifiers: KeyModifiers,
    now: Instant,
) -> Vec<Effect> {
    let effect = match key {
        KeyCode::Char('q') => {
            app.quit();
            None
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            None
        }
        KeyCode::Char('1') => app.switch_tab(Tab::Search),
        KeyCode::Char('2') => app.switch_tab(Tab::Top),
        KeyCode::Char('3') => app.switch_tab(Tab::Theaters),
        KeyCode::Char('4') => app.switch_tab(Tab::Favorites),
        KeyCode::Char('5') => app.switch_tab(Tab::Stats),
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),
        KeyCode::Char('/') if app.active_tab == Tab::Search => {
            app.begin_search_entry();
            None
        }
        KeyCode::Char('c') if app.active_tab == Tab::Theaters => {
            app.cycle_city(now);
            None
        }
        KeyCode::Char('s') if app.active_tab == Tab::Favorites => {
            app.cycle_sort(now);
            None
        }
        KeyCode::Char('n') if app.active_tab == Tab::Top => app.top_next_page(),
        KeyCode::Char('p') if app.active_tab == Tab::Top => app.top_prev_page(),
        KeyCode::Right if app.active_tab == Tab::Theaters => {
            app.focus_coming_soon();
            None
        }
        KeyCode::Left if app.active_tab == Tab::Theaters => {
            app.focus_now_playing();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_up();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_down();
            None
        }
        KeyCode::Enter => app.open_selected_detail(),
        _ => None,
    };
    effect.into_iter().collect()
}

/// Spawns the fetch for one effect and wires its completion back into
/// the channel. Every spawned task sends exactly one message.
fn run_effect(client: &Arc<CatalogClient>, tx: &UnboundedSender<Fetched>, effect: Effect) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    match effect {
        Effect::Search { keyword } => {
            tokio::spawn(async move {
                let result = client.search(&SearchParams::new(keyword)).await;
                let _ = tx.send(Fetched::Search(result));
            });
        }
        Effect::LoadTop { page } => {
            tokio::spawn(async move {
                let start = page.saturating_mul(DEFAULT_PAGE_SIZE);
                let result = client.top250(start, DEFAULT_PAGE_SIZE).await;
                let _ = tx.send(Fetched::Top { page, result });
            });
        }
        Effect::LoadTheaters { city } => {
            tokio::spawn(async move {
                let (now_playing, coming_soon) =
                    tokio::join!(client.in_theaters(&city), client.coming_soon());
                let result = now_playing
                    .and_then(|now| coming_soon.map(|soon| (now.movies, soon.movies)));
                let _ = tx.send(Fetched::Theaters(result));
            });
        }
        Effect::LoadFavorites { sort } => {
            tokio::spawn(async move {
                let result = client.favorites(sort).await.map(|r| r.favorites);
                let _ = tx.send(Fetched::Favorites(result));
            });
        }
        Effect::LoadStats => {
            tokio::spawn(async move {
                let result = client.stats().await;
                let _ = tx.send(Fetched::Stats(result));
            });
        }
        Effect::LoadDetail { movie_id } => {
            tokio::spawn(async move {
                let result = client.movie_detail(&movie_id).await;
                let _ = tx.send(Fetched::Detail(result));
            });
        }
        Effect::AddFavorite { movie_id } => {
            tokio::spawn(async move {
                let result = client.add_favorite(&movie_id, None).await;
                let _ = tx.send(Fetched::FavoriteToggled {
                    movie_id,
                    removed: false,
                    result,
                });
            });
        }
        Effect::RemoveFavorite { movie_id } => {
            tokio::spawn(async move {
                let result = client.remove_favorite(&movie_id).await;
                let _ = tx.send(Fetched::FavoriteToggled {
                    movie_id,
                    removed: true,
                    result,
                });
            });
        }
        Effect::OpenLink { url } => {
            let _ = open::that(&url);
        }
    }
}
