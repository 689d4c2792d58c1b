//! TUI rendering logic for the catalog browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};

use cinetui_api::catalog::{Movie, StatsResponse};

use super::card::{MovieCard, fmt_num, short_date};
use super::state::{App, DetailModal, InputMode, Tab, TheaterPane};

/// Number of genre rows shown in the stats ranking.
const TOP_GENRES_SHOWN: usize = 10;

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tab bar
            Constraint::Min(5),    // active panel
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_tab_bar(frame, chunks[0], app);
    match app.active_tab {
        Tab::Search => draw_search(frame, chunks[1], app),
        Tab::Top => draw_top(frame, chunks[1], app),
        Tab::Theaters => draw_theaters(frame, chunks[1], app),
        Tab::Favorites => draw_favorites(frame, chunks[1], app),
        Tab::Stats => draw_stats(frame, chunks[1], app),
    }
    draw_footer(frame, chunks[2], app);

    if app.modal_open() {
        draw_detail_overlay(frame, app);
    }
}

/// Draws the tab bar.
fn draw_tab_bar(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" cinetui "));
    frame.render_widget(tabs, area);
}

/// Draws the search tab: keyword box and result list.
#[allow(clippy::indexing_slicing)]
fn draw_search(frame: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let input_style = if app.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(app.search_input.clone())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Keyword: / "));
    frame.render_widget(input, chunks[0]);

    let body = chunks[1];
    if app.search.loading {
        placeholder(frame, body, String::from(" Results "), "Searching...", true);
    } else if let Some(message) = &app.search.message {
        let mut lines = vec![Line::from(message.clone())];
        for hint in app.search.hints {
            lines.push(Line::from(*hint));
        }
        let notice = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Results "));
        frame.render_widget(notice, body);
    } else if app.search.movies.is_empty() {
        placeholder(
            frame,
            body,
            String::from(" Results "),
            "Press / to type a keyword, then Enter to search.",
            true,
        );
    } else {
        let title = format!(
            " Results: {} found, showing {} ",
            app.search.total,
            app.search.movies.len()
        );
        let table = movie_table(&app.search.movies, title, true);
        frame.render_stateful_widget(table, body, &mut app.search.table);
    }
}

/// Draws the Top 250 tab: ranking table and pager line.
#[allow(clippy::indexing_slicing)]
fn draw_top(frame: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(area);

    if app.top.movies.is_empty() {
        let text = if app.top.loading || !app.top.loaded {
            "Loading Top 250..."
        } else {
            "Nothing here."
        };
        placeholder(frame, chunks[0], String::from(" Top 250 "), text, true);
    } else {
        let title = format!(" Top 250: page {} ", app.top.page.saturating_add(1));
        let table = movie_table(&app.top.movies, title, true);
        frame.render_stateful_widget(table, chunks[0], &mut app.top.table);
    }

    let enabled = Style::default().fg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);
    let pager = Line::from(vec![
        Span::styled(
            "[p] prev page",
            if app.top.has_prev() { enabled } else { disabled },
        ),
        Span::raw("   "),
        Span::styled(
            "[n] next page",
            if app.top.has_next() { enabled } else { disabled },
        ),
    ]);
    frame.render_widget(Paragraph::new(pager), chunks[1]);
}

/// Render state of one theater pane.
#[derive(Clone, Copy, PartialEq, Eq)]
enum PaneBody {
    /// The listing pair failed to load.
    Failed,
    /// A load is in flight (or none has finished yet).
    Loading,
    /// Loaded, but the backend listed nothing.
    Empty,
    /// Movies on screen.
    List,
}

const fn pane_body(failed: bool, loading: bool, loaded: bool, len: usize) -> PaneBody {
    if failed {
        PaneBody::Failed
    } else if len == 0 && (loading || !loaded) {
        PaneBody::Loading
    } else if len == 0 {
        PaneBody::Empty
    } else {
        PaneBody::List
    }
}

/// Draws the theaters tab: now-playing and coming-soon panes.
#[allow(clippy::indexing_slicing)]
fn draw_theaters(frame: &mut Frame, area: Rect, app: &mut App) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let now_body = pane_body(
        app.theaters.failed,
        app.theaters.loading,
        app.theaters.loaded,
        app.theaters.now_playing.len(),
    );
    draw_theater_pane(
        frame,
        panes[0],
        format!(" Now Playing: {} ", app.theaters.city),
        &app.theaters.now_playing,
        &mut app.theaters.now_table,
        app.theaters.pane == TheaterPane::NowPlaying,
        now_body,
    );

    let soon_body = pane_body(
        app.theaters.failed,
        app.theaters.loading,
        app.theaters.loaded,
        app.theaters.coming_soon.len(),
    );
    draw_theater_pane(
        frame,
        panes[1],
        String::from(" Coming Soon "),
        &app.theaters.coming_soon,
        &mut app.theaters.soon_table,
        app.theaters.pane == TheaterPane::ComingSoon,
        soon_body,
    );
}

/// Draws one theater pane in the given body state.
fn draw_theater_pane(
    frame: &mut Frame,
    area: Rect,
    title: String,
    movies: &[Movie],
    state: &mut TableState,
    focused: bool,
    body: PaneBody,
) {
    match body {
        PaneBody::Failed => placeholder(frame, area, title, "Failed to load listings.", focused),
        PaneBody::Loading => placeholder(frame, area, title, "Loading...", focused),
        PaneBody::Empty => placeholder(frame, area, title, "No movies listed.", focused),
        PaneBody::List => {
            let table = movie_table(movies, title, focused);
            frame.render_stateful_widget(table, area, state);
        }
    }
}

/// Draws the favorites tab.
fn draw_favorites(frame: &mut Frame, area: Rect, app: &mut App) {
    let title = format!(" Favorites (sort: {}) ", app.favorites.sort);

    if app.favorites.entries.is_empty() {
        if app.favorites.loaded && !app.favorites.loading {
            placeholder(
                frame,
                area,
                title,
                "No favorites yet. Press f on a movie's details to add one.",
                true,
            );
        } else {
            placeholder(frame, area, title, "Loading favorites...", true);
        }
        return;
    }

    let header = Row::new(vec!["Title", "Rating", "Year", "Added", "Note"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .favorites
        .entries
        .iter()
        .map(|entry| {
            let card = MovieCard::from_movie(&entry.movie);
            Row::new(vec![
                card.title,
                card.rating,
                card.year,
                short_date(&entry.added_at),
                entry.note.clone(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(22),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut app.favorites.table);
}

/// Draws the stats tab.
fn draw_stats(frame: &mut Frame, area: Rect, app: &App) {
    let title = String::from(" Stats ");
    if let Some(error) = &app.stats.error {
        placeholder(frame, area, title, error, true);
        return;
    }
    let Some(stats) = &app.stats.stats else {
        placeholder(frame, area, title, "Loading stats...", true);
        return;
    };
    if let Some(message) = &stats.message {
        placeholder(frame, area, title, message, true);
        return;
    }
    draw_stats_loaded(frame, area, stats);
}

/// Draws the loaded stats: summary cards, genre ranking, and recent
/// searches.
#[allow(clippy::indexing_slicing)]
fn draw_stats_loaded(frame: &mut Frame, area: Rect, stats: &StatsResponse) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(4)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(chunks[0]);

    stat_card(frame, cards[0], " Favorites ", fmt_num(stats.total_favorites));
    stat_card(
        frame,
        cards[1],
        " Average rating ",
        format!("{:.2}", stats.average_rating),
    );
    stat_card(frame, cards[2], " Searches ", fmt_num(stats.total_searches));

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let genre_lines: Vec<Line> = stats
        .top_genres(TOP_GENRES_SHOWN)
        .into_iter()
        .map(|(name, count)| Line::from(format!("{name}: {count}")))
        .collect();
    let genres = Paragraph::new(genre_lines)
        .block(Block::default().borders(Borders::ALL).title(" Top genres "));
    frame.render_widget(genres, bottom[0]);

    let search_lines: Vec<Line> = if stats.recent_searches.is_empty() {
        vec![Line::from("No searches recorded.")]
    } else {
        stats
            .recent_searches
            .iter()
            .map(|record| {
                Line::from(format!(
                    "{}  ({} results)  {}",
                    record.keyword,
                    record.results_count,
                    short_date(&record.timestamp)
                ))
            })
            .collect()
    };
    let searches = Paragraph::new(search_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recent searches "),
    );
    frame.render_widget(searches, bottom[1]);
}

/// Draws one headline number.
fn stat_card(frame: &mut Frame, area: Rect, title: &'static str, value: String) {
    let card = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(card, area);
}

/// Draws the footer with the status message or key hints.
fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = if let Some(status) = app.status_line() {
        Line::from(Span::styled(
            status.to_owned(),
            Style::default().fg(Color::Yellow),
        ))
    } else if app.modal_open() {
        Line::from("\u{2191}\u{2193}/j/k: scroll  f: favorite  o: open page  Esc: close")
    } else if app.input_mode == InputMode::Editing {
        Line::from("Type keyword | Esc: cancel | Enter: search")
    } else {
        match app.active_tab {
            Tab::Search => Line::from(
                "/: keyword  \u{2191}\u{2193}/j/k: move  Enter: details  Tab/1-5: tabs  q: quit",
            ),
            Tab::Top => Line::from(
                "n/p: page  \u{2191}\u{2193}/j/k: move  Enter: details  Tab/1-5: tabs  q: quit",
            ),
            Tab::Theaters => Line::from(
                "\u{2190}\u{2192}: pane  c: city  \u{2191}\u{2193}/j/k: move  Enter: details  q: quit",
            ),
            Tab::Favorites => Line::from(
                "s: sort  \u{2191}\u{2193}/j/k: move  Enter: details  Tab/1-5: tabs  q: quit",
            ),
            Tab::Stats => Line::from("Tab/1-5: tabs  q: quit"),
        }
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draws the centered movie detail overlay.
fn draw_detail_overlay(frame: &mut Frame, app: &App) {
    let area = popup_area(frame.area(), 70, 80);
    frame.render_widget(Clear, area);

    match &app.modal {
        Some(DetailModal::Loading) => {
            let body = Paragraph::new("Loading details...")
                .block(Block::default().borders(Borders::ALL).title(" Details "));
            frame.render_widget(body, area);
        }
        Some(DetailModal::Failed { message }) => {
            let body = Paragraph::new(message.clone())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" Details "));
            frame.render_widget(body, area);
        }
        Some(DetailModal::Loaded(detail)) => {
            let movie = &detail.movie;
            let rating_text = if movie.rating > 0.0 {
                format!(
                    "\u{2b50} {} ({} ratings)",
                    movie.rating,
                    fmt_num(movie.rating_count)
                )
            } else {
                String::from("No rating")
            };

            let mut lines = vec![
                label_line("Original title", or_dash(&movie.original_title)),
                label_line("Year", or_dash(&movie.year)),
                label_line("Rating", &rating_text),
                label_line("Genres", &join_or_dash(&movie.genres)),
                label_line("Directors", &join_or_dash(&movie.directors)),
                label_line("Actors", &join_or_dash(&movie.actors)),
                label_line("Countries", &join_or_dash(&detail.extra.countries)),
                label_line("Languages", &join_or_dash(&detail.extra.languages)),
                label_line("Duration", or_dash(&detail.extra.duration)),
            ];
            if !detail.extra.link.is_empty() {
                lines.push(label_line("Page", &detail.extra.link));
            }
            lines.push(Line::default());
            lines.push(favorite_line(detail.is_favorite));
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "Summary",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(String::from(or_dash(&movie.summary))));

            let body = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((app.modal_scroll, 0))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", movie.title))
                        .border_style(Style::default().fg(Color::Cyan)),
                );
            frame.render_widget(body, area);
        }
        None => {}
    }
}

/// One `label: value` overlay line.
fn label_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(String::from(value)),
    ])
}

/// The favorite state line of the overlay.
fn favorite_line(is_favorite: bool) -> Line<'static> {
    if is_favorite {
        Line::from(Span::styled(
            "\u{2605} In favorites (f to remove)",
            Style::default().fg(Color::Magenta),
        ))
    } else {
        Line::from("\u{2606} Not in favorites (f to add)")
    }
}

const fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        String::from("-")
    } else {
        values.join(" / ")
    }
}

/// Centers a popup of the given percentage size inside `area`.
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Builds the shared movie table.
fn movie_table(movies: &[Movie], title: String, focused: bool) -> Table<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let header = Row::new(vec!["Title", "Rating", "Year", "Genres"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = movies
        .iter()
        .map(|movie| {
            let card = MovieCard::from_movie(movie);
            let genres = card.genre_label();
            Row::new(vec![card.title, card.rating, card.year, genres])
        })
        .collect();

    let widths = [
        Constraint::Min(22),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Min(16),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
}

/// Draws a bordered text placeholder in place of a list.
fn placeholder(frame: &mut Frame, area: Rect, title: String, text: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let body = Paragraph::new(String::from(text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        );
    frame.render_widget(body, area);
}
