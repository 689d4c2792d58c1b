//! Browser state management.
//!
//! [`App`] is a plain state machine: key handlers and the timer tick
//! produce [`Effect`] values, finished fetches come back as [`Fetched`],
//! and only the event loop in `mod.rs` touches the network. Request
//! interleaving rules (in-flight flags, debouncing, the theater pair)
//! therefore stay testable without a backend.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use ratatui::widgets::TableState;

use cinetui_api::catalog::{
    CatalogError, FavoriteEntry, FavoriteSort, Movie, MovieDetailResponse, MoviePage,
    MutationResponse, StatsResponse,
};

use super::debounce::Debouncer;

/// Debounce delay for city cycling.
pub const CITY_DEBOUNCE: Duration = Duration::from_millis(300);
/// Debounce delay for favorite sort cycling.
pub const SORT_DEBOUNCE: Duration = Duration::from_millis(200);
/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(5);

/// City offered when the configured one is not in the cycle.
pub const DEFAULT_CITY: &str = "北京";

/// Cities offered by the theater listing cycle.
pub const CITIES: &[&str] = &["北京", "上海", "广州", "深圳", "杭州", "成都"];

/// Recovery hints shown under a backend-reported search error.
pub const SEARCH_API_HINTS: &[&str] = &[
    "Possible causes:",
    "- the upstream movie service is temporarily unavailable",
    "- the backend lost its network connection",
    "- try again in a little while",
];

/// Hint shown when the search request itself failed to complete.
pub const SEARCH_TRANSPORT_HINTS: &[&str] =
    &["Tip: the Top 250 and Theaters tabs may still have cached data."];

/// Top-level view tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Keyword search.
    Search,
    /// The Top 250 ranking.
    Top,
    /// Now-playing and coming-soon listings.
    Theaters,
    /// Saved favorites.
    Favorites,
    /// Aggregate statistics.
    Stats,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Self; 5] = [
        Self::Search,
        Self::Top,
        Self::Theaters,
        Self::Favorites,
        Self::Stats,
    ];

    /// Tab bar label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Top => "Top 250",
            Self::Theaters => "Theaters",
            Self::Favorites => "Favorites",
            Self::Stats => "Stats",
        }
    }

    /// Position in the tab bar.
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    /// Next tab, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Search => Self::Top,
            Self::Top => Self::Theaters,
            Self::Theaters => Self::Favorites,
            Self::Favorites => Self::Stats,
            Self::Stats => Self::Search,
        }
    }

    /// Previous tab, wrapping around.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Search => Self::Stats,
            Self::Top => Self::Search,
            Self::Theaters => Self::Top,
            Self::Favorites => Self::Theaters,
            Self::Stats => Self::Favorites,
        }
    }
}

/// Network work requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a keyword search.
    Search {
        /// Trimmed keyword.
        keyword: String,
    },
    /// Load one Top 250 page.
    LoadTop {
        /// Zero-based page index.
        page: u32,
    },
    /// Load both theater listings for a city.
    LoadTheaters {
        /// City to list for.
        city: String,
    },
    /// Load the favorites list.
    LoadFavorites {
        /// Requested sort order.
        sort: FavoriteSort,
    },
    /// Load aggregate statistics.
    LoadStats,
    /// Load one movie's detail.
    LoadDetail {
        /// Catalog identifier.
        movie_id: String,
    },
    /// Save a movie to the favorites.
    AddFavorite {
        /// Catalog identifier.
        movie_id: String,
    },
    /// Remove a movie from the favorites.
    RemoveFavorite {
        /// Catalog identifier.
        movie_id: String,
    },
    /// Open an external page in the system browser.
    OpenLink {
        /// Page URL.
        url: String,
    },
}

/// Completion of a spawned fetch.
#[derive(Debug)]
pub enum Fetched {
    /// Search results arrived.
    Search(Result<MoviePage, CatalogError>),
    /// A Top 250 page arrived.
    Top {
        /// The page that was requested.
        page: u32,
        /// The fetched page, or the failure.
        result: Result<MoviePage, CatalogError>,
    },
    /// Both theater listings arrived, or one of the pair failed.
    Theaters(Result<(Vec<Movie>, Vec<Movie>), CatalogError>),
    /// The favorites list arrived.
    Favorites(Result<Vec<FavoriteEntry>, CatalogError>),
    /// Statistics arrived.
    Stats(Result<StatsResponse, CatalogError>),
    /// A movie detail arrived.
    Detail(Result<MovieDetailResponse, CatalogError>),
    /// A favorite mutation finished.
    FavoriteToggled {
        /// The movie the mutation applied to.
        movie_id: String,
        /// `true` for a removal, `false` for an addition.
        removed: bool,
        /// The mutation outcome.
        result: Result<MutationResponse, CatalogError>,
    },
}

/// Input mode of the search tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys navigate.
    Normal,
    /// Keys edit the keyword buffer.
    Editing,
}

/// Search tab state.
#[derive(Debug, Default)]
pub struct SearchPanel {
    /// In-flight flag; re-entrant submits are dropped while set.
    pub loading: bool,
    /// Current results.
    pub movies: Vec<Movie>,
    /// Total reported by the backend.
    pub total: u64,
    /// Error or empty-result notice replacing the list.
    pub message: Option<String>,
    /// Recovery hint lines under the notice.
    pub hints: &'static [&'static str],
    /// List cursor.
    pub table: TableState,
}

/// Top 250 tab state.
#[derive(Debug, Default)]
pub struct TopPanel {
    /// In-flight flag; page keys are dropped while set.
    pub loading: bool,
    /// Zero-based index of the page on screen.
    pub page: u32,
    /// Movies of the current page.
    pub movies: Vec<Movie>,
    /// Total ranking size reported by the backend.
    pub total: u64,
    /// Whether at least one page has loaded.
    pub loaded: bool,
    /// List cursor.
    pub table: TableState,
}

impl TopPanel {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// Whether a further page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        let shown = u64::from(self.page)
            .saturating_add(1)
            .saturating_mul(u64::from(cinetui_api::catalog::DEFAULT_PAGE_SIZE));
        self.loaded && shown < self.total
    }
}

/// Which theater pane has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TheaterPane {
    /// Left pane, the in-theater listing.
    NowPlaying,
    /// Right pane, the upcoming listing.
    ComingSoon,
}

/// Theaters tab state.
#[derive(Debug)]
pub struct TheatersPanel {
    /// In-flight flag for the listing pair.
    pub loading: bool,
    /// City the listings were requested for.
    pub city: String,
    /// Currently showing movies.
    pub now_playing: Vec<Movie>,
    /// Upcoming movies.
    pub coming_soon: Vec<Movie>,
    /// Whether the last load attempt failed.
    pub failed: bool,
    /// Whether at least one load attempt completed.
    pub loaded: bool,
    /// Pane with the cursor.
    pub pane: TheaterPane,
    /// Cursor of the now-playing pane.
    pub now_table: TableState,
    /// Cursor of the coming-soon pane.
    pub soon_table: TableState,
}

/// Favorites tab state.
#[derive(Debug, Default)]
pub struct FavoritesPanel {
    /// In-flight flag for the list fetch.
    pub loading: bool,
    /// Current sort order.
    pub sort: FavoriteSort,
    /// Saved favorites in backend order.
    pub entries: Vec<FavoriteEntry>,
    /// Whether at least one load completed.
    pub loaded: bool,
    /// List cursor.
    pub table: TableState,
}

/// Stats tab state.
#[derive(Debug, Default)]
pub struct StatsPanel {
    /// In-flight flag for the stats fetch.
    pub loading: bool,
    /// Loaded statistics.
    pub stats: Option<StatsResponse>,
    /// Load failure notice replacing the panel body.
    pub error: Option<String>,
}

/// Detail overlay content.
#[derive(Debug)]
pub enum DetailModal {
    /// Fetch in flight.
    Loading,
    /// Detail on screen.
    Loaded(Box<MovieDetailResponse>),
    /// Fetch failed.
    Failed {
        /// Failure description.
        message: String,
    },
}

/// Initial view settings taken from the config file.
#[derive(Debug, Clone)]
pub struct BrowseOptions {
    /// City preselected for theater listings.
    pub city: String,
    /// Initial favorites sort order.
    pub sort: FavoriteSort,
}

/// Browser state.
#[derive(Debug)]
pub struct App {
    /// Active tab.
    pub active_tab: Tab,
    /// Tabs whose initial load has been kicked off.
    loaded_tabs: HashSet<Tab>,
    /// Set once the user asked to quit.
    pub should_quit: bool,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Keyword buffer of the search box.
    pub search_input: String,
    /// Search tab state.
    pub search: SearchPanel,
    /// Top 250 tab state.
    pub top: TopPanel,
    /// Theaters tab state.
    pub theaters: TheatersPanel,
    /// Favorites tab state.
    pub favorites: FavoritesPanel,
    /// Stats tab state.
    pub stats: StatsPanel,
    /// Detail overlay, when open.
    pub modal: Option<DetailModal>,
    /// Scroll offset inside the detail overlay.
    pub modal_scroll: u16,
    /// Transient status message with its creation time.
    status: Option<(String, Instant)>,
    /// Debounce timer for city cycling.
    city_debounce: Debouncer,
    /// Debounce timer for sort cycling.
    sort_debounce: Debouncer,
}

impl App {
    /// Creates the initial state.
    ///
    /// The search tab counts as loaded from the start since it only
    /// fetches on submit.
    #[must_use]
    pub fn new(options: BrowseOptions) -> Self {
        let mut loaded_tabs = HashSet::new();
        loaded_tabs.insert(Tab::Search);
        Self {
            active_tab: Tab::Search,
            loaded_tabs,
            should_quit: false,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            search: SearchPanel::default(),
            top: TopPanel::default(),
            theaters: TheatersPanel {
                loading: false,
                city: options.city,
                now_playing: Vec::new(),
                coming_soon: Vec::new(),
                failed: false,
                loaded: false,
                pane: TheaterPane::NowPlaying,
                now_table: TableState::default(),
                soon_table: TableState::default(),
            },
            favorites: FavoritesPanel {
                sort: options.sort,
                ..FavoritesPanel::default()
            },
            stats: StatsPanel::default(),
            modal: None,
            modal_scroll: 0,
            status: None,
            city_debounce: Debouncer::new(CITY_DEBOUNCE),
            sort_debounce: Debouncer::new(SORT_DEBOUNCE),
        }
    }

    /// Asks the event loop to exit.
    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Switches to a tab, kicking off its first load.
    pub fn switch_tab(&mut self, tab: Tab) -> Option<Effect> {
        self.active_tab = tab;
        if !self.loaded_tabs.insert(tab) {
            return None;
        }
        match tab {
            Tab::Search => None,
            Tab::Top => self.request_top(0),
            Tab::Theaters => self.request_theaters(),
            Tab::Favorites => self.request_favorites(),
            Tab::Stats => self.request_stats(),
        }
    }

    /// Cycles to the next tab.
    pub fn next_tab(&mut self) -> Option<Effect> {
        self.switch_tab(self.active_tab.next())
    }

    /// Cycles to the previous tab.
    pub fn prev_tab(&mut self) -> Option<Effect> {
        self.switch_tab(self.active_tab.prev())
    }

    /// Enters keyword editing mode.
    pub const fn begin_search_entry(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    /// Leaves keyword editing mode, keeping the buffer.
    pub const fn cancel_search_entry(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Appends a character to the keyword buffer.
    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
    }

    /// Removes the last character from the keyword buffer.
    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    /// Submits the search box.
    ///
    /// Blank input is rejected with a status notice; a submit while a
    /// search is already running is dropped.
    pub fn submit_search(&mut self, now: Instant) -> Option<Effect> {
        self.input_mode = InputMode::Normal;
        let keyword = self.search_input.trim().to_owned();
        if keyword.is_empty() {
            self.set_status(String::from("Enter a keyword to search"), now);
            return None;
        }
        if self.search.loading {
            return None;
        }
        self.search.loading = true;
        self.search.movies.clear();
        self.search.total = 0;
        self.search.message = None;
        self.search.hints = &[];
        self.search.table.select(None);
        Some(Effect::Search { keyword })
    }

    /// Moves the active list cursor up.
    pub fn move_up(&mut self) {
        if let Some(table) = self.active_table_mut() {
            let current = table.selected().unwrap_or(0);
            if current > 0 {
                table.select(Some(current.saturating_sub(1)));
            }
        }
    }

    /// Moves the active list cursor down.
    pub fn move_down(&mut self) {
        let len = self.active_list_len();
        if let Some(table) = self.active_table_mut() {
            let current = table.selected().unwrap_or(0);
            if current.saturating_add(1) < len {
                table.select(Some(current.saturating_add(1)));
            }
        }
    }

    /// Focuses the now-playing theater pane.
    pub fn focus_now_playing(&mut self) {
        if self.active_tab == Tab::Theaters {
            self.theaters.pane = TheaterPane::NowPlaying;
        }
    }

    /// Focuses the coming-soon theater pane.
    pub fn focus_coming_soon(&mut self) {
        if self.active_tab == Tab::Theaters {
            self.theaters.pane = TheaterPane::ComingSoon;
            if self.theaters.soon_table.selected().is_none()
                && !self.theaters.coming_soon.is_empty()
            {
                self.theaters.soon_table.select(Some(0));
            }
        }
    }

    /// Loads the previous Top 250 page if one exists.
    pub fn top_prev_page(&mut self) -> Option<Effect> {
        if !self.top.has_prev() {
            return None;
        }
        self.request_top(self.top.page.saturating_sub(1))
    }

    /// Loads the next Top 250 page if one exists.
    pub fn top_next_page(&mut self) -> Option<Effect> {
        if !self.top.has_next() {
            return None;
        }
        self.request_top(self.top.page.saturating_add(1))
    }

    /// Advances to the next city and schedules a debounced reload.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn cycle_city(&mut self, now: Instant) {
        let next = CITIES
            .iter()
            .position(|city| *city == self.theaters.city)
            .and_then(|idx| CITIES.get(idx.saturating_add(1) % CITIES.len()))
            .or_else(|| CITIES.first())
            .copied()
            .unwrap_or(DEFAULT_CITY);
        self.theaters.city = String::from(next);
        self.city_debounce.trigger(now);
    }

    /// Advances the favorites sort order and schedules a debounced
    /// reload.
    pub fn cycle_sort(&mut self, now: Instant) {
        self.favorites.sort = self.favorites.sort.next();
        self.sort_debounce.trigger(now);
    }

    /// Advances timers, firing due debounced reloads and expiring the
    /// status message.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.city_debounce.poll(now) {
            effects.extend(self.request_theaters());
        }
        if self.sort_debounce.poll(now) {
            effects.extend(self.request_favorites());
        }
        if let Some((_, since)) = self.status
            && now.duration_since(since) >= STATUS_TTL
        {
            self.status = None;
        }
        effects
    }

    /// Opens the detail overlay for the movie under the cursor.
    pub fn open_selected_detail(&mut self) -> Option<Effect> {
        let movie_id = self.selected_movie_id()?;
        Some(self.open_detail(movie_id))
    }

    /// Closes the detail overlay.
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.modal_scroll = 0;
    }

    /// Whether the detail overlay is open.
    #[must_use]
    pub const fn modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Toggles the favorite state of the movie in the overlay.
    pub fn toggle_modal_favorite(&self) -> Option<Effect> {
        if let Some(DetailModal::Loaded(detail)) = &self.modal {
            let movie_id = detail.movie.id.clone();
            if detail.is_favorite {
                Some(Effect::RemoveFavorite { movie_id })
            } else {
                Some(Effect::AddFavorite { movie_id })
            }
        } else {
            None
        }
    }

    /// Opens the external catalog page of the overlay movie.
    pub fn open_modal_link(&self) -> Option<Effect> {
        if let Some(DetailModal::Loaded(detail)) = &self.modal
            && !detail.extra.link.is_empty()
        {
            return Some(Effect::OpenLink {
                url: detail.extra.link.clone(),
            });
        }
        None
    }

    /// Scrolls the overlay content up.
    pub const fn scroll_modal_up(&mut self) {
        self.modal_scroll = self.modal_scroll.saturating_sub(1);
    }

    /// Scrolls the overlay content down.
    pub const fn scroll_modal_down(&mut self) {
        self.modal_scroll = self.modal_scroll.saturating_add(1);
    }

    /// The current status message, if one is visible.
    #[must_use]
    pub fn status_line(&self) -> Option<&str> {
        self.status.as_ref().map(|(message, _)| message.as_str())
    }

    /// Applies a fetch completion and returns any follow-up work.
    pub fn handle_fetched(&mut self, fetched: Fetched, now: Instant) -> Vec<Effect> {
        match fetched {
            Fetched::Search(result) => {
                self.finish_search(result);
                Vec::new()
            }
            Fetched::Top { page, result } => {
                self.finish_top(page, result, now);
                Vec::new()
            }
            Fetched::Theaters(result) => {
                self.finish_theaters(result, now);
                Vec::new()
            }
            Fetched::Favorites(result) => {
                self.finish_favorites(result, now);
                Vec::new()
            }
            Fetched::Stats(result) => {
                self.finish_stats(result);
                Vec::new()
            }
            Fetched::Detail(result) => {
                self.finish_detail(result);
                Vec::new()
            }
            Fetched::FavoriteToggled {
                movie_id,
                removed,
                result,
            } => self.finish_favorite_toggle(movie_id, removed, result, now),
        }
    }

    /// Requests a Top 250 page unless one is already in flight.
    fn request_top(&mut self, page: u32) -> Option<Effect> {
        if self.top.loading {
            return None;
        }
        self.top.loading = true;
        Some(Effect::LoadTop { page })
    }

    /// Requests the theater listing pair unless one is already in
    /// flight.
    fn request_theaters(&mut self) -> Option<Effect> {
        if self.theaters.loading {
            return None;
        }
        self.theaters.loading = true;
        Some(Effect::LoadTheaters {
            city: self.theaters.city.clone(),
        })
    }

    /// Requests the favorites list unless one is already in flight.
    fn request_favorites(&mut self) -> Option<Effect> {
        if self.favorites.loading {
            return None;
        }
        self.favorites.loading = true;
        Some(Effect::LoadFavorites {
            sort: self.favorites.sort,
        })
    }

    /// Requests the statistics unless they are already in flight.
    fn request_stats(&mut self) -> Option<Effect> {
        if self.stats.loading {
            return None;
        }
        self.stats.loading = true;
        self.stats.error = None;
        Some(Effect::LoadStats)
    }

    /// Opens (or re-opens) the overlay in loading state.
    fn open_detail(&mut self, movie_id: String) -> Effect {
        self.modal = Some(DetailModal::Loading);
        self.modal_scroll = 0;
        Effect::LoadDetail { movie_id }
    }

    /// Identifier of the movie under the cursor.
    fn selected_movie_id(&self) -> Option<String> {
        let movie = match self.active_tab {
            Tab::Search => {
                let idx = self.search.table.selected()?;
                self.search.movies.get(idx)?
            }
            Tab::Top => {
                let idx = self.top.table.selected()?;
                self.top.movies.get(idx)?
            }
            Tab::Theaters => match self.theaters.pane {
                TheaterPane::NowPlaying => {
                    let idx = self.theaters.now_table.selected()?;
                    self.theaters.now_playing.get(idx)?
                }
                TheaterPane::ComingSoon => {
                    let idx = self.theaters.soon_table.selected()?;
                    self.theaters.coming_soon.get(idx)?
                }
            },
            Tab::Favorites => {
                let idx = self.favorites.table.selected()?;
                &self.favorites.entries.get(idx)?.movie
            }
            Tab::Stats => return None,
        };
        Some(movie.id.clone())
    }

    /// Length of the list under the cursor.
    fn active_list_len(&self) -> usize {
        match self.active_tab {
            Tab::Search => self.search.movies.len(),
            Tab::Top => self.top.movies.len(),
            Tab::Theaters => match self.theaters.pane {
                TheaterPane::NowPlaying => self.theaters.now_playing.len(),
                TheaterPane::ComingSoon => self.theaters.coming_soon.len(),
            },
            Tab::Favorites => self.favorites.entries.len(),
            Tab::Stats => 0,
        }
    }

    /// Cursor of the list under the focus.
    fn active_table_mut(&mut self) -> Option<&mut TableState> {
        match self.active_tab {
            Tab::Search => Some(&mut self.search.table),
            Tab::Top => Some(&mut self.top.table),
            Tab::Theaters => Some(match self.theaters.pane {
                TheaterPane::NowPlaying => &mut self.theaters.now_table,
                TheaterPane::ComingSoon => &mut self.theaters.soon_table,
            }),
            Tab::Favorites => Some(&mut self.favorites.table),
            Tab::Stats => None,
        }
    }

    /// Shows a transient status message.
    fn set_status(&mut self, message: String, now: Instant) {
        self.status = Some((message, now));
    }

    fn finish_search(&mut self, result: Result<MoviePage, CatalogError>) {
        self.search.loading = false;
        match result {
            Ok(page) if page.movies.is_empty() => {
                self.search.movies.clear();
                self.search.total = 0;
                self.search.message =
                    Some(String::from("No movies matched. Try another keyword."));
                self.search.hints = &[];
            }
            Ok(page) => {
                self.search.total = page.total;
                self.search.movies = page.movies;
                self.search.message = None;
                self.search.hints = &[];
                self.search.table.select(Some(0));
            }
            Err(CatalogError::Api { message, .. }) => {
                self.search.message = Some(message);
                self.search.hints = SEARCH_API_HINTS;
            }
            Err(CatalogError::Format(_)) => {
                self.search.message = Some(String::from(
                    "The server response had an unexpected format.",
                ));
                self.search.hints = &[];
            }
            Err(error) => {
                self.search.message = Some(format!("Search failed: {error}"));
                self.search.hints = SEARCH_TRANSPORT_HINTS;
            }
        }
    }

    fn finish_top(&mut self, page: u32, result: Result<MoviePage, CatalogError>, now: Instant) {
        self.top.loading = false;
        match result {
            Ok(fetched) => {
                self.top.page = page;
                self.top.total = fetched.total;
                self.top.movies = fetched.movies;
                self.top.loaded = true;
                self.top.table.select(if self.top.movies.is_empty() {
                    None
                } else {
                    Some(0)
                });
            }
            Err(error) => {
                self.set_status(format!("Failed to load Top 250: {error}"), now);
            }
        }
    }

    fn finish_theaters(
        &mut self,
        result: Result<(Vec<Movie>, Vec<Movie>), CatalogError>,
        now: Instant,
    ) {
        self.theaters.loading = false;
        self.theaters.loaded = true;
        match result {
            Ok((now_playing, coming_soon)) => {
                self.theaters.failed = false;
                self.theaters.now_playing = now_playing;
                self.theaters.coming_soon = coming_soon;
                self.theaters
                    .now_table
                    .select(if self.theaters.now_playing.is_empty() {
                        None
                    } else {
                        Some(0)
                    });
                self.theaters
                    .soon_table
                    .select(if self.theaters.coming_soon.is_empty() {
                        None
                    } else {
                        Some(0)
                    });
            }
            Err(error) => {
                // One failure marks both panes failed.
                self.theaters.failed = true;
                self.theaters.now_playing.clear();
                self.theaters.coming_soon.clear();
                self.theaters.now_table.select(None);
                self.theaters.soon_table.select(None);
                self.set_status(format!("Failed to load theater listings: {error}"), now);
            }
        }
    }

    fn finish_favorites(
        &mut self,
        result: Result<Vec<FavoriteEntry>, CatalogError>,
        now: Instant,
    ) {
        self.favorites.loading = false;
        match result {
            Ok(entries) => {
                self.favorites.entries = entries;
                self.favorites.loaded = true;
                self.favorites
                    .table
                    .select(if self.favorites.entries.is_empty() {
                        None
                    } else {
                        Some(0)
                    });
            }
            Err(error) => {
                // Keep whatever list is on screen.
                self.set_status(format!("Failed to load favorites: {error}"), now);
            }
        }
    }

    fn finish_stats(&mut self, result: Result<StatsResponse, CatalogError>) {
        self.stats.loading = false;
        match result {
            Ok(stats) => {
                self.stats.stats = Some(stats);
                self.stats.error = None;
            }
            Err(error) => {
                self.stats.error = Some(format!("Failed to load stats: {error}"));
            }
        }
    }

    fn finish_detail(&mut self, result: Result<MovieDetailResponse, CatalogError>) {
        // The overlay may have been closed while the fetch ran.
        if self.modal.is_none() {
            return;
        }
        self.modal = Some(match result {
            Ok(detail) => DetailModal::Loaded(Box::new(detail)),
            Err(error) => DetailModal::Failed {
                message: format!("Failed to load details: {error}"),
            },
        });
    }

    fn finish_favorite_toggle(
        &mut self,
        movie_id: String,
        removed: bool,
        result: Result<MutationResponse, CatalogError>,
        now: Instant,
    ) -> Vec<Effect> {
        match result {
            Ok(response) if response.success => {
                let message = if response.message.is_empty() {
                    String::from(if removed {
                        "Removed from favorites"
                    } else {
                        "Added to favorites"
                    })
                } else {
                    response.message
                };
                self.set_status(message, now);
                let mut effects = vec![self.open_detail(movie_id)];
                if removed {
                    effects.extend(self.request_favorites());
                }
                effects
            }
            Ok(_) => Vec::new(),
            Err(error) => {
                self.set_status(format!("Favorite update failed: {error}"), now);
                Vec::new()
            }
        }
    }
}
