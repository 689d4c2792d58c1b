//! cinetui - movie catalog browser CLI.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::run_browser;
use crate::tui::state::BrowseOptions;
use cinetui_api::catalog::{
    CatalogApi, CatalogClient, DEFAULT_PAGE_SIZE, FavoriteSort, MutationResponse, SearchParams,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Override the backend base URL from config.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog interactively via TUI.
    Browse,
    /// Search movies by keyword.
    Search(SearchArgs),
    /// Manage saved favorites.
    Favorites(FavoritesCommand),
    /// Show favorite and search statistics.
    Stats,
    /// Show recent search history.
    History(HistoryArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search keyword (e.g. "盗梦空间").
    #[arg(long, required = true)]
    query: String,

    /// Maximum number of results.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    count: u32,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// List saved favorites.
    List(FavoritesListArgs),
    /// Save a movie as a favorite.
    Add(FavoritesAddArgs),
    /// Remove a movie from the favorites.
    Remove(FavoritesRemoveArgs),
}

/// Arguments for the `favorites list` subcommand.
#[derive(clap::Args)]
struct FavoritesListArgs {
    /// Sort criterion: added_at, rating, or year.
    #[arg(long, default_value = "added_at")]
    sort_by: String,
}

/// Arguments for the `favorites add` subcommand.
#[derive(clap::Args)]
struct FavoritesAddArgs {
    /// Movie ID (e.g. "1292052").
    #[arg(long, required = true)]
    id: String,

    /// Free-form note stored with the favorite.
    #[arg(long)]
    note: Option<String>,
}

/// Arguments for the `favorites remove` subcommand.
#[derive(clap::Args)]
struct FavoritesRemoveArgs {
    /// Movie ID (e.g. "1292052").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `history` subcommand.
#[derive(clap::Args)]
struct HistoryArgs {
    /// Maximum number of entries to show.
    #[arg(long, default_value_t = 20)]
    limit: u32,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(long, required = true)]
    shell: clap_complete::Shell,
}

/// Loads the application config, honoring the `--dir` override.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file
/// fails to parse.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a `CatalogClient` from config, with an optional base URL
/// override from the command line.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to
/// build.
#[instrument(skip_all)]
fn build_catalog_client(config: &AppConfig, base_url: Option<&str>) -> Result<CatalogClient> {
    let raw = base_url.unwrap_or(&config.api.base_url);
    let url = Url::parse(raw).with_context(|| format!("invalid base URL: {raw}"))?;

    CatalogClient::builder()
        .base_url(url)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build catalog API client")
}

/// Formats a 0-10 rating, with `-` for unrated entries.
fn fmt_rating(rating: f64) -> String {
    if rating > 0.0 {
        format!("{rating:.1}")
    } else {
        String::from("-")
    }
}

/// Replaces an empty field with `-` for table output.
const fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// Logs a mutation outcome, preferring the backend's own message.
fn report_mutation(response: &MutationResponse, fallback: &str) {
    let message = if response.message.is_empty() {
        fallback
    } else {
        response.message.as_str()
    };
    if response.success {
        tracing::info!("{message}");
    } else {
        tracing::warn!("{message}");
    }
}

/// Runs the `browse` subcommand.
///
/// Loads config, builds the API client, and launches the browser TUI.
///
/// # Errors
///
/// Returns an error if config loading, client build, or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>, base_url: Option<&str>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;

    tracing::info!("Connecting to catalog at {}. Launching TUI...", client.base_url());

    let options = BrowseOptions {
        city: config.theaters.city,
        sort: config.favorites.sort_by,
    };

    run_browser(client, options)
        .await
        .context("catalog browser TUI failed")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if config loading, client build, or the API request
/// fails.
#[instrument(skip_all)]
async fn run_search(
    args: &SearchArgs,
    dir: Option<&PathBuf>,
    base_url: Option<&str>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;

    let params = SearchParams::new(&args.query).count(args.count);
    let page = client
        .search(&params)
        .await
        .context("catalog search request failed")?;

    if page.movies.is_empty() {
        tracing::info!("No movies matched \"{}\"", args.query);
        return Ok(());
    }

    tracing::info!("ID\t\tTitle\t\t\tRating\tYear\tGenres");
    for movie in &page.movies {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            movie.id,
            movie.title,
            fmt_rating(movie.rating),
            or_dash(&movie.year),
            movie.genres.join(","),
        );
    }
    tracing::info!("Total: {} matched, showing {}", page.total, page.movies.len());

    Ok(())
}

/// Runs the `favorites list` subcommand.
///
/// # Errors
///
/// Returns an error if the sort criterion is unknown, config loading,
/// client build, or the API request fails.
#[instrument(skip_all)]
async fn run_favorites_list(
    args: &FavoritesListArgs,
    dir: Option<&PathBuf>,
    base_url: Option<&str>,
) -> Result<()> {
    let sort = args.sort_by.parse::<FavoriteSort>()?;

    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;

    let response = client
        .favorites(sort)
        .await
        .context("catalog favorites request failed")?;

    if response.favorites.is_empty() {
        tracing::info!("No favorites saved. Add one with `favorites add --id <movie-id>`.");
        return Ok(());
    }

    tracing::info!("ID\t\tTitle\t\t\tRating\tYear\tAdded\t\t\tNote");
    for entry in &response.favorites {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            entry.movie.id,
            entry.movie.title,
            fmt_rating(entry.movie.rating),
            or_dash(&entry.movie.year),
            or_dash(&entry.added_at),
            or_dash(&entry.note),
        );
    }
    tracing::info!(
        "Total: {} favorites (sort: {})",
        response.favorites.len(),
        sort
    );

    Ok(())
}

/// Runs the `favorites add` subcommand.
///
/// # Errors
///
/// Returns an error if config loading, client build, or the API request
/// fails.
#[instrument(skip_all)]
async fn run_favorites_add(
    args: &FavoritesAddArgs,
    dir: Option<&PathBuf>,
    base_url: Option<&str>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;

    let response = client
        .add_favorite(&args.id, args.note.as_deref())
        .await
        .context("catalog favorite add request failed")?;

    report_mutation(&response, "Added to favorites");

    Ok(())
}

/// Runs the `favorites remove` subcommand.
///
/// # Errors
///
/// Returns an error if config loading, client build, or the API request
/// fails. Removing an id that is not favorited fails with the backend's
/// HTTP 404 message.
#[instrument(skip_all)]
async fn run_favorites_remove(
    args: &FavoritesRemoveArgs,
    dir: Option<&PathBuf>,
    base_url: Option<&str>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;

    let response = client
        .remove_favorite(&args.id)
        .await
        .context("catalog favorite remove request failed")?;

    report_mutation(&response, "Removed from favorites");

    Ok(())
}

/// Maximum genres listed by the `stats` subcommand.
const STATS_TOP_GENRES: usize = 10;

/// Runs the `stats` subcommand.
///
/// # Errors
///
/// Returns an error if config loading, client build, or the API request
/// fails.
#[instrument(skip_all)]
async fn run_stats(dir: Option<&PathBuf>, base_url: Option<&str>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;

    let stats = client.stats().await.context("catalog stats request failed")?;

    if let Some(message) = &stats.message {
        tracing::info!("{message}");
        return Ok(());
    }

    tracing::info!("Favorites: {}", stats.total_favorites);
    tracing::info!("Average rating: {:.2}", stats.average_rating);
    tracing::info!("Searches: {}", stats.total_searches);
    tracing::info!("---");
    tracing::info!("Top genres:");
    for (name, count) in stats.top_genres(STATS_TOP_GENRES) {
        tracing::info!("  {name}: {count}");
    }
    if !stats.recent_searches.is_empty() {
        tracing::info!("Recent searches:");
        for record in &stats.recent_searches {
            tracing::info!(
                "  {} ({} results) {}",
                record.keyword,
                record.results_count,
                record.timestamp,
            );
        }
    }

    Ok(())
}

/// Runs the `history` subcommand.
///
/// # Errors
///
/// Returns an error if config loading, client build, or the API request
/// fails.
#[instrument(skip_all)]
async fn run_history(
    args: &HistoryArgs,
    dir: Option<&PathBuf>,
    base_url: Option<&str>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;

    let response = client
        .search_history(args.limit)
        .await
        .context("catalog search history request failed")?;

    if response.history.is_empty() {
        tracing::info!("No searches recorded.");
        return Ok(());
    }

    tracing::info!("Keyword\t\tResults\tTime");
    for record in &response.history {
        tracing::info!(
            "{}\t{}\t{}",
            record.keyword,
            record.results_count,
            record.timestamp,
        );
    }
    tracing::info!("Total: {} searches recorded", response.total);

    Ok(())
}

/// Runs the `completions` subcommand.
fn run_completions(shell: clap_complete::Shell) {
    clap_complete::generate(shell, &mut Cli::command(), "cinetui", &mut io::stdout());
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Browse => run_browse(cli.dir.as_ref(), cli.base_url.as_deref()).await,
        Commands::Search(args) => {
            run_search(&args, cli.dir.as_ref(), cli.base_url.as_deref()).await
        }
        Commands::Favorites(fav) => match fav.command {
            FavoritesSubcommands::List(args) => {
                run_favorites_list(&args, cli.dir.as_ref(), cli.base_url.as_deref()).await
            }
            FavoritesSubcommands::Add(args) => {
                run_favorites_add(&args, cli.dir.as_ref(), cli.base_url.as_deref()).await
            }
            FavoritesSubcommands::Remove(args) => {
                run_favorites_remove(&args, cli.dir.as_ref(), cli.base_url.as_deref()).await
            }
        },
        Commands::Stats => run_stats(cli.dir.as_ref(), cli.base_url.as_deref()).await,
        Commands::History(args) => {
            run_history(&args, cli.dir.as_ref(), cli.base_url.as_deref()).await
        }
        Commands::Completions(args) => {
            run_completions(args.shell);
            Ok(())
        }
    }
}
