//! cinedex - browse movies and TV shows from the terminal.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use cinedex_api::MediaType;
use cinedex_api::account::AccountClient;
use cinedex_api::tmdb::{TmdbCastMember, TmdbClient, TmdbGenre, image_url};
use cinedex_core::pagination::page_window;
use cinedex_core::query::MAX_TOTAL_PAGES;
use cinedex_core::{
    BrowseError, Browser, CatalogSource, FetchOrchestrator, FetchQuery, FetchState, MovieSource,
    Session, SessionStore, TvSource, auth, details, home, watchlist,
};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path, resolve_log_path, resolve_session_path};
use crate::tui::run_browser;
use crate::tui::state::ListedTitle;

/// User agent sent to both backends.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Trending, top-rated and upcoming titles.
    Home,
    /// List one page of movies (trending, or search results with --query).
    Movies(ListArgs),
    /// List one page of TV shows (trending, or search results with --query).
    Tv(ListArgs),
    /// Show movie details.
    Movie(IdArgs),
    /// Show TV show details.
    Show(IdArgs),
    /// Browse interactively with debounced search and paging.
    Browse(BrowseArgs),
    /// Log in to the account backend.
    Login(LoginArgs),
    /// Create an account.
    Register(RegisterArgs),
    /// Forget the saved session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Manage the watchlist.
    Watchlist(WatchlistCommand),
    /// Print a shell completion script.
    Completions(CompletionsArgs),
}

/// Arguments for the `movies` and `tv` subcommands.
#[derive(clap::Args)]
struct ListArgs {
    /// Search term. Lists trending titles when omitted or blank.
    #[arg(long, default_value = "")]
    query: String,
    /// Page number.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TOTAL_PAGES)))]
    page: u32,
}

/// Arguments for the `movie` and `show` subcommands.
#[derive(clap::Args)]
struct IdArgs {
    /// TMDB ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Catalog to browse.
#[derive(Clone, Copy, ValueEnum)]
enum Catalog {
    /// Movies.
    Movies,
    /// TV shows.
    Tv,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Catalog to browse.
    #[arg(value_enum)]
    catalog: Catalog,
}

/// Arguments for the `login` subcommand.
#[derive(clap::Args)]
struct LoginArgs {
    /// Account email.
    #[arg(long, required = true)]
    email: String,
    /// Account password.
    #[arg(long, required = true)]
    password: String,
}

/// Arguments for the `register` subcommand.
#[derive(clap::Args)]
struct RegisterArgs {
    /// Display name.
    #[arg(long, required = true)]
    name: String,
    /// Account email.
    #[arg(long, required = true)]
    email: String,
    /// Account password.
    #[arg(long, required = true)]
    password: String,
}

/// Arguments for the `watchlist` subcommand.
#[derive(clap::Args)]
struct WatchlistCommand {
    /// Watchlist subcommand to run.
    #[command(subcommand)]
    command: WatchlistSubcommands,
}

/// Available watchlist subcommands.
#[derive(Subcommand)]
enum WatchlistSubcommands {
    /// List saved titles.
    List,
    /// Add a title.
    Add(WatchlistItemArgs),
    /// Check whether a title is saved.
    Check(WatchlistItemArgs),
    /// Remove a title.
    Remove(WatchlistItemArgs),
}

/// Media type argument.
#[derive(Clone, Copy, ValueEnum)]
enum MediaArg {
    /// A movie.
    Movie,
    /// A TV show.
    Tv,
}

impl From<MediaArg> for MediaType {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::Movie => Self::Movie,
            MediaArg::Tv => Self::Tv,
        }
    }
}

/// Arguments identifying one watchlist title.
#[derive(clap::Args)]
struct WatchlistItemArgs {
    /// TMDB ID.
    #[arg(long, required = true)]
    id: u64,
    /// Media type.
    #[arg(long, value_enum, required = true)]
    media_type: MediaArg,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: clap_complete::Shell,
}

/// Builds a `TmdbClient` from `TMDB_API_TOKEN` and the `[tmdb]` config section.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set, the base URL override is
/// invalid, or the client fails to build.
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .user_agent(USER_AGENT)
        .language(config.tmdb.language.as_str());
    if let Some(ref base_url) = config.tmdb.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid tmdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds an `AccountClient` carrying the session's token, if any.
///
/// # Errors
///
/// Returns an error if `account.base_url` is invalid or the client fails to build.
fn build_account_client(config: &AppConfig, session: &Session) -> Result<AccountClient> {
    let base_url = Url::parse(&config.account.base_url)
        .with_context(|| format!("invalid account.base_url: {}", config.account.base_url))?;
    AccountClient::builder()
        .base_url(base_url)
        .user_agent(USER_AGENT)
        .bearer_token(session.token().map(str::to_owned))
        .build()
        .context("failed to build account client")
}

/// Loads config from `--dir` or the default location.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Opens the session store under `--dir` or the default data directory.
fn session_store(dir: Option<&PathBuf>) -> Result<SessionStore> {
    let path = resolve_session_path(dir).context("failed to resolve session path")?;
    Ok(SessionStore::new(path))
}

/// Formats `Option<i32>` years as `2008` or `--`.
fn year_label(year: Option<i32>) -> String {
    year.map_or_else(|| String::from("--"), |y| y.to_string())
}

/// Joins genre names with `, `.
fn genre_list(genres: &[TmdbGenre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Logs a cast table.
fn log_cast(cast: &[TmdbCastMember]) {
    if cast.is_empty() {
        return;
    }
    tracing::info!("Cast:");
    for member in cast {
        tracing::info!(
            "  {}\t{}",
            member.name,
            member.character.as_deref().unwrap_or("-")
        );
    }
}

/// Runs the `home` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or every section fails.
#[instrument(skip_all)]
async fn run_home(config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let feed = home::load(&client).await;

    for error in &feed.errors {
        tracing::warn!("{}", error.user_message());
    }
    if feed.is_empty() && !feed.errors.is_empty() {
        bail!("could not load any home section");
    }

    if let Some(ref featured) = feed.featured {
        tracing::info!(
            "Featured: {} ({})",
            featured.title,
            year_label(featured.release_year())
        );
        if let Some(ref overview) = featured.overview {
            tracing::info!("  {overview}");
        }
        if let Some(ref backdrop) = featured.backdrop_path {
            tracing::info!("  {}", image_url("original", backdrop));
        }
    }

    log_section("Trending Movies", &feed.trending_movies);
    log_section("Trending TV Shows", &feed.trending_tv);
    log_section("Top Rated Movies", &feed.top_rated);
    log_section("Upcoming Movies", &feed.upcoming);

    Ok(())
}

/// Logs one titled list of items.
fn log_section<I: ListedTitle + cinedex_core::CatalogItem>(heading: &str, items: &[I]) {
    if items.is_empty() {
        return;
    }
    tracing::info!("--- {heading} ---");
    for item in items {
        tracing::info!(
            "{}\t{}\t{}\t{:.1}",
            item.id(),
            item.title(),
            year_label(item.year()),
            item.rating()
        );
    }
}

/// Runs the `movies` / `tv` subcommands: one page plus its pagination window.
///
/// # Errors
///
/// Returns an error if the request fails or returns nothing.
#[instrument(skip_all, fields(query = %args.query, page = args.page))]
async fn run_listing<S>(source: S, args: &ListArgs, config: &AppConfig) -> Result<()>
where
    S: CatalogSource,
    S::Item: ListedTitle,
{
    let query = FetchQuery::new(&args.query, args.page);
    let mut fetch = FetchOrchestrator::new(source.label());
    let ticket = fetch.begin(&query);
    let outcome = source.fetch_page(&query).await;
    fetch.complete(ticket, outcome);

    let page = match fetch.state() {
        FetchState::Success(page) => page,
        FetchState::Failure(error) => return Err(anyhow::Error::new(error.clone())),
        FetchState::Idle | FetchState::Loading => bail!("fetch did not settle"),
    };

    tracing::info!("ID\tTitle\t\t\tYear\tRating");
    log_section(source.label(), &page.items);

    let total_pages = page.total_pages.clamp(1, MAX_TOTAL_PAGES);
    let window = page_window(query.page, total_pages, config.browse.page_window);
    let labels: Vec<String> = window
        .iter()
        .map(|&n| {
            if n == query.page {
                format!("[{n}]")
            } else {
                n.to_string()
            }
        })
        .collect();
    tracing::info!(
        "Page {} of {}: {}",
        query.page,
        total_pages,
        labels.join(" ")
    );

    Ok(())
}

/// Logs whether the title is on the logged-in user's watchlist.
async fn log_watchlist_status(
    config: &AppConfig,
    session: &Session,
    media_type: MediaType,
    tmdb_id: u64,
) {
    if !session.logged_in() {
        return;
    }
    let status = match build_account_client(config, session) {
        Ok(account) => watchlist::check(&account, session, media_type, tmdb_id).await,
        Err(err) => Err(err),
    };
    match status {
        Ok(true) => tracing::info!("On your watchlist"),
        Ok(false) => tracing::info!("Not on your watchlist"),
        Err(err) => tracing::warn!(error = %format_args!("{err:#}"), "watchlist check failed"),
    }
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or any request fails.
#[instrument(skip_all, fields(id = args.id))]
async fn run_movie(args: &IdArgs, config: &AppConfig, session: &Session) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let movie_details = details::movie_details(&client, args.id).await?;
    let movie = &movie_details.movie;

    tracing::info!("{} ({})", movie.title, year_label(movie.release_year()));
    if let Some(tagline) = movie.tagline.as_ref().filter(|t| !t.is_empty()) {
        tracing::info!("\"{tagline}\"");
    }
    tracing::info!(
        "Rating: {:.1} ({} votes)",
        movie.vote_average,
        movie.vote_count
    );
    if let Some(runtime) = movie.runtime {
        tracing::info!("Runtime: {runtime} min");
    }
    tracing::info!("Status: {}", movie.status.as_deref().unwrap_or("-"));
    tracing::info!("Genres: {}", genre_list(&movie.genres));
    tracing::info!(
        "Director: {}",
        movie_details.director.as_deref().unwrap_or("-")
    );
    if let Some(ref overview) = movie.overview {
        tracing::info!("---");
        tracing::info!("{overview}");
    }
    log_cast(&movie_details.cast);
    if let Some(url) = movie_details.trailer.as_ref().and_then(|v| v.youtube_url()) {
        tracing::info!("Trailer: {url}");
    }
    log_section("Similar Movies", &movie_details.similar);
    log_watchlist_status(config, session, MediaType::Movie, movie.id).await;

    Ok(())
}

/// Runs the `show` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or any request fails.
#[instrument(skip_all, fields(id = args.id))]
async fn run_show(args: &IdArgs, config: &AppConfig, session: &Session) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let tv_details = details::tv_details(&client, args.id).await?;
    let show = &tv_details.show;

    tracing::info!("{} ({})", show.name, year_label(show.first_air_year()));
    if let Some(tagline) = show.tagline.as_ref().filter(|t| !t.is_empty()) {
        tracing::info!("\"{tagline}\"");
    }
    tracing::info!("Rating: {:.1}", show.vote_average);
    tracing::info!(
        "Seasons: {}  Episodes: {}",
        show.number_of_seasons,
        show.number_of_episodes
    );
    tracing::info!("Status: {}", show.status.as_deref().unwrap_or("-"));
    tracing::info!("Genres: {}", genre_list(&show.genres));
    if !tv_details.creators.is_empty() {
        tracing::info!("Created by: {}", tv_details.creators.join(", "));
    }
    if let Some(ref overview) = show.overview {
        tracing::info!("---");
        tracing::info!("{overview}");
    }
    log_cast(&tv_details.cast);
    if let Some(url) = tv_details.trailer.as_ref().and_then(|v| v.youtube_url()) {
        tracing::info!("Trailer: {url}");
    }
    log_section("Similar Shows", &tv_details.similar);
    log_watchlist_status(config, session, MediaType::Tv, show.id).await;

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let options = config.browse.options();
    let result = match args.catalog {
        Catalog::Movies => run_browser(Browser::new(MovieSource::new(client), options)).await,
        Catalog::Tv => run_browser(Browser::new(TvSource::new(client), options)).await,
    };
    result.context("browser TUI failed")
}

/// Runs the `login` subcommand.
///
/// # Errors
///
/// Returns an error if validation, the request or saving the session fails.
#[instrument(skip_all)]
async fn run_login(args: &LoginArgs, config: &AppConfig, store: &SessionStore) -> Result<()> {
    let account = build_account_client(config, &Session::logged_out())?;
    let session = auth::login(&account, store, &args.email, &args.password).await?;
    tracing::info!(
        "Logged in as {}",
        session.user_name().unwrap_or_default()
    );
    Ok(())
}

/// Runs the `register` subcommand.
///
/// # Errors
///
/// Returns an error if validation or the request fails.
#[instrument(skip_all)]
async fn run_register(args: &RegisterArgs, config: &AppConfig) -> Result<()> {
    let account = build_account_client(config, &Session::logged_out())?;
    let message = auth::register(&account, &args.name, &args.email, &args.password).await?;
    tracing::info!("{message}");
    Ok(())
}

/// Runs the `whoami` subcommand.
fn run_whoami(session: &Session) {
    match (session.user_name(), session.user_id()) {
        (Some(name), Some(id)) => tracing::info!("Logged in as {name} (id {id})"),
        _ => tracing::info!("Not logged in"),
    }
}

/// Runs the `watchlist` subcommands.
///
/// # Errors
///
/// Returns an error if not logged in or a request fails.
#[instrument(skip_all)]
async fn run_watchlist(
    cmd: &WatchlistSubcommands,
    config: &AppConfig,
    session: &Session,
) -> Result<()> {
    let account = build_account_client(config, session)?;
    match cmd {
        WatchlistSubcommands::List => {
            let entries = watchlist::list(&account, session).await?;
            if entries.is_empty() {
                tracing::info!("Your watchlist is empty.");
                return Ok(());
            }
            tracing::info!("ID\tType\tTitle");
            for entry in &entries {
                tracing::info!("{}\t{}\t{}", entry.tmdb_id, entry.media_type, entry.title);
            }
            tracing::info!("Total: {} titles", entries.len());
        }
        WatchlistSubcommands::Add(args) => {
            if !session.logged_in() {
                bail!(BrowseError::validation(watchlist::LOGIN_REQUIRED));
            }
            let client = build_tmdb_client(config)?;
            let title = match MediaType::from(args.media_type) {
                MediaType::Movie => details::movie_details(&client, args.id)
                    .await?
                    .watchlist_title(),
                MediaType::Tv => details::tv_details(&client, args.id)
                    .await?
                    .watchlist_title(),
            };
            watchlist::add(&account, session, &title).await?;
            tracing::info!("Added {} to your watchlist", title.title);
        }
        WatchlistSubcommands::Check(args) => {
            let media_type = MediaType::from(args.media_type);
            let present = watchlist::check(&account, session, media_type, args.id).await?;
            if present {
                tracing::info!("{media_type} {} is on your watchlist", args.id);
            } else {
                tracing::info!("{media_type} {} is not on your watchlist", args.id);
            }
        }
        WatchlistSubcommands::Remove(args) => {
            let media_type = MediaType::from(args.media_type);
            watchlist::remove(&account, session, media_type, args.id).await?;
            tracing::info!("Removed {media_type} {} from your watchlist", args.id);
        }
    }
    Ok(())
}

/// Opens the log file used while the TUI owns the terminal.
fn open_log_file(dir: Option<&PathBuf>) -> Result<File> {
    let path = resolve_log_path(dir).context("failed to resolve log path")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))
}

/// Installs the global subscriber. Logs go to `log_file` when given, stdout otherwise.
fn init_tracing(log_file: Option<File>) {
    let ansi = log_file.is_none();
    let writer = log_file.map_or_else(
        || BoxMakeWriter::new(io::stdout),
        |file| BoxMakeWriter::new(Mutex::new(file)),
    );

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = cli.dir.as_ref();

    let log_file = match cli.command {
        Commands::Browse(_) => Some(open_log_file(dir)?),
        _ => None,
    };
    init_tracing(log_file);

    if let Commands::Completions(ref args) = cli.command {
        clap_complete::generate(
            args.shell,
            &mut Cli::command(),
            env!("CARGO_BIN_NAME"),
            &mut io::stdout(),
        );
        return Ok(());
    }

    let config = load_config(dir)?;
    let store = session_store(dir)?;
    let session = store.load().context("failed to load session")?;

    match cli.command {
        Commands::Home => run_home(&config).await,
        Commands::Movies(ref args) => {
            let source = MovieSource::new(build_tmdb_client(&config)?);
            run_listing(source, args, &config).await
        }
        Commands::Tv(ref args) => {
            let source = TvSource::new(build_tmdb_client(&config)?);
            run_listing(source, args, &config).await
        }
        Commands::Movie(ref args) => run_movie(args, &config, &session).await,
        Commands::Show(ref args) => run_show(args, &config, &session).await,
        Commands::Browse(ref args) => run_browse(args, &config).await,
        Commands::Login(ref args) => run_login(args, &config, &store).await,
        Commands::Register(ref args) => run_register(args, &config).await,
        Commands::Logout => {
            auth::logout(&store)?;
            tracing::info!("Logged out");
            Ok(())
        }
        Commands::Whoami => {
            run_whoami(&session);
            Ok(())
        }
        Commands::Watchlist(ref cmd) => run_watchlist(&cmd.command, &config, &session).await,
        Commands::Completions(_) => Ok(()),
    }
}
