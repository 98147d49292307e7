//! Catalog browser TUI.
//!
//! Uses `ratatui` + `crossterm` for rendering. Key input and browser events
//! (debounce commits, fetch completions) are multiplexed on one task.

/// Browser view state types.
pub mod state;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use cinedex_core::{BrowseEvent, Browser, CatalogSource};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use self::state::{BrowserViewState, InputMode, ListedTitle};

/// How often pending key input is drained between browser events.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<S>(mut browser: Browser<S>) -> Result<()>
where
    S: CatalogSource,
    S::Item: ListedTitle,
{
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = BrowserViewState::new();
    let result = run_event_loop(&mut terminal, &mut browser, &mut state).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    browser: &mut Browser<S>,
    state: &mut BrowserViewState,
) -> Result<()>
where
    S: CatalogSource,
    S::Item: ListedTitle,
{
    browser.start();

    loop {
        terminal
            .draw(|frame| ui::draw(frame, browser, state))
            .context("failed to draw TUI")?;

        tokio::select! {
            browse_event = browser.next_event() => {
                on_browse_event(browser, state, &browse_event);
            }
            () = tokio::time::sleep(INPUT_POLL_INTERVAL) => {
                while event::poll(Duration::ZERO).context("failed to poll events")? {
                    if let Event::Key(key) = event::read().context("failed to read event")?
                        && key.kind == KeyEventKind::Press
                    {
                        let quit = match state.input_mode {
                            InputMode::Search => {
                                handle_search_input(browser, state, key.code);
                                false
                            }
                            InputMode::Normal => {
                                handle_normal_input(browser, state, key.code, key.modifiers)
                            }
                        };
                        if quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Keeps the cursor consistent with what the browser now shows.
fn on_browse_event<S: CatalogSource>(
    browser: &Browser<S>,
    state: &mut BrowserViewState,
    browse_event: &BrowseEvent,
) {
    match browse_event {
        BrowseEvent::Loaded { .. } | BrowseEvent::Failed { .. } => {
            state.reset_cursor(browser.fetch().items().len());
        }
        BrowseEvent::Committed { .. } | BrowseEvent::Discarded { .. } => {}
    }
}

/// Handles key input in search mode.
fn handle_search_input<S: CatalogSource>(
    browser: &mut Browser<S>,
    state: &mut BrowserViewState,
    key: KeyCode,
) {
    match key {
        KeyCode::Esc => {
            state.search_clear();
            browser.input("");
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            browser.input(state.search_pop());
        }
        KeyCode::Char(c) => {
            browser.input(state.search_push(c));
        }
        _ => {}
    }
}

/// Handles key input in normal mode. Returns `true` to exit.
fn handle_normal_input<S>(
    browser: &mut Browser<S>,
    state: &mut BrowserViewState,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> bool
where
    S: CatalogSource,
    S::Item: ListedTitle,
{
    let len = browser.fetch().items().len();
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(len),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
            browser.prev_page();
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
            browser.next_page();
        }
        KeyCode::Home => {
            browser.set_page(1);
        }
        KeyCode::End => {
            browser.set_page(browser.state().total_pages());
        }
        KeyCode::Char('/') => state.input_mode = InputMode::Search,
        KeyCode::Char('r') => {
            browser.reload();
        }
        KeyCode::Char('o') => open_title_page(browser, state),
        _ => {}
    }
    false
}

/// Opens the TMDB page for the selected title.
fn open_title_page<S>(browser: &Browser<S>, state: &BrowserViewState)
where
    S: CatalogSource,
    S::Item: ListedTitle,
{
    let Some(item) = browser.fetch().items().get(state.cursor()) else {
        return;
    };
    let url = item.web_url();
    if let Err(err) = open::that(&url) {
        tracing::warn!(%url, error = %err, "failed to open browser");
    }
}
