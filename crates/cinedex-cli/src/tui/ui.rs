//! TUI rendering logic for the catalog browser.

use cinedex_core::{Browser, CatalogSource, FetchState, QueryMode};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use super::state::{BrowserViewState, InputMode, ListedTitle};

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw<S>(frame: &mut Frame, browser: &Browser<S>, state: &mut BrowserViewState)
where
    S: CatalogSource,
    S::Item: ListedTitle,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box + status
            Constraint::Min(5),    // results
            Constraint::Length(3), // page window
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], browser, state);
    draw_results(frame, chunks[1], browser, state);
    draw_pager(frame, chunks[2], browser);
    draw_footer(frame, chunks[3], state);
}

/// Draws the search box and the mode/status line.
#[allow(clippy::indexing_slicing)]
fn draw_header<S: CatalogSource>(
    frame: &mut Frame,
    area: Rect,
    browser: &Browser<S>,
    state: &BrowserViewState,
) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let search_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(state.search.clone())
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, header_chunks[0]);

    let query = browser.state();
    let status = if query.is_debouncing() {
        String::from("typing...")
    } else if query.is_loading() {
        String::from("loading...")
    } else {
        match browser.mode() {
            QueryMode::Discover => String::from("trending today"),
            QueryMode::Search => format!("results for \"{}\"", query.debounced_term()),
        }
    };
    let title = format!(" {} ", capitalize(browser.label()));
    let status = Paragraph::new(status).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(status, header_chunks[1]);
}

/// Draws the result table, or the loading/error message in its place.
fn draw_results<S>(frame: &mut Frame, area: Rect, browser: &Browser<S>, state: &mut BrowserViewState)
where
    S: CatalogSource,
    S::Item: ListedTitle,
{
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Results ")
        .border_style(Style::default().fg(Color::Cyan));

    let message = match browser.fetch().state() {
        FetchState::Idle => Some((String::new(), Style::default())),
        FetchState::Loading => Some((
            String::from("Loading..."),
            Style::default().fg(Color::DarkGray),
        )),
        FetchState::Failure(error) => Some((
            error.user_message().to_owned(),
            Style::default().fg(Color::Red),
        )),
        FetchState::Success(_) => None,
    };
    if let Some((text, style)) = message {
        frame.render_widget(Paragraph::new(text).style(style).block(block), area);
        return;
    }

    let header = Row::new(vec!["#", "Title", "Year", "Rating"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = browser
        .fetch()
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Row::new(vec![
                i.saturating_add(1).to_string(),
                item.title().to_owned(),
                item.year()
                    .map_or_else(|| String::from("--"), |y| y.to_string()),
                format!("{:.1}", item.rating()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the pagination window with the current page highlighted.
fn draw_pager<S: CatalogSource>(frame: &mut Frame, area: Rect, browser: &Browser<S>) {
    let query = browser.state();
    let mut spans = vec![Span::raw("\u{ab} ")];
    for n in browser.window() {
        if n == query.page() {
            spans.push(Span::styled(
                format!("[{n}]"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(format!(" {n} ")));
        }
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw("\u{bb}"));
    spans.push(Span::styled(
        format!("   page {} of {}", query.page(), query.total_pages()),
        Style::default().fg(Color::DarkGray),
    ));

    let pager = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(pager, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserViewState) {
    let help_text = match state.input_mode {
        InputMode::Search => Line::from("Type to search | Esc: clear | Enter: done"),
        InputMode::Normal => Line::from(vec![Span::raw(
            "\u{2191}\u{2193}/j/k: move  \u{2190}\u{2192}/h/l: page  /: search  r: reload  o: open  q: quit",
        )]),
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Upper-cases the first letter (`"movies"` -> `"Movies"`).
fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
