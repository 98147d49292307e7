//! Browser TUI state that lives outside the core [`Browser`](cinedex_core::Browser).

use cinedex_api::tmdb::{TmdbMovie, TmdbTvShow};
use ratatui::widgets::TableState;

/// Website for title pages opened with `o`.
const TMDB_WEB_URL: &str = "https://www.themoviedb.org";

/// Columns the browser table needs from a catalog item.
pub trait ListedTitle {
    /// Display title.
    fn title(&self) -> &str;
    /// Release or first-air year.
    fn year(&self) -> Option<i32>;
    /// Average vote (0-10).
    fn rating(&self) -> f64;
    /// Title page on the TMDB website.
    fn web_url(&self) -> String;
}

impl ListedTitle for TmdbMovie {
    fn title(&self) -> &str {
        &self.title
    }

    fn year(&self) -> Option<i32> {
        self.release_year()
    }

    fn rating(&self) -> f64 {
        self.vote_average
    }

    fn web_url(&self) -> String {
        format!("{TMDB_WEB_URL}/movie/{}", self.id)
    }
}

impl ListedTitle for TmdbTvShow {
    fn title(&self) -> &str {
        &self.name
    }

    fn year(&self) -> Option<i32> {
        self.first_air_year()
    }

    fn rating(&self) -> f64 {
        self.vote_average
    }

    fn web_url(&self) -> String {
        format!("{TMDB_WEB_URL}/tv/{}", self.id)
    }
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Cursor and page navigation.
    Normal,
    /// Typing into the search box.
    Search,
}

/// Cursor and search-box state.
#[derive(Debug)]
pub struct BrowserViewState {
    /// Current input mode.
    pub input_mode: InputMode,
    /// Text in the search box.
    pub search: String,
    /// Table state for the result list (handles selection and scroll).
    pub table_state: TableState,
}

impl Default for BrowserViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserViewState {
    /// Creates an empty state in normal mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input_mode: InputMode::Normal,
            search: String::new(),
            table_state: TableState::default(),
        }
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Puts the cursor on the first of `len` rows, or clears it when empty.
    pub fn reset_cursor(&mut self, len: usize) {
        self.table_state.select((len > 0).then_some(0));
        *self.table_state.offset_mut() = 0;
    }

    /// Moves cursor up.
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if let Some(prev) = current.checked_sub(1) {
            self.table_state.select(Some(prev));
        }
    }

    /// Moves cursor down within `len` rows.
    pub fn move_down(&mut self, len: usize) {
        let next = self.cursor().saturating_add(1);
        if next < len {
            self.table_state.select(Some(next));
        }
    }

    /// Appends a character to the search box and returns the new text.
    pub fn search_push(&mut self, c: char) -> &str {
        self.search.push(c);
        &self.search
    }

    /// Removes the last character from the search box and returns the new text.
    pub fn search_pop(&mut self) -> &str {
        self.search.pop();
        &self.search
    }

    /// Empties the search box.
    pub fn search_clear(&mut self) {
        self.search.clear();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinedex_api::tmdb::{MoviePage, TvPage};

    use super::*;

    #[test]
    fn test_initial_state() {
        // Arrange & Act
        let state = BrowserViewState::new();

        // Assert
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.search.is_empty());
        assert_eq!(state.table_state.selected(), None);
    }

    #[test]
    fn test_move_down_and_up() {
        // Arrange
        let mut state = BrowserViewState::new();
        state.reset_cursor(2);

        // Act & Assert
        state.move_down(2);
        assert_eq!(state.cursor(), 1);

        state.move_down(2); // at end, should not move
        assert_eq!(state.cursor(), 1);

        state.move_up();
        assert_eq!(state.cursor(), 0);

        state.move_up(); // at start, should not move
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_reset_cursor() {
        // Arrange
        let mut state = BrowserViewState::new();
        state.reset_cursor(20);
        state.move_down(20);
        state.move_down(20);

        // Act
        state.reset_cursor(20);

        // Assert
        assert_eq!(state.table_state.selected(), Some(0));

        // Act: empty result clears the selection
        state.reset_cursor(0);

        // Assert
        assert_eq!(state.table_state.selected(), None);
    }

    #[test]
    fn test_search_edit() {
        // Arrange
        let mut state = BrowserViewState::new();

        // Act & Assert
        assert_eq!(state.search_push('b'), "b");
        assert_eq!(state.search_push('a'), "ba");
        assert_eq!(state.search_pop(), "b");
        state.search_clear();
        assert_eq!(state.search_pop(), "");
    }

    #[test]
    fn test_listed_title_columns() {
        // Arrange
        let movies: MoviePage = serde_json::from_str(include_str!(
            "../../../../fixtures/tmdb/trending_movie_day.json"
        ))
        .unwrap();
        let shows: TvPage = serde_json::from_str(include_str!(
            "../../../../fixtures/tmdb/trending_tv_day.json"
        ))
        .unwrap();
        let movie = movies.results.first().unwrap();
        let show = shows.results.first().unwrap();

        // Act & Assert
        assert_eq!(movie.title(), "The Dark Knight");
        assert_eq!(movie.year(), Some(2008));
        assert_eq!(movie.web_url(), "https://www.themoviedb.org/movie/155");
        assert_eq!(show.title(), "Breaking Bad");
        assert_eq!(show.web_url(), "https://www.themoviedb.org/tv/1396");
    }
}
