//! Landing feed: trending, top-rated and upcoming titles.

use anyhow::Result;
use cinedex_api::tmdb::{TmdbApi, TmdbMovie, TmdbPage, TmdbTvShow, TrendingWindow};
use tracing::instrument;

use crate::error::BrowseError;

/// Items kept per section.
pub const SECTION_LEN: usize = 10;

/// The four home sections plus the featured title.
#[derive(Debug, Clone, Default)]
pub struct HomeFeed {
    /// First trending movie.
    pub featured: Option<TmdbMovie>,
    /// Today's trending movies.
    pub trending_movies: Vec<TmdbMovie>,
    /// Today's trending TV shows.
    pub trending_tv: Vec<TmdbTvShow>,
    /// Top-rated movies.
    pub top_rated: Vec<TmdbMovie>,
    /// Upcoming movies.
    pub upcoming: Vec<TmdbMovie>,
    /// One entry per section that could not be loaded.
    pub errors: Vec<BrowseError>,
}

impl HomeFeed {
    /// Whether every section came back empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trending_movies.is_empty()
            && self.trending_tv.is_empty()
            && self.top_rated.is_empty()
            && self.upcoming.is_empty()
    }
}

/// Keeps the first [`SECTION_LEN`] items, or records the failure and keeps none.
fn section<I>(label: &str, outcome: Result<TmdbPage<I>>, errors: &mut Vec<BrowseError>) -> Vec<I> {
    match outcome {
        Ok(page) => page.results.into_iter().take(SECTION_LEN).collect(),
        Err(err) => {
            tracing::warn!(
                section = label,
                error = %format_args!("{err:#}"),
                "home section failed"
            );
            errors.push(BrowseError::network(label));
            Vec::new()
        }
    }
}

/// Loads all sections concurrently. A failing section is left empty.
#[instrument(skip_all)]
pub async fn load<A: TmdbApi + Sync>(api: &A) -> HomeFeed {
    let (trending_movies, trending_tv, top_rated, upcoming) = futures::join!(
        api.trending_movies(TrendingWindow::Day, 1),
        api.trending_tv(TrendingWindow::Day, 1),
        api.top_rated_movies(1),
        api.upcoming_movies(1),
    );

    let mut errors = Vec::new();
    let trending_movies = section("trending movies", trending_movies, &mut errors);
    let trending_tv = section("trending TV shows", trending_tv, &mut errors);
    let top_rated = section("top rated movies", top_rated, &mut errors);
    let upcoming = section("upcoming movies", upcoming, &mut errors);

    HomeFeed {
        featured: trending_movies.first().cloned(),
        trending_movies,
        trending_tv,
        top_rated,
        upcoming,
        errors,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use anyhow::anyhow;

    use super::*;
    use crate::details::tests::FixtureTmdb;

    #[tokio::test]
    async fn test_load_fills_every_section() {
        // Arrange
        let api = FixtureTmdb::default();

        // Act
        let feed = load(&api).await;

        // Assert
        assert_eq!(feed.featured.as_ref().map(|movie| movie.id), Some(155));
        assert_eq!(feed.trending_movies.len(), 2);
        assert_eq!(feed.trending_tv.len(), 2);
        assert_eq!(feed.top_rated.len(), 3);
        assert_eq!(feed.upcoming.len(), 2);
        assert!(feed.errors.is_empty());
        assert!(!feed.is_empty());
    }

    #[tokio::test]
    async fn test_failed_section_is_left_empty() {
        // Arrange
        let api = FixtureTmdb::failing(&["trending_movies", "upcoming_movies"]);

        // Act
        let feed = load(&api).await;

        // Assert
        assert!(feed.featured.is_none());
        assert!(feed.trending_movies.is_empty());
        assert!(feed.upcoming.is_empty());
        assert_eq!(feed.trending_tv.len(), 2);
        assert_eq!(
            feed.errors,
            vec![
                BrowseError::network("trending movies"),
                BrowseError::network("upcoming movies"),
            ]
        );
    }

    #[test]
    fn test_section_truncates() {
        // Arrange
        let page = TmdbPage {
            page: 1,
            results: (0..25).collect::<Vec<u32>>(),
            total_pages: 1,
            total_results: 25,
        };
        let mut errors = Vec::new();

        // Act
        let kept = section("numbers", Ok(page), &mut errors);
        let failed: Vec<u32> = section("numbers", Err(anyhow!("boom")), &mut errors);

        // Assert
        assert_eq!(kept, (0..10).collect::<Vec<u32>>());
        assert!(failed.is_empty());
        assert_eq!(errors.len(), 1);
    }
}
