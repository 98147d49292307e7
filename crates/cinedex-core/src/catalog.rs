//! Catalog sources: the discover/search endpoint pair behind a browser.

use anyhow::Result;
use cinedex_api::tmdb::{
    SearchMovieParams, SearchTvParams, TmdbApi, TmdbMovie, TmdbPage, TmdbTvShow, TrendingWindow,
};
use tracing::instrument;

use crate::query::{FetchQuery, QueryMode};

/// An entry a browser can list. Only the id is interpreted.
pub trait CatalogItem {
    /// Stable catalog id, used for de-duplication.
    fn id(&self) -> u64;
}

impl CatalogItem for TmdbMovie {
    fn id(&self) -> u64 {
        self.id
    }
}

impl CatalogItem for TmdbTvShow {
    fn id(&self) -> u64 {
        self.id
    }
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct CatalogPage<I> {
    /// Items on this page.
    pub items: Vec<I>,
    /// Total pages reported by the catalog.
    pub total_pages: u32,
}

impl<I> From<TmdbPage<I>> for CatalogPage<I> {
    fn from(page: TmdbPage<I>) -> Self {
        Self {
            items: page.results,
            total_pages: page.total_pages,
        }
    }
}

/// A catalog that can be browsed page by page.
///
/// An empty term is served by the discover endpoint, anything else by search.
pub trait CatalogSource: Send + Sync + 'static {
    /// Item type listed by this catalog.
    type Item: CatalogItem + Clone + Send + 'static;

    /// Plural noun used in user-facing messages (e.g. `"movies"`).
    fn label(&self) -> &'static str;

    /// Fetches one page for `query`.
    fn fetch_page(
        &self,
        query: &FetchQuery,
    ) -> impl Future<Output = Result<CatalogPage<Self::Item>>> + Send;
}

/// Movies: `trending/movie/day` or `search/movie`.
#[derive(Debug)]
pub struct MovieSource<A> {
    api: A,
}

impl<A> MovieSource<A> {
    /// Wraps a TMDB client.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Underlying client.
    pub const fn api(&self) -> &A {
        &self.api
    }
}

impl<A: TmdbApi + Sync + 'static> CatalogSource for MovieSource<A> {
    type Item = TmdbMovie;

    fn label(&self) -> &'static str {
        "movies"
    }

    #[instrument(skip_all, fields(term = %query.term, page = query.page))]
    async fn fetch_page(&self, query: &FetchQuery) -> Result<CatalogPage<TmdbMovie>> {
        let page = match query.mode() {
            QueryMode::Discover => {
                self.api
                    .trending_movies(TrendingWindow::Day, query.page)
                    .await?
            }
            QueryMode::Search => {
                let params = SearchMovieParams::new(query.term.as_str()).page(query.page);
                self.api.search_movie(&params).await?
            }
        };
        Ok(page.into())
    }
}

/// TV shows: `trending/tv/day` or `search/tv`.
#[derive(Debug)]
pub struct TvSource<A> {
    api: A,
}

impl<A> TvSource<A> {
    /// Wraps a TMDB client.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Underlying client.
    pub const fn api(&self) -> &A {
        &self.api
    }
}

impl<A: TmdbApi + Sync + 'static> CatalogSource for TvSource<A> {
    type Item = TmdbTvShow;

    fn label(&self) -> &'static str {
        "TV shows"
    }

    #[instrument(skip_all, fields(term = %query.term, page = query.page))]
    async fn fetch_page(&self, query: &FetchQuery) -> Result<CatalogPage<TmdbTvShow>> {
        let page = match query.mode() {
            QueryMode::Discover => self.api.trending_tv(TrendingWindow::Day, query.page).await?,
            QueryMode::Search => {
                let params = SearchTvParams::new(query.term.as_str()).page(query.page);
                self.api.search_tv(&params).await?
            }
        };
        Ok(page.into())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Mutex;

    use anyhow::bail;
    use cinedex_api::MediaType;
    use cinedex_api::tmdb::{
        MoviePage, TmdbCredits, TmdbMovieDetails, TmdbTvDetails, TmdbVideos, TvPage,
    };

    use super::*;

    /// Records which endpoint was called; lists are built from fixtures.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingTmdb {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingTmdb {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn movies_fixture() -> MoviePage {
        serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/search_movie_batman.json"
        ))
        .unwrap()
    }

    fn tv_fixture() -> TvPage {
        serde_json::from_str(include_str!("../../../fixtures/tmdb/trending_tv_day.json")).unwrap()
    }

    impl TmdbApi for RecordingTmdb {
        async fn trending_movies(&self, window: TrendingWindow, page: u32) -> Result<MoviePage> {
            self.record(format!("trending_movies:{}:{page}", window.as_str()));
            Ok(movies_fixture())
        }

        async fn trending_tv(&self, window: TrendingWindow, page: u32) -> Result<TvPage> {
            self.record(format!("trending_tv:{}:{page}", window.as_str()));
            Ok(tv_fixture())
        }

        async fn search_movie(&self, params: &SearchMovieParams) -> Result<MoviePage> {
            self.record(format!("search_movie:{}:{}", params.query, params.page));
            Ok(movies_fixture())
        }

        async fn search_tv(&self, params: &SearchTvParams) -> Result<TvPage> {
            self.record(format!("search_tv:{}:{}", params.query, params.page));
            Ok(tv_fixture())
        }

        async fn top_rated_movies(&self, _page: u32) -> Result<MoviePage> {
            bail!("not used")
        }

        async fn upcoming_movies(&self, _page: u32) -> Result<MoviePage> {
            bail!("not used")
        }

        async fn movie_details(&self, _movie_id: u64) -> Result<TmdbMovieDetails> {
            bail!("not used")
        }

        async fn tv_details(&self, _series_id: u64) -> Result<TmdbTvDetails> {
            bail!("not used")
        }

        async fn credits(&self, _media: MediaType, _id: u64) -> Result<TmdbCredits> {
            bail!("not used")
        }

        async fn videos(&self, _media: MediaType, _id: u64) -> Result<TmdbVideos> {
            bail!("not used")
        }

        async fn similar_movies(&self, _movie_id: u64) -> Result<MoviePage> {
            bail!("not used")
        }

        async fn similar_tv(&self, _series_id: u64) -> Result<TvPage> {
            bail!("not used")
        }
    }

    #[tokio::test]
    async fn test_movie_source_empty_term_uses_trending() {
        // Arrange
        let source = MovieSource::new(RecordingTmdb::default());

        // Act
        let page = source.fetch_page(&FetchQuery::new("", 1)).await.unwrap();

        // Assert
        assert_eq!(source.api().calls(), vec!["trending_movies:day:1"]);
        assert_eq!(page.total_pages, 7);
        assert_eq!(page.items.len(), 3);
    }

    #[tokio::test]
    async fn test_movie_source_term_uses_search() {
        // Arrange
        let source = MovieSource::new(RecordingTmdb::default());

        // Act
        source
            .fetch_page(&FetchQuery::new("batman", 2))
            .await
            .unwrap();

        // Assert
        assert_eq!(source.api().calls(), vec!["search_movie:batman:2"]);
    }

    #[tokio::test]
    async fn test_tv_source_routes_by_mode() {
        // Arrange
        let source = TvSource::new(RecordingTmdb::default());

        // Act
        let discover = source.fetch_page(&FetchQuery::new("  ", 3)).await.unwrap();
        source
            .fetch_page(&FetchQuery::new("breaking", 1))
            .await
            .unwrap();

        // Assert
        assert_eq!(
            source.api().calls(),
            vec!["trending_tv:day:3", "search_tv:breaking:1"]
        );
        assert_eq!(discover.items[0].id(), 1396);
        assert_eq!(source.label(), "TV shows");
    }
}
