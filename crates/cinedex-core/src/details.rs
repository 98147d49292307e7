//! Detail views: a title with its cast, crew highlights, trailer and similar titles.

use anyhow::Result;
use cinedex_api::MediaType;
use cinedex_api::tmdb::{
    TmdbApi, TmdbCastMember, TmdbCredits, TmdbMovie, TmdbMovieDetails, TmdbTvDetails, TmdbTvShow,
    TmdbVideo, TmdbVideos,
};
use tracing::instrument;

use crate::error::BrowseError;
use crate::watchlist::WatchlistTitle;

/// Cast members kept per title.
pub const MAX_CAST: usize = 10;
/// Similar titles kept per title.
pub const MAX_SIMILAR: usize = 5;

const MOVIE_FAILED: &str = "Could not fetch movie details. Please try again later.";
const TV_FAILED: &str = "Could not fetch TV show details. Please try again later.";

/// Everything shown on a movie page.
#[derive(Debug, Clone)]
pub struct MovieDetails {
    /// Core record.
    pub movie: TmdbMovieDetails,
    /// Top-billed cast, at most [`MAX_CAST`].
    pub cast: Vec<TmdbCastMember>,
    /// Director's name, if credited.
    pub director: Option<String>,
    /// Similar movies, at most [`MAX_SIMILAR`].
    pub similar: Vec<TmdbMovie>,
    /// First YouTube trailer.
    pub trailer: Option<TmdbVideo>,
}

impl MovieDetails {
    /// The watchlist record for this movie.
    #[must_use]
    pub fn watchlist_title(&self) -> WatchlistTitle {
        WatchlistTitle {
            tmdb_id: self.movie.id,
            media_type: MediaType::Movie,
            title: self.movie.title.clone(),
            poster_path: self.movie.poster_path.clone(),
            backdrop_path: self.movie.backdrop_path.clone(),
        }
    }
}

/// Everything shown on a TV show page.
#[derive(Debug, Clone)]
pub struct TvDetails {
    /// Core record.
    pub show: TmdbTvDetails,
    /// Top-billed cast, at most [`MAX_CAST`].
    pub cast: Vec<TmdbCastMember>,
    /// Creators' names.
    pub creators: Vec<String>,
    /// Similar shows, at most [`MAX_SIMILAR`].
    pub similar: Vec<TmdbTvShow>,
    /// First YouTube trailer.
    pub trailer: Option<TmdbVideo>,
}

impl TvDetails {
    /// The watchlist record for this show.
    #[must_use]
    pub fn watchlist_title(&self) -> WatchlistTitle {
        WatchlistTitle {
            tmdb_id: self.show.id,
            media_type: MediaType::Tv,
            title: self.show.name.clone(),
            poster_path: self.show.poster_path.clone(),
            backdrop_path: self.show.backdrop_path.clone(),
        }
    }
}

/// First crew member credited as `Director`.
#[must_use]
pub fn director(credits: &TmdbCredits) -> Option<String> {
    credits
        .crew
        .iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.clone())
}

/// First video that is a `Trailer` hosted on `YouTube`.
#[must_use]
pub fn trailer(videos: &TmdbVideos) -> Option<TmdbVideo> {
    videos
        .results
        .iter()
        .find(|video| video.video_type == "Trailer" && video.site == "YouTube")
        .cloned()
}

/// Creator names from the show record, then any crew credited as `Creator`.
fn creators(show: &TmdbTvDetails, credits: &TmdbCredits) -> Vec<String> {
    let mut names: Vec<String> = show
        .created_by
        .iter()
        .map(|creator| creator.name.clone())
        .collect();
    for member in credits.crew.iter().filter(|member| member.job == "Creator") {
        if !names.contains(&member.name) {
            names.push(member.name.clone());
        }
    }
    names
}

fn failure(err: &anyhow::Error, message: &str) -> anyhow::Error {
    tracing::warn!(error = %format_args!("{err:#}"), "details request failed");
    BrowseError::Network {
        message: String::from(message),
    }
    .into()
}

/// Fetches a movie with its credits, videos and similar titles concurrently.
///
/// # Errors
///
/// [`BrowseError::Network`] if any of the four requests fails.
#[instrument(skip(api))]
pub async fn movie_details<A: TmdbApi + Sync>(api: &A, movie_id: u64) -> Result<MovieDetails> {
    let (movie, credits, videos, similar) = futures::try_join!(
        api.movie_details(movie_id),
        api.credits(MediaType::Movie, movie_id),
        api.videos(MediaType::Movie, movie_id),
        api.similar_movies(movie_id),
    )
    .map_err(|err| failure(&err, MOVIE_FAILED))?;

    Ok(MovieDetails {
        movie,
        director: director(&credits),
        cast: credits.cast.into_iter().take(MAX_CAST).collect(),
        similar: similar.results.into_iter().take(MAX_SIMILAR).collect(),
        trailer: trailer(&videos),
    })
}

/// Fetches a TV show with its credits, videos and similar titles concurrently.
///
/// # Errors
///
/// [`BrowseError::Network`] if any of the four requests fails.
#[instrument(skip(api))]
pub async fn tv_details<A: TmdbApi + Sync>(api: &A, series_id: u64) -> Result<TvDetails> {
    let (show, credits, videos, similar) = futures::try_join!(
        api.tv_details(series_id),
        api.credits(MediaType::Tv, series_id),
        api.videos(MediaType::Tv, series_id),
        api.similar_tv(series_id),
    )
    .map_err(|err| failure(&err, TV_FAILED))?;

    Ok(TvDetails {
        creators: creators(&show, &credits),
        show,
        cast: credits.cast.into_iter().take(MAX_CAST).collect(),
        similar: similar.results.into_iter().take(MAX_SIMILAR).collect(),
        trailer: trailer(&videos),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::HashSet;

    use anyhow::bail;
    use cinedex_api::tmdb::{
        MoviePage, SearchMovieParams, SearchTvParams, TmdbCrewMember, TrendingWindow, TvPage,
    };

    use super::*;

    fn parse<T: serde::de::DeserializeOwned>(json: &str) -> T {
        serde_json::from_str(json).unwrap()
    }

    /// Serves every endpoint from fixtures; endpoints named in `failing` error out.
    #[derive(Debug, Default)]
    pub(crate) struct FixtureTmdb {
        pub(crate) failing: HashSet<&'static str>,
    }

    impl FixtureTmdb {
        pub(crate) fn failing(endpoints: &[&'static str]) -> Self {
            Self {
                failing: endpoints.iter().copied().collect(),
            }
        }

        fn guard(&self, endpoint: &'static str) -> Result<()> {
            if self.failing.contains(endpoint) {
                bail!("TMDB API error (HTTP 503) on {endpoint}");
            }
            Ok(())
        }
    }

    impl TmdbApi for FixtureTmdb {
        async fn trending_movies(&self, _window: TrendingWindow, _page: u32) -> Result<MoviePage> {
            self.guard("trending_movies")?;
            Ok(parse(include_str!(
                "../../../fixtures/tmdb/trending_movie_day.json"
            )))
        }

        async fn trending_tv(&self, _window: TrendingWindow, _page: u32) -> Result<TvPage> {
            self.guard("trending_tv")?;
            Ok(parse(include_str!("../../../fixtures/tmdb/trending_tv_day.json")))
        }

        async fn search_movie(&self, _params: &SearchMovieParams) -> Result<MoviePage> {
            self.guard("search_movie")?;
            Ok(parse(include_str!(
                "../../../fixtures/tmdb/search_movie_batman.json"
            )))
        }

        async fn search_tv(&self, _params: &SearchTvParams) -> Result<TvPage> {
            self.guard("search_tv")?;
            Ok(parse(include_str!("../../../fixtures/tmdb/search_empty.json")))
        }

        async fn top_rated_movies(&self, _page: u32) -> Result<MoviePage> {
            self.guard("top_rated_movies")?;
            Ok(parse(include_str!(
                "../../../fixtures/tmdb/search_movie_batman.json"
            )))
        }

        async fn upcoming_movies(&self, _page: u32) -> Result<MoviePage> {
            self.guard("upcoming_movies")?;
            Ok(parse(include_str!(
                "../../../fixtures/tmdb/movie_similar_155.json"
            )))
        }

        async fn movie_details(&self, _movie_id: u64) -> Result<TmdbMovieDetails> {
            self.guard("movie_details")?;
            Ok(parse(include_str!(
                "../../../fixtures/tmdb/movie_details_155.json"
            )))
        }

        async fn tv_details(&self, _series_id: u64) -> Result<TmdbTvDetails> {
            self.guard("tv_details")?;
            Ok(parse(include_str!("../../../fixtures/tmdb/tv_details_1396.json")))
        }

        async fn credits(&self, media: MediaType, _id: u64) -> Result<TmdbCredits> {
            self.guard("credits")?;
            Ok(match media {
                MediaType::Movie => parse(include_str!(
                    "../../../fixtures/tmdb/movie_credits_155.json"
                )),
                MediaType::Tv => parse(include_str!("../../../fixtures/tmdb/tv_credits_1396.json")),
            })
        }

        async fn videos(&self, media: MediaType, _id: u64) -> Result<TmdbVideos> {
            self.guard("videos")?;
            Ok(match media {
                MediaType::Movie => parse(include_str!(
                    "../../../fixtures/tmdb/movie_videos_155.json"
                )),
                MediaType::Tv => parse(include_str!("../../../fixtures/tmdb/tv_videos_1396.json")),
            })
        }

        async fn similar_movies(&self, _movie_id: u64) -> Result<MoviePage> {
            self.guard("similar_movies")?;
            Ok(parse(include_str!(
                "../../../fixtures/tmdb/movie_similar_155.json"
            )))
        }

        async fn similar_tv(&self, _series_id: u64) -> Result<TvPage> {
            self.guard("similar_tv")?;
            Ok(parse(include_str!("../../../fixtures/tmdb/trending_tv_day.json")))
        }
    }

    fn crew(name: &str, job: &str) -> TmdbCrewMember {
        TmdbCrewMember {
            id: 1,
            name: String::from(name),
            job: String::from(job),
            department: String::from("Directing"),
        }
    }

    #[tokio::test]
    async fn test_movie_details_assembles_all_parts() {
        // Arrange
        let api = FixtureTmdb::default();

        // Act
        let details = movie_details(&api, 155).await.unwrap();

        // Assert
        assert_eq!(details.movie.title, "The Dark Knight");
        assert_eq!(details.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(details.cast.len(), 3);
        assert_eq!(details.similar.len(), 2);
        let trailer = details.trailer.unwrap();
        assert_eq!(trailer.key, "EXeTwQWrcwY");
        assert_eq!(trailer.site, "YouTube");
    }

    #[tokio::test]
    async fn test_movie_details_any_failure_is_network_error() {
        // Arrange
        let api = FixtureTmdb::failing(&["videos"]);

        // Act
        let err = movie_details(&api, 155).await.unwrap_err();

        // Assert
        let error = err.downcast_ref::<BrowseError>().unwrap();
        assert_eq!(error.user_message(), MOVIE_FAILED);
    }

    #[tokio::test]
    async fn test_tv_details_uses_created_by() {
        // Arrange
        let api = FixtureTmdb::default();

        // Act
        let details = tv_details(&api, 1396).await.unwrap();

        // Assert
        assert_eq!(details.show.name, "Breaking Bad");
        assert_eq!(details.creators, vec![String::from("Vince Gilligan")]);
        assert_eq!(details.cast[0].name, "Bryan Cranston");
        assert!(details.trailer.is_none());
        assert_eq!(details.similar.len(), 2);
    }

    #[tokio::test]
    async fn test_tv_details_failure_message() {
        // Arrange
        let api = FixtureTmdb::failing(&["tv_details"]);

        // Act
        let err = tv_details(&api, 1396).await.unwrap_err();

        // Assert
        assert_eq!(
            err.downcast_ref::<BrowseError>().unwrap().user_message(),
            TV_FAILED
        );
    }

    #[test]
    fn test_director_picks_first_director() {
        // Arrange
        let credits = TmdbCredits {
            cast: Vec::new(),
            crew: vec![
                crew("Hans Zimmer", "Original Music Composer"),
                crew("First", "Director"),
                crew("Second", "Director"),
            ],
        };

        // Act & Assert
        assert_eq!(director(&credits).as_deref(), Some("First"));
        assert_eq!(director(&TmdbCredits::default()), None);
    }

    #[test]
    fn test_creators_merges_crew_without_duplicates() {
        // Arrange
        let show: TmdbTvDetails = parse(include_str!("../../../fixtures/tmdb/tv_details_1396.json"));
        let credits = TmdbCredits {
            cast: Vec::new(),
            crew: vec![
                crew("Vince Gilligan", "Creator"),
                crew("Peter Gould", "Creator"),
                crew("Michelle MacLaren", "Director"),
            ],
        };

        // Act
        let names = creators(&show, &credits);

        // Assert
        assert_eq!(names, vec!["Vince Gilligan", "Peter Gould"]);
    }

    #[test]
    fn test_trailer_requires_youtube_trailer() {
        // Arrange
        let videos: TmdbVideos = parse(include_str!(
            "../../../fixtures/tmdb/movie_videos_155.json"
        ));

        // Act
        let found = trailer(&videos).unwrap();

        // Assert
        assert_eq!(found.video_type, "Trailer");
        assert_eq!(found.site, "YouTube");
        assert_eq!(trailer(&TmdbVideos::default()), None);
    }
}
