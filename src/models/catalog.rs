use serde::{Deserialize, Serialize};
use std::fmt;

use super::{MediaKind, TmdbId};

/// A paged listing the app can browse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Catalog {
    TrendingMovies,
    TrendingTv,
    NowPlaying,
    MoviesByGenre(TmdbId),
    TvByGenre(TmdbId),
    Search { kind: MediaKind, query: String },
}

impl Catalog {
    pub fn kind(&self) -> MediaKind {
        match self {
            Catalog::TrendingMovies | Catalog::NowPlaying | Catalog::MoviesByGenre(_) => {
                MediaKind::Movie
            }
            Catalog::TrendingTv | Catalog::TvByGenre(_) => MediaKind::Tv,
            Catalog::Search { kind, .. } => *kind,
        }
    }

    /// API path for this listing.
    pub fn endpoint(&self) -> String {
        match self {
            Catalog::TrendingMovies => "/trending/movie/week".to_string(),
            Catalog::TrendingTv => "/trending/tv/week".to_string(),
            Catalog::NowPlaying => "/movie/now_playing".to_string(),
            Catalog::MoviesByGenre(_) => "/discover/movie".to_string(),
            Catalog::TvByGenre(_) => "/discover/tv".to_string(),
            Catalog::Search { kind, .. } => format!("/search/{}", kind.as_path()),
        }
    }

    /// Extra query parameters besides `page`.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Catalog::MoviesByGenre(id) | Catalog::TvByGenre(id) => {
                vec![("with_genres", id.to_string())]
            }
            Catalog::Search { query, .. } => vec![("query", query.clone())],
            _ => Vec::new(),
        }
    }

    /// Stable key naming the page that lists this catalog; used to persist
    /// list state and scroll offset across navigations.
    pub fn page_key(&self) -> String {
        match self {
            Catalog::TrendingMovies => "movies".to_string(),
            Catalog::TrendingTv => "tv-shows".to_string(),
            Catalog::NowPlaying => "now-playing".to_string(),
            Catalog::MoviesByGenre(id) => format!("genres-{}", id),
            Catalog::TvByGenre(id) => format!("tv-genres-{}", id),
            Catalog::Search { kind, query } => {
                format!("search-{}-{}", kind, query.trim().to_lowercase())
            }
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Catalog::TrendingMovies => write!(f, "Trending movies"),
            Catalog::TrendingTv => write!(f, "Trending TV shows"),
            Catalog::NowPlaying => write!(f, "Now playing"),
            Catalog::MoviesByGenre(id) => write!(f, "Movies in genre {}", id),
            Catalog::TvByGenre(id) => write!(f, "TV shows in genre {}", id),
            Catalog::Search { kind, query } => write!(f, "Search {} for \"{}\"", kind, query),
        }
    }
}
