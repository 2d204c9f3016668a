use std::fmt;
use std::str::FromStr;

use crate::models::{Catalog, MediaKind, TmdbId};
use crate::utils::RouteError;

/// Every view the app can show, addressed the way links address them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Movies,
    TvShows,
    /// Genre index, or the movies of one genre.
    Genres(Option<TmdbId>),
    Detail { kind: MediaKind, id: TmdbId },
    Search { query: String },
}

impl Route {
    /// `path` without its query string; `query` is the raw `a=b&c=d` part.
    pub fn parse(path: &str, query: Option<&str>) -> Result<Self, RouteError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["movies"] => Ok(Route::Movies),
            ["tv-shows"] => Ok(Route::TvShows),
            ["genres"] => Ok(Route::Genres(None)),
            ["genres", id] => Ok(Route::Genres(Some(parse_id(id)?))),
            ["movie", id] => Ok(Route::Detail {
                kind: MediaKind::Movie,
                id: parse_id(id)?,
            }),
            ["tv", id] => Ok(Route::Detail {
                kind: MediaKind::Tv,
                id: parse_id(id)?,
            }),
            ["search"] => {
                let query = query
                    .map(|q| {
                        url::form_urlencoded::parse(q.as_bytes())
                            .find(|(name, _)| name == "q")
                            .map(|(_, value)| value.into_owned())
                            .unwrap_or_default()
                    })
                    .unwrap_or_default();
                Ok(Route::Search { query })
            }
            _ => Err(RouteError::NotFound(path.to_string())),
        }
    }

    /// Listings shown on this view, in display order.
    pub fn catalogs(&self) -> Vec<Catalog> {
        match self {
            Route::Home | Route::Movies => vec![Catalog::TrendingMovies],
            Route::TvShows => vec![Catalog::TrendingTv],
            Route::Genres(Some(id)) => vec![Catalog::MoviesByGenre(*id)],
            Route::Search { query } if !query.trim().is_empty() => vec![
                Catalog::Search {
                    kind: MediaKind::Movie,
                    query: query.clone(),
                },
                Catalog::Search {
                    kind: MediaKind::Tv,
                    query: query.clone(),
                },
            ],
            Route::Genres(None) | Route::Detail { .. } | Route::Search { .. } => Vec::new(),
        }
    }

    /// The main listing of a list view.
    pub fn catalog(&self) -> Option<Catalog> {
        self.catalogs().into_iter().next()
    }

    /// List views own a paginator and a scroll anchor.
    pub fn is_list(&self) -> bool {
        self.catalog().is_some()
    }

    /// Whether the view opens with the featured carousel.
    pub fn has_carousel(&self) -> bool {
        matches!(self, Route::Home)
    }

    /// Key under which this view's scroll offset and list are saved.
    pub fn page_key(&self) -> String {
        match self {
            Route::Home => "home".to_string(),
            Route::Genres(None) => "genres".to_string(),
            Route::Detail { kind, id } => format!("{}-{}", kind, id),
            _ => self
                .catalog()
                .map(|c| c.page_key())
                .unwrap_or_else(|| "search".to_string()),
        }
    }
}

fn parse_id(raw: &str) -> Result<TmdbId, RouteError> {
    raw.parse()
        .map_err(|_| RouteError::InvalidId(raw.to_string()))
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('?') {
            Some((path, query)) => Route::parse(path, Some(query)),
            None => Route::parse(s, None),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Movies => write!(f, "/movies"),
            Route::TvShows => write!(f, "/tv-shows"),
            Route::Genres(None) => write!(f, "/genres"),
            Route::Genres(Some(id)) => write!(f, "/genres/{}", id),
            Route::Detail { kind, id } => write!(f, "/{}/{}", kind.as_path(), id),
            Route::Search { query } => {
                let encoded: String = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("q", query)
                    .finish();
                write!(f, "/search?{}", encoded)
            }
        }
    }
}
