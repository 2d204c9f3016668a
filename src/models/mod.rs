mod catalog;

pub use catalog::Catalog;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{TRAILER_SITE, TRAILER_TYPE, YOUTUBE_WATCH_URL};

/// Numeric identifier assigned by the metadata API.
pub type TmdbId = u64;

/// Anything carrying a stable unique identifier, which the paginator uses to
/// drop duplicates across pages.
pub trait Identified {
    fn id(&self) -> TmdbId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "show" | "shows" | "tv-shows" => Ok(MediaKind::Tv),
            other => Err(format!("unknown media kind '{}'", other)),
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Always at least 1, even for empty listings.
    pub total_pages: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self {
            items,
            total_pages: total_pages.max(1),
        }
    }
}

/// Card-level record shared by movie and TV listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: TmdbId,
    pub kind: MediaKind,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    /// Release date for movies, first air date for shows (`YYYY-MM-DD`).
    pub release_date: Option<String>,
    pub overview: String,
}

impl MediaSummary {
    /// Listings only show entries that have artwork.
    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }
}

impl Identified for MediaSummary {
    fn id(&self) -> TmdbId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: TmdbId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub name: String,
}

impl Video {
    pub fn is_trailer(&self) -> bool {
        self.video_type == TRAILER_TYPE && self.site == TRAILER_SITE
    }

    pub fn watch_url(&self) -> Option<url::Url> {
        url::Url::parse_with_params(YOUTUBE_WATCH_URL, &[("v", self.key.as_str())]).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: TmdbId,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

/// Full record for the detail views and the carousel's trailer lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    pub summary: MediaSummary,
    pub genres: Vec<Genre>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    /// Minutes; for shows the typical episode length.
    pub runtime: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub videos: Vec<Video>,
    pub cast: Vec<CastMember>,
}

impl MediaDetails {
    pub fn trailer(&self) -> Option<&Video> {
        self.videos.iter().find(|v| v.is_trailer())
    }

    pub fn has_trailer(&self) -> bool {
        self.trailer().is_some()
    }
}
