use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

use crate::models::{
    CastMember, Catalog, Genre, MediaDetails, MediaKind, MediaSummary, PagedResult, TmdbId, Video,
};
use crate::utils::TransportError;

/// Thin HTTP client over the TMDB v3 REST API.
#[derive(Clone)]
pub struct TmdbApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl std::fmt::Debug for TmdbApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbApi")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish()
    }
}

impl TmdbApi {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TransportError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            language: language.into(),
        })
    }

    pub async fn list_page(
        &self,
        catalog: &Catalog,
        page: u32,
    ) -> Result<PagedResult<MediaSummary>, TransportError> {
        let endpoint = catalog.endpoint();
        let mut params = catalog.query_params();
        params.push(("page", page.to_string()));

        let items = match catalog.kind() {
            MediaKind::Movie => {
                let raw: RawPage<RawMovie> = self.get(&endpoint, &params).await?;
                PagedResult::new(
                    raw.results.into_iter().map(RawMovie::into_summary).collect(),
                    raw.total_pages,
                )
            }
            MediaKind::Tv => {
                let raw: RawPage<RawTvShow> = self.get(&endpoint, &params).await?;
                PagedResult::new(
                    raw.results.into_iter().map(RawTvShow::into_summary).collect(),
                    raw.total_pages,
                )
            }
        };

        debug!(
            "{} page {} returned {} items ({} pages total)",
            catalog,
            page,
            items.items.len(),
            items.total_pages
        );
        Ok(items)
    }

    pub async fn details(&self, kind: MediaKind, id: TmdbId) -> Result<MediaDetails, TransportError> {
        let endpoint = format!("/{}/{}", kind.as_path(), id);
        let params = [("append_to_response", "videos,credits".to_string())];

        match kind {
            MediaKind::Movie => {
                let raw: RawMovieDetails = self.get(&endpoint, &params).await?;
                Ok(raw.into_details())
            }
            MediaKind::Tv => {
                let raw: RawTvDetails = self.get(&endpoint, &params).await?;
                Ok(raw.into_details())
            }
        }
    }

    pub async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, TransportError> {
        let endpoint = format!("/genre/{}/list", kind.as_path());
        let raw: RawGenres = self.get(&endpoint, &[]).await?;
        Ok(raw.genres)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch from TMDB: {} ({})", endpoint, e);
                TransportError::from_reqwest(endpoint, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("TMDB {} returned status {}", endpoint, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(endpoint, e))?;

        serde_json::from_str(&body).map_err(|e| TransportError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct RawPage<T> {
    #[serde(default)]
    results: Vec<T>,
    #[serde(default)]
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct RawMovie {
    id: TmdbId,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: f64,
    release_date: Option<String>,
    #[serde(default)]
    overview: String,
}

impl RawMovie {
    fn into_summary(self) -> MediaSummary {
        MediaSummary {
            id: self.id,
            kind: MediaKind::Movie,
            title: self.title,
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            vote_average: self.vote_average,
            release_date: non_empty(self.release_date),
            overview: self.overview,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTvShow {
    id: TmdbId,
    #[serde(default)]
    name: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: f64,
    first_air_date: Option<String>,
    #[serde(default)]
    overview: String,
}

impl RawTvShow {
    fn into_summary(self) -> MediaSummary {
        MediaSummary {
            id: self.id,
            kind: MediaKind::Tv,
            title: self.name,
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            vote_average: self.vote_average,
            release_date: non_empty(self.first_air_date),
            overview: self.overview,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawVideos {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCredits {
    #[serde(default)]
    cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
struct RawMovieDetails {
    #[serde(flatten)]
    movie: RawMovie,
    #[serde(default)]
    genres: Vec<Genre>,
    tagline: Option<String>,
    status: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    videos: RawVideos,
    #[serde(default)]
    credits: RawCredits,
}

impl RawMovieDetails {
    fn into_details(self) -> MediaDetails {
        MediaDetails {
            summary: self.movie.into_summary(),
            genres: self.genres,
            tagline: non_empty(self.tagline),
            status: self.status,
            runtime: self.runtime,
            number_of_seasons: None,
            videos: self.videos.results,
            cast: self.credits.cast,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTvDetails {
    #[serde(flatten)]
    show: RawTvShow,
    #[serde(default)]
    genres: Vec<Genre>,
    tagline: Option<String>,
    status: Option<String>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    number_of_seasons: Option<u32>,
    #[serde(default)]
    videos: RawVideos,
    #[serde(default)]
    credits: RawCredits,
}

impl RawTvDetails {
    fn into_details(self) -> MediaDetails {
        MediaDetails {
            summary: self.show.into_summary(),
            genres: self.genres,
            tagline: non_empty(self.tagline),
            status: self.status,
            runtime: self.episode_run_time.first().copied(),
            number_of_seasons: self.number_of_seasons,
            videos: self.videos.results,
            cast: self.credits.cast,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGenres {
    #[serde(default)]
    genres: Vec<Genre>,
}
