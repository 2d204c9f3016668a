mod api;
mod images;


pub use api::TmdbApi;
pub use images::{ImageSize, image_url};

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::traits::MetadataSource;
use crate::config::ApiConfig;
use crate::models::{Catalog, Genre, MediaDetails, MediaKind, MediaSummary, PagedResult, TmdbId};
use crate::utils::TransportError;

/// `MetadataSource` backed by The Movie Database.
#[derive(Debug, Clone)]
pub struct TmdbBackend {
    api: TmdbApi,
    image_base_url: String,
}

impl TmdbBackend {
    pub fn new(api: TmdbApi, image_base_url: impl Into<String>) -> Self {
        Self {
            api,
            image_base_url: image_base_url.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, TransportError> {
        let api_key = config.api_key.clone().ok_or(TransportError::MissingApiKey)?;
        let api = TmdbApi::new(
            config.base_url.clone(),
            api_key,
            config.language.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        info!("TMDB backend ready at {}", config.base_url);
        Ok(Self::new(api, config.image_base_url.clone()))
    }

    pub fn image_url(&self, path: Option<&str>, size: ImageSize) -> String {
        image_url(&self.image_base_url, path, size)
    }
}

#[async_trait]
impl MetadataSource for TmdbBackend {
    async fn fetch_paged(
        &self,
        catalog: &Catalog,
        page: u32,
    ) -> Result<PagedResult<MediaSummary>, TransportError> {
        self.api.list_page(catalog, page).await
    }

    async fn fetch_detail(
        &self,
        kind: MediaKind,
        id: TmdbId,
    ) -> Result<MediaDetails, TransportError> {
        self.api.details(kind, id).await
    }

    async fn fetch_genres(&self, kind: MediaKind) -> Result<Vec<Genre>, TransportError> {
        self.api.genres(kind).await
    }
}
