use cinebrowse::models::{MediaDetails, MediaKind, MediaSummary, TmdbId, Video};

pub struct SummaryBuilder {
    id: TmdbId,
    kind: MediaKind,
    title: String,
    poster_path: Option<String>,
    release_date: Option<String>,
    rating: f64,
}

impl SummaryBuilder {
    pub fn movie(id: TmdbId, title: &str) -> Self {
        Self {
            id,
            kind: MediaKind::Movie,
            title: title.to_string(),
            poster_path: Some(format!("/poster{}.jpg", id)),
            release_date: Some("2024-01-01".to_string()),
            rating: 7.5,
        }
    }

    pub fn show(id: TmdbId, title: &str) -> Self {
        Self {
            kind: MediaKind::Tv,
            ..Self::movie(id, title)
        }
    }

    pub fn without_poster(mut self) -> Self {
        self.poster_path = None;
        self
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.release_date = Some(format!("{}-06-01", year));
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn build(self) -> MediaSummary {
        MediaSummary {
            id: self.id,
            kind: self.kind,
            title: self.title,
            poster_path: self.poster_path,
            backdrop_path: None,
            vote_average: self.rating,
            release_date: self.release_date,
            overview: String::new(),
        }
    }
}

pub struct DetailsBuilder {
    summary: MediaSummary,
    videos: Vec<Video>,
}

impl DetailsBuilder {
    pub fn for_summary(summary: MediaSummary) -> Self {
        Self {
            summary,
            videos: Vec::new(),
        }
    }

    pub fn with_trailer(mut self, key: &str) -> Self {
        self.videos.push(Video {
            key: key.to_string(),
            site: "YouTube".to_string(),
            video_type: "Trailer".to_string(),
            name: "Official Trailer".to_string(),
        });
        self
    }

    pub fn with_teaser(mut self, key: &str) -> Self {
        self.videos.push(Video {
            key: key.to_string(),
            site: "YouTube".to_string(),
            video_type: "Teaser".to_string(),
            name: "Teaser".to_string(),
        });
        self
    }

    pub fn build(self) -> MediaDetails {
        MediaDetails {
            summary: self.summary,
            genres: Vec::new(),
            tagline: None,
            status: None,
            runtime: None,
            number_of_seasons: None,
            videos: self.videos,
            cast: Vec::new(),
        }
    }
}
