use super::builders::*;
use cinebrowse::models::{MediaDetails, MediaSummary, TmdbId};

pub struct Fixtures;

impl Fixtures {
    /// Movies with posters, titled after their id.
    pub fn movies(ids: &[TmdbId]) -> Vec<MediaSummary> {
        ids.iter()
            .map(|&id| SummaryBuilder::movie(id, &format!("Movie {}", id)).build())
            .collect()
    }

    pub fn featured() -> Vec<MediaSummary> {
        vec![
            SummaryBuilder::movie(438631, "Dune")
                .with_year(2021)
                .with_rating(7.8)
                .build(),
            SummaryBuilder::movie(693134, "Dune: Part Two")
                .with_year(2024)
                .with_rating(8.2)
                .build(),
            SummaryBuilder::movie(27205, "Inception")
                .with_year(2010)
                .with_rating(8.4)
                .build(),
        ]
    }

    pub fn featured_details() -> Vec<MediaDetails> {
        let featured = Self::featured();
        vec![
            DetailsBuilder::for_summary(featured[0].clone())
                .with_trailer("n9xhJrPXop4")
                .build(),
            DetailsBuilder::for_summary(featured[1].clone())
                .with_trailer("Way9Dexny3w")
                .build(),
            DetailsBuilder::for_summary(featured[2].clone())
                .with_teaser("8hP9D6kZseM")
                .build(),
        ]
    }
}
