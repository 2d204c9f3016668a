pub mod tmdb;
pub mod traits;

pub use tmdb::TmdbBackend;
pub use traits::MetadataSource;
