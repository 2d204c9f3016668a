// Timing constants shared by the browsing core.
// Config values override these at runtime; the constants are the defaults.

// === Persistence ===
/// Records older than this are treated as absent and removed on read.
pub const STALENESS_HORIZON_SECS: i64 = 30 * 60;
pub const SCROLL_DEBOUNCE_MS: u64 = 50;

// === Pagination ===
/// Consecutive empty pages the paginator will chain through before giving up.
pub const MAX_CHAINED_SKIPS: u32 = 5;

// === Carousel ===
pub const AUTOPLAY_DELAY_MS: u64 = 8_000;
/// Shorter autoplay delays are raised to this.
pub const MIN_AUTOPLAY_DELAY_MS: u64 = 10;
pub const CONTENT_FADE_MS: u64 = 100;
pub const SLIDE_DURATION_MS: u64 = 500;

// === Visibility sensor ===
pub const SENTINEL_ROOT_MARGIN_PX: f64 = 100.0;
pub const SENTINEL_THRESHOLD: f64 = 0.1;

// === Headless list layout ===
pub const LIST_ROW_HEIGHT_PX: f64 = 48.0;
pub const LIST_VIEWPORT_HEIGHT_PX: f64 = 720.0;

// === Metadata API ===
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const TMDB_LANGUAGE: &str = "pt-BR";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";
pub const TRAILER_SITE: &str = "YouTube";
pub const TRAILER_TYPE: &str = "Trailer";
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch";
