use std::fmt;

use crate::constants::PLACEHOLDER_IMAGE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    Original,
    W500,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Original => "original",
            ImageSize::W500 => "w500",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve an image path from the API into a full URL, falling back to a
/// placeholder when the title has no artwork.
pub fn image_url(base_url: &str, path: Option<&str>, size: ImageSize) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => {
            let base = base_url.trim_end_matches('/');
            if path.starts_with('/') {
                format!("{}/{}{}", base, size, path)
            } else {
                format!("{}/{}/{}", base, size, path)
            }
        }
        None => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}
