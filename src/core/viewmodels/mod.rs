pub mod browse_view_model;
pub mod carousel_view_model;
pub mod property;

pub use browse_view_model::{BrowseViewModel, CatalogFeed, MountOutcome};
pub use carousel_view_model::{CarouselState, CarouselViewModel};
pub use property::{Property, PropertySubscriber};
