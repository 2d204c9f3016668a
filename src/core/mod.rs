pub mod carousel;
pub mod list_view;
pub mod navigation;
pub mod pagination;
pub mod scroll_anchor;
pub mod viewmodels;
pub mod visibility;

pub use carousel::{CarouselMachine, CarouselTiming, Direction};
pub use list_view::{ListLayout, ListView, ListViewOptions};
pub use navigation::Route;
pub use pagination::{DedupPaginator, PageSnapshot, PagedSource, PaginationState, PaginatorOptions};
pub use scroll_anchor::{NavigationEntry, ScrollAnchor, Viewport};
pub use visibility::{BoundarySignals, ManualTrigger, VisibilityOptions, VisibilityTrigger};
