pub mod errors;

pub use errors::{PaginationError, RouteError, StorageError, TransportError};
