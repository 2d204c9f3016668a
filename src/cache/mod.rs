pub mod clock;
pub mod keys;
pub mod state_store;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use keys::{Namespace, StorageKey};
pub use state_store::{PersistedState, ScrollRecord, TimeBoxedStateStore};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
