use std::fmt;

/// Namespaced storage keys. List state and scroll offsets for the same page
/// live side by side and expire independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Accumulated list state of a page
    PageState(String),

    /// Vertical scroll offset of a page
    Scroll(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    PageState,
    Scroll,
}

impl Namespace {
    pub fn key(&self, page_key: impl Into<String>) -> StorageKey {
        match self {
            Namespace::PageState => StorageKey::PageState(page_key.into()),
            Namespace::Scroll => StorageKey::Scroll(page_key.into()),
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Namespace::PageState => "state",
            Namespace::Scroll => "scroll",
        }
    }
}

impl StorageKey {
    pub fn namespace(&self) -> Namespace {
        match self {
            StorageKey::PageState(_) => Namespace::PageState,
            StorageKey::Scroll(_) => Namespace::Scroll,
        }
    }

    pub fn page_key(&self) -> &str {
        match self {
            StorageKey::PageState(key) | StorageKey::Scroll(key) => key,
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.namespace().prefix(), self.page_key())
    }
}
