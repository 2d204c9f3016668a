//! Paginated catalog browsing with state that survives navigation.
//!
//! The binary in `src/main.rs` is a thin command-line front end over this
//! library.

pub mod backends;
pub mod cache;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod utils;

#[cfg(test)]
mod test_utils;
