//! # `staffdesk`
//!
//! Office management core: staff records, a TODO list, calendar events,
//! and internal documents, owned by a single [`store::Repository`] and
//! persisted as flat JSON files in a managed data directory.

pub mod config;
pub mod error;
pub mod oplog;
pub mod paths;
pub mod reminders;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
pub use store::Repository;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
