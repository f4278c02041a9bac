//! Storage layout for the office data directory.
//!
//! All persistent state lives in a single data directory: one JSON file per
//! collection plus a `documents/` subdirectory holding copies of imported
//! files. The default location is `~/.staffdesk/data`, falling back to a
//! local `data/` directory when the home directory cannot be determined.

use std::fmt;
use std::path::{Path, PathBuf};

/// The base directory name for staffdesk data.
const DATA_DIR_NAME: &str = ".staffdesk";

/// Subdirectory of the data directory holding imported document copies.
pub const DOCUMENTS_DIR: &str = "documents";

/// The four persisted resources, in their fixed save order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resource {
    /// Staff records (`staff_data.json`, wrapped in `{"employees": [...]}`).
    Staff,
    /// TODO tasks (`tasks_data.json`, bare array).
    Tasks,
    /// Calendar events (`calendar_events.json`, bare date-keyed map).
    Events,
    /// Document registry (`documents_data.json`, bare array).
    Documents,
}

impl Resource {
    /// All resources in save order.
    pub const ALL: [Self; 4] = [Self::Staff, Self::Tasks, Self::Events, Self::Documents];

    /// File name of the backing JSON resource.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Staff => "staff_data.json",
            Self::Tasks => "tasks_data.json",
            Self::Events => "calendar_events.json",
            Self::Documents => "documents_data.json",
        }
    }

    /// Short lowercase name for reports and log entries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Tasks => "tasks",
            Self::Events => "events",
            Self::Documents => "documents",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Get the default data directory.
///
/// Returns `~/.staffdesk/data`, or `data/` relative to the working directory
/// if the home directory cannot be determined.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map_or_else(|| PathBuf::from("data"), |home| home.join(DATA_DIR_NAME).join("data"))
}

/// Path of a resource's backing file within a data directory.
#[must_use]
pub fn resource_path(data_dir: &Path, resource: Resource) -> PathBuf {
    data_dir.join(resource.file_name())
}

/// Path of the managed document-storage directory within a data directory.
#[must_use]
pub fn documents_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(DOCUMENTS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_file_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            Resource::ALL.iter().map(|r| r.file_name()).collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_resource_display() {
        assert_eq!(Resource::Staff.to_string(), "staff");
        assert_eq!(Resource::Documents.to_string(), "documents");
    }

    #[test]
    fn test_save_order() {
        assert_eq!(
            Resource::ALL,
            [Resource::Staff, Resource::Tasks, Resource::Events, Resource::Documents]
        );
    }

    #[test]
    fn test_resource_path() {
        let path = resource_path(Path::new("/tmp/data"), Resource::Events);
        assert_eq!(path, PathBuf::from("/tmp/data/calendar_events.json"));
    }

    #[test]
    fn test_documents_dir() {
        let dir = documents_dir(Path::new("/tmp/data"));
        assert_eq!(dir, PathBuf::from("/tmp/data/documents"));
    }

    #[test]
    fn test_default_data_dir_under_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(default_data_dir(), home.join(".staffdesk").join("data"));
        }
    }
}
