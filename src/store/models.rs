//! Record types for the four office collections.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default status for a newly created employee.
pub const DEFAULT_EMPLOYEE_STATUS: &str = "active";

/// History entry kind recorded when a current task is changed directly.
pub const HISTORY_KIND_CHANGE: &str = "change";

fn default_employee_status() -> String {
    DEFAULT_EMPLOYEE_STATUS.to_string()
}

/// A staff record.
///
/// The `id` is assigned once at creation and never changes; it is the only
/// key task and event records use to reference an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Opaque 8-character identifier, immutable once assigned.
    pub id: String,
    /// Full name.
    pub full_name: String,
    /// Birth date, free-form but expected as `YYYY-MM-DD`.
    #[serde(default)]
    pub birth_date: String,
    /// Job position.
    pub position: String,
    /// The task the employee is currently working on; empty when none.
    #[serde(default)]
    pub current_task: String,
    /// Displaced task assignments, oldest first.
    #[serde(default)]
    pub task_history: Vec<HistoryEntry>,
    /// Employment status. Defaults to `"active"`.
    #[serde(default = "default_employee_status")]
    pub status: String,
}

/// An entry in an employee's task history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The task text that was displaced.
    pub task: String,
    /// When the entry began (`YYYY-MM-DD HH:MM`).
    pub start_date: String,
    /// When the entry ended. Equal to `start_date` for entries recorded by
    /// a direct task change.
    pub end_date: String,
    /// Entry kind; direct changes record `"change"`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not yet started.
    #[default]
    #[serde(rename = "to-do")]
    ToDo,
    /// Currently being worked on.
    #[serde(rename = "in-progress")]
    InProgress,
    /// Finished.
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    /// Parse a status from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid status.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidTaskStatus> {
        match s.to_lowercase().as_str() {
            "to-do" | "todo" => Ok(Self::ToDo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(InvalidTaskStatus(s.to_string())),
        }
    }

    /// Get the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to-do",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid task status string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTaskStatus(pub String);

impl std::fmt::Display for InvalidTaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid task status: '{}' (must be one of: to-do, in-progress, done)", self.0)
    }
}

impl std::error::Error for InvalidTaskStatus {}

/// Task priority levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority (default).
    #[default]
    Medium,
    /// High priority.
    High,
    /// Critical priority.
    Critical,
}

impl TaskPriority {
    /// Parse a priority from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid priority.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidTaskPriority> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(InvalidTaskPriority(s.to_string())),
        }
    }

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid task priority string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTaskPriority(pub String);

impl std::fmt::Display for InvalidTaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid task priority: '{}' (must be one of: low, medium, high, critical)",
            self.0
        )
    }
}

impl std::error::Error for InvalidTaskPriority {}

/// A TODO-list task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Sequential integer id, unique within the collection.
    pub id: u32,
    /// The task text.
    pub text: String,
    /// Id of the assigned employee.
    pub assignee_id: String,
    /// Assignee name as it was at creation time. Not kept in sync when the
    /// employee is renamed.
    pub assignee_name: String,
    /// Current status.
    #[serde(default)]
    pub status: TaskStatus,
    /// Priority level.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Creation timestamp (`YYYY-MM-DD HH:MM`).
    pub created: String,
    /// Optional deadline; `null` when unset.
    #[serde(default)]
    pub deadline: Option<String>,
}

/// A calendar event within a date bucket.
///
/// Events are grouped by their `YYYY-MM-DD` date; the `id` is unique only
/// within that bucket. `datetime` is always `"{bucket_date} {time}"` and is
/// recomputed whenever the event is edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier, unique only within the event's date bucket.
    pub id: u32,
    /// Event title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Optional link to a task.
    #[serde(default)]
    pub task_id: Option<u32>,
    /// Name of the linked task at link time; not kept in sync.
    #[serde(default)]
    pub task_name: Option<String>,
    /// Id of the assigned employee.
    #[serde(default)]
    pub assignee_id: String,
    /// Assignee name at assignment time; not kept in sync.
    #[serde(default)]
    pub assignee_name: String,
    /// Start time within the bucket date (`HH:MM`).
    pub time: String,
    /// Derived `"{bucket_date} {time}"`.
    pub datetime: String,
    /// Creation timestamp (`YYYY-MM-DD HH:MM`).
    #[serde(default)]
    pub created: String,
}

/// A registered internal document.
///
/// `path` always points at the copy inside the managed storage directory;
/// the original import source is never referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// File name; unique within the collection.
    pub name: String,
    /// Location of the stored copy.
    pub path: PathBuf,
    /// Size of the stored copy in bytes.
    pub size: u64,
    /// Last modification timestamp (`YYYY-MM-DD HH:MM`).
    pub modified: String,
    /// Lowercased extension including the leading dot, or empty.
    #[serde(rename = "type", default)]
    pub kind: String,
}
