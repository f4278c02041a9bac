//! The office data store.
//!
//! This module provides the [`Repository`] — the single owner of the
//! employees, tasks, calendar-events, and documents collections — together
//! with its record types and persistence:
//! - Best-effort loading from four flat JSON files, with per-entry
//!   validation and a structured [`LoadReport`]
//! - Fail-fast saving that reports which resource failed and which were
//!   already written
//! - Lookups by id and by assignee, filters, and dashboard aggregates
//! - Intent-revealing mutators that apply the denormalization rules
//!   (task creation overwrites the assignee's current task; direct task
//!   changes append history; renames never cascade to denormalized names)
//!
//! # Example
//!
//! ```no_run
//! use staffdesk::store::{Repository, TaskPriority, TaskStatus};
//!
//! let (mut repo, report) = Repository::open("data");
//! assert!(report.is_clean());
//!
//! let alice = repo.add_employee("Alice Schmidt", "1990-04-12", "Accountant", "");
//! repo.add_task("Write report", &alice.id, TaskStatus::ToDo, TaskPriority::High, None)
//!     .unwrap();
//! repo.save().unwrap();
//! ```

pub mod id;
pub mod models;
pub mod repository;

pub use models::{
    Document, Employee, Event, HistoryEntry, InvalidTaskPriority, InvalidTaskStatus, Task,
    TaskPriority, TaskStatus,
};
pub use repository::{
    EmployeeUpdate, EventUpdate, ImportOutcome, LoadOutcome, LoadReport, NewEvent, OnConflict,
    Repository, SaveError, Stats, TaskFilter, TaskUpdate,
};

/// Timestamp format used throughout the persisted data (`YYYY-MM-DD HH:MM`).
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M";

/// Current local time in the persisted timestamp format.
pub(crate) fn timestamp_now() -> String {
    chrono::Local::now().format(DATETIME_FMT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_timestamp_format_parses_back() {
        let stamp = timestamp_now();
        assert!(NaiveDateTime::parse_from_str(&stamp, DATETIME_FMT).is_ok());
    }
}
