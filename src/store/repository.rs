//! The repository owning the four office collections and their persistence.
//!
//! A [`Repository`] is constructed explicitly with the data directory it
//! manages and handed to every consumer; there is no global instance.
//! Collections are only readable from outside — every mutation goes through
//! an intent-revealing operation so that denormalization and history rules
//! are applied in exactly one place.

use crate::error::{Error, Result};
use crate::oplog;
use crate::paths::{self, Resource};
use crate::store::id::generate_employee_id;
use crate::store::models::{
    Document, Employee, Event, HistoryEntry, Task, TaskPriority, TaskStatus,
    DEFAULT_EMPLOYEE_STATUS, HISTORY_KIND_CHANGE,
};
use crate::store::timestamp_now;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-resource outcome of a best-effort load pass.
#[derive(Debug, Default)]
pub enum LoadOutcome {
    /// The resource file does not exist; the collection was left untouched.
    #[default]
    Missing,
    /// The resource file was read; `loaded` well-formed records were taken
    /// and each `malformed` entry was skipped.
    Loaded {
        /// Number of records loaded into the collection.
        loaded: usize,
        /// One [`Error::MalformedRecord`] per skipped entry.
        malformed: Vec<Error>,
    },
    /// The resource could not be read or parsed; the collection was left
    /// untouched.
    Failed(Error),
}

impl LoadOutcome {
    /// Whether this outcome carries no failures of any kind.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Loaded { malformed, .. } => malformed.is_empty(),
            Self::Failed(_) => false,
        }
    }
}

/// Structured result of [`Repository::load`].
///
/// Loading is best-effort: a failure in one resource never aborts the
/// others, and never fails the load as a whole.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Outcome for the staff resource.
    pub staff: LoadOutcome,
    /// Outcome for the tasks resource.
    pub tasks: LoadOutcome,
    /// Outcome for the events resource.
    pub events: LoadOutcome,
    /// Outcome for the documents resource.
    pub documents: LoadOutcome,
}

impl LoadReport {
    /// Outcome for a specific resource.
    #[must_use]
    pub const fn outcome(&self, resource: Resource) -> &LoadOutcome {
        match resource {
            Resource::Staff => &self.staff,
            Resource::Tasks => &self.tasks,
            Resource::Events => &self.events,
            Resource::Documents => &self.documents,
        }
    }

    /// Whether every resource loaded without failures or malformed entries.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        Resource::ALL.iter().all(|r| self.outcome(*r).is_clean())
    }

    /// All failures across resources, paired with the resource they hit.
    #[must_use]
    pub fn failures(&self) -> Vec<(Resource, &Error)> {
        let mut out = Vec::new();
        for resource in Resource::ALL {
            match self.outcome(resource) {
                LoadOutcome::Missing => {}
                LoadOutcome::Loaded { malformed, .. } => {
                    out.extend(malformed.iter().map(|e| (resource, e)));
                }
                LoadOutcome::Failed(e) => out.push((resource, e)),
            }
        }
        out
    }
}

/// Error describing a failed save pass.
///
/// Saving is fail-fast: resources are written in the fixed order staff,
/// tasks, events, documents, and the first failure aborts the pass. The
/// error names the failing resource and everything already written, so no
/// partial write goes unnoticed.
#[derive(Debug, thiserror::Error)]
#[error("failed to save {resource}: {source}")]
pub struct SaveError {
    /// The resource whose write failed.
    pub resource: Resource,
    /// Resources successfully written before the failure.
    pub written: Vec<Resource>,
    /// The underlying error.
    #[source]
    pub source: Error,
}

/// Fields that can be updated on an employee.
///
/// The current task is deliberately absent: changing it goes through
/// [`Repository::change_current_task`], which records history.
#[derive(Debug, Default, Clone)]
pub struct EmployeeUpdate {
    /// New full name (if Some). Does not cascade to denormalized
    /// `assignee_name` copies on tasks or events.
    pub full_name: Option<String>,
    /// New birth date (if Some).
    pub birth_date: Option<String>,
    /// New position (if Some).
    pub position: Option<String>,
    /// New status (if Some).
    pub status: Option<String>,
}

impl EmployeeUpdate {
    /// Check if any fields are set for update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.birth_date.is_none()
            && self.position.is_none()
            && self.status.is_none()
    }
}

/// Fields that can be updated on a task.
#[derive(Debug, Default, Clone)]
pub struct TaskUpdate {
    /// New task text (if Some).
    pub text: Option<String>,
    /// New assignee (if Some); refreshes the denormalized assignee name.
    pub assignee_id: Option<String>,
    /// New status (if Some).
    pub status: Option<TaskStatus>,
    /// New priority (if Some).
    pub priority: Option<TaskPriority>,
    /// New deadline (if Some); `Some(None)` clears it.
    pub deadline: Option<Option<String>>,
}

impl TaskUpdate {
    /// Check if any fields are set for update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.assignee_id.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
    }
}

/// Filter options for listing tasks.
#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    /// Filter by status.
    pub status: Option<TaskStatus>,
    /// Filter by assignee id.
    pub assignee_id: Option<String>,
    /// Filter by priority.
    pub priority: Option<TaskPriority>,
}

/// Fields for a new calendar event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional task to link; its name is denormalized onto the event.
    pub task_id: Option<u32>,
    /// Id of the assigned employee.
    pub assignee_id: String,
    /// Start time within the bucket date (`HH:MM`).
    pub time: String,
}

/// Fields that can be updated on an event.
#[derive(Debug, Default, Clone)]
pub struct EventUpdate {
    /// New title (if Some).
    pub title: Option<String>,
    /// New description (if Some).
    pub description: Option<String>,
    /// New task link (if Some); `Some(None)` clears the link.
    pub task_id: Option<Option<u32>>,
    /// New assignee (if Some); refreshes the denormalized assignee name.
    pub assignee_id: Option<String>,
    /// New start time (if Some). The derived `datetime` is recomputed.
    pub time: Option<String>,
}

/// What to do when an imported file name collides with an existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    /// Overwrite the stored file and replace the record in place.
    Replace,
    /// Leave the existing record and stored file untouched.
    Skip,
}

/// Result of a document import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The file was imported as a new document.
    Imported(Document),
    /// An existing document with the same name was replaced.
    Replaced(Document),
    /// The import was skipped because a document with the same name exists.
    Skipped,
}

/// Aggregate counts for the dashboard view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    /// Number of staff records.
    pub employees: usize,
    /// Number of tasks.
    pub tasks: usize,
    /// Number of events across all date buckets.
    pub events: usize,
    /// Number of registered documents.
    pub documents: usize,
    /// Task counts per status, in status declaration order.
    pub tasks_by_status: Vec<(TaskStatus, usize)>,
}

/// On-disk shape of the staff resource.
#[derive(Serialize)]
struct StaffFileOut<'a> {
    employees: &'a [Employee],
}

#[derive(Deserialize)]
struct StaffFileIn {
    #[serde(default)]
    employees: Vec<serde_json::Value>,
}

/// Owner of the employees, tasks, events, and documents collections.
#[derive(Debug)]
pub struct Repository {
    data_dir: PathBuf,
    debug_logging: bool,
    employees: Vec<Employee>,
    tasks: Vec<Task>,
    events: BTreeMap<String, Vec<Event>>,
    documents: Vec<Document>,
}

impl Repository {
    /// Create an empty repository over the given data directory.
    ///
    /// No I/O happens until [`load`](Self::load) or [`save`](Self::save).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            debug_logging: false,
            employees: Vec::new(),
            tasks: Vec::new(),
            events: BTreeMap::new(),
            documents: Vec::new(),
        }
    }

    /// Create a repository and immediately load all four resources.
    pub fn open(data_dir: impl Into<PathBuf>) -> (Self, LoadReport) {
        let mut repo = Self::new(data_dir);
        let report = repo.load();
        (repo, report)
    }

    /// Enable or disable the debug operation log (see [`crate::oplog`]).
    #[must_use]
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// The data directory this repository persists into.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // ---- persistence ----

    /// Load all four resources, best-effort.
    ///
    /// A missing file leaves the corresponding collection untouched. A file
    /// that cannot be read or parsed also leaves the collection untouched
    /// and is reported in the result. Within a parseable file, well-formed
    /// records are loaded and each malformed entry is skipped and reported.
    pub fn load(&mut self) -> LoadReport {
        LoadReport {
            staff: self.load_staff(),
            tasks: self.load_tasks(),
            events: self.load_events(),
            documents: self.load_documents(),
        }
    }

    fn read_resource(&self, resource: Resource) -> Option<Result<String>> {
        let path = paths::resource_path(&self.data_dir, resource);
        if !path.exists() {
            return None;
        }
        Some(fs::read_to_string(&path).map_err(Error::from))
    }

    fn load_staff(&mut self) -> LoadOutcome {
        let content = match self.read_resource(Resource::Staff) {
            None => return LoadOutcome::Missing,
            Some(Err(e)) => return LoadOutcome::Failed(e),
            Some(Ok(content)) => content,
        };
        let raw: StaffFileIn = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => return LoadOutcome::Failed(e.into()),
        };
        let (records, malformed) = collect_records(Resource::Staff, raw.employees);
        self.employees = records;
        LoadOutcome::Loaded { loaded: self.employees.len(), malformed }
    }

    fn load_tasks(&mut self) -> LoadOutcome {
        let content = match self.read_resource(Resource::Tasks) {
            None => return LoadOutcome::Missing,
            Some(Err(e)) => return LoadOutcome::Failed(e),
            Some(Ok(content)) => content,
        };
        let raw: Vec<serde_json::Value> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => return LoadOutcome::Failed(e.into()),
        };
        let (records, malformed) = collect_records(Resource::Tasks, raw);
        self.tasks = records;
        LoadOutcome::Loaded { loaded: self.tasks.len(), malformed }
    }

    fn load_events(&mut self) -> LoadOutcome {
        let content = match self.read_resource(Resource::Events) {
            None => return LoadOutcome::Missing,
            Some(Err(e)) => return LoadOutcome::Failed(e),
            Some(Ok(content)) => content,
        };
        let raw: BTreeMap<String, Vec<serde_json::Value>> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => return LoadOutcome::Failed(e.into()),
        };

        let mut events = BTreeMap::new();
        let mut malformed = Vec::new();
        let mut loaded = 0;
        for (date, bucket) in raw {
            let mut parsed = Vec::with_capacity(bucket.len());
            for (index, value) in bucket.into_iter().enumerate() {
                match serde_json::from_value::<Event>(value) {
                    Ok(event) => parsed.push(event),
                    Err(e) => malformed.push(Error::MalformedRecord {
                        resource: Resource::Events,
                        index,
                        reason: format!("in bucket {date}: {e}"),
                    }),
                }
            }
            loaded += parsed.len();
            events.insert(date, parsed);
        }
        self.events = events;
        LoadOutcome::Loaded { loaded, malformed }
    }

    fn load_documents(&mut self) -> LoadOutcome {
        let content = match self.read_resource(Resource::Documents) {
            None => return LoadOutcome::Missing,
            Some(Err(e)) => return LoadOutcome::Failed(e),
            Some(Ok(content)) => content,
        };
        let raw: Vec<serde_json::Value> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => return LoadOutcome::Failed(e.into()),
        };
        let (records, malformed) = collect_records(Resource::Documents, raw);
        self.documents = records;
        LoadOutcome::Loaded { loaded: self.documents.len(), malformed }
    }

    /// Save all four resources, fail-fast.
    ///
    /// The data directory is created if absent. Resources are written in
    /// the order of [`Resource::ALL`]; the first failure aborts the pass
    /// and is returned with the list of resources already written.
    /// In-memory collections are never modified by a save.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] naming the failing resource.
    pub fn save(&self) -> std::result::Result<(), SaveError> {
        let mut written = Vec::new();
        for resource in Resource::ALL {
            if let Err(source) = self.write_resource(resource) {
                return Err(SaveError { resource, written, source });
            }
            written.push(resource);
        }
        Ok(())
    }

    /// Export the full events map to an arbitrary JSON file, in the same
    /// pretty format as the events resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub fn export_events(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.events)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn write_resource(&self, resource: Resource) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let json = match resource {
            Resource::Staff => {
                serde_json::to_string_pretty(&StaffFileOut { employees: &self.employees })?
            }
            Resource::Tasks => serde_json::to_string_pretty(&self.tasks)?,
            Resource::Events => serde_json::to_string_pretty(&self.events)?,
            Resource::Documents => serde_json::to_string_pretty(&self.documents)?,
        };
        fs::write(paths::resource_path(&self.data_dir, resource), json)?;
        Ok(())
    }

    // ---- read access ----

    /// All staff records, in insertion order.
    #[must_use]
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// All tasks, in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// All event buckets, keyed by `YYYY-MM-DD` date in chronological order.
    #[must_use]
    pub const fn events(&self) -> &BTreeMap<String, Vec<Event>> {
        &self.events
    }

    /// All registered documents, in insertion order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Find an employee by id.
    #[must_use]
    pub fn employee_by_id(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Find a task by id.
    #[must_use]
    pub fn task_by_id(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Find a document by name.
    #[must_use]
    pub fn document_by_name(&self, name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.name == name)
    }

    /// All tasks assigned to an employee, in collection order.
    #[must_use]
    pub fn tasks_by_assignee(&self, assignee_id: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.assignee_id == assignee_id).collect()
    }

    /// All events assigned to an employee, flattened across date buckets in
    /// chronological bucket order.
    #[must_use]
    pub fn events_by_assignee(&self, assignee_id: &str) -> Vec<&Event> {
        self.events
            .values()
            .flatten()
            .filter(|e| e.assignee_id == assignee_id)
            .collect()
    }

    /// Events on a specific date, in bucket order.
    #[must_use]
    pub fn events_on(&self, date: &str) -> &[Event] {
        self.events.get(date).map_or(&[], Vec::as_slice)
    }

    /// Tasks matching a filter, in collection order.
    #[must_use]
    pub fn filter_tasks(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| filter.assignee_id.as_ref().map_or(true, |a| &t.assignee_id == a))
            .filter(|t| filter.priority.map_or(true, |p| t.priority == p))
            .collect()
    }

    /// Employees whose name, position, or current task contains the query,
    /// case-insensitively.
    #[must_use]
    pub fn search_employees(&self, query: &str) -> Vec<&Employee> {
        let needle = query.to_lowercase();
        self.employees
            .iter()
            .filter(|e| {
                e.full_name.to_lowercase().contains(&needle)
                    || e.position.to_lowercase().contains(&needle)
                    || e.current_task.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Up to `limit` events on or after `from_date`, in date order.
    #[must_use]
    pub fn upcoming_events(&self, from_date: &str, limit: usize) -> Vec<&Event> {
        self.events
            .range(from_date.to_string()..)
            .flat_map(|(_, bucket)| bucket)
            .take(limit)
            .collect()
    }

    /// Aggregate counts for the dashboard view.
    #[must_use]
    pub fn stats(&self) -> Stats {
        let statuses = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];
        Stats {
            employees: self.employees.len(),
            tasks: self.tasks.len(),
            events: self.events.values().map(Vec::len).sum(),
            documents: self.documents.len(),
            tasks_by_status: statuses
                .iter()
                .map(|s| (*s, self.tasks.iter().filter(|t| t.status == *s).count()))
                .collect(),
        }
    }

    // ---- staff mutations ----

    /// Add a new employee and return the created record.
    ///
    /// The id is generated from the name, birth date, position, and the
    /// creation instant; status starts as `"active"` with empty history.
    pub fn add_employee(
        &mut self,
        full_name: &str,
        birth_date: &str,
        position: &str,
        current_task: &str,
    ) -> Employee {
        let employee = Employee {
            id: generate_employee_id(full_name, birth_date, position),
            full_name: full_name.to_string(),
            birth_date: birth_date.to_string(),
            position: position.to_string(),
            current_task: current_task.to_string(),
            task_history: Vec::new(),
            status: DEFAULT_EMPLOYEE_STATUS.to_string(),
        };
        self.employees.push(employee.clone());
        self.log_op("add_employee", json!({ "id": employee.id, "full_name": employee.full_name }));
        employee
    }

    /// Update an employee's fields. Returns `None` if the id is unknown.
    ///
    /// Renaming does not cascade to the denormalized `assignee_name` copies
    /// on existing tasks and events; those keep the name they were created
    /// with.
    pub fn update_employee(&mut self, id: &str, update: EmployeeUpdate) -> Option<Employee> {
        if update.is_empty() {
            return self.employee_by_id(id).cloned();
        }

        let employee = self.employees.iter_mut().find(|e| e.id == id)?;
        if let Some(full_name) = update.full_name {
            employee.full_name = full_name;
        }
        if let Some(birth_date) = update.birth_date {
            employee.birth_date = birth_date;
        }
        if let Some(position) = update.position {
            employee.position = position;
        }
        if let Some(status) = update.status {
            employee.status = status;
        }
        let updated = employee.clone();
        self.log_op("update_employee", json!({ "id": id }));
        Some(updated)
    }

    /// Change an employee's current task directly.
    ///
    /// When the prior task is non-empty and different from the new one, it
    /// is appended to the history with `start_date == end_date == now` and
    /// kind `"change"` — an instantaneous entry, not an interval.
    /// Returns `None` if the id is unknown.
    pub fn change_current_task(&mut self, id: &str, new_task: &str) -> Option<Employee> {
        let now = timestamp_now();
        let employee = self.employees.iter_mut().find(|e| e.id == id)?;

        let old_task = std::mem::replace(&mut employee.current_task, new_task.to_string());
        if !old_task.is_empty() && old_task != new_task {
            employee.task_history.push(HistoryEntry {
                task: old_task,
                start_date: now.clone(),
                end_date: now,
                kind: HISTORY_KIND_CHANGE.to_string(),
            });
        }
        let updated = employee.clone();
        self.log_op("change_current_task", json!({ "id": id }));
        Some(updated)
    }

    /// Remove an employee strictly by id. Returns whether a record was
    /// removed.
    pub fn remove_employee(&mut self, id: &str) -> bool {
        let before = self.employees.len();
        self.employees.retain(|e| e.id != id);
        let removed = self.employees.len() != before;
        if removed {
            self.log_op("remove_employee", json!({ "id": id }));
        }
        removed
    }

    // ---- task mutations ----

    /// Add a task for an existing employee and return the created record.
    ///
    /// The assignee's name is denormalized onto the task, and the
    /// assignee's `current_task` is overwritten with the task text (without
    /// a history entry).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmployeeNotFound`] if the assignee does not exist.
    pub fn add_task(
        &mut self,
        text: &str,
        assignee_id: &str,
        status: TaskStatus,
        priority: TaskPriority,
        deadline: Option<String>,
    ) -> Result<Task> {
        let assignee_index = self
            .employees
            .iter()
            .position(|e| e.id == assignee_id)
            .ok_or_else(|| Error::EmployeeNotFound(assignee_id.to_string()))?;

        let task = Task {
            id: self.next_task_id(),
            text: text.to_string(),
            assignee_id: assignee_id.to_string(),
            assignee_name: self.employees[assignee_index].full_name.clone(),
            status,
            priority,
            created: timestamp_now(),
            deadline,
        };
        self.tasks.push(task.clone());
        self.employees[assignee_index].current_task = task.text.clone();
        self.log_op("add_task", json!({ "id": task.id, "assignee_id": assignee_id }));
        Ok(task)
    }

    /// Update a task's fields. Returns `Ok(None)` if the id is unknown.
    ///
    /// Editing the text never retroactively updates employee history or the
    /// assignee's `current_task`. Reassigning refreshes both the assignee
    /// id and the denormalized name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmployeeNotFound`] if a new assignee id is unknown;
    /// the task is left untouched in that case.
    pub fn update_task(&mut self, id: u32, update: TaskUpdate) -> Result<Option<Task>> {
        if update.is_empty() {
            return Ok(self.task_by_id(id).cloned());
        }

        let assignee = match &update.assignee_id {
            Some(aid) => {
                let employee = self
                    .employee_by_id(aid)
                    .ok_or_else(|| Error::EmployeeNotFound(aid.clone()))?;
                Some((employee.id.clone(), employee.full_name.clone()))
            }
            None => None,
        };

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(text) = update.text {
            task.text = text;
        }
        if let Some((assignee_id, assignee_name)) = assignee {
            task.assignee_id = assignee_id;
            task.assignee_name = assignee_name;
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(deadline) = update.deadline {
            task.deadline = deadline;
        }
        let updated = task.clone();
        self.log_op("update_task", json!({ "id": id }));
        Ok(Some(updated))
    }

    /// Remove a task by id. Returns whether a record was removed.
    ///
    /// Ids of remaining tasks are never renumbered, and the removed id is
    /// not reused.
    pub fn remove_task(&mut self, id: u32) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            self.log_op("remove_task", json!({ "id": id }));
        }
        removed
    }

    /// Next sequential task id. Never reuses an id freed by removal.
    fn next_task_id(&self) -> u32 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    // ---- event mutations ----

    /// Add an event to a date bucket and return the created record.
    ///
    /// The event id is unique only within its bucket. The `datetime` field
    /// is derived as `"{date} {time}"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] / [`Error::InvalidTime`] for
    /// malformed inputs, [`Error::EmployeeNotFound`] for an unknown
    /// assignee, and [`Error::TaskNotFound`] for an unknown task link.
    pub fn add_event(&mut self, date: &str, new: NewEvent) -> Result<Event> {
        validate_date(date)?;
        validate_time(&new.time)?;

        let assignee_name = self
            .employee_by_id(&new.assignee_id)
            .ok_or_else(|| Error::EmployeeNotFound(new.assignee_id.clone()))?
            .full_name
            .clone();
        let task_name = match new.task_id {
            Some(task_id) => {
                Some(self.task_by_id(task_id).ok_or(Error::TaskNotFound(task_id))?.text.clone())
            }
            None => None,
        };

        let datetime = format!("{date} {}", new.time);
        let bucket = self.events.entry(date.to_string()).or_default();
        let event = Event {
            id: bucket.iter().map(|e| e.id).max().unwrap_or(0) + 1,
            title: new.title,
            description: new.description,
            task_id: new.task_id,
            task_name,
            assignee_id: new.assignee_id,
            assignee_name,
            time: new.time,
            datetime,
            created: timestamp_now(),
        };
        bucket.push(event.clone());
        self.log_op("add_event", json!({ "date": date, "id": event.id }));
        Ok(event)
    }

    /// Update an event within its date bucket. Returns `Ok(None)` if the
    /// bucket or id is unknown.
    ///
    /// The derived `datetime` is recomputed on every edit so it always
    /// equals `"{bucket_date} {time}"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTime`] for a malformed time,
    /// [`Error::EmployeeNotFound`] for an unknown assignee, and
    /// [`Error::TaskNotFound`] for an unknown task link; the event is left
    /// untouched in those cases.
    pub fn update_event(
        &mut self,
        date: &str,
        id: u32,
        update: EventUpdate,
    ) -> Result<Option<Event>> {
        if let Some(time) = &update.time {
            validate_time(time)?;
        }
        let assignee = match &update.assignee_id {
            Some(aid) => {
                let employee = self
                    .employee_by_id(aid)
                    .ok_or_else(|| Error::EmployeeNotFound(aid.clone()))?;
                Some((employee.id.clone(), employee.full_name.clone()))
            }
            None => None,
        };
        let task_link = match update.task_id {
            Some(Some(task_id)) => {
                let text = self.task_by_id(task_id).ok_or(Error::TaskNotFound(task_id))?.text.clone();
                Some(Some((task_id, text)))
            }
            Some(None) => Some(None),
            None => None,
        };

        let Some(bucket) = self.events.get_mut(date) else {
            return Ok(None);
        };
        let Some(event) = bucket.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            event.title = title;
        }
        if let Some(description) = update.description {
            event.description = description;
        }
        if let Some(link) = task_link {
            match link {
                Some((task_id, task_name)) => {
                    event.task_id = Some(task_id);
                    event.task_name = Some(task_name);
                }
                None => {
                    event.task_id = None;
                    event.task_name = None;
                }
            }
        }
        if let Some((assignee_id, assignee_name)) = assignee {
            event.assignee_id = assignee_id;
            event.assignee_name = assignee_name;
        }
        if let Some(time) = update.time {
            event.time = time;
        }
        event.datetime = format!("{date} {}", event.time);
        let updated = event.clone();
        self.log_op("update_event", json!({ "date": date, "id": id }));
        Ok(Some(updated))
    }

    /// Remove an event from its date bucket. Returns whether a record was
    /// removed. An emptied bucket keeps its date key.
    pub fn remove_event(&mut self, date: &str, id: u32) -> bool {
        let Some(bucket) = self.events.get_mut(date) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|e| e.id != id);
        let removed = bucket.len() != before;
        if removed {
            self.log_op("remove_event", json!({ "date": date, "id": id }));
        }
        removed
    }

    // ---- document mutations ----

    /// Import a file into the managed document store.
    ///
    /// The source is copied into the `documents/` subdirectory — never
    /// moved or referenced in place — and a record pointing at the copy is
    /// registered. A name collision is resolved by `on_conflict`: `Skip`
    /// leaves the existing record and stored file untouched, `Replace`
    /// overwrites both.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the source is not a readable
    /// file, or [`Error::Io`] if the copy fails.
    pub fn import_document(&mut self, source: &Path, on_conflict: OnConflict) -> Result<ImportOutcome> {
        if !source.is_file() {
            return Err(Error::FileNotFound(source.to_path_buf()));
        }
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::FileNotFound(source.to_path_buf()))?
            .to_string();

        let existing = self.documents.iter().position(|d| d.name == name);
        if existing.is_some() && on_conflict == OnConflict::Skip {
            return Ok(ImportOutcome::Skipped);
        }

        let storage = paths::documents_dir(&self.data_dir);
        fs::create_dir_all(&storage)?;
        let dest = storage.join(&name);
        fs::copy(source, &dest)?;

        let document = Document {
            kind: file_kind(&name),
            size: fs::metadata(&dest)?.len(),
            modified: timestamp_now(),
            path: dest,
            name,
        };

        match existing {
            Some(index) => {
                self.documents[index] = document.clone();
                self.log_op("replace_document", json!({ "name": document.name }));
                Ok(ImportOutcome::Replaced(document))
            }
            None => {
                self.documents.push(document.clone());
                self.log_op("import_document", json!({ "name": document.name }));
                Ok(ImportOutcome::Imported(document))
            }
        }
    }

    /// Remove a document and delete its stored copy. Returns whether a
    /// record was removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the stored copy exists but cannot be
    /// deleted; the record is kept in that case.
    pub fn remove_document(&mut self, name: &str) -> Result<bool> {
        let Some(index) = self.documents.iter().position(|d| d.name == name) else {
            return Ok(false);
        };
        let path = self.documents[index].path.clone();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        self.documents.remove(index);
        self.log_op("remove_document", json!({ "name": name }));
        Ok(true)
    }

    /// Re-stat a document's stored copy after an external edit, updating
    /// its size and modification timestamp. Returns `Ok(None)` if the name
    /// is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the stored copy cannot be inspected.
    pub fn refresh_document(&mut self, name: &str) -> Result<Option<Document>> {
        let Some(index) = self.documents.iter().position(|d| d.name == name) else {
            return Ok(None);
        };
        let size = fs::metadata(&self.documents[index].path)?.len();
        self.documents[index].size = size;
        self.documents[index].modified = timestamp_now();
        let updated = self.documents[index].clone();
        self.log_op("refresh_document", json!({ "name": name }));
        Ok(Some(updated))
    }

    fn log_op(&self, operation: &str, details: serde_json::Value) {
        if self.debug_logging {
            oplog::append(&self.data_dir, operation, &details);
        }
    }
}

/// Deserialize each entry of a JSON array, collecting malformed ones
/// instead of failing the whole resource.
fn collect_records<T: serde::de::DeserializeOwned>(
    resource: Resource,
    values: Vec<serde_json::Value>,
) -> (Vec<T>, Vec<Error>) {
    let mut records = Vec::with_capacity(values.len());
    let mut malformed = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => malformed.push(Error::MalformedRecord {
                resource,
                index,
                reason: e.to_string(),
            }),
        }
    }
    (records, malformed)
}

fn validate_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(date.to_string()))?;
    Ok(())
}

fn validate_time(time: &str) -> Result<()> {
    NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| Error::InvalidTime(time.to_string()))?;
    Ok(())
}

fn file_kind(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map_or_else(String::new, |e| format!(".{}", e.to_lowercase()))
}
