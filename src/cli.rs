//! Command-line shell over the office repository.
//!
//! Each invocation loads the repository, performs one operation, and saves
//! when something changed. Load problems are reported as warnings on
//! stderr; the data that did load is still usable, matching the
//! best-effort load contract.

use crate::config::AppConfig;
use crate::reminders::ReminderScanner;
use crate::store::{
    ImportOutcome, NewEvent, OnConflict, Repository, TaskFilter, TaskPriority, TaskStatus,
    TaskUpdate,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Office management over flat JSON files.
#[derive(Debug, Parser)]
#[command(name = "staffdesk", version, about)]
pub struct Cli {
    /// Data directory (defaults to the configured location).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show collection counts and the task status breakdown.
    Stats,
    /// Manage staff records.
    Staff {
        /// Staff action.
        #[command(subcommand)]
        action: StaffAction,
    },
    /// Manage the TODO list.
    Tasks {
        /// Task action.
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Manage calendar events.
    Events {
        /// Event action.
        #[command(subcommand)]
        action: EventAction,
    },
    /// Manage internal documents.
    Docs {
        /// Document action.
        #[command(subcommand)]
        action: DocAction,
    },
    /// List events starting within the reminder window.
    Remind,
}

/// Staff subcommands.
#[derive(Debug, Subcommand)]
pub enum StaffAction {
    /// List employees, optionally filtered by a search query.
    List {
        /// Case-insensitive substring matched against name, position, and
        /// current task.
        query: Option<String>,
    },
    /// Add an employee.
    Add {
        /// Full name.
        full_name: String,
        /// Birth date (YYYY-MM-DD).
        birth_date: String,
        /// Job position.
        position: String,
        /// Initial current task.
        #[arg(long, default_value = "")]
        task: String,
    },
    /// Change an employee's current task, recording the prior one.
    SetTask {
        /// Employee id.
        id: String,
        /// The new task text.
        task: String,
    },
    /// Show an employee's task history.
    History {
        /// Employee id.
        id: String,
    },
    /// Remove an employee by id.
    Remove {
        /// Employee id.
        id: String,
    },
}

/// Task subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// List tasks, optionally filtered.
    List {
        /// Filter by status (to-do, in-progress, done).
        #[arg(long, value_parser = TaskStatus::from_str)]
        status: Option<TaskStatus>,
        /// Filter by assignee id.
        #[arg(long)]
        assignee: Option<String>,
        /// Filter by priority (low, medium, high, critical).
        #[arg(long, value_parser = TaskPriority::from_str)]
        priority: Option<TaskPriority>,
    },
    /// Add a task for an employee.
    Add {
        /// Task text.
        text: String,
        /// Assignee employee id.
        assignee: String,
        /// Initial status.
        #[arg(long, default_value = "to-do", value_parser = TaskStatus::from_str)]
        status: TaskStatus,
        /// Priority.
        #[arg(long, default_value = "medium", value_parser = TaskPriority::from_str)]
        priority: TaskPriority,
        /// Optional deadline.
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Mark a task done.
    Done {
        /// Task id.
        id: u32,
    },
    /// Remove a task by id.
    Remove {
        /// Task id.
        id: u32,
    },
}

/// Event subcommands.
#[derive(Debug, Subcommand)]
pub enum EventAction {
    /// List events for a date, or all dates when omitted.
    List {
        /// Date (YYYY-MM-DD).
        date: Option<String>,
    },
    /// Add an event on a date.
    Add {
        /// Date (YYYY-MM-DD).
        date: String,
        /// Event title.
        title: String,
        /// Start time (HH:MM).
        #[arg(long)]
        time: String,
        /// Assignee employee id.
        #[arg(long)]
        assignee: String,
        /// Description.
        #[arg(long, default_value = "")]
        description: String,
        /// Optional linked task id.
        #[arg(long)]
        task: Option<u32>,
    },
    /// Remove an event by date and id.
    Remove {
        /// Date (YYYY-MM-DD).
        date: String,
        /// Event id within the date.
        id: u32,
    },
    /// Export all events to a JSON file.
    Export {
        /// Destination file.
        path: PathBuf,
    },
}

/// Document subcommands.
#[derive(Debug, Subcommand)]
pub enum DocAction {
    /// List registered documents.
    List,
    /// Import a file into the managed document store.
    Import {
        /// File to import (copied, never moved).
        path: PathBuf,
        /// Replace an existing document with the same name.
        #[arg(long)]
        replace: bool,
    },
    /// Remove a document and its stored copy.
    Remove {
        /// Document name.
        name: String,
    },
}

/// Run a parsed command to completion.
///
/// # Errors
///
/// Returns the first repository or I/O error hit while executing.
pub fn run(cli: Cli) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.resolved_data_dir());

    let (repo, report) = Repository::open(data_dir);
    let mut repo = repo.with_debug_logging(config.debug_logging);
    for (resource, error) in report.failures() {
        eprintln!("warning: failed to load {resource}: {error}");
    }

    match cli.command {
        Command::Stats => {
            let stats = repo.stats();
            println!("employees: {}", stats.employees);
            println!("tasks:     {}", stats.tasks);
            println!("events:    {}", stats.events);
            println!("documents: {}", stats.documents);
            for (status, count) in stats.tasks_by_status {
                println!("  {status}: {count}");
            }
        }
        Command::Staff { action } => run_staff(&mut repo, action)?,
        Command::Tasks { action } => run_tasks(&mut repo, action)?,
        Command::Events { action } => run_events(&mut repo, action)?,
        Command::Docs { action } => run_docs(&mut repo, action)?,
        Command::Remind => {
            let mut scanner = ReminderScanner::new(config.reminder_lookahead_minutes);
            let now = chrono::Local::now().naive_local();
            let due = scanner.due_events(&repo, now);
            if due.is_empty() {
                println!("no upcoming events");
            }
            for event in due {
                println!("{} | {} | {}", event.datetime, event.title, event.assignee_name);
            }
        }
    }
    Ok(())
}

fn run_staff(
    repo: &mut Repository,
    action: StaffAction,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match action {
        StaffAction::List { query } => {
            let employees = match &query {
                Some(q) => repo.search_employees(q),
                None => repo.employees().iter().collect(),
            };
            for employee in employees {
                println!(
                    "{} | {} | {} | {} | {}",
                    employee.id,
                    employee.full_name,
                    employee.position,
                    employee.current_task,
                    employee.status
                );
            }
        }
        StaffAction::Add { full_name, birth_date, position, task } => {
            let employee = repo.add_employee(&full_name, &birth_date, &position, &task);
            repo.save()?;
            println!("added {} ({})", employee.full_name, employee.id);
        }
        StaffAction::SetTask { id, task } => match repo.change_current_task(&id, &task) {
            Some(employee) => {
                repo.save()?;
                println!("{} now working on: {}", employee.full_name, employee.current_task);
            }
            None => eprintln!("no employee with id {id}"),
        },
        StaffAction::History { id } => match repo.employee_by_id(&id) {
            Some(employee) => {
                for entry in &employee.task_history {
                    println!(
                        "{} .. {} | {} | {}",
                        entry.start_date, entry.end_date, entry.kind, entry.task
                    );
                }
            }
            None => eprintln!("no employee with id {id}"),
        },
        StaffAction::Remove { id } => {
            if repo.remove_employee(&id) {
                repo.save()?;
                println!("removed {id}");
            } else {
                eprintln!("no employee with id {id}");
            }
        }
    }
    Ok(())
}

fn run_tasks(
    repo: &mut Repository,
    action: TaskAction,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match action {
        TaskAction::List { status, assignee, priority } => {
            let filter = TaskFilter { status, assignee_id: assignee, priority };
            for task in repo.filter_tasks(&filter) {
                println!(
                    "#{} | {} | {} | {} | {}",
                    task.id, task.text, task.assignee_name, task.status, task.priority
                );
            }
        }
        TaskAction::Add { text, assignee, status, priority, deadline } => {
            let task = repo.add_task(&text, &assignee, status, priority, deadline)?;
            repo.save()?;
            println!("added task #{} for {}", task.id, task.assignee_name);
        }
        TaskAction::Done { id } => {
            let update = TaskUpdate { status: Some(TaskStatus::Done), ..Default::default() };
            match repo.update_task(id, update)? {
                Some(task) => {
                    repo.save()?;
                    println!("task #{} done: {}", task.id, task.text);
                }
                None => eprintln!("no task with id {id}"),
            }
        }
        TaskAction::Remove { id } => {
            if repo.remove_task(id) {
                repo.save()?;
                println!("removed task #{id}");
            } else {
                eprintln!("no task with id {id}");
            }
        }
    }
    Ok(())
}

fn run_events(
    repo: &mut Repository,
    action: EventAction,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match action {
        EventAction::List { date } => match date {
            Some(date) => {
                for event in repo.events_on(&date) {
                    println!("#{} | {} | {} | {}", event.id, event.time, event.title, event.assignee_name);
                }
            }
            None => {
                for (date, bucket) in repo.events() {
                    for event in bucket {
                        println!("{date} | #{} | {} | {}", event.id, event.time, event.title);
                    }
                }
            }
        },
        EventAction::Add { date, title, time, assignee, description, task } => {
            let event = repo.add_event(
                &date,
                NewEvent { title, description, task_id: task, assignee_id: assignee, time },
            )?;
            repo.save()?;
            println!("added event #{} at {}", event.id, event.datetime);
        }
        EventAction::Remove { date, id } => {
            if repo.remove_event(&date, id) {
                repo.save()?;
                println!("removed event #{id} on {date}");
            } else {
                eprintln!("no event #{id} on {date}");
            }
        }
        EventAction::Export { path } => {
            repo.export_events(&path)?;
            println!("exported events to {}", path.display());
        }
    }
    Ok(())
}

fn run_docs(
    repo: &mut Repository,
    action: DocAction,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match action {
        DocAction::List => {
            for doc in repo.documents() {
                println!("{} | {} bytes | {} | {}", doc.name, doc.size, doc.modified, doc.kind);
            }
        }
        DocAction::Import { path, replace } => {
            let policy = if replace { OnConflict::Replace } else { OnConflict::Skip };
            match repo.import_document(&path, policy)? {
                ImportOutcome::Imported(doc) => {
                    repo.save()?;
                    println!("imported {}", doc.name);
                }
                ImportOutcome::Replaced(doc) => {
                    repo.save()?;
                    println!("replaced {}", doc.name);
                }
                ImportOutcome::Skipped => println!("skipped: a document with that name exists"),
            }
        }
        DocAction::Remove { name } => {
            if repo.remove_document(&name)? {
                repo.save()?;
                println!("removed {name}");
            } else {
                eprintln!("no document named {name}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_command_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_staff_add() {
        let cli = Cli::try_parse_from([
            "staffdesk",
            "staff",
            "add",
            "Alice Schmidt",
            "1990-04-12",
            "Accountant",
        ])
        .unwrap();
        let Command::Staff { action: StaffAction::Add { full_name, task, .. } } = cli.command
        else {
            panic!("expected staff add");
        };
        assert_eq!(full_name, "Alice Schmidt");
        assert_eq!(task, "");
    }

    #[test]
    fn test_parse_tasks_add_with_enums() {
        let cli = Cli::try_parse_from([
            "staffdesk",
            "tasks",
            "add",
            "Write report",
            "a1b2c3d4",
            "--priority",
            "critical",
            "--status",
            "in-progress",
        ])
        .unwrap();
        let Command::Tasks { action: TaskAction::Add { status, priority, .. } } = cli.command
        else {
            panic!("expected tasks add");
        };
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(priority, TaskPriority::Critical);
    }

    #[test]
    fn test_parse_rejects_bad_priority() {
        let result = Cli::try_parse_from([
            "staffdesk",
            "tasks",
            "add",
            "Write report",
            "a1b2c3d4",
            "--priority",
            "urgent",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_global_data_dir() {
        let cli =
            Cli::try_parse_from(["staffdesk", "--data-dir", "/tmp/office", "stats"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/office")));
    }

    #[test]
    fn test_run_staff_add_saves() {
        let dir = tempfile::TempDir::new().unwrap();
        let data_dir = dir.path().join("data");

        let cli = Cli::try_parse_from([
            "staffdesk",
            "--data-dir",
            data_dir.to_str().unwrap(),
            "staff",
            "add",
            "Alice Schmidt",
            "1990-04-12",
            "Accountant",
        ])
        .unwrap();
        run(cli).unwrap();

        // The add saved; a fresh repository sees the record.
        let (repo, report) = Repository::open(&data_dir);
        assert!(report.is_clean());
        assert_eq!(repo.employees().len(), 1);
        assert_eq!(repo.employees()[0].full_name, "Alice Schmidt");
    }

    #[test]
    fn test_run_docs_import() {
        let dir = tempfile::TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        let source = dir.path().join("report.txt");
        std::fs::write(&source, "contents").unwrap();

        let cli = Cli::try_parse_from([
            "staffdesk",
            "--data-dir",
            data_dir.to_str().unwrap(),
            "docs",
            "import",
            source.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();

        let (repo, _) = Repository::open(&data_dir);
        assert_eq!(repo.documents().len(), 1);
        assert_eq!(repo.documents()[0].name, "report.txt");
    }
}
