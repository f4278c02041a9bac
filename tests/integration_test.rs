//! Integration tests for `staffdesk`.

use staffdesk::paths::{resource_path, Resource};
use staffdesk::store::{
    ImportOutcome, NewEvent, OnConflict, Repository, TaskPriority, TaskStatus,
};
use staffdesk::VERSION;
use tempfile::TempDir;

#[test]
fn test_version_exists() {
    assert!(!VERSION.is_empty());
}

#[test]
fn test_full_round_trip_through_public_api() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");

    let mut repo = Repository::new(&data_dir);
    let alice = repo.add_employee("Alice Schmidt", "1990-04-12", "Accountant", "");
    let task = repo
        .add_task("Write report", &alice.id, TaskStatus::InProgress, TaskPriority::High, None)
        .unwrap();
    repo.add_event(
        "2024-03-01",
        NewEvent {
            title: "Planning".to_string(),
            description: "Q2 roadmap".to_string(),
            task_id: Some(task.id),
            assignee_id: alice.id.clone(),
            time: "14:30".to_string(),
        },
    )
    .unwrap();
    let source = dir.path().join("report.txt");
    std::fs::write(&source, "quarterly numbers").unwrap();
    let outcome = repo.import_document(&source, OnConflict::Skip).unwrap();
    assert!(matches!(outcome, ImportOutcome::Imported(_)));

    repo.save().unwrap();

    let (loaded, report) = Repository::open(&data_dir);
    assert!(report.is_clean());
    assert_eq!(loaded.employees(), repo.employees());
    assert_eq!(loaded.tasks(), repo.tasks());
    assert_eq!(loaded.events(), repo.events());
    assert_eq!(loaded.documents(), repo.documents());

    // Denormalized state survived the trip.
    let reloaded_alice = loaded.employee_by_id(&alice.id).unwrap();
    assert_eq!(reloaded_alice.current_task, "Write report");
    assert_eq!(loaded.events_on("2024-03-01")[0].datetime, "2024-03-01 14:30");
}

#[test]
fn test_partial_load_survives_one_corrupt_resource() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");

    let mut repo = Repository::new(&data_dir);
    let alice = repo.add_employee("Alice Schmidt", "1990-04-12", "Accountant", "");
    repo.add_task("Write report", &alice.id, TaskStatus::ToDo, TaskPriority::Medium, None)
        .unwrap();
    repo.save().unwrap();

    std::fs::write(resource_path(&data_dir, Resource::Tasks), "definitely not json").unwrap();

    let (loaded, report) = Repository::open(&data_dir);
    assert!(!report.is_clean());
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].0, Resource::Tasks);
    assert_eq!(loaded.employees().len(), 1);
    assert!(loaded.tasks().is_empty());
}
