//! Debug operation logging.
//!
//! When `debug_logging` is enabled in the application config, every
//! repository mutation is appended as a JSONL line to
//! `<data_dir>/oplog.jsonl`. This allows reconstructing what happened to
//! the collections by inspecting exactly which operations ran.
//!
//! Errors are silently ignored — logging must never break a mutation.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Log file name within the data directory.
const OPLOG_FILE: &str = "oplog.jsonl";

/// Append an operation entry to the log file.
///
/// Creates the data directory if needed. Any failure is swallowed.
pub fn append(data_dir: &Path, operation: &str, details: &serde_json::Value) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }

    let entry = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "operation": operation,
        "details": details,
    });

    let log_path = data_dir.join(OPLOG_FILE);
    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    // Write the entry as a single line
    let _ = writeln!(file, "{entry}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn read_log_lines(data_dir: &Path) -> Vec<serde_json::Value> {
        let log_path = data_dir.join(OPLOG_FILE);
        if !log_path.exists() {
            return vec![];
        }
        let content = std::fs::read_to_string(&log_path).unwrap();
        content
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_append_writes_entry() {
        let dir = TempDir::new().unwrap();

        append(dir.path(), "add_employee", &json!({ "id": "a1b2c3d4" }));

        let lines = read_log_lines(dir.path());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["operation"], "add_employee");
        assert_eq!(lines[0]["details"]["id"], "a1b2c3d4");
        assert!(lines[0]["timestamp"].is_string());
    }

    #[test]
    fn test_append_multiple_entries() {
        let dir = TempDir::new().unwrap();

        append(dir.path(), "add_task", &json!({ "id": 1 }));
        append(dir.path(), "remove_task", &json!({ "id": 1 }));

        let lines = read_log_lines(dir.path());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["operation"], "add_task");
        assert_eq!(lines[1]["operation"], "remove_task");
    }

    #[test]
    fn test_append_creates_data_dir() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("nested").join("data");

        append(&data_dir, "add_employee", &json!({}));

        assert!(data_dir.join(OPLOG_FILE).exists());
    }

    #[test]
    fn test_append_swallows_failures() {
        let dir = TempDir::new().unwrap();
        // Occupy the log path with a directory so the file open fails.
        std::fs::create_dir_all(dir.path().join(OPLOG_FILE)).unwrap();

        // Must not panic.
        append(dir.path(), "add_employee", &json!({}));
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let dir = TempDir::new().unwrap();
        append(dir.path(), "op", &json!({}));

        let lines = read_log_lines(dir.path());
        let ts = lines[0]["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
