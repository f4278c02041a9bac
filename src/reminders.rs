//! Periodic checks driven by the presentation layer's timers.
//!
//! Both checks here are plain synchronous calls designed to run on the same
//! thread as user actions — there is no background work to coordinate:
//! - [`ReminderScanner`] finds events starting within a lookahead window of
//!   the current time, firing each one at most once.
//! - [`Autosave`] answers whether a periodic save pass is due.

use crate::store::{Event, Repository, DATETIME_FMT};
use chrono::{Duration, NaiveDateTime};
use std::collections::HashSet;

/// Scans calendar events for upcoming reminders.
///
/// An event is due when its parsed `datetime` lies within
/// `[now, now + lookahead]`. Each event fires at most once per scanner;
/// [`snooze`](Self::snooze) re-arms a fired event so it fires again on a
/// later scan. Events whose `datetime` does not parse are skipped.
#[derive(Debug)]
pub struct ReminderScanner {
    lookahead: Duration,
    fired: HashSet<String>,
}

impl ReminderScanner {
    /// Create a scanner with the given lookahead window.
    #[must_use]
    pub fn new(lookahead_minutes: i64) -> Self {
        Self { lookahead: Duration::minutes(lookahead_minutes), fired: HashSet::new() }
    }

    /// Events starting within the lookahead window of `now` that have not
    /// fired yet. Fired events are remembered.
    pub fn due_events(&mut self, repo: &Repository, now: NaiveDateTime) -> Vec<Event> {
        let mut due = Vec::new();
        for (date, bucket) in repo.events() {
            for event in bucket {
                let key = Self::key(date, event);
                if self.fired.contains(&key) {
                    continue;
                }
                let Ok(starts_at) = NaiveDateTime::parse_from_str(&event.datetime, DATETIME_FMT)
                else {
                    continue;
                };
                let until = starts_at - now;
                if until >= Duration::zero() && until <= self.lookahead {
                    self.fired.insert(key);
                    due.push(event.clone());
                }
            }
        }
        due
    }

    /// Re-arm a fired event so it is reported again on a later scan.
    pub fn snooze(&mut self, event: &Event) {
        let date = event.datetime.split(' ').next().unwrap_or_default();
        self.fired.remove(&Self::key(date, event));
    }

    fn key(date: &str, event: &Event) -> String {
        format!("{date}_{}_{}", event.time, event.title)
    }
}

/// Tracks when a periodic save pass is due.
///
/// The timer arms itself on the first [`is_due`](Self::is_due) call and
/// fires once per interval thereafter; the caller marks completed passes
/// with [`mark_saved`](Self::mark_saved).
#[derive(Debug)]
pub struct Autosave {
    interval: Duration,
    last_save: Option<NaiveDateTime>,
}

impl Autosave {
    /// Create a ticker firing every `interval_secs` seconds.
    #[must_use]
    pub fn new(interval_secs: u64) -> Self {
        let secs = i64::try_from(interval_secs).unwrap_or(i64::MAX);
        Self { interval: Duration::seconds(secs), last_save: None }
    }

    /// Whether a save pass is due at `now`.
    pub fn is_due(&mut self, now: NaiveDateTime) -> bool {
        match self.last_save {
            None => {
                self.last_save = Some(now);
                false
            }
            Some(last) => now - last >= self.interval,
        }
    }

    /// Record that a save pass completed at `now`.
    pub fn mark_saved(&mut self, now: NaiveDateTime) {
        self.last_save = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewEvent;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn repo_with_event(dir: &TempDir, title: &str, time: &str) -> Repository {
        let mut repo = Repository::new(dir.path().join("data"));
        let alice = repo.add_employee("Alice Schmidt", "1990-04-12", "Accountant", "");
        repo.add_event(
            "2024-03-01",
            NewEvent {
                title: title.to_string(),
                description: String::new(),
                task_id: None,
                assignee_id: alice.id,
                time: time.to_string(),
            },
        )
        .unwrap();
        repo
    }

    #[test]
    fn test_event_within_window_is_due() {
        let dir = TempDir::new().unwrap();
        let repo = repo_with_event(&dir, "Planning", "14:30");
        let mut scanner = ReminderScanner::new(10);

        let due = scanner.due_events(&repo, at(14, 25));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "Planning");
    }

    #[test]
    fn test_event_outside_window_is_not_due() {
        let dir = TempDir::new().unwrap();
        let repo = repo_with_event(&dir, "Planning", "14:30");
        let mut scanner = ReminderScanner::new(10);

        // Too early: more than ten minutes out.
        assert!(scanner.due_events(&repo, at(14, 0)).is_empty());
        // Too late: already started.
        assert!(scanner.due_events(&repo, at(14, 31)).is_empty());
    }

    #[test]
    fn test_event_at_window_edges_is_due() {
        let dir = TempDir::new().unwrap();
        let repo = repo_with_event(&dir, "Planning", "14:30");

        let mut scanner = ReminderScanner::new(10);
        assert_eq!(scanner.due_events(&repo, at(14, 20)).len(), 1);

        let mut scanner = ReminderScanner::new(10);
        assert_eq!(scanner.due_events(&repo, at(14, 30)).len(), 1);
    }

    #[test]
    fn test_event_fires_only_once() {
        let dir = TempDir::new().unwrap();
        let repo = repo_with_event(&dir, "Planning", "14:30");
        let mut scanner = ReminderScanner::new(10);

        assert_eq!(scanner.due_events(&repo, at(14, 25)).len(), 1);
        assert!(scanner.due_events(&repo, at(14, 26)).is_empty());
    }

    #[test]
    fn test_snooze_rearms_event() {
        let dir = TempDir::new().unwrap();
        let repo = repo_with_event(&dir, "Planning", "14:30");
        let mut scanner = ReminderScanner::new(10);

        let due = scanner.due_events(&repo, at(14, 25));
        assert_eq!(due.len(), 1);

        scanner.snooze(&due[0]);
        assert_eq!(scanner.due_events(&repo, at(14, 26)).len(), 1);
    }

    #[test]
    fn test_unparseable_datetime_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut repo = repo_with_event(&dir, "Planning", "14:30");
        // Corrupt the datetime the way a hand-edited data file could.
        repo.save().unwrap();
        let events_path =
            crate::paths::resource_path(repo.data_dir(), crate::paths::Resource::Events);
        let content = std::fs::read_to_string(&events_path)
            .unwrap()
            .replace("2024-03-01 14:30", "not a datetime");
        std::fs::write(&events_path, content).unwrap();
        repo.load();

        let mut scanner = ReminderScanner::new(10);
        assert!(scanner.due_events(&repo, at(14, 25)).is_empty());
    }

    #[test]
    fn test_autosave_arms_on_first_call() {
        let mut autosave = Autosave::new(300);
        assert!(!autosave.is_due(at(12, 0)));
        assert!(!autosave.is_due(at(12, 4)));
        assert!(autosave.is_due(at(12, 5)));
    }

    #[test]
    fn test_autosave_mark_saved_resets_interval() {
        let mut autosave = Autosave::new(300);
        autosave.is_due(at(12, 0));
        assert!(autosave.is_due(at(12, 6)));

        autosave.mark_saved(at(12, 6));
        assert!(!autosave.is_due(at(12, 10)));
        assert!(autosave.is_due(at(12, 11)));
    }
}
