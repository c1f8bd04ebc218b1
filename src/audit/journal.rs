use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::models::triplet::Variable;

/// Snapshot of the thermal triplet at one date, as recorded in the journal.
/// `None` means the series had no row for the date at capture time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TripletValues {
    pub tmin: Option<f64>,
    pub tmean: Option<f64>,
    pub tmax: Option<f64>,
}

/// One applied reviewer decision. Append-only: a (station, date) pair may
/// accumulate entries over time; the journal is a history, not a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub station: String,
    pub date: NaiveDate,
    pub action: String,
    /// Set for statistical decisions; thermal corrections span the triplet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<Variable>,
    #[serde(default)]
    pub note: String,
    pub values_before: TripletValues,
    pub values_after: TripletValues,
}

impl AuditEntry {
    pub fn is_keep(&self) -> bool {
        self.action == "m"
    }
}

/// Cross-variable swaps are journaled separately from single-date entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Swap,
    Single,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Journal {
    #[serde(default)]
    swaps: Vec<AuditEntry>,
    #[serde(default)]
    single_changes: Vec<AuditEntry>,
}

/// Append-only, reloadable journal of applied decisions.
///
/// Every durable append reloads the latest on-disk content first, so two
/// sequential sessions against the same file do not lose each other's
/// entries; concurrent sessions are last-writer-wins and unsupported.
#[derive(Debug, Default)]
pub struct AuditLog {
    path: Option<PathBuf>,
    journal: Journal,
}

impl AuditLog {
    /// Purely in-memory log, used by tests and dry-run auditing.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a journal backed by `path`, loading prior history if present.
    ///
    /// An unreadable or malformed journal is recovered as empty: prior audit
    /// history is best-effort, not safety-critical.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let journal = Self::load_journal(&path);
        Self {
            path: Some(path),
            journal,
        }
    }

    fn load_journal(path: &Path) -> Journal {
        if !path.exists() {
            return Journal::default();
        }
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(journal) => journal,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "journal unreadable, starting empty");
                    Journal::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "journal unreadable, starting empty");
                Journal::default()
            }
        }
    }

    /// Append an entry and persist the whole journal (reload-before-append).
    pub fn append(&mut self, kind: EntryKind, entry: AuditEntry) -> Result<()> {
        if let Some(path) = &self.path {
            // Pick up entries written since this log was opened
            self.journal = Self::load_journal(path);
        }
        match kind {
            EntryKind::Swap => self.journal.swaps.push(entry),
            EntryKind::Single => self.journal.single_changes.push(entry),
        }
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let text = serde_json::to_string_pretty(&self.journal)?;
            fs::write(path, text)?;
        }
        Ok(())
    }

    /// All entries, swaps first, each in append order.
    pub fn iter(&self) -> impl Iterator<Item = &AuditEntry> {
        self.journal
            .swaps
            .iter()
            .chain(self.journal.single_changes.iter())
    }

    pub fn len(&self) -> usize {
        self.journal.swaps.len() + self.journal.single_changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries matching a predicate, for history rendering.
    pub fn query<'a>(
        &'a self,
        predicate: impl Fn(&AuditEntry) -> bool + 'a,
    ) -> impl Iterator<Item = &'a AuditEntry> {
        self.iter().filter(move |e| predicate(e))
    }

    /// History for one (station, date) pair in append order.
    pub fn entries_for(&self, station: &str, date: NaiveDate) -> Vec<&AuditEntry> {
        self.iter()
            .filter(|e| e.station == station && e.date == date)
            .collect()
    }

    /// True if a "keep" decision suppresses re-flagging of `variable` at
    /// (station, date). An entry scoped to a variable suppresses only that
    /// variable; an unscoped (thermal) keep covers the whole triplet.
    pub fn is_kept(&self, station: &str, date: NaiveDate, variable: Variable) -> bool {
        self.iter().any(|e| {
            e.is_keep()
                && e.station == station
                && e.date == date
                && e.variable.map_or(true, |v| v == variable)
        })
    }
}
