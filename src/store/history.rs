use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Result;

/// Immutable record of one successful generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub semester: String,
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    pub total_rows: usize,
    pub subjects: Vec<String>,
}

impl GenerationRecord {
    pub fn new(
        semester: impl Into<String>,
        generated_by: impl Into<String>,
        total_rows: usize,
        subjects: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            semester: semester.into(),
            generated_at: Utc::now(),
            generated_by: generated_by.into(),
            total_rows,
            subjects,
        }
    }
}

/// History of one semester's runs, newest first.
#[derive(Debug, Clone)]
pub struct SemesterHistory {
    pub semester: String,
    pub runs: Vec<GenerationRecord>,
}

impl SemesterHistory {
    pub fn latest(&self) -> &GenerationRecord {
        &self.runs[0]
    }

    pub fn total_runs(&self) -> usize {
        self.runs.len()
    }
}

/// Append-only JSON-lines log of generation runs. Unparseable lines are
/// skipped on read.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &GenerationRecord) -> Result<()> {
        let line = serde_json::to_string(record).map_err(std::io::Error::other)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// All records, newest first.
    pub fn load(&self) -> Result<Vec<GenerationRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut records: Vec<GenerationRecord> = contents
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        records.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(records)
    }

    /// Records grouped by semester label, groups ordered by most recent run.
    pub fn grouped_by_semester(&self) -> Result<Vec<SemesterHistory>> {
        let mut groups: Vec<SemesterHistory> = Vec::new();
        for record in self.load()? {
            match groups.iter_mut().find(|g| g.semester == record.semester) {
                Some(group) => group.runs.push(record),
                None => groups.push(SemesterHistory {
                    semester: record.semester.clone(),
                    runs: vec![record],
                }),
            }
        }
        Ok(groups)
    }
}

/// Default semester label for a run date, e.g. `2026 Aug-Nov Semester`.
pub fn default_semester_label(date: NaiveDate) -> String {
    let name = match date.month() {
        1..=4 => "Jan-Apr Semester",
        8..=11 => "Aug-Nov Semester",
        12 => "December Vacation",
        _ => "Jan-May Semester",
    };
    format!("{} {}", date.year(), name)
}
