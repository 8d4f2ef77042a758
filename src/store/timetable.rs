use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Result, Slot, TimetableRow};

use super::replace_file;

/// Timetable store: one scheduled session per line,
/// `day,period,subject,room,teacher,target[,label]`.
///
/// The label column is optional and omitted when empty. The whole file is
/// replaced on every generation run and on every manual mutation; there are
/// no partial writes. Lines with fewer than four fields are skipped.
pub struct TimetableStore {
    path: PathBuf,
}

impl TimetableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing store reads as empty.
    pub fn load(&self) -> Result<Vec<TimetableRow>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.lines().filter_map(parse_row_line).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, rows: &[TimetableRow]) -> Result<()> {
        let mut contents = String::new();
        for row in rows {
            let _ = writeln!(contents, "{}", serialize_row(row));
        }
        replace_file(&self.path, &contents)?;
        Ok(())
    }

    /// Truncate to empty; failed generation runs must never leave a stale
    /// timetable visible.
    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }
}

/// Parse one store line; `None` drops the line.
pub fn parse_row_line(line: &str) -> Option<TimetableRow> {
    let parts: Vec<&str> = line.trim().split(',').collect();
    if parts.len() < 4 {
        return None;
    }

    let day = parts[0].parse().ok()?;
    let period = parts[1].parse().ok()?;

    Some(TimetableRow {
        slot: Slot::new(day, period),
        subject: parts[2].to_string(),
        room: parts[3].to_string(),
        teacher: parts.get(4).unwrap_or(&"").to_string(),
        target: parts.get(5).unwrap_or(&"ALL").to_string(),
        label: parts.get(6).unwrap_or(&"").to_string(),
    })
}

pub fn serialize_row(row: &TimetableRow) -> String {
    let mut line = format!(
        "{},{},{},{},{},{}",
        row.slot.day, row.slot.period, row.subject, row.room, row.teacher, row.target
    );
    let label = row.label.trim();
    if !label.is_empty() {
        line.push(',');
        line.push_str(label);
    }
    line
}
