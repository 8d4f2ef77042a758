use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{normalize_target, Course, PreferenceSet, Result, ScheduleError, Slot};

use super::replace_file;

/// Wire form of the "no preference" placeholder.
pub const NO_PREFERENCE: &str = "-:-";

/// Course catalog file: one course per line,
/// `subject,teacher,students[,target],pref1,pref2,pref3`.
///
/// The target column is optional for legacy rows; its presence is detected
/// by the absence of a `:` in the fourth field. Malformed lines are
/// silently skipped on read: hand-edited files are part of the contract,
/// so the parser stays lenient.
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load for generation: a missing or unreadable file is a hard failure.
    pub fn load(&self) -> Result<Vec<Course>> {
        let contents =
            fs::read_to_string(&self.path).map_err(|e| ScheduleError::CatalogUnavailable {
                reason: format!("{}: {}", self.path.display(), e),
            })?;
        Ok(parse_catalog(&contents))
    }

    /// Load for catalog edits: a missing file is just an empty catalog.
    pub fn load_or_default(&self) -> Result<Vec<Course>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(parse_catalog(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, courses: &[Course]) -> Result<()> {
        let mut contents = String::new();
        for course in courses {
            let _ = writeln!(contents, "{}", serialize_course(course));
        }
        replace_file(&self.path, &contents)?;
        Ok(())
    }
}

fn parse_catalog(contents: &str) -> Vec<Course> {
    contents.lines().filter_map(parse_course_line).collect()
}

/// Parse one catalog line; `None` drops the line.
pub fn parse_course_line(line: &str) -> Option<Course> {
    let parts: Vec<&str> = line.trim().split(',').collect();
    if parts.len() < 6 {
        return None;
    }

    let subject = parts[0].to_string();
    let teacher = parts[1].to_string();
    let students: u32 = parts[2].trim().parse().ok()?;

    // Legacy rows have no target column; a preference always contains ':'.
    let (target, pref_fields) = if parts[3].contains(':') {
        ("ALL".to_string(), &parts[3..])
    } else {
        (normalize_target(parts[3]), &parts[4..])
    };

    let prefs = PreferenceSet::normalize(
        pref_fields
            .iter()
            .take(3)
            .map(|field| field.trim().parse::<Slot>().ok()),
    );

    Some(Course {
        subject,
        teacher,
        students,
        target,
        prefs,
    })
}

pub fn serialize_course(course: &Course) -> String {
    let mut fields = vec![
        course.subject.clone(),
        course.teacher.clone(),
        course.students.to_string(),
        course.target.clone(),
    ];
    for entry in course.prefs.entries() {
        fields.push(match entry {
            Some(slot) => slot.to_string(),
            None => NO_PREFERENCE.to_string(),
        });
    }
    fields.join(",")
}
