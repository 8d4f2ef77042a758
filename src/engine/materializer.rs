use crate::domain::{Campus, Course, Slot, TimetableRow};
use crate::milp::MilpSolution;

use super::builder::VariableIndex;

/// Diagnostic record: a course that was assigned slots outside its
/// preference set. Reporting only; violations never block a run.
#[derive(Debug, Clone)]
pub struct PreferenceViolation {
    pub subject: String,
    pub teacher: String,
    pub target: String,
    pub preferred: Vec<Slot>,
    pub assigned: Vec<Slot>,
}

/// Result of a successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub semester: String,
    pub message: String,
    pub total_rows: usize,
    /// Distinct subjects scheduled, sorted.
    pub subjects: Vec<String>,
    pub violations: Vec<PreferenceViolation>,
}

/// Turn a solved assignment into flat timetable rows plus per-course
/// violation diagnostics. Rows come out course-major in catalog order,
/// slots in week order.
pub fn materialize(
    campus: &Campus,
    courses: &[Course],
    index: &VariableIndex,
    solution: &MilpSolution,
) -> (Vec<TimetableRow>, Vec<PreferenceViolation>) {
    let mut rows = Vec::new();
    let mut violations = Vec::new();

    for (c, course) in courses.iter().enumerate() {
        let mut off_preference = Vec::new();
        for (s, slot) in index.slots().iter().enumerate() {
            for (r, room) in campus.rooms.iter().enumerate() {
                if !solution.is_selected(index.column(c, s, r)) {
                    continue;
                }
                rows.push(TimetableRow {
                    slot: *slot,
                    subject: course.subject.clone(),
                    room: room.name.clone(),
                    teacher: course.teacher.clone(),
                    target: course.target.clone(),
                    label: String::new(),
                });
                if !course.prefs.contains(*slot) {
                    off_preference.push(*slot);
                }
            }
        }
        if !off_preference.is_empty() {
            violations.push(PreferenceViolation {
                subject: course.subject.clone(),
                teacher: course.teacher.clone(),
                target: course.target.clone(),
                preferred: course.prefs.real().collect(),
                assigned: off_preference,
            });
        }
    }

    (rows, violations)
}
