use std::collections::BTreeSet;

use crate::domain::{Campus, Course, Slot};
use crate::milp::{BinaryProgram, ConstraintSense, LinearConstraint};

/// Maps (course, slot, room) triples to solver columns and back.
///
/// Columns are laid out course-major: all of a course's (slot, room)
/// choices are contiguous, slots in week order, rooms in campus order.
#[derive(Debug, Clone)]
pub struct VariableIndex {
    slots: Vec<Slot>,
    num_rooms: usize,
    num_courses: usize,
}

impl VariableIndex {
    pub fn new(num_courses: usize, slots: Vec<Slot>, num_rooms: usize) -> Self {
        Self {
            slots,
            num_rooms,
            num_courses,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn num_columns(&self) -> usize {
        self.num_courses * self.slots.len() * self.num_rooms
    }

    pub fn column(&self, course: usize, slot: usize, room: usize) -> usize {
        (course * self.slots.len() + slot) * self.num_rooms + room
    }

    /// Inverse of [`VariableIndex::column`].
    pub fn triple(&self, column: usize) -> (usize, usize, usize) {
        let room = column % self.num_rooms;
        let rest = column / self.num_rooms;
        (rest / self.slots.len(), rest % self.slots.len(), room)
    }
}

/// Builds the assignment MILP: one binary variable per (course, slot, room)
/// meaning "this course occupies this room during this slot".
pub fn build_model(campus: &Campus, courses: &[Course]) -> (BinaryProgram, VariableIndex) {
    let slots = Slot::week();
    let index = VariableIndex::new(courses.len(), slots.clone(), campus.rooms.len());
    let mut program = BinaryProgram::new("weekly-timetable");

    // Columns, with their soft costs. The seniority term is charged on
    // every column of a course; since the session count is fixed it is a
    // per-course constant in the objective and never steers slot choice.
    for course in courses {
        let seniority = campus.seniority_cost(&course.teacher);
        for slot in &slots {
            let mut cost = seniority;
            if !course.prefs.contains(*slot) {
                cost += campus.preference_weight;
            }
            if slot.period.is_late() {
                cost += campus.late_weight;
            }
            for _room in &campus.rooms {
                program.add_variable(cost);
            }
        }
    }

    // Session count: each course is scheduled exactly as many times as it
    // has real preferences. Zero preferences means zero sessions.
    for (c, course) in courses.iter().enumerate() {
        let terms = (0..slots.len())
            .flat_map(|s| (0..campus.rooms.len()).map(move |r| (s, r)))
            .map(|(s, r)| (index.column(c, s, r), 1.0))
            .collect();
        program.add_constraint(
            LinearConstraint::new(ConstraintSense::Eq, terms, course.prefs.real_count() as f64)
                .with_name(format!("sessions[{}]", course.subject)),
        );
    }

    // Teacher exclusivity: per slot, at most one session among a teacher's
    // courses.
    let teachers: BTreeSet<&str> = courses.iter().map(|c| c.teacher.as_str()).collect();
    for (s, slot) in slots.iter().enumerate() {
        for teacher in &teachers {
            let mut terms: Vec<(usize, f64)> = Vec::new();
            for (c, course) in courses.iter().enumerate() {
                if course.teacher == *teacher {
                    for r in 0..campus.rooms.len() {
                        terms.push((index.column(c, s, r), 1.0));
                    }
                }
            }
            if terms.len() > 1 {
                program.add_constraint(
                    LinearConstraint::new(ConstraintSense::LessEq, terms, 1.0)
                        .with_name(format!("teacher[{}@{}]", teacher, slot)),
                );
            }
        }
    }

    // Room exclusivity: per (slot, room), at most one session.
    for (s, slot) in slots.iter().enumerate() {
        for (r, room) in campus.rooms.iter().enumerate() {
            let terms: Vec<(usize, f64)> = (0..courses.len())
                .map(|c| (index.column(c, s, r), 1.0))
                .collect();
            if terms.len() > 1 {
                program.add_constraint(
                    LinearConstraint::new(ConstraintSense::LessEq, terms, 1.0)
                        .with_name(format!("room[{}@{}]", room.name, slot)),
                );
            }
        }
    }

    // Capacity: a course can never sit in a room smaller than its size.
    for (c, course) in courses.iter().enumerate() {
        for (r, room) in campus.rooms.iter().enumerate() {
            if course.students > room.capacity {
                for s in 0..slots.len() {
                    program.pin_zero(index.column(c, s, r));
                }
            }
        }
    }

    (program, index)
}
