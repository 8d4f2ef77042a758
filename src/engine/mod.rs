// Engine layer: constraint model builder, schedule materializer,
// consistency synchronizer and the scheduler that orchestrates them.

pub mod builder;
pub mod materializer;
pub mod synchronizer;

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{Campus, Course, Result, ScheduleError};
use crate::milp::{MilpSolver, SolverFactory};
use crate::store::{default_semester_label, GenerationRecord, Stores};

pub use builder::{build_model, VariableIndex};
pub use materializer::{materialize, GenerationReport, PreferenceViolation};
pub use synchronizer::{Synchronizer, ABSENT_LABEL};

/// Orchestrates generation runs and manual-edit reconciliation against one
/// set of stores. Single-threaded and synchronous: the solve is a blocking,
/// CPU-bound call whose latency grows combinatorially with
/// |courses| × |slots| × |rooms|.
pub struct Scheduler {
    campus: Campus,
    stores: Stores,
    solver: Arc<dyn MilpSolver>,
}

impl Scheduler {
    pub fn new(campus: Campus, stores: Stores) -> Self {
        Self::with_solver(campus, stores, SolverFactory::default_solver())
    }

    pub fn with_solver(campus: Campus, stores: Stores, solver: Arc<dyn MilpSolver>) -> Self {
        Self {
            campus,
            stores,
            solver,
        }
    }

    pub fn campus(&self) -> &Campus {
        &self.campus
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn synchronizer(&self) -> Synchronizer<'_> {
        Synchronizer::new(&self.stores)
    }

    /// Regenerate the whole timetable from the course catalog.
    ///
    /// On success the store is replaced wholesale and an immutable history
    /// record is appended. On any failure (catalog unavailable, infeasible,
    /// solver breakage) the store is truncated to empty: a failed run must
    /// never leave a stale or partial timetable visible. Equally optimal
    /// layouts are broken arbitrarily by the backend; reruns may differ.
    pub fn generate(&self, actor: &str, semester: Option<String>) -> Result<GenerationReport> {
        let courses = match self.stores.catalog.load() {
            Ok(courses) => courses,
            Err(e) => {
                self.stores.timetable.clear()?;
                return Err(e);
            }
        };
        let semester =
            semester.unwrap_or_else(|| default_semester_label(Utc::now().date_naive()));

        if courses.is_empty() {
            self.stores.timetable.clear()?;
            let record = GenerationRecord::new(semester.clone(), actor, 0, Vec::new());
            self.stores.history.append(&record)?;
            return Ok(GenerationReport {
                semester,
                message: "Timetable generated (catalog is empty)".to_string(),
                total_rows: 0,
                subjects: Vec::new(),
                violations: Vec::new(),
            });
        }

        let (program, index) = build_model(&self.campus, &courses);
        info!(
            courses = courses.len(),
            variables = program.num_variables(),
            constraints = program.num_constraints(),
            solver = self.solver.name(),
            "solving assignment model"
        );

        let solution = match self.solver.solve(&program) {
            Ok(solution) => solution,
            Err(e) => {
                self.stores.timetable.clear()?;
                return Err(e);
            }
        };
        if !solution.is_optimal() {
            self.stores.timetable.clear()?;
            return Err(ScheduleError::Infeasible);
        }
        info!(
            status = %solution.status,
            objective = solution.objective_value,
            solve_time_ms = solution.stats.solve_time_ms,
            "solve finished"
        );

        let (rows, violations) = materialize(&self.campus, &courses, &index, &solution);
        self.stores.timetable.save(&rows)?;

        for violation in &violations {
            warn!(
                subject = %violation.subject,
                teacher = %violation.teacher,
                assigned = ?violation.assigned.iter().map(ToString::to_string).collect::<Vec<_>>(),
                preferred = ?violation.preferred.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "preference violation"
            );
        }

        let mut subjects: Vec<String> = rows.iter().map(|r| r.subject.clone()).collect();
        subjects.sort();
        subjects.dedup();

        let record = GenerationRecord::new(semester.clone(), actor, rows.len(), subjects.clone());
        self.stores.history.append(&record)?;

        Ok(GenerationReport {
            semester,
            message: "Timetable generated".to_string(),
            total_rows: rows.len(),
            subjects,
            violations,
        })
    }

    /// Create or replace a catalog entry, rejecting class sizes no room can
    /// hold before anything touches the file.
    pub fn upsert_course(&self, course: Course) -> Result<()> {
        let max_capacity = self.campus.max_capacity();
        if course.students > max_capacity {
            return Err(ScheduleError::CapacityExceeded {
                students: course.students,
                max_capacity,
            });
        }

        let mut courses = self.stores.catalog.load_or_default()?;
        match courses
            .iter_mut()
            .find(|c| c.matches_identity(&course.subject, &course.teacher, &course.target))
        {
            Some(existing) => *existing = course,
            None => courses.push(course),
        }
        self.stores.catalog.save(&courses)
    }
}
