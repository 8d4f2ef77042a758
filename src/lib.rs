// Domain layer: timetable data model and error taxonomy
pub mod domain;

// MILP layer: solver-agnostic program representation and backends
pub mod milp;

// Engine layer: model builder, materializer, synchronizer, scheduler
pub mod engine;

// Store layer: catalog / timetable / history persistence
pub mod store;

// Campus configuration loading
pub mod config;

// Re-export commonly used types
pub use domain::{
    Campus, Course, Day, Period, PreferenceSet, Result, Room, RowKey, ScheduleError, Slot,
    TimetableRow,
};

pub use engine::{GenerationReport, PreferenceViolation, Scheduler, Synchronizer, ABSENT_LABEL};

pub use milp::{
    BinaryProgram, MicrolpSolver, MilpSolution, MilpSolver, SolverBackend, SolverFactory,
};

pub use store::{default_semester_label, GenerationRecord, HistoryStore, Stores};
