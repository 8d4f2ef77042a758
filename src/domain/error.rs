/// Error taxonomy for the timetable engine. Everything a caller can see is
/// one of these; parse-level malformations are recovered locally by the
/// stores (the offending line is dropped) and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Course catalog missing or unreadable at generation time. The
    /// timetable store is truncated before this is returned.
    #[error("course catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// Hard constraints admit no assignment. Distinct from
    /// [`ScheduleError::CatalogUnavailable`]; the store is truncated.
    #[error("no feasible timetable found; check class sizes and preferences")]
    Infeasible,

    /// An edit or delete targeted a key with no matching row. The store is
    /// left untouched.
    #[error("timetable entry not found")]
    RowNotFound,

    /// A submitted course would need more seats than the largest room has.
    /// Rejected before it reaches the catalog.
    #[error("{students} students exceed the maximum room capacity ({max_capacity})")]
    CapacityExceeded { students: u32, max_capacity: u32 },

    #[error("invalid campus configuration: {reason}")]
    Config { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("solver failure: {reason}")]
    Solver { reason: String },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
