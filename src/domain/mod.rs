// Domain module: timetable data model and error taxonomy

pub mod error;
pub mod model;

pub use error::*;
pub use model::*;
