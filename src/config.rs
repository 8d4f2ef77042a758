use std::fs;
use std::path::Path;

use crate::domain::{Campus, Result, ScheduleError};

/// Load campus data (rooms, seniority costs, weights) from a TOML file, or
/// fall back to the built-in campus when no file is given. Every field is
/// optional; omitted ones keep their defaults.
pub fn load_campus(path: Option<&Path>) -> Result<Campus> {
    let Some(path) = path else {
        return Ok(Campus::default());
    };
    let contents = fs::read_to_string(path)?;
    let campus: Campus = toml::from_str(&contents).map_err(|e| ScheduleError::Config {
        reason: format!("{}: {}", path.display(), e),
    })?;
    if campus.rooms.is_empty() {
        return Err(ScheduleError::Config {
            reason: format!("{}: campus has no rooms", path.display()),
        });
    }
    Ok(campus)
}
