// Solver interface: the contract any MILP backend must follow, so the
// model builder never depends on a concrete solver crate.

use crate::domain::{Result, ScheduleError};

use super::program::{BinaryProgram, MilpSolution};

/// Interface for MILP backends.
///
/// The solve call is blocking and CPU-bound; its latency grows
/// combinatorially with the program size. Tie-breaking among equally
/// optimal assignments is backend-defined and not stable across runs.
pub trait MilpSolver: Send + Sync {
    /// Solve a binary program. Infeasibility is a status on the returned
    /// solution, not an `Err`; errors are reserved for backend failures.
    fn solve(&self, program: &BinaryProgram) -> Result<MilpSolution>;

    /// Structural checks shared by all backends.
    fn validate(&self, program: &BinaryProgram) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = program.num_variables();

        if num_vars == 0 {
            errors.push("program has no variables".to_string());
        }

        if program.pinned_zero.len() != num_vars {
            errors.push(format!(
                "pinned-zero mask has {} entries but program has {} variables",
                program.pinned_zero.len(),
                num_vars
            ));
        }

        for (i, constraint) in program.constraints.iter().enumerate() {
            if let Some(&(col, _)) = constraint.terms.iter().find(|(col, _)| *col >= num_vars) {
                errors.push(format!(
                    "constraint {} ('{}') references column {} but program has {} variables",
                    i, constraint.name, col, num_vars
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ScheduleError::Solver {
                reason: errors.join("; "),
            })
        }
    }

    /// Name of this solver backend.
    fn name(&self) -> &str;
}
