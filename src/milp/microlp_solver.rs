use std::time::Instant;

use good_lp::{
    solvers::microlp::microlp, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolution, SolverModel, Variable as GoodLpVariable,
};

use crate::domain::{Result, ScheduleError};

use super::program::{BinaryProgram, ConstraintSense, MilpSolution, SolveStats, SolveStatus};
use super::solver::MilpSolver;

/// Backend on the pure-Rust microlp solver via `good_lp`.
///
/// microlp exposes no time-limit knob, so solves run to completion.
pub struct MicrolpSolver;

impl MicrolpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicrolpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MilpSolver for MicrolpSolver {
    fn solve(&self, program: &BinaryProgram) -> Result<MilpSolution> {
        self.validate(program)?;

        let start_time = Instant::now();
        let num_vars = program.num_variables();

        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(num_vars);

        for &pinned in &program.pinned_zero {
            // Pinned columns are expressed through the upper bound.
            let def = if pinned {
                variable().binary().max(0.0)
            } else {
                variable().binary()
            };
            lp_variables.push(vars.add(def));
        }

        let mut objective: Expression = 0.into();
        for (i, &cost) in program.objective.iter().enumerate() {
            if cost != 0.0 {
                objective += cost * lp_variables[i];
            }
        }

        let mut lp_model = vars.minimise(objective).using(microlp);

        for constraint in &program.constraints {
            let mut lhs: Expression = 0.into();
            for &(column, coefficient) in &constraint.terms {
                if coefficient != 0.0 {
                    lhs += coefficient * lp_variables[column];
                }
            }
            lp_model = match constraint.sense {
                ConstraintSense::LessEq => lp_model.with(lhs.leq(constraint.bound)),
                ConstraintSense::Eq => lp_model.with(lhs.eq(constraint.bound)),
            };
        }

        let solve_result = lp_model.solve();
        let stats = SolveStats {
            solve_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
            num_variables: num_vars as u32,
            num_constraints: program.num_constraints() as u32,
        };

        match solve_result {
            Ok(solved) => {
                let values: Vec<f64> = lp_variables.iter().map(|&v| solved.value(v)).collect();
                let objective_value = program
                    .objective
                    .iter()
                    .zip(&values)
                    .map(|(c, v)| c * v)
                    .sum();

                let mut solution = MilpSolution::optimal(objective_value, values);
                solution.stats = stats;
                solution.message = format!("Optimal assignment found for '{}'", program.name);
                Ok(solution)
            }
            Err(ResolutionError::Infeasible) => {
                let mut solution = MilpSolution::without_assignment(
                    SolveStatus::Infeasible,
                    "No assignment satisfies the hard constraints",
                );
                solution.stats = stats;
                Ok(solution)
            }
            Err(ResolutionError::Unbounded) => {
                let mut solution = MilpSolution::without_assignment(
                    SolveStatus::Unbounded,
                    "Objective can be improved without bound",
                );
                solution.stats = stats;
                Ok(solution)
            }
            Err(e) => Err(ScheduleError::Solver {
                reason: format!("{:?}", e),
            }),
        }
    }

    fn name(&self) -> &str {
        "microlp"
    }
}
