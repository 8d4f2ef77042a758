// MILP layer: solver-agnostic program representation and backend adapters

pub mod factory;
pub mod microlp_solver;
pub mod program;
pub mod solver;

pub use factory::{SolverBackend, SolverFactory};
pub use microlp_solver::MicrolpSolver;
pub use program::{
    BinaryProgram, ConstraintSense, LinearConstraint, MilpSolution, SolveStats, SolveStatus,
};
pub use solver::MilpSolver;
