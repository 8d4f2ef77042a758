use std::fmt;
use std::sync::Arc;

use super::microlp_solver::MicrolpSolver;
use super::solver::MilpSolver;

/// Solver backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverBackend {
    /// Automatically select the best available solver
    #[default]
    Auto,
    /// Pure-Rust microlp solver
    Microlp,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::Microlp => write!(f, "microlp"),
        }
    }
}

/// Factory for creating solver instances.
pub struct SolverFactory;

impl SolverFactory {
    pub fn create(backend: SolverBackend) -> Arc<dyn MilpSolver> {
        match backend {
            SolverBackend::Auto | SolverBackend::Microlp => Arc::new(MicrolpSolver::new()),
        }
    }

    pub fn default_solver() -> Arc<dyn MilpSolver> {
        Self::create(SolverBackend::default())
    }
}
