use std::fmt;

/// Comparison sense of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// Less than or equal (≤)
    LessEq,
    /// Equal (=)
    Eq,
}

/// Linear constraint over a sparse subset of columns.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub sense: ConstraintSense,
    /// (column, coefficient) pairs; columns absent from the list have
    /// coefficient zero.
    pub terms: Vec<(usize, f64)>,
    pub bound: f64,
    pub name: String,
}

impl LinearConstraint {
    pub fn new(sense: ConstraintSense, terms: Vec<(usize, f64)>, bound: f64) -> Self {
        Self {
            sense,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A pure 0/1 integer program in minimization form: one cost per binary
/// column, linear constraints, and a set of columns pinned to zero.
#[derive(Debug, Clone, Default)]
pub struct BinaryProgram {
    pub name: String,
    /// Objective coefficient per column; the objective is minimized.
    pub objective: Vec<f64>,
    /// Columns forced to zero (structurally infeasible choices).
    pub pinned_zero: Vec<bool>,
    pub constraints: Vec<LinearConstraint>,
}

impl BinaryProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a binary column with the given objective cost; returns its index.
    pub fn add_variable(&mut self, cost: f64) -> usize {
        self.objective.push(cost);
        self.pinned_zero.push(false);
        self.objective.len() - 1
    }

    /// Force a column to zero regardless of the constraints.
    pub fn pin_zero(&mut self, column: usize) {
        self.pinned_zero[column] = true;
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

/// Outcome status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Found a provably optimal assignment
    Optimal,
    /// No assignment satisfies the constraints
    Infeasible,
    /// Objective can be improved without bound
    Unbounded,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Unbounded => write!(f, "Unbounded"),
        }
    }
}

/// Statistics about the solve process.
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
}

/// Solution to a [`BinaryProgram`]. On any non-optimal status the value
/// vector is empty: there is no partial assignment to act on.
#[derive(Debug, Clone)]
pub struct MilpSolution {
    pub status: SolveStatus,
    pub objective_value: Option<f64>,
    pub values: Vec<f64>,
    pub message: String,
    pub stats: SolveStats,
}

impl MilpSolution {
    pub fn optimal(objective_value: f64, values: Vec<f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective_value: Some(objective_value),
            values,
            message: "Optimal solution found".to_string(),
            stats: SolveStats::default(),
        }
    }

    pub fn without_assignment(status: SolveStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            message: message.into(),
            stats: SolveStats::default(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Whether the binary column was selected in the assignment.
    pub fn is_selected(&self, column: usize) -> bool {
        self.values.get(column).copied().unwrap_or(0.0) > 0.5
    }
}
