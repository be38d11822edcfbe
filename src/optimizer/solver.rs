//! Solver adapter: the seam between the lineup model and an exact 0/1 integer-program solver.

use good_lp::solvers::microlp::microlp;
use good_lp::{
    variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
};
use thiserror::Error;

use crate::optimizer::model::{Bound, LineupModel};

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver failed: {0}")]
    Failed(String),
    #[error("model is unbounded")]
    Unbounded,
    #[error("solver returned an assignment violating constraint '{0}'")]
    ConstraintViolated(String),
}

/// An optimal 0/1 assignment, index-aligned with [LineupModel::variables].
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub objective: f64,
    pub selected: Vec<bool>,
}

impl Assignment {
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected
            .iter()
            .enumerate()
            .filter(|(_, chosen)| **chosen)
            .map(|(index, _)| index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Optimal(Assignment),
    /// No assignment satisfies the model. A normal outcome for over-constrained pools.
    Infeasible,
}

/// Anything able to solve a [LineupModel] exactly.
pub trait LineupSolver: Send + Sync {
    fn solve(&self, model: &LineupModel) -> Result<SolveOutcome, SolverError>;
}

/// Constraints with no terms are decided without a solver: they hold iff 0 is admitted.
pub fn trivially_infeasible(model: &LineupModel) -> bool {
    model
        .constraints
        .iter()
        .any(|constraint| constraint.terms.is_empty() && !constraint.bound.admits(0.0))
}

/// Exact branch-and-bound through `good_lp`'s pure-Rust `microlp` backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl LineupSolver for MicroLpSolver {
    fn solve(&self, model: &LineupModel) -> Result<SolveOutcome, SolverError> {
        if trivially_infeasible(model) {
            return Ok(SolveOutcome::Infeasible);
        }

        let mut vars = ProblemVariables::new();
        let decisions: Vec<Variable> = model
            .variables
            .iter()
            .map(|_| vars.add(variable().binary()))
            .collect();

        let mut objective = Expression::with_capacity(decisions.len());
        for (coef, decision) in model.objective.iter().zip(&decisions) {
            objective.add_mul(*coef, *decision);
        }

        let mut problem = vars.maximise(objective).using(microlp);
        for constraint in &model.constraints {
            if constraint.terms.is_empty() {
                continue;
            }
            let mut lhs = Expression::with_capacity(constraint.terms.len());
            for term in &constraint.terms {
                lhs.add_mul(term.coef, decisions[term.var]);
            }
            problem = problem.with(match constraint.bound {
                Bound::AtLeast(lower) => lhs.geq(lower),
                Bound::AtMost(upper) => lhs.leq(upper),
                Bound::Exactly(target) => lhs.eq(target),
            });
        }

        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Ok(SolveOutcome::Infeasible),
            Err(ResolutionError::Unbounded) => return Err(SolverError::Unbounded),
            Err(err) => return Err(SolverError::Failed(err.to_string())),
        };

        let selected: Vec<bool> = decisions
            .iter()
            .map(|decision| solution.value(*decision) > 0.5)
            .collect();
        if let Some(violated) = model.violated_constraint(&selected) {
            return Err(SolverError::ConstraintViolated(violated.name.clone()));
        }

        Ok(SolveOutcome::Optimal(Assignment {
            objective: model.objective_value(&selected),
            selected,
        }))
    }
}
