//! Integer-program description of a lineup search.
//!
//! The model is solver-agnostic: one binary variable per slot instance, a linear objective
//! to maximize, and named linear constraints. [crate::optimizer::solver] turns it into a
//! concrete solver call.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ContestRules;
use crate::optimizer::pool::SlotInstance;

/// Tolerance used when checking a 0/1 assignment against a bound.
const BOUND_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtLeast(f64),
    AtMost(f64),
    Exactly(f64),
}

impl Bound {
    pub fn admits(&self, value: f64) -> bool {
        match *self {
            Self::AtLeast(lower) => value >= lower - BOUND_TOLERANCE,
            Self::AtMost(upper) => value <= upper + BOUND_TOLERANCE,
            Self::Exactly(target) => (value - target).abs() <= BOUND_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub var: usize,
    pub coef: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<Term>,
    pub bound: Bound,
}

impl LinearConstraint {
    pub fn evaluate(&self, selected: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|term| selected.get(term.var).copied().unwrap_or(false))
            .map(|term| term.coef)
            .sum()
    }

    pub fn is_satisfied_by(&self, selected: &[bool]) -> bool {
        self.bound.admits(self.evaluate(selected))
    }
}

/// A 0/1 linear program: maximize `objective · x` subject to `constraints`, every `x` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct LineupModel {
    /// Variable names (slot instance ids), index-aligned with `objective`.
    pub variables: Vec<String>,
    pub objective: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
}

impl LineupModel {
    pub fn objective_value(&self, selected: &[bool]) -> f64 {
        self.objective
            .iter()
            .zip(selected)
            .filter(|(_, chosen)| **chosen)
            .map(|(coef, _)| coef)
            .sum()
    }

    /// First constraint the assignment breaks, if any.
    pub fn violated_constraint(&self, selected: &[bool]) -> Option<&LinearConstraint> {
        self.constraints
            .iter()
            .find(|constraint| !constraint.is_satisfied_by(selected))
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints
            .iter()
            .find(|constraint| constraint.name == name)
    }
}

fn unit_terms(indices: impl IntoIterator<Item = usize>) -> Vec<Term> {
    indices
        .into_iter()
        .map(|var| Term { var, coef: 1.0 })
        .collect()
}

/// Build the lineup program for `slots`.
///
/// Locks and duplicate prevention are grouped by player id over the slot instances. A locked
/// id without any slot yields an empty equality constraint, which no assignment satisfies.
pub fn build_model(
    slots: &[SlotInstance],
    locked_ids: &BTreeSet<String>,
    rules: &ContestRules,
) -> LineupModel {
    let variables: Vec<String> = slots.iter().map(|slot| slot.id.clone()).collect();
    let objective: Vec<f64> = slots.iter().map(|slot| slot.projected_points).collect();

    let mut by_player: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, slot) in slots.iter().enumerate() {
        by_player.entry(slot.player_id.as_str()).or_default().push(index);
    }

    let mut constraints = Vec::new();

    for (position, minimum) in &rules.position_minimums {
        constraints.push(LinearConstraint {
            name: position.code().to_string(),
            terms: unit_terms(
                slots
                    .iter()
                    .enumerate()
                    .filter(|(_, slot)| slot.position == *position)
                    .map(|(index, _)| index),
            ),
            bound: Bound::AtLeast(f64::from(*minimum)),
        });
    }

    constraints.push(LinearConstraint {
        name: "cost".to_string(),
        terms: slots
            .iter()
            .enumerate()
            .map(|(var, slot)| Term {
                var,
                coef: f64::from(slot.salary),
            })
            .collect(),
        bound: Bound::AtMost(f64::from(rules.salary_cap)),
    });

    constraints.push(LinearConstraint {
        name: "totalPlayers".to_string(),
        terms: unit_terms(0..slots.len()),
        bound: Bound::Exactly(f64::from(rules.roster_size)),
    });

    for locked in locked_ids {
        let indices = by_player.get(locked.as_str()).cloned().unwrap_or_default();
        constraints.push(LinearConstraint {
            name: format!("{locked} Locked"),
            terms: unit_terms(indices),
            bound: Bound::Exactly(1.0),
        });
    }

    for (player_id, indices) in &by_player {
        if indices.len() > 1 {
            constraints.push(LinearConstraint {
                name: format!("{player_id} Duplicate"),
                terms: unit_terms(indices.iter().copied()),
                bound: Bound::AtMost(1.0),
            });
        }
    }

    LineupModel {
        variables,
        objective,
        constraints,
    }
}
