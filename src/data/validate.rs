//! Pool diagnostics run before optimizing: catches inputs that would silently make every
//! solve infeasible or skew results.

use std::collections::HashMap;
use std::fmt;

use crate::config::ContestRules;
use crate::data::player::{PlayerRecord, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_player_pool(players: &[PlayerRecord], rules: &ContestRules) -> ValidationReport {
    let mut report = ValidationReport::default();

    if players.is_empty() {
        report.push(ValidationSeverity::Error, "pool", "player pool is empty");
        return report;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, player) in players.iter().enumerate() {
        if let Some(first) = seen.insert(player.id.as_str(), index) {
            report.push(
                ValidationSeverity::Error,
                format!("player {}", player.id),
                format!("duplicate id (records {first} and {index})"),
            );
        }
        if player.positions.is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("player {}", player.id),
                "no eligible position",
            );
        }
        if player.salary == 0 {
            report.push(
                ValidationSeverity::Warning,
                format!("player {}", player.id),
                "salary is zero",
            );
        }
        if !player.has_projection() {
            report.push(
                ValidationSeverity::Warning,
                format!("player {}", player.id),
                "no projection; player will be skipped",
            );
        }
    }

    let mut eligible: HashMap<Position, usize> = HashMap::new();
    for player in players
        .iter()
        .filter(|player| player.has_projection() && !player.is_ruled_out())
    {
        for position in &player.positions {
            *eligible.entry(*position).or_default() += 1;
        }
    }
    for (position, minimum) in &rules.position_minimums {
        let available = eligible.get(position).copied().unwrap_or(0);
        if available < *minimum as usize {
            report.push(
                ValidationSeverity::Error,
                format!("position {position}"),
                format!("{available} eligible player(s), roster needs at least {minimum}"),
            );
        }
    }

    let playable = players
        .iter()
        .filter(|player| player.has_projection() && !player.is_ruled_out())
        .count();
    if playable < rules.roster_size as usize {
        report.push(
            ValidationSeverity::Error,
            "pool",
            format!(
                "{playable} playable player(s), roster needs {}",
                rules.roster_size
            ),
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, position: Position) -> PlayerRecord {
        PlayerRecord::new(id, id, vec![position], 5000).with_projection(20.0)
    }

    #[test]
    fn empty_pool_is_an_error() {
        let report = validate_player_pool(&[], &ContestRules::default());
        assert!(report.has_errors());
    }

    #[test]
    fn flags_duplicates_and_thin_positions() {
        let players = vec![
            player("a", Position::PointGuard),
            player("a", Position::ShootingGuard),
            player("c", Position::Center),
        ];
        let report = validate_player_pool(&players, &ContestRules::default());
        assert!(report.has_errors());
        assert!(report
            .diagnostics
            .iter()
            .any(|diag| diag.message.starts_with("duplicate id")));
        assert!(report
            .diagnostics
            .iter()
            .any(|diag| diag.context == "position SF"));
    }

    #[test]
    fn complete_pool_has_no_errors() {
        let mut players = Vec::new();
        for (index, position) in Position::ALL.iter().enumerate() {
            players.push(player(&format!("{index}a"), *position));
            players.push(player(&format!("{index}b"), *position));
        }
        let mut unprojected = player("x", Position::Center);
        unprojected.projected_points = None;
        players.push(unprojected);

        let report = validate_player_pool(&players, &ContestRules::default());
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
        assert_eq!(report.count(ValidationSeverity::Warning), 1);
    }
}
