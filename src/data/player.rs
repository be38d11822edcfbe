use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between position codes in a multi-position listing ("PF/C").
pub const POSITION_DELIMITER: char = '/';

/// Basketball roster positions. Declaration order is the output order of a lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "PG")]
    PointGuard,
    #[serde(rename = "SG")]
    ShootingGuard,
    #[serde(rename = "SF")]
    SmallForward,
    #[serde(rename = "PF")]
    PowerForward,
    #[serde(rename = "C")]
    Center,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::PointGuard,
        Position::ShootingGuard,
        Position::SmallForward,
        Position::PowerForward,
        Position::Center,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::PointGuard => "PG",
            Self::ShootingGuard => "SG",
            Self::SmallForward => "SF",
            Self::PowerForward => "PF",
            Self::Center => "C",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown position code '{0}'")]
pub struct UnknownPosition(pub String);

impl FromStr for Position {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PG" => Ok(Self::PointGuard),
            "SG" => Ok(Self::ShootingGuard),
            "SF" => Ok(Self::SmallForward),
            "PF" => Ok(Self::PowerForward),
            "C" => Ok(Self::Center),
            _ => Err(UnknownPosition(s.trim().to_string())),
        }
    }
}

/// Parse a delimiter-separated listing such as `"PF/C"`. Repeated codes collapse to one.
pub fn parse_positions(raw: &str) -> Result<Vec<Position>, UnknownPosition> {
    let mut positions = Vec::new();
    for token in raw.split(POSITION_DELIMITER) {
        if token.trim().is_empty() {
            continue;
        }
        let position = token.parse::<Position>()?;
        if !positions.contains(&position) {
            positions.push(position);
        }
    }
    Ok(positions)
}

/// One row of the player pool as handed to the engine.
///
/// `projected_points` and `expected_to_play` may be overwritten by a projection overlay
/// before optimization; the engine itself never mutates a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub positions: Vec<Position>,
    pub salary: u32,
    #[serde(default)]
    pub projected_points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injury_indicator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_to_play: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl PlayerRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, positions: Vec<Position>, salary: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            positions,
            salary,
            projected_points: None,
            injury_indicator: None,
            expected_to_play: None,
            team: None,
        }
    }

    pub fn with_projection(mut self, points: f64) -> Self {
        self.projected_points = Some(points);
        self
    }

    /// Injury indicator "O" (or "OUT") rules a player out; GTD/Q and friends do not.
    pub fn is_ruled_out(&self) -> bool {
        self.injury_indicator
            .as_deref()
            .map(str::trim)
            .is_some_and(|flag| flag.eq_ignore_ascii_case("O") || flag.eq_ignore_ascii_case("OUT"))
    }

    pub fn has_projection(&self) -> bool {
        self.projected_points.is_some_and(f64::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_position_listing() {
        let parsed = parse_positions("PF/C").expect("valid listing");
        assert_eq!(parsed, vec![Position::PowerForward, Position::Center]);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = parse_positions("PG/QB").expect_err("QB is not a basketball position");
        assert_eq!(err, UnknownPosition("QB".to_string()));
        assert_eq!(err.to_string(), "unknown position code 'QB'");
    }

    #[test]
    fn duplicate_codes_collapse() {
        assert_eq!(parse_positions("c/C").unwrap(), vec![Position::Center]);
    }

    #[test]
    fn position_order_follows_roster_layout() {
        let mut shuffled = vec![
            Position::Center,
            Position::SmallForward,
            Position::PointGuard,
            Position::PowerForward,
            Position::ShootingGuard,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Position::ALL.to_vec());
    }

    #[test]
    fn out_indicator_rules_player_out() {
        let mut player = PlayerRecord::new("1", "A", vec![Position::Center], 4000);
        assert!(!player.is_ruled_out());
        player.injury_indicator = Some("GTD".to_string());
        assert!(!player.is_ruled_out());
        player.injury_indicator = Some(" o ".to_string());
        assert!(player.is_ruled_out());
    }
}
