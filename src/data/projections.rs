//! Projection overlay: replaces projected points and the expected-to-play flag of matching
//! players before the pool reaches the optimizer.
//!
//! CSV columns: `id, projected_points, expected_to_play` (header row required; blank cells
//! leave the existing value untouched).

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::data::import::ImportError;
use crate::data::player::PlayerRecord;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectionOverride {
    pub id: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub projected_points: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub expected_to_play: Option<bool>,
}

pub fn parse_projection_overrides<R: Read>(reader: R) -> Result<Vec<ProjectionOverride>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut overrides = Vec::new();
    for result in reader.deserialize::<ProjectionOverride>() {
        let entry = result?;
        if !entry.id.is_empty() {
            overrides.push(entry);
        }
    }
    Ok(overrides)
}

pub fn load_projection_overrides(path: impl AsRef<Path>) -> Result<Vec<ProjectionOverride>, ImportError> {
    parse_projection_overrides(File::open(path)?)
}

/// Apply overrides in place. Returns how many players were touched.
pub fn apply_projection_overrides(players: &mut [PlayerRecord], overrides: &[ProjectionOverride]) -> usize {
    let by_id: HashMap<&str, &ProjectionOverride> =
        overrides.iter().map(|entry| (entry.id.as_str(), entry)).collect();

    let mut updated = 0;
    for player in players.iter_mut() {
        let Some(entry) = by_id.get(player.id.as_str()) else {
            continue;
        };
        if let Some(points) = entry.projected_points.filter(|points| points.is_finite()) {
            player.projected_points = Some(points);
        }
        if entry.expected_to_play.is_some() {
            player.expected_to_play = entry.expected_to_play;
        }
        updated += 1;
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::player::Position;

    #[test]
    fn overlay_replaces_points_and_flag() {
        let mut players = vec![
            PlayerRecord::new("a", "A", vec![Position::Center], 5000).with_projection(20.0),
            PlayerRecord::new("b", "B", vec![Position::Center], 5000),
        ];
        let overrides = parse_projection_overrides(
            "id,projected_points,expected_to_play\na,31.5,\nb,,false\nzzz,10,true\n".as_bytes(),
        )
        .expect("overlay parses");

        let touched = apply_projection_overrides(&mut players, &overrides);

        assert_eq!(touched, 2);
        assert_eq!(players[0].projected_points, Some(31.5));
        assert_eq!(players[0].expected_to_play, None);
        assert_eq!(players[1].projected_points, None);
        assert_eq!(players[1].expected_to_play, Some(false));
    }
}
