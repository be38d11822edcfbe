//! Player pool preparation: filter the raw pool and expand each survivor into one slot
//! instance per eligible position.

use std::collections::HashSet;

use crate::data::player::{PlayerRecord, Position};

/// A player bound to exactly one position. `id` (`<player id>_<position>`) names the
/// solver variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotInstance {
    pub id: String,
    pub player_id: String,
    pub name: String,
    pub position: Position,
    pub projected_points: f64,
    pub salary: u32,
}

pub fn slot_id(player_id: &str, position: Position) -> String {
    format!("{player_id}_{}", position.code())
}

/// Whether `player` may enter a solve at all.
pub fn is_eligible(player: &PlayerRecord, excluded: &HashSet<String>, require_expected: bool) -> bool {
    player.has_projection()
        && !excluded.contains(&player.id)
        && !player.is_ruled_out()
        && !(require_expected && player.expected_to_play == Some(false))
}

pub fn prepare(
    pool: &[PlayerRecord],
    excluded: &HashSet<String>,
    require_expected: bool,
) -> Vec<SlotInstance> {
    pool.iter()
        .filter(|player| is_eligible(player, excluded, require_expected))
        .flat_map(|player| {
            let points = player.projected_points.unwrap_or_default();
            player.positions.iter().map(move |position| SlotInstance {
                id: slot_id(&player.id, *position),
                player_id: player.id.clone(),
                name: player.name.clone(),
                position: *position,
                projected_points: points,
                salary: player.salary,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<PlayerRecord> {
        let mut injured = PlayerRecord::new("inj", "Injured", vec![Position::Center], 4000)
            .with_projection(30.0);
        injured.injury_indicator = Some("O".to_string());
        let mut doubtful = PlayerRecord::new("exp", "Not Expected", vec![Position::PointGuard], 4000)
            .with_projection(25.0);
        doubtful.expected_to_play = Some(false);

        vec![
            PlayerRecord::new("big", "Big", vec![Position::PowerForward, Position::Center], 9000)
                .with_projection(50.0),
            PlayerRecord::new("none", "No Projection", vec![Position::SmallForward], 3500),
            PlayerRecord::new("gone", "Removed", vec![Position::ShootingGuard], 5000)
                .with_projection(20.0),
            injured,
            doubtful,
        ]
    }

    #[test]
    fn expands_multi_position_players() {
        let slots = prepare(&pool(), &HashSet::new(), false);
        let ids: Vec<&str> = slots.iter().map(|slot| slot.id.as_str()).collect();
        assert_eq!(ids, vec!["big_PF", "big_C", "gone_SG", "exp_PG"]);
        assert!(slots[..2].iter().all(|slot| slot.salary == 9000));
    }

    #[test]
    fn drops_excluded_unprojected_and_ruled_out() {
        let excluded = HashSet::from(["gone".to_string()]);
        let slots = prepare(&pool(), &excluded, true);
        let players: HashSet<&str> = slots.iter().map(|slot| slot.player_id.as_str()).collect();
        assert_eq!(players, HashSet::from(["big"]));
    }

    #[test]
    fn unknown_expectation_is_kept_when_required() {
        let mut unknown = PlayerRecord::new("u", "U", vec![Position::Center], 3000).with_projection(1.0);
        unknown.expected_to_play = None;
        assert_eq!(prepare(&[unknown], &HashSet::new(), true).len(), 1);
    }
}
