//! FanDuel player-list CSV ingestion.
//!
//! Expected header (extra columns are ignored):
//! `Id, Position, First Name, Nickname, Last Name, FPPG, Played, Salary, Game, Team, Opponent,
//! Injury Indicator, Injury Details`. An optional `Expected` column carries an availability flag.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::data::player::{parse_positions, PlayerRecord, UnknownPosition};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read player list: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse player list CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {source}")]
    InvalidPosition {
        row: usize,
        #[source]
        source: UnknownPosition,
    },
    #[error("row {row}: missing player id")]
    MissingId { row: usize },
}

#[derive(Debug, Deserialize)]
struct PlayerListRow {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "First Name", default)]
    first_name: String,
    #[serde(rename = "Nickname", default)]
    nickname: String,
    #[serde(rename = "Last Name", default)]
    last_name: String,
    #[serde(rename = "FPPG", default, deserialize_with = "csv::invalid_option")]
    fppg: Option<f64>,
    #[serde(rename = "Salary")]
    salary: u32,
    #[serde(rename = "Team", default)]
    team: String,
    #[serde(rename = "Injury Indicator", default)]
    injury_indicator: String,
    #[serde(rename = "Expected", default, deserialize_with = "csv::invalid_option")]
    expected: Option<bool>,
}

impl PlayerListRow {
    fn display_name(&self) -> String {
        let nickname = self.nickname.trim();
        if !nickname.is_empty() {
            return nickname.to_string();
        }
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    fn into_record(self, row: usize) -> Result<PlayerRecord, ImportError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ImportError::MissingId { row });
        }
        let positions = parse_positions(&self.position)
            .map_err(|source| ImportError::InvalidPosition { row, source })?;
        let name = self.display_name();
        Ok(PlayerRecord {
            id,
            name,
            positions,
            salary: self.salary,
            projected_points: self.fppg.filter(|points| points.is_finite()),
            injury_indicator: non_empty(self.injury_indicator),
            expected_to_play: self.expected,
            team: non_empty(self.team),
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a player list. Records come back sorted by projection, highest first, with
/// unprojected players last.
pub fn parse_player_pool_csv<R: Read>(reader: R) -> Result<Vec<PlayerRecord>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut players = Vec::new();
    for (index, result) in reader.deserialize::<PlayerListRow>().enumerate() {
        // Header is line 1.
        let row = index + 2;
        players.push(result?.into_record(row)?);
    }

    players.sort_by(|left, right| {
        let left_points = left.projected_points.unwrap_or(f64::NEG_INFINITY);
        let right_points = right.projected_points.unwrap_or(f64::NEG_INFINITY);
        right_points.total_cmp(&left_points)
    });
    Ok(players)
}

pub fn load_player_pool(path: impl AsRef<Path>) -> Result<Vec<PlayerRecord>, ImportError> {
    let file = File::open(path)?;
    parse_player_pool_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::player::Position;

    const SAMPLE: &str = "\
Id,Position,First Name,Nickname,Last Name,FPPG,Played,Salary,Game,Team,Opponent,Injury Indicator,Injury Details
87118-40199,PF/C,Nikola,Nikola Jokic,Jokic,58.2,60,12000,DEN@LAL,DEN,LAL,,
87118-15595,PG,Stephen,,Curry,44.1,55,10000,GSW@SAC,GSW,SAC,GTD,Ankle
87118-99999,SG,Bench,Bench Guy,Guy,,0,3500,GSW@SAC,GSW,SAC,O,Knee
";

    #[test]
    fn parses_fanduel_export_and_sorts_by_projection() {
        let players = parse_player_pool_csv(SAMPLE.as_bytes()).expect("sample parses");
        assert_eq!(players.len(), 3);
        assert_eq!(players[0].id, "87118-40199");
        assert_eq!(players[0].positions, vec![Position::PowerForward, Position::Center]);
        assert_eq!(players[1].name, "Stephen Curry");
        assert_eq!(players[1].injury_indicator.as_deref(), Some("GTD"));
        assert_eq!(players[2].projected_points, None);
        assert!(players[2].is_ruled_out());
    }

    #[test]
    fn reports_row_of_bad_position() {
        let input = "Id,Position,Nickname,FPPG,Salary\n1,PG,A,10,3000\n2,QB,B,10,3000\n";
        match parse_player_pool_csv(input.as_bytes()) {
            Err(ImportError::InvalidPosition { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected invalid position error, got {other:?}"),
        }
    }

    #[test]
    fn optional_expected_column_is_read() {
        let input = "Id,Position,Nickname,FPPG,Salary,Expected\n1,C,A,10,3000,false\n2,C,B,9,3000,\n";
        let players = parse_player_pool_csv(input.as_bytes()).expect("parses");
        assert_eq!(players[0].expected_to_play, Some(false));
        assert_eq!(players[1].expected_to_play, None);
    }

    #[test]
    fn blank_id_is_rejected() {
        let input = "Id,Position,Nickname,FPPG,Salary\n ,PG,A,10,3000\n";
        assert!(matches!(
            parse_player_pool_csv(input.as_bytes()),
            Err(ImportError::MissingId { row: 2 })
        ));
    }
}
