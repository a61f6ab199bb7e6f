//! 存檔格式（純資料）
//!
//! 讀檔後必須經過 `GameState::from_snapshot` 重建為帶型別的角色，
//! 不直接使用這裡的欄位做遊戲邏輯。

use crate::domain::alias::{CellIndex, Level, Points, Stat};
use crate::error::{LoadError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub class_tag: String,
    pub level: Level,
    pub attack: Stat,
    pub defence: Stat,
    pub health: Stat,
    pub is_player: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedRecord {
    pub character: CharacterRecord,
    pub position: CellIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_level: Level,
    pub teams: Vec<PositionedRecord>,
    pub number_of_points: Points,
    pub player_turn: bool,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LoadError::SerializeError {
                format: "snapshot.json".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            LoadError::DeserializeError {
                format: "snapshot.json".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT_JSON: &str = r#"
{
  "currentLevel": 2,
  "teams": [
    {
      "character": {
        "classTag": "Bowman",
        "level": 2,
        "attack": 33,
        "defence": 33,
        "health": 100,
        "isPlayer": true
      },
      "position": 8
    }
  ],
  "numberOfPoints": 50,
  "playerTurn": true
}
"#;

    #[test]
    fn test_snapshot_field_names() {
        let snapshot = Snapshot::from_json(SNAPSHOT_JSON).unwrap();
        assert_eq!(snapshot.current_level, 2);
        assert_eq!(snapshot.number_of_points, 50);
        assert!(snapshot.player_turn);
        assert_eq!(snapshot.teams[0].position, 8);
        assert_eq!(snapshot.teams[0].character.class_tag, "Bowman");

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"classTag\""));
        assert!(json.contains("\"isPlayer\""));
        assert!(json.contains("\"numberOfPoints\""));
    }

    #[test]
    fn test_non_integer_position_is_rejected() {
        let json = SNAPSHOT_JSON.replace("\"position\": 8", "\"position\": \"8\"");
        let err = Snapshot::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("snapshot.json"));
    }

    #[test]
    fn test_non_character_payload_is_rejected() {
        let json = r#"{ "currentLevel": 1, "teams": [ { "character": {}, "position": 1 } ],
            "numberOfPoints": 0, "playerTurn": true }"#;
        assert!(Snapshot::from_json(json).is_err());
    }
}
