//! 遊戲設定
//!
//! 以 TOML 載入，所有欄位都有預設值，未填寫的欄位沿用預設。

use crate::domain::alias::{BoardSize, Level};
use crate::domain::character::{CharacterClass, Faction};
use crate::domain::constants::{DEFAULT_BOARD_SIZE, DEFAULT_MAX_LEVEL, MIN_BOARD_SIZE};
use crate::error::{ConfigError, Context, LoadError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: BoardSize,
    pub max_level: Level,
    /// 開局時每個陣營的單位數
    pub initial_team_size: usize,
    /// 開局單位的最高等級
    pub initial_max_level: Level,
    pub reinforcement: ReinforcementConfig,
    pub player_classes: Vec<CharacterClass>,
    pub opponent_classes: Vec<CharacterClass>,
    /// 第 N 關使用 themes[N - 1]
    pub themes: Vec<String>,
}

/// 過關後玩家援軍數量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReinforcementConfig {
    pub small_wave: usize,
    pub large_wave: usize,
    /// 關卡 > 此值時改用 large_wave
    pub large_wave_after_level: Level,
}

impl Default for ReinforcementConfig {
    fn default() -> Self {
        Self {
            small_wave: 1,
            large_wave: 2,
            large_wave_after_level: 3,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            max_level: DEFAULT_MAX_LEVEL,
            initial_team_size: 2,
            initial_max_level: 1,
            reinforcement: ReinforcementConfig::default(),
            player_classes: vec![
                CharacterClass::Bowman,
                CharacterClass::Swordsman,
                CharacterClass::Magician,
            ],
            opponent_classes: vec![
                CharacterClass::Vampire,
                CharacterClass::Undead,
                CharacterClass::Daemon,
            ],
            themes: ["prairie", "desert", "arctic", "mountain"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl GameConfig {
    /// 反序列化 TOML 並驗證
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| LoadError::DeserializeError {
            format: "config.toml".to_string(),
            reason: e.to_string(),
        })?;
        config.validate().context("驗證 config.toml")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                board_size: self.board_size,
                min: MIN_BOARD_SIZE,
            }
            .into());
        }
        if self.max_level == 0 || self.initial_max_level == 0 {
            return Err(ConfigError::NoLevels.into());
        }
        for (faction, classes) in [
            (Faction::Player, &self.player_classes),
            (Faction::Opponent, &self.opponent_classes),
        ] {
            if classes.is_empty() {
                return Err(ConfigError::EmptyClassList.into());
            }
            if let Some(class) = classes.iter().find(|c| c.faction() != faction) {
                return Err(ConfigError::WrongFaction {
                    class_tag: class.to_string(),
                    faction,
                }
                .into());
            }
        }
        if self.themes.len() < self.max_level as usize {
            return Err(ConfigError::MissingTheme {
                level: self.themes.len() as Level + 1,
            }
            .into());
        }
        Ok(())
    }

    /// 關卡主題；已通關時沿用最後一關
    pub fn theme_for(&self, level: Level) -> &str {
        let idx = level.min(self.max_level).max(1) as usize - 1;
        self.themes.get(idx).map_or("", String::as_str)
    }

    /// 進入 `level` 時玩家獲得的援軍數
    pub fn reinforcement_size(&self, level: Level) -> usize {
        if level > self.reinforcement.large_wave_after_level {
            self.reinforcement.large_wave
        } else {
            self.reinforcement.small_wave
        }
    }

    pub fn classes_for(&self, faction: Faction) -> &[CharacterClass] {
        match faction {
            Faction::Player => &self.player_classes,
            Faction::Opponent => &self.opponent_classes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.theme_for(1), "prairie");
        assert_eq!(config.theme_for(4), "mountain");
        assert_eq!(config.theme_for(5), "mountain");
    }

    #[test]
    fn test_reinforcement_size() {
        let config = GameConfig::default();
        assert_eq!(config.reinforcement_size(2), 1);
        assert_eq!(config.reinforcement_size(3), 1);
        assert_eq!(config.reinforcement_size(4), 2);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = GameConfig::from_toml(
            r#"
board_size = 10
player_classes = ["Swordsman"]

[reinforcement]
large_wave = 3
"#,
        )
        .unwrap();
        assert_eq!(config.board_size, 10);
        assert_eq!(config.max_level, 4);
        assert_eq!(config.player_classes, vec![CharacterClass::Swordsman]);
        assert_eq!(config.reinforcement.small_wave, 1);
        assert_eq!(config.reinforcement.large_wave, 3);
    }

    #[test]
    fn test_from_toml_invalid() {
        let test_data = [
            "board_size = 2",
            "max_level = 0",
            "player_classes = []",
            r#"opponent_classes = ["Bowman"]"#,
            r#"themes = ["prairie"]"#,
            r#"player_classes = ["Dragon"]"#,
        ];
        for (idx, content) in test_data.iter().enumerate() {
            assert!(GameConfig::from_toml(content).is_err(), "Case {}", idx);
        }
    }

    #[test]
    fn test_wrong_faction_error() {
        let config = GameConfig {
            opponent_classes: vec![CharacterClass::Magician],
            ..GameConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Config(ConfigError::WrongFaction { faction: Faction::Opponent, .. })
        ));
    }
}
