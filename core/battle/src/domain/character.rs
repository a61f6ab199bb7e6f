//! 角色定義
//!
//! - 角色類型（CharacterClass）決定陣營與基礎攻防 / 射程 / 步數
//! - Character 只負責屬性本身與升級公式，不含戰鬥流程

use crate::domain::alias::{Level, Radius, Stat};
use crate::domain::constants::{
    INITIAL_HEALTH, LEVEL_UP_HEAL, MAX_HEALTH, MAX_STAT, STATS_UP_BASE_PERCENT,
};
use crate::domain::snapshot::CharacterRecord;
use crate::error::{EntityError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// 陣營
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Faction {
    Player,
    Opponent,
}

impl Faction {
    pub fn from_is_player(is_player: bool) -> Self {
        if is_player {
            Faction::Player
        } else {
            Faction::Opponent
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Faction::Player => Faction::Opponent,
            Faction::Opponent => Faction::Player,
        }
    }
}

/// 角色類型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum CharacterClass {
    Bowman,
    Swordsman,
    Magician,
    Vampire,
    Undead,
    Daemon,
}

/// 角色類型的基礎數值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassProfile {
    pub attack: Stat,
    pub defence: Stat,
    /// 攻擊半徑
    pub range: Radius,
    /// 移動半徑
    pub step: Radius,
}

impl CharacterClass {
    pub fn profile(self) -> ClassProfile {
        let (attack, defence, range, step) = match self {
            Self::Bowman => (25, 25, 2, 2),
            Self::Swordsman => (40, 10, 1, 4),
            Self::Magician => (10, 40, 4, 1),
            Self::Vampire => (25, 25, 2, 2),
            Self::Undead => (40, 10, 1, 4),
            Self::Daemon => (10, 10, 4, 1),
        };
        ClassProfile {
            attack,
            defence,
            range,
            step,
        }
    }

    pub fn faction(self) -> Faction {
        match self {
            Self::Bowman | Self::Swordsman | Self::Magician => Faction::Player,
            Self::Vampire | Self::Undead | Self::Daemon => Faction::Opponent,
        }
    }
}

/// 角色
///
/// 欄位私有，確保生命值永遠落在 `0..=MAX_HEALTH`、等級 >= 1。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    class: CharacterClass,
    level: Level,
    attack: Stat,
    defence: Stat,
    health: Stat,
    is_player: bool,
}

impl Character {
    /// 以類型基礎數值建立角色（不因等級加成，加成由呼叫端決定）
    pub fn new(class: CharacterClass, level: Level) -> Result<Self> {
        if level == 0 {
            return Err(EntityError::InvalidLevel { level }.into());
        }
        let profile = class.profile();
        Ok(Self {
            class,
            level,
            attack: profile.attack,
            defence: profile.defence,
            health: INITIAL_HEALTH,
            is_player: class.faction() == Faction::Player,
        })
    }

    /// 從存檔的純資料重建角色，類型標籤決定升級規則
    pub fn rehydrate(record: &CharacterRecord) -> Result<Self> {
        let class = CharacterClass::from_str(&record.class_tag).map_err(|_| {
            EntityError::UnknownClass {
                class_tag: record.class_tag.clone(),
            }
        })?;
        if record.level == 0 {
            return Err(EntityError::InvalidLevel {
                level: record.level,
            }
            .into());
        }
        if record.health > MAX_HEALTH {
            return Err(EntityError::HealthOutOfRange {
                health: record.health,
            }
            .into());
        }
        for (stat, value) in [("attack", record.attack), ("defence", record.defence)] {
            if value > MAX_STAT {
                return Err(EntityError::StatOutOfRange {
                    stat,
                    value,
                    max: MAX_STAT,
                }
                .into());
            }
        }
        if (class.faction() == Faction::Player) != record.is_player {
            return Err(EntityError::FactionMismatch {
                class_tag: record.class_tag.clone(),
                is_player: record.is_player,
            }
            .into());
        }
        Ok(Self {
            class,
            level: record.level,
            attack: record.attack,
            defence: record.defence,
            health: record.health,
            is_player: record.is_player,
        })
    }

    pub fn to_record(&self) -> CharacterRecord {
        CharacterRecord {
            class_tag: self.class.to_string(),
            level: self.level,
            attack: self.attack,
            defence: self.defence,
            health: self.health,
            is_player: self.is_player,
        }
    }

    /// 設定攻防（超過 MAX_STAT 時截斷）
    pub fn with_stats(mut self, attack: Stat, defence: Stat) -> Self {
        self.attack = attack.min(MAX_STAT);
        self.defence = defence.min(MAX_STAT);
        self
    }

    /// 設定生命值（超過上限時截斷）
    pub fn with_health(mut self, health: Stat) -> Self {
        self.health = health.min(MAX_HEALTH);
        self
    }

    pub fn class(&self) -> CharacterClass {
        self.class
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn attack(&self) -> Stat {
        self.attack
    }

    pub fn defence(&self) -> Stat {
        self.defence
    }

    pub fn health(&self) -> Stat {
        self.health
    }

    pub fn is_player(&self) -> bool {
        self.is_player
    }

    pub fn faction(&self) -> Faction {
        Faction::from_is_player(self.is_player)
    }

    pub fn range(&self) -> Radius {
        self.class.profile().range
    }

    pub fn step(&self) -> Radius {
        self.class.profile().step
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// 扣血，最低為 0
    pub fn take_damage(&mut self, damage: Stat) {
        self.health = self.health.saturating_sub(damage);
    }

    /// 單級屬性成長：stat = max(stat, stat * (80 + health) / 100)，四捨五入
    ///
    /// 不改變等級與生命值。
    pub fn stats_up(&mut self) {
        self.attack = grow_stat(self.attack, self.health);
        self.defence = grow_stat(self.defence, self.health);
    }

    /// 升級：等級 +1、屬性成長、回血
    pub fn level_up(&mut self) {
        self.level += 1;
        self.stats_up();
        self.health = (self.health + LEVEL_UP_HEAL).min(MAX_HEALTH);
    }

    /// 懸停時顯示的資訊
    pub fn info_text(&self) -> String {
        format!(
            "🎖{} ⚔{} 🛡{} ❤{}",
            self.level, self.attack, self.defence, self.health
        )
    }
}

fn grow_stat(stat: Stat, health: Stat) -> Stat {
    let grown = stat
        .saturating_mul(STATS_UP_BASE_PERCENT + health)
        .saturating_add(50)
        / 100;
    stat.max(grown).min(MAX_STAT)
}
