//! 遊戲常數定義

use crate::domain::alias::{BoardSize, Level, Stat};

/// 生命值上限
pub const MAX_HEALTH: Stat = 100;

/// 新生成角色的生命值
pub const INITIAL_HEALTH: Stat = 50;

/// 攻擊 / 防禦上限，讀檔時超過即視為損毀
pub const MAX_STAT: Stat = 100_000;

/// 升級時回復的生命值（仍受 MAX_HEALTH 限制）
pub const LEVEL_UP_HEAL: Stat = 80;

/// 升級屬性公式的基礎百分比：stat * (BASE + health) / 100
pub const STATS_UP_BASE_PERCENT: Stat = 80;

/// 最低傷害比例（攻擊力的 1/10）
pub const CHIP_DAMAGE_DIVISOR: Stat = 10;

pub const DEFAULT_BOARD_SIZE: BoardSize = 8;

pub const DEFAULT_MAX_LEVEL: Level = 4;

/// 棋盤最小邊長（雙方各佔兩欄起始區）
pub const MIN_BOARD_SIZE: BoardSize = 4;

/// 每個陣營起始區的欄數
pub const START_COLUMNS: BoardSize = 2;
