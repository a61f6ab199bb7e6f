//! 錯誤處理系統
//!
//! 頂層 `Error` 攜帶錯誤種類與 context 鏈，各模組以 `?` 往上傳遞。
//! 玩家的非法操作（走太遠、打不到）不是錯誤，由引擎回傳 `IntentOutcome::Rejected`。

use crate::domain::alias::{BoardSize, CellIndex, Level, Stat};
use crate::domain::character::Faction;
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// 頂層錯誤，包含原始錯誤和 context 鏈
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    contexts: Vec<String>,
}

/// 錯誤種類
#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

/// 角色建構錯誤
#[derive(Debug, ThisError)]
pub enum EntityError {
    #[error("未知的角色類型: {class_tag}")]
    UnknownClass { class_tag: String },
    #[error("等級必須 >= 1: {level}")]
    InvalidLevel { level: Level },
    #[error("生命值超出範圍 0..=100: {health}")]
    HealthOutOfRange { health: Stat },
    #[error("{stat} 超出範圍 0..={max}: {value}")]
    StatOutOfRange {
        stat: &'static str,
        value: Stat,
        max: Stat,
    },
    #[error("角色類型 {class_tag} 的陣營不符 (is_player = {is_player})")]
    FactionMismatch { class_tag: String, is_player: bool },
}

/// 站位錯誤
#[derive(Debug, ThisError)]
pub enum RosterError {
    #[error("位置 {position} 超出棋盤 {board_size}x{board_size}")]
    OutOfBoard {
        position: CellIndex,
        board_size: BoardSize,
    },
    #[error("位置 {position} 已被佔用")]
    PositionOccupied { position: CellIndex },
}

/// 存讀檔錯誤
#[derive(Debug, ThisError)]
pub enum LoadError {
    #[error("找不到存檔")]
    SnapshotMissing,
    #[error("讀寫 {path} 失敗: {reason}")]
    Io { path: String, reason: String },
    #[error("{format} 反序列化失敗: {reason}")]
    DeserializeError { format: String, reason: String },
    #[error("{format} 序列化失敗: {reason}")]
    SerializeError { format: String, reason: String },
    #[error("存檔內容不合法: {reason}")]
    InvalidSnapshot { reason: String },
}

/// 設定錯誤
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("棋盤太小: {board_size}，至少需要 {min}")]
    BoardTooSmall { board_size: BoardSize, min: BoardSize },
    #[error("最大關卡數必須 >= 1")]
    NoLevels,
    #[error("角色類型清單為空")]
    EmptyClassList,
    #[error("角色類型 {class_tag} 不屬於 {faction}")]
    WrongFaction { class_tag: String, faction: Faction },
    #[error("缺少第 {level} 關的主題")]
    MissingTheme { level: Level },
}

/// 不變量被破壞：代表棋盤 / 名單設定有 bug，不可吞掉
#[derive(Debug, ThisError)]
pub enum InvariantError {
    #[error("{faction} 沒有任何單位")]
    EmptyRoster { faction: Faction },
    #[error("位置 {position} 沒有單位")]
    NoUnitAt { position: CellIndex },
    #[error("位置 {position} 的單位找不到任何可走的格子")]
    NoLegalStep { position: CellIndex },
    #[error("{faction} 起始區不足: 需要 {needed}，只剩 {available}")]
    NotEnoughStartCells {
        faction: Faction,
        needed: usize,
        available: usize,
    },
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// 添加錯誤上下文，自動記錄呼叫位置
    #[track_caller]
    pub fn context<C: Into<String>>(mut self, context: C) -> Self {
        let loc = std::panic::Location::caller();
        let msg = format!("{} [{}:{}]", context.into(), loc.file(), loc.line());
        self.contexts.push(msg);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        for ctx in &self.contexts {
            write!(f, "\n  {}", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<E: Into<ErrorKind>> From<E> for Error {
    fn from(error: E) -> Self {
        Self {
            kind: error.into(),
            contexts: Vec::new(),
        }
    }
}

/// Result 擴展 trait，用於添加錯誤上下文
pub trait Context<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    #[track_caller]
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        let loc = std::panic::Location::caller();
        self.map_err(|e| {
            let msg = format!("{} [{}:{}]", context.into(), loc.file(), loc.line());
            Error {
                kind: e.kind,
                contexts: {
                    let mut contexts = e.contexts;
                    contexts.push(msg);
                    contexts
                },
            }
        })
    }
}
