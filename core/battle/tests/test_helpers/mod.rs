//! 測試輔助：load_roster_from_ascii 與 RecordingPresenter
//!
//! 用 ASCII art 擺出棋盤上的單位，並記錄引擎送出的所有顯示指令。

#![allow(dead_code)]

use battle::alias::{BoardSize, CellIndex, Level, Points, Stat};
use battle::config::GameConfig;
use battle::domain::character::{Character, CharacterClass};
use battle::domain::roster::{PositionedCharacter, Roster};
use battle::domain::state::GameState;
use battle::engine::TurnEngine;
use battle::engine::presenter::{
    Cursor, Feedback, Highlight, HighlightScope, Presenter, Severity,
};
use battle::engine::store::MemoryStore;
use battle::error::{LoadError, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

// ============================================================================
// load_roster_from_ascii
// ============================================================================

fn class_from_marker(marker: &str) -> Option<CharacterClass> {
    match marker {
        "B" => Some(CharacterClass::Bowman),
        "S" => Some(CharacterClass::Swordsman),
        "M" => Some(CharacterClass::Magician),
        "v" => Some(CharacterClass::Vampire),
        "u" => Some(CharacterClass::Undead),
        "d" => Some(CharacterClass::Daemon),
        _ => None,
    }
}

fn parse_error(reason: impl Into<String>) -> LoadError {
    LoadError::DeserializeError {
        format: "ascii".to_string(),
        reason: reason.into(),
    }
}

/// 從 ASCII 格式載入名單，棋盤必須是正方形
///
/// - `.` = 空格
/// - 大寫 `B` `S` `M` = 玩家的 Bowman / Swordsman / Magician
/// - 小寫 `v` `u` `d` = 對手的 Vampire / Undead / Daemon
///
/// 所有單位都是 1 級、初始生命值。
///
/// 例如：
/// ```text
/// S v .
/// . . .
/// . . d
/// ```
pub fn load_roster_from_ascii(ascii: &str) -> Result<(BoardSize, Roster)> {
    let lines: Vec<&str> = ascii
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(parse_error("棋盤為空").into());
    }

    let board_size = lines.len();
    let mut members = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.len() != board_size {
            return Err(parse_error(format!(
                "第 {row} 行有 {} 格，棋盤應為 {board_size}x{board_size}",
                cells.len()
            ))
            .into());
        }
        for (col, cell) in cells.iter().enumerate() {
            if *cell == "." {
                continue;
            }
            let class = class_from_marker(cell)
                .ok_or_else(|| parse_error(format!("未知的符號: {cell}")))?;
            members.push(PositionedCharacter::new(
                Character::new(class, 1)?,
                row * board_size + col,
                board_size,
            )?);
        }
    }

    Ok((board_size, Roster::from_members(members)?))
}

/// 設定指定位置單位的生命值
pub fn with_health_at(
    roster: &Roster,
    position: CellIndex,
    health: Stat,
    board_size: BoardSize,
) -> Roster {
    let mut roster = roster.clone();
    let member = roster.remove_at(position).unwrap();
    roster
        .insert(
            PositionedCharacter::new(
                member.into_character().with_health(health),
                position,
                board_size,
            )
            .unwrap(),
        )
        .unwrap();
    roster
}

/// 第一關、輪到玩家的狀態
pub fn state_from_roster(roster: Roster) -> GameState {
    GameState {
        teams: roster,
        ..GameState::fresh(0)
    }
}

pub type TestEngine = TurnEngine<RecordingPresenter, MemoryStore, StdRng>;

/// 建立引擎並換上 ASCII 擺好的棋盤，清除開局產生的顯示紀錄
pub fn engine_from_ascii(ascii: &str, feedback: Feedback, seed: u64) -> TestEngine {
    let (board_size, roster) = load_roster_from_ascii(ascii).unwrap();
    engine_from_roster(roster, board_size, feedback, seed)
}

pub fn engine_from_roster(
    roster: Roster,
    board_size: BoardSize,
    feedback: Feedback,
    seed: u64,
) -> TestEngine {
    let config = GameConfig {
        board_size,
        ..GameConfig::default()
    };
    let mut engine = TurnEngine::new(
        config,
        RecordingPresenter::new(feedback),
        MemoryStore::new(),
        StdRng::seed_from_u64(seed),
    )
    .unwrap();
    engine.restore(state_from_roster(roster)).unwrap();
    engine.presenter_mut().clear();
    engine
}

// ============================================================================
// RecordingPresenter
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DrawBoard(String),
    Redraw { players: usize, opponents: usize },
    Highlight(CellIndex, Highlight),
    ClearHighlights(HighlightScope),
    Cursor(Cursor),
    Tooltip { message: String, severity: Severity },
    CellInfo(String, CellIndex),
    HideCellInfo(CellIndex),
    Banner(String),
    AnimateDamage(CellIndex, Stat),
    Score { level: Level, points: Points, record: Points },
}

/// 記錄所有顯示指令；傷害動畫依 `feedback` 回報完成或播放中
#[derive(Debug, Clone)]
pub struct RecordingPresenter {
    pub calls: Vec<Call>,
    pub feedback: Feedback,
}

impl RecordingPresenter {
    pub fn new(feedback: Feedback) -> Self {
        Self {
            calls: Vec::new(),
            feedback,
        }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn tooltips(&self) -> Vec<(&str, Severity)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Tooltip { message, severity } => Some((message.as_str(), *severity)),
                _ => None,
            })
            .collect()
    }

    pub fn banners(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Banner(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_score(&self) -> Option<(Level, Points, Points)> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::Score {
                level,
                points,
                record,
            } => Some((*level, *points, *record)),
            _ => None,
        })
    }

    pub fn damages(&self) -> Vec<(CellIndex, Stat)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::AnimateDamage(index, amount) => Some((*index, *amount)),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn draw_board(&mut self, theme: &str) {
        self.calls.push(Call::DrawBoard(theme.to_string()));
    }

    fn redraw(&mut self, roster: &Roster) {
        self.calls.push(Call::Redraw {
            players: roster.players().len(),
            opponents: roster.opponents().len(),
        });
    }

    fn highlight_cell(&mut self, index: CellIndex, highlight: Highlight) {
        self.calls.push(Call::Highlight(index, highlight));
    }

    fn clear_highlights(&mut self, scope: HighlightScope) {
        self.calls.push(Call::ClearHighlights(scope));
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.calls.push(Call::Cursor(cursor));
    }

    fn show_tooltip(&mut self, _title: &str, message: &str, severity: Severity) {
        self.calls.push(Call::Tooltip {
            message: message.to_string(),
            severity,
        });
    }

    fn show_cell_info(&mut self, text: &str, index: CellIndex) {
        self.calls.push(Call::CellInfo(text.to_string(), index));
    }

    fn hide_cell_info(&mut self, index: CellIndex) {
        self.calls.push(Call::HideCellInfo(index));
    }

    fn show_banner(&mut self, text: &str) {
        self.calls.push(Call::Banner(text.to_string()));
    }

    fn animate_damage(&mut self, index: CellIndex, amount: Stat) -> Feedback {
        self.calls.push(Call::AnimateDamage(index, amount));
        self.feedback
    }

    fn render_score(&mut self, level: Level, points: Points, record: Points) {
        self.calls.push(Call::Score {
            level,
            points,
            record,
        });
    }
}
