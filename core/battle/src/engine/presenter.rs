//! 畫面層介面
//!
//! 引擎只送出顯示指令，不碰任何畫面狀態。

use crate::domain::alias::{CellIndex, Level, Points, Stat};
use crate::domain::roster::Roster;
use strum_macros::Display;
use tracing::{debug, info};

/// 格子高亮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Highlight {
    /// 已選取的單位（黃）
    Selected,
    /// 可移動（綠）
    Move,
    /// 可攻擊（紅）
    Attack,
}

/// 清除高亮的範圍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HighlightScope {
    /// 只清移動 / 攻擊提示
    Hints,
    Selection,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Cursor {
    Auto,
    Pointer,
    Crosshair,
    NotAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

/// 傷害動畫的完成訊號
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// 已完成，引擎直接繼續回合結算
    Done,
    /// 動畫播放中，畫面層結束後必須呼叫一次 `TurnEngine::complete_feedback`
    Pending,
}

pub trait Presenter {
    fn draw_board(&mut self, theme: &str);
    fn redraw(&mut self, roster: &Roster);
    fn highlight_cell(&mut self, index: CellIndex, highlight: Highlight);
    fn clear_highlights(&mut self, scope: HighlightScope);
    fn set_cursor(&mut self, cursor: Cursor);
    fn show_tooltip(&mut self, title: &str, message: &str, severity: Severity);
    fn show_cell_info(&mut self, text: &str, index: CellIndex);
    fn hide_cell_info(&mut self, index: CellIndex);
    fn show_banner(&mut self, text: &str);
    fn animate_damage(&mut self, index: CellIndex, amount: Stat) -> Feedback;
    fn render_score(&mut self, level: Level, points: Points, record: Points);
}

/// 無畫面的 presenter：所有指令寫入 tracing，動畫立即完成
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn draw_board(&mut self, theme: &str) {
        debug!(theme, "draw_board");
    }

    fn redraw(&mut self, roster: &Roster) {
        debug!(units = roster.len(), "redraw");
    }

    fn highlight_cell(&mut self, index: CellIndex, highlight: Highlight) {
        debug!(index, %highlight, "highlight_cell");
    }

    fn clear_highlights(&mut self, scope: HighlightScope) {
        debug!(%scope, "clear_highlights");
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        debug!(%cursor, "set_cursor");
    }

    fn show_tooltip(&mut self, title: &str, message: &str, severity: Severity) {
        info!(title, message, %severity, "tooltip");
    }

    fn show_cell_info(&mut self, text: &str, index: CellIndex) {
        debug!(index, text, "show_cell_info");
    }

    fn hide_cell_info(&mut self, index: CellIndex) {
        debug!(index, "hide_cell_info");
    }

    fn show_banner(&mut self, text: &str) {
        info!(text, "banner");
    }

    fn animate_damage(&mut self, index: CellIndex, amount: Stat) -> Feedback {
        debug!(index, amount, "animate_damage");
        Feedback::Done
    }

    fn render_score(&mut self, level: Level, points: Points, record: Points) {
        debug!(level, points, record, "render_score");
    }
}
