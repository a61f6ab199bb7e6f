//! 棋盤幾何判定
//!
//! 格索引為 row-major：`index = y * board_size + x`。距離採 Chebyshev（對角線算一格）。

use crate::domain::alias::{BoardSize, CellIndex, Radius};

fn coords(index: CellIndex, board_size: BoardSize) -> (usize, usize) {
    (index % board_size, index / board_size)
}

fn in_board(index: CellIndex, board_size: BoardSize) -> bool {
    index < board_size * board_size
}

pub fn distance(from: CellIndex, to: CellIndex, board_size: BoardSize) -> usize {
    let (fx, fy) = coords(from, board_size);
    let (tx, ty) = coords(to, board_size);
    fx.abs_diff(tx).max(fy.abs_diff(ty))
}

/// 是否可以從 `from` 走到 `to`
///
/// 只能沿橫、直、斜線移動，且距離 <= radius。
pub fn can_step(from: CellIndex, to: CellIndex, radius: Radius, board_size: BoardSize) -> bool {
    if from == to || !in_board(from, board_size) || !in_board(to, board_size) {
        return false;
    }
    let (fx, fy) = coords(from, board_size);
    let (tx, ty) = coords(to, board_size);
    let dx = fx.abs_diff(tx);
    let dy = fy.abs_diff(ty);
    let straight = dx == 0 || dy == 0 || dx == dy;
    straight && dx.max(dy) <= radius
}

/// 是否可以從 `from` 攻擊 `to`：以 `from` 為中心、邊長 2 * radius + 1 的方形範圍
pub fn can_attack(from: CellIndex, to: CellIndex, radius: Radius, board_size: BoardSize) -> bool {
    if from == to || !in_board(from, board_size) || !in_board(to, board_size) {
        return false;
    }
    distance(from, to, board_size) <= radius
}
