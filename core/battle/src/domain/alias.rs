//! 型別別名

/// 棋盤格索引（row-major，範圍 `[0, board_size²)`）
pub type CellIndex = usize;
/// 棋盤邊長
pub type BoardSize = usize;
/// 移動 / 攻擊半徑（格）
pub type Radius = usize;
pub type Level = u32;
pub type Stat = u32;
pub type Points = u32;
