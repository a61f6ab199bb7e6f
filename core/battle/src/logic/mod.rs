//! 核心遊戲邏輯（純函式，不持有狀態）

pub mod ai;
pub mod combat;
pub mod generator;
pub mod geometry;
pub mod progression;
