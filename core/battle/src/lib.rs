//! 回合制戰棋核心
//!
//! - domain：角色、棋盤站位、遊戲狀態與存檔格式
//! - logic：戰鬥結算、幾何判定、單位生成、AI、關卡推進（純函式）
//! - engine：回合引擎，唯一持有遊戲狀態的地方，透過 Presenter / StateStore 與外部溝通

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod logic;

pub use domain::{alias, constants};
