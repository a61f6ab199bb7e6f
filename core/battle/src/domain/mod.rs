//! 資料類型定義

pub mod alias;
pub mod character;
pub mod constants;
pub mod roster;
pub mod snapshot;
pub mod state;
