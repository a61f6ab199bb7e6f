//! 遊戲狀態
//!
//! 引擎每次變更都產生新的 `GameState`，舊值不被原地修改。

use crate::domain::alias::{BoardSize, Level, Points};
use crate::domain::roster::{PositionedCharacter, Roster};
use crate::domain::snapshot::Snapshot;
use crate::error::{Context, LoadError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// 目前關卡；通關後為 `max_level + 1`，代表比賽已結束
    pub current_level: Level,
    pub teams: Roster,
    pub number_of_points: Points,
    pub player_turn: bool,
    /// 本次執行期間的最高分（不寫入存檔）
    pub record: Points,
}

impl GameState {
    /// 新遊戲的空白狀態，保留最高分
    pub fn fresh(record: Points) -> Self {
        Self {
            current_level: 1,
            teams: Roster::new(),
            number_of_points: 0,
            player_turn: true,
            record,
        }
    }

    pub fn with_teams(&self, teams: Roster) -> Self {
        Self {
            teams,
            ..self.clone()
        }
    }

    pub fn with_player_turn(&self, player_turn: bool) -> Self {
        Self {
            player_turn,
            ..self.clone()
        }
    }

    /// 更新分數，最高分同步取較大者
    pub fn with_points(&self, number_of_points: Points) -> Self {
        Self {
            number_of_points,
            record: self.record.max(number_of_points),
            ..self.clone()
        }
    }

    pub fn with_record(&self, record: Points) -> Self {
        Self {
            record: self.record.max(record),
            ..self.clone()
        }
    }

    pub fn has_ended(&self, max_level: Level) -> bool {
        self.current_level > max_level
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_level: self.current_level,
            teams: self.teams.iter().map(PositionedCharacter::to_record).collect(),
            number_of_points: self.number_of_points,
            player_turn: self.player_turn,
        }
    }

    /// 由存檔重建狀態
    ///
    /// 每個角色都透過類型標籤重建；生命值為 0 的單位直接移出名單。
    pub fn from_snapshot(snapshot: &Snapshot, board_size: BoardSize, record: Points) -> Result<Self> {
        if snapshot.current_level == 0 {
            return Err(LoadError::InvalidSnapshot {
                reason: "currentLevel 必須 >= 1".to_string(),
            }
            .into());
        }
        let members = snapshot
            .teams
            .iter()
            .map(|record| PositionedCharacter::rehydrate(record, board_size))
            .collect::<Result<Vec<_>>>()
            .context("重建存檔名單")?;
        let mut teams = Roster::from_members(members).context("重建存檔名單")?;
        teams.prune_dead();
        Ok(Self {
            current_level: snapshot.current_level,
            teams,
            number_of_points: snapshot.number_of_points,
            player_turn: snapshot.player_turn,
            record: record.max(snapshot.number_of_points),
        })
    }
}
