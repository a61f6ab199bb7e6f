//! 棋盤站位與雙方名單

use crate::domain::alias::{BoardSize, CellIndex, Stat};
use crate::domain::character::{Character, Faction};
use crate::domain::snapshot::PositionedRecord;
use crate::error::{Context, Result, RosterError};
use std::collections::HashSet;

/// 站在棋盤上的角色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedCharacter {
    character: Character,
    position: CellIndex,
}

impl PositionedCharacter {
    /// 建立站位，位置必須落在 `[0, board_size²)`
    pub fn new(character: Character, position: CellIndex, board_size: BoardSize) -> Result<Self> {
        if position >= board_size * board_size {
            return Err(RosterError::OutOfBoard {
                position,
                board_size,
            }
            .into());
        }
        Ok(Self {
            character,
            position,
        })
    }

    pub fn rehydrate(record: &PositionedRecord, board_size: BoardSize) -> Result<Self> {
        let character = Character::rehydrate(&record.character)
            .context(format!("重建位置 {} 的角色", record.position))?;
        Self::new(character, record.position, board_size)
    }

    pub fn to_record(&self) -> PositionedRecord {
        PositionedRecord {
            character: self.character.to_record(),
            position: self.position,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn position(&self) -> CellIndex {
        self.position
    }

    pub fn faction(&self) -> Faction {
        self.character.faction()
    }

    pub fn into_character(self) -> Character {
        self.character
    }
}

/// 雙方全部單位
///
/// 順序沒有意義；同一格最多一個單位。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<PositionedCharacter>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由一組站位建立名單，位置重複時回傳錯誤
    pub fn from_members(members: impl IntoIterator<Item = PositionedCharacter>) -> Result<Self> {
        let mut roster = Self::new();
        for member in members {
            roster.insert(member)?;
        }
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionedCharacter> {
        self.members.iter()
    }

    pub fn at(&self, position: CellIndex) -> Option<&PositionedCharacter> {
        self.members.iter().find(|m| m.position == position)
    }

    pub fn is_occupied(&self, position: CellIndex) -> bool {
        self.at(position).is_some()
    }

    pub fn occupied(&self) -> HashSet<CellIndex> {
        self.members.iter().map(|m| m.position).collect()
    }

    pub fn insert(&mut self, member: PositionedCharacter) -> Result<()> {
        if self.is_occupied(member.position) {
            return Err(RosterError::PositionOccupied {
                position: member.position,
            }
            .into());
        }
        self.members.push(member);
        Ok(())
    }

    /// 移除指定位置的單位，該格無單位時回傳 None
    pub fn remove_at(&mut self, position: CellIndex) -> Option<PositionedCharacter> {
        let idx = self.members.iter().position(|m| m.position == position)?;
        Some(self.members.swap_remove(idx))
    }

    /// 移除所有已死亡的單位
    pub fn prune_dead(&mut self) {
        self.members.retain(|m| m.character.is_alive());
    }

    pub fn faction(&self, faction: Faction) -> FactionView<'_> {
        FactionView {
            faction,
            members: self
                .members
                .iter()
                .filter(|m| m.faction() == faction)
                .collect(),
        }
    }

    pub fn players(&self) -> FactionView<'_> {
        self.faction(Faction::Player)
    }

    pub fn opponents(&self) -> FactionView<'_> {
        self.faction(Faction::Opponent)
    }

    pub fn into_members(self) -> Vec<PositionedCharacter> {
        self.members
    }
}

/// 單一陣營的唯讀視圖（每次查詢時建立一次）
#[derive(Debug, Clone)]
pub struct FactionView<'a> {
    faction: Faction,
    members: Vec<&'a PositionedCharacter>,
}

impl<'a> FactionView<'a> {
    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PositionedCharacter> + '_ {
        self.members.iter().copied()
    }

    pub fn members(&self) -> &[&'a PositionedCharacter] {
        &self.members
    }

    pub fn total_health(&self) -> Stat {
        self.members.iter().map(|m| m.character.health()).sum()
    }
}
