//! 單位生成與起始位置

use crate::domain::alias::{BoardSize, CellIndex, Level};
use crate::domain::character::{Character, CharacterClass, Faction};
use crate::domain::constants::START_COLUMNS;
use crate::domain::roster::PositionedCharacter;
use crate::error::{ConfigError, InvariantError, Result};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;

/// 隨機產生 `count` 個角色，類型從 `classes` 中抽，等級為 `1..=max_level`
///
/// 只設定等級，不套用等級加成。
pub fn generate_roster<R: Rng>(
    classes: &[CharacterClass],
    max_level: Level,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Character>> {
    let max_level = max_level.max(1);
    (0..count)
        .map(|_| {
            let class = *classes.choose(rng).ok_or(ConfigError::EmptyClassList)?;
            let level = rng.random_range(1..=max_level);
            Character::new(class, level)
        })
        .collect()
}

/// 陣營起始區：玩家在最左兩欄，對手在最右兩欄
pub fn generate_start_cells(faction: Faction, board_size: BoardSize) -> Vec<CellIndex> {
    let columns = START_COLUMNS.min(board_size);
    let first_column = match faction {
        Faction::Player => 0,
        Faction::Opponent => board_size - columns,
    };
    (0..board_size)
        .flat_map(|row| (first_column..first_column + columns).map(move |col| row * board_size + col))
        .collect()
}

/// 把角色放到陣營起始區，位置抽出後不放回
///
/// `occupied` 中的格子不會被使用。
pub fn place_on_start_cells<R: Rng>(
    characters: Vec<Character>,
    faction: Faction,
    board_size: BoardSize,
    occupied: &HashSet<CellIndex>,
    rng: &mut R,
) -> Result<Vec<PositionedCharacter>> {
    let mut cells: Vec<CellIndex> = generate_start_cells(faction, board_size)
        .into_iter()
        .filter(|cell| !occupied.contains(cell))
        .collect();
    if cells.len() < characters.len() {
        return Err(InvariantError::NotEnoughStartCells {
            faction,
            needed: characters.len(),
            available: cells.len(),
        }
        .into());
    }
    characters
        .into_iter()
        .map(|character| {
            let idx = rng.random_range(0..cells.len());
            let position = cells.swap_remove(idx);
            PositionedCharacter::new(character, position, board_size)
        })
        .collect()
}

/// 開局用：產生角色並直接放到陣營起始區
pub fn generate_team<R: Rng>(
    classes: &[CharacterClass],
    max_level: Level,
    count: usize,
    faction: Faction,
    board_size: BoardSize,
    rng: &mut R,
) -> Result<Vec<PositionedCharacter>> {
    let characters = generate_roster(classes, max_level, count, rng)?;
    place_on_start_cells(characters, faction, board_size, &HashSet::new(), rng)
}
