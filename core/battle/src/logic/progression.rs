//! 關卡推進
//!
//! 對手全滅後呼叫：加分、升級倖存者、補充玩家援軍、重新佈陣、產生下一波對手。
//! 超過最後一關則結算並結束比賽。

use crate::config::GameConfig;
use crate::domain::alias::Points;
use crate::domain::character::{Character, Faction};
use crate::domain::roster::{PositionedCharacter, Roster};
use crate::domain::state::GameState;
use crate::error::{Context, Result};
use crate::logic::generator::{generate_roster, place_on_start_cells};
use rand::Rng;
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelOutcome {
    /// 進入下一關，新的對手已就位，輪到玩家
    Advanced(GameState),
    /// 最後一關已通過，比賽結束
    Victory(GameState),
}

impl LevelOutcome {
    pub fn state(&self) -> &GameState {
        match self {
            LevelOutcome::Advanced(state) | LevelOutcome::Victory(state) => state,
        }
    }
}

pub fn advance_level<R: Rng>(
    state: &GameState,
    config: &GameConfig,
    rng: &mut R,
) -> Result<LevelOutcome> {
    let level = state.current_level + 1;
    let bonus: Points = state.teams.players().total_health();
    let scored = GameState {
        current_level: level,
        ..state.with_points(state.number_of_points + bonus)
    };

    if level > config.max_level {
        info!(points = scored.number_of_points, "最後一關已通過");
        return Ok(LevelOutcome::Victory(scored));
    }

    // 倖存者升級（照理說只剩玩家單位）
    let mut players = Vec::new();
    let mut leftovers = Vec::new();
    for member in state.teams.iter() {
        let position = member.position();
        let mut character = member.character().clone();
        character.level_up();
        match character.faction() {
            Faction::Player => players.push(character),
            Faction::Opponent => leftovers.push(
                PositionedCharacter::new(character, position, config.board_size)?,
            ),
        }
    }

    let reinforcements = generate_roster(
        &config.player_classes,
        level - 1,
        config.reinforcement_size(level),
        rng,
    )
    .context("產生玩家援軍")?;
    players.extend(reinforcements);

    let mut occupied: HashSet<_> = leftovers.iter().map(|m| m.position()).collect();
    let players = place_on_start_cells(players, Faction::Player, config.board_size, &occupied, rng)
        .context("重新佈署玩家")?;
    occupied.extend(players.iter().map(|m| m.position()));

    let mut wave = generate_roster(&config.opponent_classes, level, players.len(), rng)
        .context("產生對手")?;
    for character in &mut wave {
        boost_to_level(character);
    }
    let wave = place_on_start_cells(wave, Faction::Opponent, config.board_size, &occupied, rng)
        .context("佈署對手")?;

    let teams = Roster::from_members(players.into_iter().chain(leftovers).chain(wave))?;
    info!(
        level,
        players = teams.players().len(),
        opponents = teams.opponents().len(),
        "進入下一關"
    );
    Ok(LevelOutcome::Advanced(GameState {
        player_turn: true,
        ..scored.with_teams(teams)
    }))
}

/// 新生成的對手依等級補上屬性：單級成長重複 (level - 1) 次
fn boost_to_level(character: &mut Character) {
    for _ in 1..character.level() {
        character.stats_up();
    }
}
