//! 對手陣營 AI
//!
//! 每次呼叫只決定一個行動，不會跳過回合：
//! 1. 有任何可攻擊的玩家單位 → 隨機挑一組 (攻擊者, 目標)
//! 2. 否則隨機挑一個對手單位，從空格中抽樣直到找到可走的格子

use crate::domain::alias::{BoardSize, CellIndex};
use crate::domain::character::Faction;
use crate::domain::roster::{PositionedCharacter, Roster};
use crate::error::{InvariantError, Result};
use crate::logic::geometry::{can_attack, can_step};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    Attack { from: CellIndex, target: CellIndex },
    Move { from: CellIndex, to: CellIndex },
}

/// 可攻擊的組合
#[derive(Debug)]
struct Engagement<'a> {
    attacker: &'a PositionedCharacter,
    targets: Vec<&'a PositionedCharacter>,
}

pub fn decide_action<R: Rng>(roster: &Roster, board_size: BoardSize, rng: &mut R) -> Result<AiAction> {
    let opponents = roster.opponents();
    let players = roster.players();
    // 呼叫前提：雙方都還有單位
    for view in [&opponents, &players] {
        if view.is_empty() {
            return Err(InvariantError::EmptyRoster {
                faction: view.faction(),
            }
            .into());
        }
    }

    let engagements: Vec<Engagement> = opponents
        .iter()
        .filter_map(|attacker| {
            let targets: Vec<_> = players
                .iter()
                .filter(|target| {
                    can_attack(
                        attacker.position(),
                        target.position(),
                        attacker.character().range(),
                        board_size,
                    )
                })
                .collect();
            (!targets.is_empty()).then_some(Engagement { attacker, targets })
        })
        .collect();

    if let Some(engagement) = engagements.choose(rng) {
        if let Some(target) = engagement.targets.choose(rng) {
            debug!(
                from = engagement.attacker.position(),
                target = target.position(),
                "AI 選擇攻擊"
            );
            return Ok(AiAction::Attack {
                from: engagement.attacker.position(),
                target: target.position(),
            });
        }
    }

    let mover = opponents
        .members()
        .choose(rng)
        .ok_or(InvariantError::EmptyRoster {
            faction: Faction::Opponent,
        })?;
    let to = find_step(roster, mover, board_size, rng)?;
    debug!(from = mover.position(), to, "AI 選擇移動");
    Ok(AiAction::Move {
        from: mover.position(),
        to,
    })
}

/// 從所有空格中隨機抽樣，不合法的格子移出候選池，池空即為不變量錯誤
fn find_step<R: Rng>(
    roster: &Roster,
    mover: &PositionedCharacter,
    board_size: BoardSize,
    rng: &mut R,
) -> Result<CellIndex> {
    let occupied = roster.occupied();
    let mut pool: Vec<CellIndex> = (0..board_size * board_size)
        .filter(|cell| !occupied.contains(cell))
        .collect();
    while !pool.is_empty() {
        let idx = rng.random_range(0..pool.len());
        let candidate = pool[idx];
        if can_step(
            mover.position(),
            candidate,
            mover.character().step(),
            board_size,
        ) {
            return Ok(candidate);
        }
        pool.swap_remove(idx);
    }
    Err(InvariantError::NoLegalStep {
        position: mover.position(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::character::{Character, CharacterClass};
    use crate::error::ErrorKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn roster(units: &[(CharacterClass, CellIndex)], board_size: BoardSize) -> Roster {
        Roster::from_members(units.iter().map(|(class, pos)| {
            PositionedCharacter::new(Character::new(*class, 1).unwrap(), *pos, board_size).unwrap()
        }))
        .unwrap()
    }

    #[test]
    fn test_attacks_when_target_in_range() {
        // Undead 射程 1，只能打到 9
        let roster = roster(
            &[
                (CharacterClass::Undead, 0),
                (CharacterClass::Bowman, 9),
                (CharacterClass::Bowman, 63),
            ],
            8,
        );
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let action = decide_action(&roster, 8, &mut rng).unwrap();
            assert_eq!(action, AiAction::Attack { from: 0, target: 9 });
        }
    }

    #[test]
    fn test_moves_when_nothing_in_range() {
        let roster = roster(
            &[(CharacterClass::Daemon, 63), (CharacterClass::Swordsman, 0)],
            8,
        );
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            match decide_action(&roster, 8, &mut rng).unwrap() {
                AiAction::Move { from, to } => {
                    assert_eq!(from, 63);
                    assert!([54, 55, 62].contains(&to), "to = {to}");
                }
                other => panic!("預期移動，得到 {other:?}"),
            }
        }
    }

    #[test]
    fn test_boxed_in_unit_is_invariant_violation() {
        // 4x4，Daemon 在角落 0，周圍三格被自己人佔滿
        let roster = roster(
            &[
                (CharacterClass::Daemon, 0),
                (CharacterClass::Vampire, 1),
                (CharacterClass::Vampire, 4),
                (CharacterClass::Vampire, 5),
                (CharacterClass::Magician, 15),
            ],
            4,
        );
        // 任何一個對手被選中都可能成功，只檢查 Daemon 被選中時的結果
        let daemon = roster.at(0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let err = find_step(&roster, daemon, 4, &mut rng).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Invariant(InvariantError::NoLegalStep { position: 0 })
        ));
    }

    #[test]
    fn test_requires_both_factions() {
        let roster = roster(&[(CharacterClass::Daemon, 0)], 4);
        let mut rng = StdRng::seed_from_u64(0);
        let err = decide_action(&roster, 4, &mut rng).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Invariant(InvariantError::EmptyRoster {
                faction: Faction::Player
            })
        ));
    }
}
