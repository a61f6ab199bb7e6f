//! 戰鬥結算
//!
//! 純函式，不修改名單；移除死亡單位由引擎負責。

use crate::domain::alias::Stat;
use crate::domain::character::Character;
use crate::domain::constants::CHIP_DAMAGE_DIVISOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackResult {
    pub damage: Stat,
    pub remaining_health: Stat,
}

impl AttackResult {
    pub fn is_lethal(&self) -> bool {
        self.remaining_health == 0
    }
}

/// 傷害 = round(max(attack - defence, attack * 0.1))，四捨五入（.5 進位）
///
/// 全部以整數計算：攻擊力的 1/10 只有在差值不足時才會生效。
pub fn resolve_attack(attacker: &Character, defender: &Character) -> AttackResult {
    let attack = attacker.attack();
    let defence = defender.defence();
    let chip_floor = attack.saturating_add(CHIP_DAMAGE_DIVISOR / 2) / CHIP_DAMAGE_DIVISOR;
    let damage = match attack.checked_sub(defence) {
        // diff >= attack / 10 <=> diff * 10 >= attack
        Some(diff) if diff.saturating_mul(CHIP_DAMAGE_DIVISOR) >= attack => diff,
        _ => chip_floor,
    };
    AttackResult {
        damage,
        remaining_health: defender.health().saturating_sub(damage),
    }
}
