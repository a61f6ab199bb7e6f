//! 回合引擎
//!
//! 唯一持有 `GameState` 的地方。畫面層把事件轉成格索引後呼叫 `on_*`，
//! 引擎驗證意圖、結算戰鬥、驅動 AI 與關卡推進，再透過 `Presenter` 送出顯示指令。
//!
//! 階段：
//! - `Idle` → `Selected` → `ActionPending`（懸停在合法目標上）→ 行動結算後回到 `Idle` / `Selected`
//! - 攻擊的傷害動畫未結束前為 `AwaitingFeedback`，期間忽略所有格子輸入
//! - `PlayerWon` / `PlayerLost` 為終局，凍結輸入

pub mod presenter;
pub mod store;

use crate::config::GameConfig;
use crate::domain::alias::CellIndex;
use crate::domain::character::Faction;
use crate::domain::roster::{PositionedCharacter, Roster};
use crate::domain::snapshot::Snapshot;
use crate::domain::state::GameState;
use crate::error::{Context, InvariantError, Result};
use crate::logic::ai::{AiAction, decide_action};
use crate::logic::combat::{AttackResult, resolve_attack};
use crate::logic::generator::generate_team;
use crate::logic::geometry::{can_attack, can_step};
use crate::logic::progression::{LevelOutcome, advance_level};
use presenter::{Cursor, Feedback, Highlight, HighlightScope, Presenter, Severity};
use rand::Rng;
use rand::rngs::ThreadRng;
use store::StateStore;
use strum_macros::Display;
use tracing::{debug, info, warn};

const TOOLTIP_TITLE: &str = "訊息";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TurnPhase {
    Idle,
    Selected,
    ActionPending,
    AwaitingFeedback,
    PlayerWon,
    PlayerLost,
}

impl TurnPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::PlayerWon | TurnPhase::PlayerLost)
    }
}

/// 非法意圖：狀態不變，只顯示提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rejection {
    /// 空格但超出步數
    Unreachable,
    /// 敵方單位但超出射程
    TooFar,
    /// 自己人
    InvalidTarget,
}

impl Rejection {
    fn message(self) -> &'static str {
        match self {
            Rejection::Unreachable => "無法移動到這裡！",
            Rejection::TooFar => "太遠了……",
            Rejection::InvalidTarget => "不是有效的目標！",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    /// 動畫播放中、非玩家回合或比賽已結束
    Locked,
    Ignored,
    Selected(CellIndex),
    Moved {
        from: CellIndex,
        to: CellIndex,
    },
    Attacked {
        from: CellIndex,
        target: CellIndex,
        damage: u32,
        killed: bool,
    },
    Rejected(Rejection),
}

/// 懸停查詢結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverPreview {
    pub occupant: Option<Faction>,
    pub can_move: bool,
    pub can_attack: bool,
}

impl HoverPreview {
    pub fn is_actionable(&self) -> bool {
        self.can_move || self.can_attack
    }
}

#[derive(Debug)]
pub struct TurnEngine<P, S, R> {
    config: GameConfig,
    presenter: P,
    store: S,
    rng: R,
    state: GameState,
    /// 選取中的玩家單位位置
    selected: Option<CellIndex>,
    phase: TurnPhase,
}

impl<P: Presenter, S: StateStore> TurnEngine<P, S, ThreadRng> {
    /// 預設設定 + 執行緒亂數
    pub fn with_defaults(presenter: P, store: S) -> Result<Self> {
        Self::new(GameConfig::default(), presenter, store, rand::rng())
    }
}

impl<P: Presenter, S: StateStore, R: Rng> TurnEngine<P, S, R> {
    /// 驗證設定並開一局新遊戲
    pub fn new(config: GameConfig, presenter: P, store: S, rng: R) -> Result<Self> {
        config.validate().context("建立回合引擎")?;
        let mut engine = Self {
            config,
            presenter,
            store,
            rng,
            state: GameState::fresh(0),
            selected: None,
            phase: TurnPhase::Idle,
        };
        engine.prepare_game()?;
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn selected(&self) -> Option<CellIndex> {
        self.selected
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 整體替換遊戲狀態並重繪
    ///
    /// 最高分取兩者較大值。若替換後輪到對手，對手立即行動一次；
    /// 後續的關卡推進或對手行動失敗時，還原為替換前的狀態並回傳錯誤。
    pub fn restore(&mut self, state: GameState) -> Result<()> {
        let previous = (self.state.clone(), self.selected, self.phase);
        let result = self.apply_restored(state);
        if result.is_err() {
            (self.state, self.selected, self.phase) = previous;
            self.redraw_all();
        }
        result
    }

    fn apply_restored(&mut self, state: GameState) -> Result<()> {
        let record = self.state.record;
        self.state = state.with_record(record);
        self.selected = None;
        self.phase = if self.state.teams.players().is_empty() {
            TurnPhase::PlayerLost
        } else if self.state.has_ended(self.config.max_level) {
            TurnPhase::PlayerWon
        } else {
            TurnPhase::Idle
        };
        self.redraw_all();

        if self.phase != TurnPhase::Idle {
            return Ok(());
        }
        if self.state.teams.opponents().is_empty() {
            self.state = self.state.with_player_turn(false);
            return self.next_level();
        }
        if !self.state.player_turn {
            return self.run_ai();
        }
        Ok(())
    }

    fn redraw_all(&mut self) {
        self.presenter
            .draw_board(self.config.theme_for(self.state.current_level));
        self.presenter.clear_highlights(HighlightScope::All);
        self.presenter.redraw(&self.state.teams);
        if let Some(index) = self.selected {
            self.presenter.highlight_cell(index, Highlight::Selected);
        }
        self.render_score();
    }

    pub fn on_new_game(&mut self) -> Result<()> {
        self.prepare_game()?;
        self.presenter
            .show_tooltip(TOOLTIP_TITLE, "新遊戲開始", Severity::Info);
        Ok(())
    }

    pub fn on_save(&mut self) {
        if self.phase == TurnPhase::AwaitingFeedback {
            self.presenter
                .show_tooltip(TOOLTIP_TITLE, "動畫播放中，請稍後再存檔", Severity::Warning);
            return;
        }
        match self.store.save(&self.state.snapshot()) {
            Ok(()) => {
                info!(level = self.state.current_level, "遊戲已儲存");
                self.presenter
                    .show_tooltip(TOOLTIP_TITLE, "遊戲已儲存", Severity::Info);
            }
            Err(e) => {
                warn!(error = %e, "存檔失敗");
                self.presenter
                    .show_tooltip(TOOLTIP_TITLE, &e.to_string(), Severity::Danger);
            }
        }
    }

    /// 讀檔；存檔不存在、損毀或無法套用時顯示警告，目前狀態不變
    pub fn on_load(&mut self) -> Result<()> {
        if self.phase == TurnPhase::AwaitingFeedback {
            self.presenter
                .show_tooltip(TOOLTIP_TITLE, "動畫播放中，請稍後再讀檔", Severity::Warning);
            return Ok(());
        }
        let loaded = self
            .store
            .load()
            .and_then(|snapshot| {
                GameState::from_snapshot(&snapshot, self.config.board_size, self.state.record)
            })
            .and_then(|state| {
                info!(level = state.current_level, "讀取存檔");
                self.restore(state).context("套用存檔")
            });
        match loaded {
            Ok(()) => {
                self.presenter
                    .show_tooltip(TOOLTIP_TITLE, "遊戲已讀取", Severity::Info);
            }
            Err(e) => {
                warn!(error = %e, "讀檔失敗");
                self.presenter
                    .show_tooltip(TOOLTIP_TITLE, &e.to_string(), Severity::Danger);
            }
        }
        Ok(())
    }

    /// 畫面層的點擊入口：點自己人為選取，其餘交給 `resolve_intent`
    pub fn on_cell_click(&mut self, index: CellIndex) -> Result<IntentOutcome> {
        if !self.accepts_input() {
            return Ok(IntentOutcome::Locked);
        }
        if self.selected == Some(index) {
            return Ok(IntentOutcome::Ignored);
        }
        let occupant = self.state.teams.at(index).map(PositionedCharacter::faction);
        if occupant == Some(Faction::Player) || self.selected.is_none() {
            return Ok(self.select_cell(index));
        }
        self.resolve_intent(index)
    }

    /// 選取玩家單位；空格或敵方單位不改變選取
    pub fn select_cell(&mut self, index: CellIndex) -> IntentOutcome {
        if !self.accepts_input() {
            return IntentOutcome::Locked;
        }
        match self.state.teams.at(index).map(PositionedCharacter::faction) {
            Some(Faction::Player) => {
                self.selected = Some(index);
                self.phase = TurnPhase::Selected;
                self.presenter.clear_highlights(HighlightScope::Selection);
                self.presenter.highlight_cell(index, Highlight::Selected);
                self.presenter.set_cursor(Cursor::Pointer);
                debug!(index, "選取單位");
                IntentOutcome::Selected(index)
            }
            Some(Faction::Opponent) if self.selected.is_none() => {
                self.presenter.show_tooltip(
                    TOOLTIP_TITLE,
                    "這不是可操作的角色！",
                    Severity::Danger,
                );
                IntentOutcome::Ignored
            }
            _ => IntentOutcome::Ignored,
        }
    }

    /// 純查詢：`index` 對目前選取的單位是否為合法的移動或攻擊目標
    pub fn hover(&self, index: CellIndex) -> HoverPreview {
        let occupant = self.state.teams.at(index);
        let mut preview = HoverPreview {
            occupant: occupant.map(PositionedCharacter::faction),
            ..HoverPreview::default()
        };
        let Some(actor) = self.selected_unit() else {
            return preview;
        };
        let board_size = self.config.board_size;
        match occupant {
            None => {
                preview.can_move = can_step(
                    actor.position(),
                    index,
                    actor.character().step(),
                    board_size,
                );
            }
            Some(target) if target.faction() != actor.faction() => {
                preview.can_attack = can_attack(
                    actor.position(),
                    index,
                    actor.character().range(),
                    board_size,
                );
            }
            Some(_) => {}
        }
        preview
    }

    pub fn on_cell_enter(&mut self, index: CellIndex) {
        if !self.accepts_input() {
            return;
        }
        let preview = self.hover(index);
        if let Some(text) = self
            .state
            .teams
            .at(index)
            .map(|m| m.character().info_text())
        {
            self.presenter.show_cell_info(&text, index);
        }
        if preview.can_move {
            self.presenter.highlight_cell(index, Highlight::Move);
            self.presenter.set_cursor(Cursor::Pointer);
        } else if preview.can_attack {
            self.presenter.highlight_cell(index, Highlight::Attack);
            self.presenter.set_cursor(Cursor::Crosshair);
        } else if self.selected.is_some() && preview.occupant == Some(Faction::Opponent) {
            self.presenter.set_cursor(Cursor::NotAllowed);
        }
        if preview.is_actionable() {
            self.phase = TurnPhase::ActionPending;
        }
    }

    pub fn on_cell_leave(&mut self, index: CellIndex) {
        if self.phase.is_terminal() {
            return;
        }
        self.presenter.set_cursor(Cursor::Pointer);
        self.presenter.clear_highlights(HighlightScope::Hints);
        self.presenter.hide_cell_info(index);
        if self.phase == TurnPhase::ActionPending {
            self.phase = TurnPhase::Selected;
        }
    }

    /// 以目前選取的單位對 `index` 行動
    pub fn resolve_intent(&mut self, index: CellIndex) -> Result<IntentOutcome> {
        if !self.accepts_input() {
            return Ok(IntentOutcome::Locked);
        }
        let Some(actor) = self.selected_unit() else {
            return Ok(IntentOutcome::Ignored);
        };
        let from = actor.position();
        if from == index {
            return Ok(IntentOutcome::Ignored);
        }
        let faction = actor.faction();
        let step = actor.character().step();
        let range = actor.character().range();
        let board_size = self.config.board_size;

        match self.state.teams.at(index).map(PositionedCharacter::faction) {
            None if can_step(from, index, step, board_size) => {
                self.apply_move(from, index)?;
                self.end_of_turn()?;
                Ok(IntentOutcome::Moved { from, to: index })
            }
            None => Ok(self.reject(Rejection::Unreachable)),
            Some(target) if target == faction => Ok(self.reject(Rejection::InvalidTarget)),
            Some(_) if can_attack(from, index, range, board_size) => {
                let result = self.apply_attack(from, index)?;
                Ok(IntentOutcome::Attacked {
                    from,
                    target: index,
                    damage: result.damage,
                    killed: result.is_lethal(),
                })
            }
            Some(_) => Ok(self.reject(Rejection::TooFar)),
        }
    }

    /// 傷害動畫結束，繼續回合結算；只在 `AwaitingFeedback` 時生效一次
    pub fn complete_feedback(&mut self) -> Result<()> {
        if self.phase != TurnPhase::AwaitingFeedback {
            return Ok(());
        }
        self.phase = self.resting_phase();
        self.end_of_turn()
    }

    fn accepts_input(&self) -> bool {
        self.state.player_turn
            && !self.phase.is_terminal()
            && self.phase != TurnPhase::AwaitingFeedback
    }

    fn resting_phase(&self) -> TurnPhase {
        if self.selected.is_some() {
            TurnPhase::Selected
        } else {
            TurnPhase::Idle
        }
    }

    fn selected_unit(&self) -> Option<&PositionedCharacter> {
        self.selected
            .and_then(|index| self.state.teams.at(index))
            .filter(|m| m.faction() == Faction::Player)
    }

    fn reject(&mut self, rejection: Rejection) -> IntentOutcome {
        debug!(%rejection, "拒絕行動");
        self.presenter
            .show_tooltip(TOOLTIP_TITLE, rejection.message(), Severity::Warning);
        IntentOutcome::Rejected(rejection)
    }

    fn prepare_game(&mut self) -> Result<()> {
        let board_size = self.config.board_size;
        let mut members = Vec::new();
        for faction in [Faction::Player, Faction::Opponent] {
            members.extend(
                generate_team(
                    self.config.classes_for(faction),
                    self.config.initial_max_level,
                    self.config.initial_team_size,
                    faction,
                    board_size,
                    &mut self.rng,
                )
                .context(format!("產生 {faction} 開局隊伍"))?,
            );
        }
        self.state = GameState {
            teams: Roster::from_members(members)?,
            ..GameState::fresh(self.state.record)
        };
        self.selected = None;
        self.phase = TurnPhase::Idle;
        info!("新遊戲");
        self.presenter.draw_board(self.config.theme_for(1));
        self.presenter.clear_highlights(HighlightScope::All);
        self.presenter.redraw(&self.state.teams);
        self.render_score();
        Ok(())
    }

    fn apply_move(&mut self, from: CellIndex, to: CellIndex) -> Result<()> {
        let mut teams = self.state.teams.clone();
        let member = teams
            .remove_at(from)
            .ok_or(InvariantError::NoUnitAt { position: from })?;
        teams.insert(PositionedCharacter::new(
            member.into_character(),
            to,
            self.config.board_size,
        )?)?;
        self.state = self.state.with_teams(teams);
        if self.selected == Some(from) {
            self.selected = Some(to);
        }
        debug!(from, to, "移動");
        Ok(())
    }

    /// 結算攻擊；動畫立即完成時直接進入回合結算，否則等待 `complete_feedback`
    fn apply_attack(&mut self, from: CellIndex, target: CellIndex) -> Result<AttackResult> {
        let attacker = self
            .state
            .teams
            .at(from)
            .ok_or(InvariantError::NoUnitAt { position: from })?
            .character()
            .clone();
        let mut teams = self.state.teams.clone();
        let defender = teams
            .remove_at(target)
            .ok_or(InvariantError::NoUnitAt { position: target })?;
        let result = resolve_attack(&attacker, defender.character());
        let mut character = defender.into_character();
        character.take_damage(result.damage);
        if character.is_alive() {
            teams.insert(PositionedCharacter::new(
                character,
                target,
                self.config.board_size,
            )?)?;
        }
        self.state = self.state.with_teams(teams);
        info!(
            from,
            target,
            damage = result.damage,
            killed = result.is_lethal(),
            "攻擊"
        );

        match self.presenter.animate_damage(target, result.damage) {
            Feedback::Done => self.end_of_turn()?,
            Feedback::Pending => self.phase = TurnPhase::AwaitingFeedback,
        }
        Ok(result)
    }

    fn end_of_turn(&mut self) -> Result<()> {
        if self.selected_unit().is_none() {
            self.selected = None;
        }
        self.presenter.redraw(&self.state.teams);

        if self.state.teams.players().is_empty() {
            info!(points = self.state.number_of_points, "玩家全滅");
            self.phase = TurnPhase::PlayerLost;
            self.presenter.show_banner("你輸了！");
            return Ok(());
        }

        if self.state.teams.opponents().is_empty() {
            self.presenter.clear_highlights(HighlightScope::All);
            self.presenter.set_cursor(Cursor::Auto);
            self.state = self.state.with_player_turn(false);
            return self.next_level();
        }

        self.presenter.clear_highlights(HighlightScope::Selection);
        if let Some(index) = self.selected {
            self.presenter.highlight_cell(index, Highlight::Selected);
        }

        if self.state.player_turn {
            self.state = self.state.with_player_turn(false);
            self.run_ai()
        } else {
            self.state = self.state.with_player_turn(true);
            self.phase = self.resting_phase();
            Ok(())
        }
    }

    /// 對手行動一次
    fn run_ai(&mut self) -> Result<()> {
        let action = decide_action(&self.state.teams, self.config.board_size, &mut self.rng)
            .context("對手回合")?;
        match action {
            AiAction::Attack { from, target } => {
                self.apply_attack(from, target)?;
                Ok(())
            }
            AiAction::Move { from, to } => {
                self.apply_move(from, to)?;
                self.end_of_turn()
            }
        }
    }

    fn next_level(&mut self) -> Result<()> {
        let outcome = advance_level(&self.state, &self.config, &mut self.rng)
            .context(format!("第 {} 關結束", self.state.current_level))?;
        self.selected = None;
        match outcome {
            LevelOutcome::Victory(state) => {
                self.state = state;
                self.phase = TurnPhase::PlayerWon;
                self.presenter.redraw(&self.state.teams);
                self.render_score();
                self.presenter.show_banner("你贏了！");
            }
            LevelOutcome::Advanced(state) => {
                self.state = state;
                self.phase = TurnPhase::Idle;
                self.presenter
                    .draw_board(self.config.theme_for(self.state.current_level));
                self.presenter.redraw(&self.state.teams);
                self.render_score();
                self.presenter
                    .show_tooltip(TOOLTIP_TITLE, "下一關", Severity::Info);
            }
        }
        Ok(())
    }

    fn render_score(&mut self) {
        self.state = self.state.with_record(self.state.number_of_points);
        let level = self.state.current_level.min(self.config.max_level);
        self.presenter
            .render_score(level, self.state.number_of_points, self.state.record);
    }
}
