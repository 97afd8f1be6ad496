//! 对局控制
//!
//! `GameSession` 持有一局游戏的全部状态：棋盘、走子方、选中的棋子、
//! 奖励步与连跳、无吃子计数、回合计时与结果。人类执白先行，AI 执黑。

use checkers_ai::AiEngine;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rules::{execute, Board, Color, Move, MoveGenerator, MoveOutcome, Square};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::GameSettings;
use crate::timer::TurnClock;

/// 人类玩家执白
pub const HUMAN: Color = Color::White;

/// AI 执黑
pub const AI: Color = Color::Black;

fn side_name(color: Color) -> &'static str {
    if color == HUMAN {
        "玩家"
    } else {
        "AI"
    }
}

fn side_index(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

/// 获胜原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    /// 对方棋子全部被吃
    NoPieces,
    /// 对方无子可走
    NoMoves,
}

impl std::fmt::Display for WinReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinReason::NoPieces => f.write_str("对方棋子全部被吃"),
            WinReason::NoMoves => f.write_str("对方无子可走"),
        }
    }
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Win { winner: Color, reason: WinReason },
    Draw,
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameOutcome::Win { winner, .. } => Some(*winner),
            GameOutcome::Draw => None,
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::Win { winner, reason } => {
                write!(f, "{}获胜（{}）", side_name(*winner), reason)
            }
            GameOutcome::Draw => f.write_str("和棋"),
        }
    }
}

/// 回合内的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    /// 等待选子
    #[default]
    AwaitingSelection,
    /// 已选中棋子
    PieceSelected(Square),
    /// 连跳中，只能继续用该棋子吃子
    Continuation(Square),
    /// 奖励步，只能再走该棋子
    Bonus(Square),
}

impl TurnPhase {
    /// 当前选中的格子
    pub fn selected(&self) -> Option<Square> {
        match self {
            TurnPhase::AwaitingSelection => None,
            TurnPhase::PieceSelected(sq) | TurnPhase::Continuation(sq) | TurnPhase::Bonus(sq) => {
                Some(*sq)
            }
        }
    }

    /// 被锁定的棋子（连跳或奖励步）
    pub fn locked(&self) -> Option<Square> {
        match self {
            TurnPhase::Continuation(sq) | TurnPhase::Bonus(sq) => Some(*sq),
            _ => None,
        }
    }
}

/// 对局事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    /// 目标格不合法
    Illegal,
    /// 吃了传送区内的棋子，已撤销
    CapturePrevented(Square),
    /// 可以继续连跳
    ContinueJump(Square),
    /// 落入传送区，获得奖励步
    BonusMove(Square),
    /// 回合结束
    TurnEnded { next: Color },
    /// 对局结束
    GameOver(GameOutcome),
    /// 本回合连跳激活
    MultiJumpActivated(Color),
    /// 超时换边
    TimedOut(Color),
    /// 无吃子步数达到阈值
    DrawOffered,
    /// AI 走了一步
    AiMoved(Move),
}

impl std::fmt::Display for TurnEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnEvent::Illegal => f.write_str("非法走法"),
            TurnEvent::CapturePrevented(sq) => write!(f, "传送区：{} 的吃子被阻止", sq),
            TurnEvent::ContinueJump(sq) => write!(f, "可以从 {} 继续连跳", sq),
            TurnEvent::BonusMove(sq) => write!(f, "传送区：{} 获得奖励步", sq),
            TurnEvent::TurnEnded { next } => write!(f, "轮到{}", side_name(*next)),
            TurnEvent::GameOver(outcome) => write!(f, "对局结束：{}", outcome),
            TurnEvent::MultiJumpActivated(color) => write!(f, "{}连跳已激活", side_name(*color)),
            TurnEvent::TimedOut(color) => write!(f, "{}超时，换边", side_name(*color)),
            TurnEvent::DrawOffered => f.write_str("对局趋于和棋，输入 draw 接受和棋"),
            TurnEvent::AiMoved(mv) => write!(f, "AI 走棋 {}", mv),
        }
    }
}

/// 对局操作错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Game is over")]
    GameOver,

    #[error("Not your turn, {0} to move")]
    NotYourTurn(Color),

    #[error("No own piece at {0}")]
    NotYourPiece(Square),

    #[error("Piece at {0} must move")]
    PieceLocked(Square),

    #[error("No piece selected")]
    NothingSelected,

    #[error("No draw offered")]
    NoDrawOffered,
}

/// 一局游戏
pub struct GameSession {
    board: Board,
    current_turn: Color,
    phase: TurnPhase,
    /// 本回合是否已用过奖励步
    bonus_used: bool,
    moves_without_capture: u32,
    draw_offered: bool,
    multi_jump_active: bool,
    /// 每方每局只能激活一次连跳
    multi_jump_used: [bool; 2],
    outcome: Option<GameOutcome>,
    message: String,
    clock: TurnClock,
    settings: GameSettings,
    rng: ChaCha8Rng,
}

impl GameSession {
    /// 创建新对局（初始局面，白方先行）
    pub fn new(settings: GameSettings, rng: ChaCha8Rng) -> Self {
        Self::with_board(settings, rng, Board::initial(), HUMAN)
    }

    /// 从指定局面开始
    pub fn with_board(settings: GameSettings, rng: ChaCha8Rng, board: Board, turn: Color) -> Self {
        let mut session = Self {
            board,
            current_turn: turn,
            phase: TurnPhase::AwaitingSelection,
            bonus_used: false,
            moves_without_capture: 0,
            draw_offered: false,
            multi_jump_active: false,
            multi_jump_used: [false; 2],
            outcome: None,
            message: String::new(),
            clock: TurnClock::new(settings.turn_duration_ms),
            settings,
            rng,
        };
        session.begin_turn();
        session
    }

    /// 重新开始
    pub fn reset(&mut self) {
        self.board = Board::initial();
        self.current_turn = HUMAN;
        self.phase = TurnPhase::AwaitingSelection;
        self.bonus_used = false;
        self.moves_without_capture = 0;
        self.draw_offered = false;
        self.multi_jump_active = false;
        self.multi_jump_used = [false; 2];
        self.outcome = None;
        self.message.clear();
        self.clock.restart();
        info!("新对局开始");
        self.begin_turn();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn moves_without_capture(&self) -> u32 {
        self.moves_without_capture
    }

    pub fn draw_offered(&self) -> bool {
        self.draw_offered
    }

    pub fn multi_jump_active(&self) -> bool {
        self.multi_jump_active
    }

    pub fn multi_jump_used(&self, color: Color) -> bool {
        self.multi_jump_used[side_index(color)]
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// 最近一条提示
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// 选中棋子的合法目标格
    pub fn legal_targets(&self) -> Vec<Square> {
        self.phase
            .selected()
            .map(|sq| MoveGenerator::legal_moves(&self.board, sq, false))
            .unwrap_or_default()
    }

    /// 回合开始时按概率激活连跳（每方每局最多一次）
    pub fn begin_turn(&mut self) -> Option<TurnEvent> {
        if self.outcome.is_some() {
            return None;
        }
        let side = self.current_turn;
        if self.multi_jump_used[side_index(side)] {
            return None;
        }

        let chance = self.settings.multi_jump_chance;
        let chance = if (0.0..=1.0).contains(&chance) { chance } else { 0.0 };
        if !self.rng.gen_bool(chance) {
            return None;
        }

        self.multi_jump_active = true;
        self.multi_jump_used[side_index(side)] = true;
        let event = TurnEvent::MultiJumpActivated(side);
        info!("{} 本回合连跳激活", side);
        self.message = event.to_string();
        Some(event)
    }

    /// 人类选子
    pub fn select(&mut self, sq: Square) -> Result<(), GameError> {
        self.ensure_turn(HUMAN)?;

        if let Some(locked) = self.phase.locked() {
            return if sq == locked {
                Ok(())
            } else {
                Err(GameError::PieceLocked(locked))
            };
        }

        if !self.board.is_player_piece_at(sq.row as i32, sq.col as i32, HUMAN) {
            return Err(GameError::NotYourPiece(sq));
        }
        self.phase = TurnPhase::PieceSelected(sq);
        Ok(())
    }

    /// 人类把选中的棋子走到 `to`
    pub fn move_selected(&mut self, to: Square) -> Result<Vec<TurnEvent>, GameError> {
        self.ensure_turn(HUMAN)?;
        let from = self.phase.selected().ok_or(GameError::NothingSelected)?;
        let mut events = Vec::new();

        if !MoveGenerator::is_legal_move(&self.board, from, to, HUMAN) {
            if self.phase.locked().is_none() {
                self.phase = TurnPhase::AwaitingSelection;
            }
            self.emit(&mut events, TurnEvent::Illegal);
            return Ok(events);
        }

        let snapshot = self.board;
        let Some(outcome) = execute(&mut self.board, from, to, self.multi_jump_active) else {
            self.emit(&mut events, TurnEvent::Illegal);
            return Ok(events);
        };
        debug!("玩家走棋 {} -> {}: {:?}", from, to, outcome);

        if !self.settle(snapshot, &outcome, &mut events) || self.check_pieces(&mut events) {
            return Ok(events);
        }

        if let Some(at) = outcome.continuation {
            self.phase = TurnPhase::Continuation(at);
            self.emit(&mut events, TurnEvent::ContinueJump(at));
            return Ok(events);
        }

        if outcome.bonus_move && !self.bonus_used {
            self.bonus_used = true;
            self.phase = TurnPhase::Bonus(to);
            self.clock.restart();
            self.emit(&mut events, TurnEvent::BonusMove(to));
            return Ok(events);
        }

        self.end_turn(&mut events);
        Ok(events)
    }

    /// AI 走完整个回合：首步、连跳后续、一次奖励步
    pub fn play_ai_turn(&mut self, engine: &mut AiEngine) -> Vec<TurnEvent> {
        let mut events = Vec::new();
        if self.ensure_turn(AI).is_err() {
            return events;
        }

        let depth = engine.config().max_depth;
        let allow_multi_jump = self.multi_jump_active;

        let snapshot = self.board;
        let first = engine.make_ai_move(&mut self.board, AI, depth, allow_multi_jump);
        let (Some(mut mv), Some(mut outcome)) = (first.mv, first.outcome) else {
            self.finish(
                GameOutcome::Win {
                    winner: HUMAN,
                    reason: WinReason::NoMoves,
                },
                &mut events,
            );
            return events;
        };
        self.emit(&mut events, TurnEvent::AiMoved(mv));

        if self.settle(snapshot, &outcome, &mut events) {
            if self.check_pieces(&mut events) {
                return events;
            }

            // 连跳只能继续用同一个棋子
            while let Some(at) = outcome.continuation {
                self.emit(&mut events, TurnEvent::ContinueJump(at));
                let snapshot = self.board;
                let leg = engine.make_ai_move_from(&mut self.board, AI, at, depth, allow_multi_jump);
                let (Some(leg_mv), Some(leg_outcome)) = (leg.mv, leg.outcome) else {
                    break;
                };
                self.emit(&mut events, TurnEvent::AiMoved(leg_mv));
                if !self.settle(snapshot, &leg_outcome, &mut events) {
                    break;
                }
                if self.check_pieces(&mut events) {
                    return events;
                }
                mv = leg_mv;
                outcome = leg_outcome;
            }

            // 奖励步不再连跳
            if outcome.bonus_move {
                self.emit(&mut events, TurnEvent::BonusMove(mv.to));
                let snapshot = self.board;
                let bonus = engine.make_ai_move_from(&mut self.board, AI, mv.to, depth, false);
                if let (Some(bonus_mv), Some(bonus_outcome)) = (bonus.mv, bonus.outcome) {
                    self.emit(&mut events, TurnEvent::AiMoved(bonus_mv));
                    if self.settle(snapshot, &bonus_outcome, &mut events)
                        && self.check_pieces(&mut events)
                    {
                        return events;
                    }
                }
            }
        }

        self.end_turn(&mut events);
        events
    }

    /// 当前方超时：直接换边
    pub fn expire_turn(&mut self) -> Vec<TurnEvent> {
        let mut events = Vec::new();
        if self.outcome.is_some() {
            return events;
        }
        let side = self.current_turn;
        warn!("{} 超时", side);
        self.emit(&mut events, TurnEvent::TimedOut(side));
        self.end_turn(&mut events);
        events
    }

    /// 检查回合计时
    pub fn check_clock(&mut self) -> Vec<TurnEvent> {
        if self.outcome.is_none() && self.clock.is_expired() {
            self.expire_turn()
        } else {
            Vec::new()
        }
    }

    /// 接受和棋
    pub fn accept_draw(&mut self) -> Result<TurnEvent, GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        if !self.draw_offered {
            return Err(GameError::NoDrawOffered);
        }
        let mut events = Vec::new();
        self.finish(GameOutcome::Draw, &mut events);
        Ok(TurnEvent::GameOver(GameOutcome::Draw))
    }

    fn ensure_turn(&self, side: Color) -> Result<(), GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        if self.current_turn != side {
            return Err(GameError::NotYourTurn(self.current_turn));
        }
        Ok(())
    }

    fn emit(&mut self, events: &mut Vec<TurnEvent>, event: TurnEvent) {
        debug!("对局事件: {:?}", event);
        self.message = event.to_string();
        events.push(event);
    }

    /// 结算一步：吃了传送区内的棋子则恢复快照并返回 false，否则更新无吃子计数
    fn settle(&mut self, snapshot: Board, outcome: &MoveOutcome, events: &mut Vec<TurnEvent>) -> bool {
        if let Some(captured) = outcome.captured.filter(|sq| sq.is_warp_zone()) {
            self.board = snapshot;
            warn!("传送区吃子被撤销: {}", captured);
            self.emit(events, TurnEvent::CapturePrevented(captured));
            return false;
        }

        if outcome.capture {
            self.moves_without_capture = 0;
        } else {
            self.moves_without_capture += 1;
        }

        let offered = self.moves_without_capture >= self.settings.draw_threshold;
        let newly_offered = offered && !self.draw_offered;
        self.draw_offered = offered;
        if newly_offered {
            info!("连续 {} 步无吃子，提示和棋", self.moves_without_capture);
            self.emit(events, TurnEvent::DrawOffered);
        }
        true
    }

    /// 一方棋子被吃光则对局结束
    fn check_pieces(&mut self, events: &mut Vec<TurnEvent>) -> bool {
        let Some(loser) = [HUMAN, AI].into_iter().find(|&color| self.board.count(color) == 0) else {
            return false;
        };
        self.finish(
            GameOutcome::Win {
                winner: loser.opponent(),
                reason: WinReason::NoPieces,
            },
            events,
        );
        true
    }

    fn finish(&mut self, outcome: GameOutcome, events: &mut Vec<TurnEvent>) {
        self.outcome = Some(outcome);
        self.phase = TurnPhase::AwaitingSelection;
        self.multi_jump_active = false;
        info!("对局结束: {}", outcome);
        self.emit(events, TurnEvent::GameOver(outcome));
    }

    /// 换边，清除选中、奖励步与连跳状态
    fn end_turn(&mut self, events: &mut Vec<TurnEvent>) {
        let next = self.current_turn.opponent();
        self.current_turn = next;
        self.phase = TurnPhase::AwaitingSelection;
        self.bonus_used = false;
        self.multi_jump_active = false;
        self.clock.restart();
        self.emit(events, TurnEvent::TurnEnded { next });

        if next == HUMAN && MoveGenerator::has_no_moves(&self.board, HUMAN) {
            self.finish(
                GameOutcome::Win {
                    winner: AI,
                    reason: WinReason::NoMoves,
                },
                events,
            );
            return;
        }

        if let Some(event) = self.begin_turn() {
            events.push(event);
        }
    }
}
