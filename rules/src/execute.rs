//! 走法执行
//!
//! 执行一步走法并报告副作用：吃子、连跳、传送区奖励步。
//! 执行器本身不做回滚，传送区吃子的撤销由调用方用快照完成。

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::board::Board;
use crate::moves::{Move, MoveGenerator};
use crate::piece::Square;

/// 一步走法的执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// 是否为跳吃
    pub capture: bool,
    /// 被吃子所在格
    pub captured: Option<Square>,
    /// 是否可以继续连跳
    pub may_continue: bool,
    /// 连跳时继续选中的格子（即落点）
    pub continuation: Option<Square>,
    /// 是否触发传送区奖励步
    pub bonus_move: bool,
}

impl MoveOutcome {
    /// 本回合是否结束（既不能连跳，也没有奖励步）
    pub fn ends_turn(&self) -> bool {
        !self.may_continue && !self.bonus_move
    }
}

/// 执行走法
///
/// 目标格不在 `legal_moves` 中时不做任何修改并返回 `None`。
/// 落在传送区时给予奖励步；若还要连跳，奖励步推迟到连跳结束的那一步。
pub fn execute(board: &mut Board, from: Square, to: Square, allow_multi_jump: bool) -> Option<MoveOutcome> {
    if !MoveGenerator::legal_moves(board, from, false).contains(&to) {
        trace!("拒绝非法走法 {} -> {}", from, to);
        return None;
    }

    let mv = Move::new(from, to);
    let mut outcome = MoveOutcome::default();

    // 先移除被吃子，再移动
    if let Some(captured) = mv.captured_square() {
        board.remove(captured);
        outcome.capture = true;
        outcome.captured = Some(captured);
    }
    board.move_piece(from, to);

    // 连跳只发生在吃子之后
    if allow_multi_jump && outcome.capture && MoveGenerator::has_capture(board, to) {
        outcome.may_continue = true;
        outcome.continuation = Some(to);
        return Some(outcome);
    }

    outcome.bonus_move = to.is_warp_zone();
    Some(outcome)
}
