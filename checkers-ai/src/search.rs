//! 搜索引擎
//!
//! 实现 Minimax + Alpha-Beta 剪枝，搜索中处理连跳

use rules::{execute, Board, Color, Move, MoveGenerator, MoveOutcome, Square, DEFAULT_SEARCH_DEPTH};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::evaluate::Evaluator;

/// 胜负分（无子可走的一方记为负无穷）
pub const SCORE_INFINITY: i32 = i32::MAX;

/// 搜索中连跳的展开方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainMode {
    /// 每一步只取第一个可吃走法，沿一条路线走到底
    #[default]
    Greedy,
    /// 展开所有连跳路线，连跳结束后轮到对方
    Exhaustive,
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub max_depth: u8,
    pub chain_mode: ChainMode,
    pub pruning: bool,
}

impl AiConfig {
    pub fn with_depth(max_depth: u8) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_SEARCH_DEPTH,
            chain_mode: ChainMode::Greedy,
            pruning: true,
        }
    }
}

/// 搜索结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub best: Option<Move>,
}

/// AI 走棋结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AiMove {
    /// 是否走了棋（false 表示 AI 无子可走，判负）
    pub move_made: bool,
    /// 是否触发奖励步
    pub bonus_move: bool,
    pub mv: Option<Move>,
    pub outcome: Option<MoveOutcome>,
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            nodes_searched: 0,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 搜索 `side` 的最佳走法
    pub fn best_move(&mut self, board: &Board, side: Color, depth: u8, allow_multi_jump: bool) -> SearchResult {
        let moves = MoveGenerator::all_legal_moves(board, side);
        self.search_root(board, moves, side, depth, allow_multi_jump)
    }

    /// 只在 `from` 上的棋子中搜索（用于连跳后续与奖励步）
    pub fn best_move_from(
        &mut self,
        board: &Board,
        side: Color,
        from: Square,
        depth: u8,
        allow_multi_jump: bool,
    ) -> SearchResult {
        let moves = if board.is_player_piece_at(from.row as i32, from.col as i32, side) {
            MoveGenerator::legal_moves(board, from, false)
                .into_iter()
                .map(|to| Move::new(from, to))
                .collect()
        } else {
            Vec::new()
        };
        self.search_root(board, moves, side, depth, allow_multi_jump)
    }

    /// 搜索并在棋盘上执行最佳走法
    pub fn make_ai_move(&mut self, board: &mut Board, side: Color, depth: u8, allow_multi_jump: bool) -> AiMove {
        // 深度至少为 1，保证有走法时一定走棋
        let result = self.best_move(board, side, depth.max(1), allow_multi_jump);
        Self::apply(board, result, allow_multi_jump)
    }

    /// 只用 `from` 上的棋子走棋
    pub fn make_ai_move_from(
        &mut self,
        board: &mut Board,
        side: Color,
        from: Square,
        depth: u8,
        allow_multi_jump: bool,
    ) -> AiMove {
        let result = self.best_move_from(board, side, from, depth.max(1), allow_multi_jump);
        Self::apply(board, result, allow_multi_jump)
    }

    fn apply(board: &mut Board, result: SearchResult, allow_multi_jump: bool) -> AiMove {
        let Some(mv) = result.best else {
            return AiMove::default();
        };
        match execute(board, mv.from, mv.to, allow_multi_jump) {
            Some(outcome) => AiMove {
                move_made: true,
                bonus_move: outcome.bonus_move,
                mv: Some(mv),
                outcome: Some(outcome),
            },
            None => AiMove::default(),
        }
    }

    /// 根节点搜索
    ///
    /// 没有走法时返回负无穷且不给走法；所有走法都必败（评分均为负无穷）时
    /// 仍然返回第一个生成的走法。
    fn search_root(
        &mut self,
        board: &Board,
        moves: Vec<Move>,
        side: Color,
        depth: u8,
        allow_multi_jump: bool,
    ) -> SearchResult {
        self.nodes_searched = 0;

        if depth == 0 {
            return SearchResult {
                score: Evaluator::evaluate(board, side),
                best: None,
            };
        }
        if moves.is_empty() {
            return SearchResult {
                score: -SCORE_INFINITY,
                best: None,
            };
        }

        self.nodes_searched += 1;
        let (score, best) = self.expand(
            board,
            &moves,
            depth,
            true,
            side,
            -SCORE_INFINITY,
            SCORE_INFINITY,
            allow_multi_jump,
        );
        // 所有走法都必败时仍然走第一步
        let best = best.or_else(|| moves.first().copied());

        debug!(
            "AI 搜索完成: 阵营 {}, 深度 {}, 评分 {}, 节点 {}, 走法 {:?}",
            side, depth, score, self.nodes_searched, best
        );

        SearchResult { score, best }
    }

    /// Minimax 搜索，`side` 为最大化方
    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        maximizing: bool,
        side: Color,
        alpha: i32,
        beta: i32,
        allow_multi_jump: bool,
    ) -> (i32, Option<Move>) {
        self.nodes_searched += 1;

        if depth == 0 {
            return (Evaluator::evaluate(board, side), None);
        }

        let to_move = if maximizing { side } else { side.opponent() };
        let moves = MoveGenerator::all_legal_moves(board, to_move);

        // 无子可走即判负
        if moves.is_empty() {
            let score = if maximizing { -SCORE_INFINITY } else { SCORE_INFINITY };
            return (score, None);
        }

        self.expand(board, &moves, depth, maximizing, side, alpha, beta, allow_multi_jump)
    }

    /// 依次展开候选走法，每个分支在棋盘副本上进行
    #[allow(clippy::too_many_arguments)]
    fn expand(
        &mut self,
        board: &Board,
        moves: &[Move],
        depth: u8,
        maximizing: bool,
        side: Color,
        mut alpha: i32,
        mut beta: i32,
        allow_multi_jump: bool,
    ) -> (i32, Option<Move>) {
        let mut best_score = if maximizing { -SCORE_INFINITY } else { SCORE_INFINITY };
        let mut best_move = None;

        for &mv in moves {
            let mut child = *board;
            let Some(outcome) = execute(&mut child, mv.from, mv.to, allow_multi_jump) else {
                continue;
            };

            let score = match outcome.continuation {
                Some(at) if allow_multi_jump => match self.config.chain_mode {
                    ChainMode::Greedy => self.greedy_chain(
                        child,
                        at,
                        depth,
                        maximizing,
                        side,
                        alpha,
                        beta,
                        best_score,
                        allow_multi_jump,
                    ),
                    ChainMode::Exhaustive => self.exhaustive_chain(
                        &child,
                        at,
                        depth,
                        maximizing,
                        side,
                        alpha,
                        beta,
                        allow_multi_jump,
                    ),
                },
                _ => {
                    self.minimax(&child, depth - 1, !maximizing, side, alpha, beta, allow_multi_jump)
                        .0
                }
            };
            trace!("深度 {} 走法 {} 评分 {}", depth, mv, score);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best_score);
            }

            if self.config.pruning && beta <= alpha {
                break; // Alpha-Beta 剪枝
            }
        }

        (best_score, best_move)
    }

    /// 单线连跳：每步取第一个可吃走法，每跳一步都以同一方继续搜索，
    /// 取整条路线上的最好（最大化方）或最坏（最小化方）评分
    #[allow(clippy::too_many_arguments)]
    fn greedy_chain(
        &mut self,
        mut board: Board,
        mut at: Square,
        depth: u8,
        maximizing: bool,
        side: Color,
        alpha: i32,
        beta: i32,
        seed: i32,
        allow_multi_jump: bool,
    ) -> i32 {
        let mut folded = seed;

        loop {
            let Some(&next) = MoveGenerator::legal_moves(&board, at, true).first() else {
                break;
            };
            let Some(outcome) = execute(&mut board, at, next, allow_multi_jump) else {
                break;
            };

            let (score, _) = self.minimax(&board, depth - 1, maximizing, side, alpha, beta, allow_multi_jump);
            folded = if maximizing { folded.max(score) } else { folded.min(score) };

            match outcome.continuation {
                Some(sq) => at = sq,
                None => break,
            }
        }

        folded
    }

    /// 完整连跳：每条连跳路线都作为独立分支，由走子方挑选最好的一条
    #[allow(clippy::too_many_arguments)]
    fn exhaustive_chain(
        &mut self,
        board: &Board,
        at: Square,
        depth: u8,
        maximizing: bool,
        side: Color,
        mut alpha: i32,
        mut beta: i32,
        allow_multi_jump: bool,
    ) -> i32 {
        let mut best_score = if maximizing { -SCORE_INFINITY } else { SCORE_INFINITY };

        for next in MoveGenerator::legal_moves(board, at, true) {
            let mut child = *board;
            let Some(outcome) = execute(&mut child, at, next, allow_multi_jump) else {
                continue;
            };

            let score = match outcome.continuation {
                Some(sq) => self.exhaustive_chain(&child, sq, depth, maximizing, side, alpha, beta, allow_multi_jump),
                None => {
                    self.minimax(&child, depth - 1, !maximizing, side, alpha, beta, allow_multi_jump)
                        .0
                }
            };

            if maximizing {
                best_score = best_score.max(score);
                alpha = alpha.max(best_score);
            } else {
                best_score = best_score.min(score);
                beta = beta.min(best_score);
            }

            if self.config.pruning && beta <= alpha {
                break;
            }
        }

        best_score
    }

    /// 获取上次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

impl Default for AiEngine {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}
