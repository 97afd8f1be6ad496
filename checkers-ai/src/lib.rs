//! 传送区跳棋 AI 引擎
//!
//! 包含:
//! - 棋局评估函数
//! - Minimax + Alpha-Beta 搜索
//! - 搜索中的连跳展开（单线 / 完整）

mod evaluate;
mod search;

pub use evaluate::{Evaluator, KING_BONUS, PIECE_VALUE, WARP_ZONE_BONUS};
pub use search::{AiConfig, AiEngine, AiMove, ChainMode, SearchResult, SCORE_INFINITY};
