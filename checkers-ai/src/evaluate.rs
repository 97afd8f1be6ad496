//! 棋局评估函数

use rules::{Board, Color, Piece, Square};

/// 每个棋子的基础分
pub const PIECE_VALUE: i32 = 1;

/// 王的额外分
pub const KING_BONUS: i32 = 2;

/// 占据传送区的额外分
pub const WARP_ZONE_BONUS: i32 = 1;

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 评估棋局（`side` 视角，正值对 `side` 有利）
    pub fn evaluate(board: &Board, side: Color) -> i32 {
        board
            .all_pieces()
            .into_iter()
            .map(|(sq, piece)| {
                let value = Self::piece_value(sq, piece);
                if piece.color == side {
                    value
                } else {
                    -value
                }
            })
            .sum()
    }

    /// 单个棋子的价值（包括王与传送区加成）
    fn piece_value(sq: Square, piece: Piece) -> i32 {
        let mut value = PIECE_VALUE;
        if piece.king {
            value += KING_BONUS;
        }
        if sq.is_warp_zone() {
            value += WARP_ZONE_BONUS;
        }
        value
    }
}
