//! 走法生成和验证

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{Color, Square};

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始格
    pub from: Square,
    /// 目标格
    pub to: Square,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// 是否为跳吃（行列各跨两格）
    pub fn is_capture(&self) -> bool {
        self.from.row.abs_diff(self.to.row) == 2 && self.from.col.abs_diff(self.to.col) == 2
    }

    /// 被跳过的格子
    pub fn captured_square(&self) -> Option<Square> {
        self.is_capture().then(|| self.from.midpoint(self.to))
    }

    /// 被吃子是否位于传送区（此时应整步撤销）
    pub fn captures_in_warp_zone(&self) -> bool {
        self.captured_square().is_some_and(|sq| sq.is_warp_zone())
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arrow = if self.is_capture() { "x" } else { "->" };
        write!(f, "{} {} {}", self.from, arrow, self.to)
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定格子上棋子的所有合法目标格
    ///
    /// 有吃子时只返回吃子走法（强制吃子只针对单个棋子）。
    /// 传送区内的棋子不能被吃。
    pub fn legal_moves(board: &Board, from: Square, only_captures: bool) -> Vec<Square> {
        let Some(piece) = board.get_square(from) else {
            return Vec::new();
        };

        let mut steps = Vec::new();
        let mut captures = Vec::new();

        if !only_captures {
            for &(drow, dcol) in piece.directions() {
                if let Some(to) = from.offset(drow, dcol) {
                    if board.get_square(to).is_none() {
                        steps.push(to);
                    }
                }
            }
        }

        for &(drow, dcol) in piece.directions() {
            let (Some(over), Some(to)) = (from.offset(drow, dcol), from.offset(2 * drow, 2 * dcol))
            else {
                continue;
            };
            let Some(victim) = board.get_square(over) else {
                continue;
            };
            if victim.color != piece.color
                && board.get_square(to).is_none()
                && !over.is_warp_zone()
            {
                captures.push(to);
            }
        }

        if captures.is_empty() {
            steps
        } else {
            captures
        }
    }

    /// 指定格子上的棋子是否有吃子走法
    pub fn has_capture(board: &Board, from: Square) -> bool {
        !Self::legal_moves(board, from, true).is_empty()
    }

    /// 生成指定阵营的所有走法（按行优先遍历棋子）
    pub fn all_legal_moves(board: &Board, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);

        for (from, _) in board.pieces(color) {
            for to in Self::legal_moves(board, from, false) {
                moves.push(Move::new(from, to));
            }
        }

        moves
    }

    /// 校验人类玩家提出的走法
    pub fn is_legal_move(board: &Board, from: Square, to: Square, color_to_move: Color) -> bool {
        match board.get_square(from) {
            Some(piece) if piece.color == color_to_move => {
                Self::legal_moves(board, from, false).contains(&to)
            }
            _ => false,
        }
    }

    /// 指定阵营是否无子可走
    pub fn has_no_moves(board: &Board, color: Color) -> bool {
        board
            .pieces(color)
            .into_iter()
            .all(|(from, _)| Self::legal_moves(board, from, false).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::Notation;
    use crate::piece::Piece;

    fn sq(row: u8, col: u8) -> Square {
        Square::new_unchecked(row, col)
    }

    fn board_with(pieces: &[(u8, u8, Piece)]) -> Board {
        let mut board = Board::empty();
        for &(row, col, piece) in pieces {
            board.set(sq(row, col), Some(piece));
        }
        board
    }

    #[test]
    fn test_initial_moves() {
        let board = Board::initial();

        // 白方前排 5 个棋子可走，两侧边缘各少一个方向
        let white = MoveGenerator::all_legal_moves(&board, Color::White);
        assert_eq!(white.len(), 9);
        assert!(white.iter().all(|mv| mv.from.row == 6 && mv.to.row == 5));

        let black = MoveGenerator::all_legal_moves(&board, Color::Black);
        assert_eq!(black.len(), 9);
        assert!(black.iter().all(|mv| mv.from.row == 3 && mv.to.row == 4));
    }

    #[test]
    fn test_empty_square_has_no_moves() {
        let board = Board::initial();
        assert!(MoveGenerator::legal_moves(&board, sq(4, 5), false).is_empty());
    }

    #[test]
    fn test_direction_order() {
        let board = board_with(&[(5, 2, Piece::man(Color::White))]);
        assert_eq!(
            MoveGenerator::legal_moves(&board, sq(5, 2), false),
            vec![sq(4, 1), sq(4, 3)]
        );

        let board = board_with(&[(5, 2, Piece::king(Color::Black))]);
        assert_eq!(
            MoveGenerator::legal_moves(&board, sq(5, 2), false),
            vec![sq(4, 1), sq(4, 3), sq(6, 1), sq(6, 3)]
        );
    }

    #[test]
    fn test_men_never_move_backward() {
        // 白子背后有可吃的黑子，也不能向后吃
        let board = board_with(&[
            (5, 2, Piece::man(Color::White)),
            (6, 3, Piece::man(Color::Black)),
            (6, 1, Piece::man(Color::Black)),
        ]);
        let moves = MoveGenerator::legal_moves(&board, sq(5, 2), false);
        assert!(moves.iter().all(|to| to.row < 5), "{:?}", moves);

        let board = board_with(&[
            (4, 3, Piece::man(Color::Black)),
            (3, 2, Piece::man(Color::White)),
            (3, 4, Piece::man(Color::White)),
        ]);
        let moves = MoveGenerator::legal_moves(&board, sq(4, 3), false);
        assert!(moves.iter().all(|to| to.row > 4), "{:?}", moves);
    }

    #[test]
    fn test_forced_capture_per_piece() {
        let board = board_with(&[
            (6, 3, Piece::man(Color::White)),
            (5, 2, Piece::man(Color::Black)),
        ]);
        assert_eq!(
            MoveGenerator::legal_moves(&board, sq(6, 3), false),
            vec![sq(4, 1)]
        );
    }

    #[test]
    fn test_no_side_wide_forced_capture() {
        // (6,3) 可吃，(8,7) 只能普通走，两者都出现在全方走法中
        let board = board_with(&[
            (6, 3, Piece::man(Color::White)),
            (5, 2, Piece::man(Color::Black)),
            (8, 7, Piece::man(Color::White)),
        ]);
        let moves = MoveGenerator::all_legal_moves(&board, Color::White);
        assert!(moves.contains(&Move::new(sq(6, 3), sq(4, 1))));
        assert!(!moves.contains(&Move::new(sq(6, 3), sq(5, 4))));
        assert!(moves.contains(&Move::new(sq(8, 7), sq(7, 6))));
        assert!(moves.contains(&Move::new(sq(8, 7), sq(7, 8))));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_only_captures() {
        let board = board_with(&[(6, 3, Piece::man(Color::White))]);
        assert!(MoveGenerator::legal_moves(&board, sq(6, 3), true).is_empty());
        assert!(!MoveGenerator::has_capture(&board, sq(6, 3)));
    }

    #[test]
    fn test_capture_blocked_by_occupied_landing() {
        let board = board_with(&[
            (6, 3, Piece::man(Color::White)),
            (5, 2, Piece::man(Color::Black)),
            (4, 1, Piece::man(Color::Black)),
        ]);
        assert_eq!(
            MoveGenerator::legal_moves(&board, sq(6, 3), false),
            vec![sq(5, 4)]
        );
    }

    #[test]
    fn test_cannot_capture_own_piece() {
        let board = board_with(&[
            (6, 3, Piece::man(Color::White)),
            (5, 2, Piece::man(Color::White)),
        ]);
        assert_eq!(
            MoveGenerator::legal_moves(&board, sq(6, 3), false),
            vec![sq(5, 4)]
        );
    }

    #[test]
    fn test_warp_zone_piece_cannot_be_captured() {
        // (5,4) 在传送区内，(6,3) 的白子几何上可以跳到 (4,5)
        let board = board_with(&[
            (6, 3, Piece::man(Color::White)),
            (5, 4, Piece::man(Color::Black)),
        ]);
        let moves = MoveGenerator::legal_moves(&board, sq(6, 3), false);
        assert!(!moves.contains(&sq(4, 5)));
        assert_eq!(moves, vec![sq(5, 2)]);
    }

    #[test]
    fn test_king_next_to_warp_zone_piece() {
        // 白王 (6,6)，黑子 (5,5) 在传送区
        let board = Notation::parse_board("10/10/10/10/10/5b4/6W3/10/10/10").unwrap();
        let moves = MoveGenerator::legal_moves(&board, sq(6, 6), false);

        // 朝 (4,4) 方向既不能跳吃也不能走
        assert!(!moves.contains(&sq(4, 4)));
        assert!(!moves.contains(&sq(5, 5)));
        // 其余三个方向各一步
        assert_eq!(moves, vec![sq(5, 7), sq(7, 5), sq(7, 7)]);
    }

    #[test]
    fn test_simple_capture_scenario() {
        let board = board_with(&[
            (1, 0, Piece::man(Color::Black)),
            (2, 1, Piece::man(Color::White)),
        ]);
        // 黑子向下跳过白子
        assert_eq!(
            MoveGenerator::legal_moves(&board, sq(1, 0), false),
            vec![sq(3, 2)]
        );
    }

    #[test]
    fn test_white_capture_at_top_edge() {
        // 白子 (1,0) 前方黑子 (2,1) 在身后，普通白子不能吃
        let board = board_with(&[
            (1, 0, Piece::man(Color::White)),
            (2, 1, Piece::man(Color::Black)),
        ]);
        assert_eq!(
            MoveGenerator::legal_moves(&board, sq(1, 0), false),
            vec![sq(0, 1)]
        );

        // 升王后即可向后跳吃
        let board = board_with(&[
            (1, 0, Piece::king(Color::White)),
            (2, 1, Piece::man(Color::Black)),
        ]);
        assert_eq!(
            MoveGenerator::legal_moves(&board, sq(1, 0), false),
            vec![sq(3, 2)]
        );
    }

    #[test]
    fn test_is_legal_move_checks_color() {
        let board = Board::initial();
        assert!(MoveGenerator::is_legal_move(&board, sq(6, 1), sq(5, 0), Color::White));
        assert!(!MoveGenerator::is_legal_move(&board, sq(6, 1), sq(5, 0), Color::Black));
        assert!(!MoveGenerator::is_legal_move(&board, sq(6, 1), sq(4, 1), Color::White));
        assert!(!MoveGenerator::is_legal_move(&board, sq(5, 0), sq(4, 1), Color::White));
    }

    #[test]
    fn test_has_no_moves() {
        let board = board_with(&[
            (0, 1, Piece::man(Color::White)),
            (9, 0, Piece::man(Color::Black)),
        ]);
        assert!(MoveGenerator::has_no_moves(&board, Color::White));
        assert!(MoveGenerator::has_no_moves(&board, Color::Black));
        assert!(!MoveGenerator::has_no_moves(&Board::initial(), Color::White));
    }

    #[test]
    fn test_move_capture_helpers() {
        let jump = Move::new(sq(6, 3), sq(4, 5));
        assert!(jump.is_capture());
        assert_eq!(jump.captured_square(), Some(sq(5, 4)));
        assert!(jump.captures_in_warp_zone());

        let step = Move::new(sq(6, 3), sq(5, 4));
        assert!(!step.is_capture());
        assert_eq!(step.captured_square(), None);
        assert!(!step.captures_in_warp_zone());
    }
}
