//! 棋盘状态

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{BOARD_SIZE, SQUARE_COUNT, STARTING_ROWS};
use crate::notation::Notation;
use crate::piece::{Color, Piece, Square};

/// 棋盘
///
/// 10x10 定长数组，索引为 row * 10 + col。棋盘是棋子的唯一所有者，
/// 整体按值复制，供搜索分支使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; SQUARE_COUNT],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: [None; SQUARE_COUNT],
        }
    }

    /// 创建初始棋盘：0-3 行黑方，6-9 行白方，均在深色格
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for row in 0..BOARD_SIZE {
            let color = if row < STARTING_ROWS {
                Color::Black
            } else if row >= BOARD_SIZE - STARTING_ROWS {
                Color::White
            } else {
                continue;
            };
            for col in 0..BOARD_SIZE {
                let sq = Square::new_unchecked(row as u8, col as u8);
                if sq.is_playable() {
                    board.set(sq, Some(Piece::man(color)));
                }
            }
        }

        board
    }

    /// 获取指定坐标的棋子，越界坐标视为空
    pub fn get(&self, row: i32, col: i32) -> Option<Piece> {
        Square::new(row, col).and_then(|sq| self.get_square(sq))
    }

    /// 获取指定格子的棋子
    pub fn get_square(&self, sq: Square) -> Option<Piece> {
        self.squares.get(sq.to_index()).copied().flatten()
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if let Some(slot) = self.squares.get_mut(sq.to_index()) {
            *slot = piece;
        }
    }

    /// 清空格子（吃子）
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.get_square(sq);
        self.set(sq, None);
        piece
    }

    /// 移动棋子（不检查规则），到达底线时升王
    pub fn move_piece(&mut self, from: Square, to: Square) {
        let Some(mut piece) = self.remove(from) else {
            return;
        };
        if to.row == piece.color.promotion_row() {
            piece.promote();
        }
        self.set(to, Some(piece));
    }

    /// 指定坐标是否为该方棋子
    pub fn is_player_piece_at(&self, row: i32, col: i32, color: Color) -> bool {
        self.get(row, col).is_some_and(|piece| piece.color == color)
    }

    /// 获取指定阵营的所有棋子位置（按行优先顺序）
    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let piece = (*slot)?;
                Square::from_index(index).map(|sq| (sq, piece))
            })
            .collect()
    }

    /// 指定阵营的棋子数
    pub fn count(&self, color: Color) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|piece| piece.color == color)
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{:>2} ", row)?;
            for col in 0..BOARD_SIZE {
                let sq = Square::new_unchecked(row as u8, col as u8);
                let c = match self.get_square(sq) {
                    Some(piece) => piece.to_char(),
                    None if sq.is_warp_zone() => '*',
                    None if sq.is_playable() => '.',
                    None => ' ',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// 棋盘以记谱字符串形式序列化
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Notation::board_to_string(self))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Notation::parse_board(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PIECES_PER_SIDE;

    #[test]
    fn test_initial_board() {
        let board = Board::initial();

        assert_eq!(board.count(Color::White), PIECES_PER_SIDE);
        assert_eq!(board.count(Color::Black), PIECES_PER_SIDE);

        assert_eq!(board.get(0, 1), Some(Piece::man(Color::Black)));
        assert_eq!(board.get(0, 0), None);
        assert_eq!(board.get(9, 0), Some(Piece::man(Color::White)));

        // 中间两行为空
        for col in 0..10 {
            assert!(board.get(4, col).is_none());
            assert!(board.get(5, col).is_none());
        }
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let board = Board::initial();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(10, 3), None);
        assert_eq!(board.get(3, 10), None);
        assert!(!board.is_player_piece_at(-1, -1, Color::Black));
    }

    #[test]
    fn test_move_piece() {
        let mut board = Board::initial();
        let from = Square::new_unchecked(6, 1);
        let to = Square::new_unchecked(5, 0);

        board.move_piece(from, to);

        assert!(board.get_square(from).is_none());
        assert_eq!(board.get_square(to), Some(Piece::man(Color::White)));
    }

    #[test]
    fn test_promotion_on_far_row() {
        let mut board = Board::empty();
        board.set(Square::new_unchecked(1, 2), Some(Piece::man(Color::White)));
        board.set(Square::new_unchecked(8, 1), Some(Piece::man(Color::Black)));

        board.move_piece(Square::new_unchecked(1, 2), Square::new_unchecked(0, 1));
        board.move_piece(Square::new_unchecked(8, 1), Square::new_unchecked(9, 2));

        assert_eq!(board.get(0, 1), Some(Piece::king(Color::White)));
        assert_eq!(board.get(9, 2), Some(Piece::king(Color::Black)));

        // 王离开底线后仍是王
        board.move_piece(Square::new_unchecked(0, 1), Square::new_unchecked(1, 0));
        assert_eq!(board.get(1, 0), Some(Piece::king(Color::White)));
    }

    #[test]
    fn test_no_promotion_on_own_back_row() {
        let mut board = Board::empty();
        board.set(Square::new_unchecked(1, 0), Some(Piece::king(Color::Black)));
        board.move_piece(Square::new_unchecked(1, 0), Square::new_unchecked(0, 1));
        assert_eq!(board.get(0, 1), Some(Piece::king(Color::Black)));

        board.set(Square::new_unchecked(8, 1), Some(Piece::man(Color::White)));
        board.move_piece(Square::new_unchecked(8, 1), Square::new_unchecked(9, 0));
        assert_eq!(board.get(9, 0), Some(Piece::man(Color::White)));
    }

    #[test]
    fn test_remove() {
        let mut board = Board::initial();
        let removed = board.remove(Square::new_unchecked(3, 0));
        assert_eq!(removed, Some(Piece::man(Color::Black)));
        assert_eq!(board.count(Color::Black), PIECES_PER_SIDE - 1);
    }

    #[test]
    fn test_copy_is_independent() {
        let board = Board::initial();
        let mut copy = board;
        copy.remove(Square::new_unchecked(0, 1));
        assert!(board.get(0, 1).is_some());
        assert!(copy.get(0, 1).is_none());
    }

    #[test]
    fn test_pieces_order() {
        let board = Board::initial();
        let black = board.pieces(Color::Black);
        assert_eq!(black.len(), PIECES_PER_SIDE);
        assert_eq!(black[0].0, Square::new_unchecked(0, 1));
        assert!(black.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_serde_roundtrip() {
        let board = Board::initial();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }
}
