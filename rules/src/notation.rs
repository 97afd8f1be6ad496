//! 棋盘记谱格式
//!
//! 十行以 `/` 分隔，从 row 0 开始：
//! `w` 白子，`W` 白王，`b` 黑子，`B` 黑王，数字表示连续空格（1-10）。
//!
//! 初始局面：
//! `1b1b1b1b1b/b1b1b1b1b1/1b1b1b1b1b/b1b1b1b1b1/10/10/1w1w1w1w1w/w1w1w1w1w1/1w1w1w1w1w/w1w1w1w1w1`

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::error::{Result, RulesError};
use crate::piece::{Piece, Square};

/// 初始局面记谱
pub const INITIAL_NOTATION: &str =
    "1b1b1b1b1b/b1b1b1b1b1/1b1b1b1b1b/b1b1b1b1b1/10/10/1w1w1w1w1w/w1w1w1w1w1/1w1w1w1w1w/w1w1w1w1w1";

/// 记谱格式处理
pub struct Notation;

impl Notation {
    /// 解析记谱字符串为棋盘
    pub fn parse_board(text: &str) -> Result<Board> {
        let mut board = Board::empty();
        let rows: Vec<&str> = text.trim().split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(RulesError::InvalidNotation {
                reason: format!("Expected {} rows, got {}", BOARD_SIZE, rows.len()),
            });
        }

        for (row_idx, row) in rows.iter().enumerate() {
            let mut col = 0usize;
            let mut chars = row.chars().peekable();

            while let Some(c) = chars.next() {
                if let Some(digit) = c.to_digit(10) {
                    // 允许两位数（整行为空时写作 10）
                    let mut run = digit as usize;
                    while let Some(next) = chars.peek().and_then(|n| n.to_digit(10)) {
                        run = run * 10 + next as usize;
                        chars.next();
                    }
                    if run == 0 {
                        return Err(RulesError::InvalidNotation {
                            reason: format!("Row {} has an empty run of 0", row_idx),
                        });
                    }
                    col += run;
                } else if let Some(piece) = Piece::from_char(c) {
                    if col >= BOARD_SIZE {
                        return Err(RulesError::InvalidNotation {
                            reason: format!("Row {} has too many columns", row_idx),
                        });
                    }
                    board.set(Square::new_unchecked(row_idx as u8, col as u8), Some(piece));
                    col += 1;
                } else {
                    return Err(RulesError::InvalidNotation {
                        reason: format!("Invalid piece character: {}", c),
                    });
                }
            }

            if col != BOARD_SIZE {
                return Err(RulesError::InvalidNotation {
                    reason: format!("Row {} has {} columns, expected {}", row_idx, col, BOARD_SIZE),
                });
            }
        }

        Ok(board)
    }

    /// 将棋盘转换为记谱字符串
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for row in 0..BOARD_SIZE {
            let mut text = String::new();
            let mut empty_count = 0;

            for col in 0..BOARD_SIZE {
                if let Some(piece) = board.get(row as i32, col as i32) {
                    if empty_count > 0 {
                        text.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    text.push(piece.to_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                text.push_str(&empty_count.to_string());
            }

            rows.push(text);
        }

        rows.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    #[test]
    fn test_parse_initial() {
        let board = Notation::parse_board(INITIAL_NOTATION).unwrap();
        assert_eq!(board, Board::initial());
    }

    #[test]
    fn test_initial_to_string() {
        assert_eq!(Notation::board_to_string(&Board::initial()), INITIAL_NOTATION);
    }

    #[test]
    fn test_parse_kings() {
        let board = Notation::parse_board("10/10/10/10/10/5b4/6W3/10/10/10").unwrap();
        assert_eq!(board.get(5, 5), Some(Piece::man(Color::Black)));
        assert_eq!(board.get(6, 6), Some(Piece::king(Color::White)));
        assert_eq!(board.count(Color::White), 1);
        assert_eq!(board.count(Color::Black), 1);
    }

    #[test]
    fn test_invalid_notation() {
        // 行数不对
        assert!(Notation::parse_board("10/10/10").is_err());

        // 列数不对
        assert!(Notation::parse_board("9/10/10/10/10/10/10/10/10/10").is_err());
        assert!(Notation::parse_board("1b9/10/10/10/10/10/10/10/10/10").is_err());

        // 无效字符
        assert!(Notation::parse_board("1x8/10/10/10/10/10/10/10/10/10").is_err());

        // 空格数为 0
        assert!(Notation::parse_board("0b9/10/10/10/10/10/10/10/10/10").is_err());
    }
}
