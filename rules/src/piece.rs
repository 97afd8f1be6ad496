//! 棋子与格子定义

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, WARP_ZONE};
use crate::error::RulesError;

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// 白方（先手，在下方，向 row 0 前进）
    White,
    /// 黑方（AI，在上方，向 row 9 前进）
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 前进方向的行增量
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// 升王行
    pub fn promotion_row(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => (BOARD_SIZE - 1) as u8,
        }
    }

    /// 小写名称
    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 棋子
///
/// 棋子不记录自己的位置：位置就是它在棋盘上所占的格子。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub king: bool,
}

impl Piece {
    /// 创建普通棋子
    pub fn man(color: Color) -> Self {
        Self { color, king: false }
    }

    /// 创建王
    pub fn king(color: Color) -> Self {
        Self { color, king: true }
    }

    /// 升王（重复升王无影响）
    pub fn promote(&mut self) {
        self.king = true;
    }

    /// 可走的斜向方向，顺序固定
    pub fn directions(&self) -> &'static [(i8, i8)] {
        const ALL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
        if self.king {
            return &ALL;
        }
        match self.color {
            Color::White => &ALL[..2],
            Color::Black => &ALL[2..],
        }
    }

    /// 记谱字符（白方 w/W，黑方 b/B，大写为王）
    pub fn to_char(&self) -> char {
        let c = match self.color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        if self.king {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// 从记谱字符解析
    pub fn from_char(c: char) -> Option<Piece> {
        let color = match c.to_ascii_lowercase() {
            'w' => Color::White,
            'b' => Color::Black,
            _ => return None,
        };
        Some(Piece {
            color,
            king: c.is_ascii_uppercase(),
        })
    }
}

/// 棋盘格子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    /// 行 (0-9)
    pub row: u8,
    /// 列 (0-9)
    pub col: u8,
}

impl Square {
    /// 创建新格子，越界返回 None
    pub fn new(row: i32, col: i32) -> Option<Self> {
        if is_on_board(row, col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 是否为可落子的深色格
    pub fn is_playable(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// 是否在传送区内
    pub fn is_warp_zone(&self) -> bool {
        WARP_ZONE.contains(&(self.row, self.col))
    }

    /// 获取偏移后的格子
    pub fn offset(&self, drow: i8, dcol: i8) -> Option<Square> {
        Square::new(
            self.row as i32 + drow as i32,
            self.col as i32 + dcol as i32,
        )
    }

    /// 两格之间的中点（跳吃时被吃子所在格）
    pub fn midpoint(&self, other: Square) -> Square {
        Square {
            row: (self.row + other.row) / 2,
            col: (self.col + other.col) / 2,
        }
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Square {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 解析 "6,6"、"6 6" 或 "(6, 6)" 形式的坐标
impl FromStr for Square {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || RulesError::SquareSyntax {
            input: s.to_string(),
        };
        let cleaned = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts: Vec<&str> = cleaned
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != 2 {
            return Err(syntax());
        }
        let row: i32 = parts[0].parse().map_err(|_| syntax())?;
        let col: i32 = parts[1].parse().map_err(|_| syntax())?;
        Square::new(row, col).ok_or(RulesError::InvalidSquare { row, col })
    }
}

/// 坐标是否在棋盘内
pub fn is_on_board(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

/// 坐标是否在传送区内（越界坐标返回 false）
pub fn is_warp_zone(row: i32, col: i32) -> bool {
    Square::new(row, col).is_some_and(|sq| sq.is_warp_zone())
}
