//! 传送区跳棋规则库
//!
//! 包含:
//! - 棋子、格子、棋盘等核心数据结构
//! - 走法生成（强制吃子、传送区保护）
//! - 走法执行（升王、连跳、奖励步）
//! - 棋盘记谱格式

mod board;
mod constants;
mod error;
mod execute;
mod moves;
mod notation;
mod piece;

pub use board::Board;
pub use constants::*;
pub use error::{Result, RulesError};
pub use execute::{execute, MoveOutcome};
pub use moves::{Move, MoveGenerator};
pub use notation::{Notation, INITIAL_NOTATION};
pub use piece::{is_on_board, is_warp_zone, Color, Piece, Square};
