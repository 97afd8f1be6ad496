//! 错误类型定义
//!
//! 规则层面的非法输入（越界、非法走法、无子可走）都不是错误，
//! 这里只覆盖文本解析这类真正可能失败的操作。

use thiserror::Error;

/// 规则库错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RulesError {
    /// 无效的格子坐标
    #[error("Invalid square: ({row}, {col})")]
    InvalidSquare { row: i32, col: i32 },

    /// 无法解析的格子文本
    #[error("Cannot parse square from {input:?}")]
    SquareSyntax { input: String },

    /// 无效的棋盘记谱
    #[error("Invalid board notation: {reason}")]
    InvalidNotation { reason: String },
}

/// 规则库操作结果类型
pub type Result<T> = std::result::Result<T, RulesError>;
