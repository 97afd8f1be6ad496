//! 传送区跳棋终端对局
//!
//! 包含:
//! - 游戏设置
//! - 回合计时
//! - 对局控制（人类执白，AI 执黑）
//! - 终端命令解析

pub mod command;
pub mod config;
pub mod game;
pub mod timer;

pub use command::{Command, CommandError, HELP};
pub use config::{ConfigError, GameSettings};
pub use game::{GameError, GameOutcome, GameSession, TurnEvent, TurnPhase, WinReason, AI, HUMAN};
pub use timer::TurnClock;
