//! 终端命令解析

use std::str::FromStr;

use rules::{RulesError, Square};
use thiserror::Error;

/// 命令解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error(transparent)]
    Square(#[from] RulesError),
}

/// 终端命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `r c`：选子
    Select(Square),
    /// `r c r c`：走棋
    Move { from: Square, to: Square },
    /// 接受和棋
    Draw,
    /// 重新开始
    New,
    Help,
    Quit,
}

pub const HELP: &str = "\
命令:
  r c          选中 (r, c) 上的棋子（选中后输入 r c 作为目标格即可走棋）
  r c r c      从 (r, c) 走到 (r, c)
  draw         接受和棋
  new          重新开始
  help         显示帮助
  quit         退出";

fn parse_square(row: &str, col: &str) -> Result<Square, CommandError> {
    Ok(format!("{},{}", row, col).parse::<Square>()?)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();

        match tokens.as_slice() {
            [] => Err(CommandError::Empty),
            [word] => match word.to_ascii_lowercase().as_str() {
                "draw" | "d" => Ok(Command::Draw),
                "new" | "n" => Ok(Command::New),
                "help" | "h" | "?" => Ok(Command::Help),
                "quit" | "q" | "exit" => Ok(Command::Quit),
                _ => Err(CommandError::Unknown(s.trim().to_string())),
            },
            [row, col] => parse_square(row, col).map(Command::Select),
            [r1, c1, r2, c2] => Ok(Command::Move {
                from: parse_square(r1, c1)?,
                to: parse_square(r2, c2)?,
            }),
            _ => Err(CommandError::Unknown(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new_unchecked(row, col)
    }

    #[test]
    fn test_parse_words() {
        assert_eq!("draw".parse::<Command>(), Ok(Command::Draw));
        assert_eq!(" NEW ".parse::<Command>(), Ok(Command::New));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("help".parse::<Command>(), Ok(Command::Help));
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert!(matches!("resign".parse::<Command>(), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_parse_select() {
        assert_eq!("6 1".parse::<Command>(), Ok(Command::Select(sq(6, 1))));
        assert_eq!("6,1".parse::<Command>(), Ok(Command::Select(sq(6, 1))));
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(
            "6 1 5 0".parse::<Command>(),
            Ok(Command::Move {
                from: sq(6, 1),
                to: sq(5, 0)
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "10 0".parse::<Command>(),
            Err(CommandError::Square(RulesError::InvalidSquare { row: 10, col: 0 }))
        );
        assert_eq!(
            "a b".parse::<Command>(),
            Err(CommandError::Square(RulesError::SquareSyntax {
                input: "a,b".to_string()
            }))
        );
        assert!(matches!("6 1 x 0".parse::<Command>(), Err(CommandError::Square(_))));
        assert!(matches!("1 2 3".parse::<Command>(), Err(CommandError::Unknown(_))));
    }
}
