//! 规则常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 10;

/// 棋盘格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 每方初始棋子行数
pub const STARTING_ROWS: usize = 4;

/// 每方初始棋子数
pub const PIECES_PER_SIDE: usize = STARTING_ROWS * BOARD_SIZE / 2;

/// 传送区（棋盘中央 2x2）
pub const WARP_ZONE: [(u8, u8); 4] = [(4, 4), (4, 5), (5, 4), (5, 5)];

/// 无吃子步数达到此值时提示和棋
pub const DRAW_THRESHOLD: u32 = 20;

/// 每回合限时（毫秒）
pub const TURN_DURATION_MS: u64 = 5000;

/// AI 默认搜索深度
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

/// 每局每方一次的连跳激活概率
pub const MULTI_JUMP_CHANCE: f64 = 0.1;
