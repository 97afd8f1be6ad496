//! 游戏设置
//!
//! 提供设置数据结构与 JSON 持久化

use std::path::{Path, PathBuf};

use checkers_ai::{AiConfig, ChainMode};
use rules::{DEFAULT_SEARCH_DEPTH, DRAW_THRESHOLD, MULTI_JUMP_CHANCE, TURN_DURATION_MS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 设置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读写设置文件失败
    #[error("Settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 设置文件格式错误
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// 设置值不合法
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// 游戏设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// AI 搜索深度
    pub search_depth: u8,
    /// 每回合限时（毫秒）
    pub turn_duration_ms: u64,
    /// 无吃子步数达到此值时提示和棋
    pub draw_threshold: u32,
    /// 每回合开始时激活连跳的概率（每方每局最多一次）
    pub multi_jump_chance: f64,
    /// 搜索中的连跳展开方式
    pub chain_mode: ChainMode,
    /// 随机种子（固定后对局可复现）
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            turn_duration_ms: TURN_DURATION_MS,
            draw_threshold: DRAW_THRESHOLD,
            multi_jump_chance: MULTI_JUMP_CHANCE,
            chain_mode: ChainMode::default(),
            seed: None,
        }
    }
}

impl GameSettings {
    /// 获取默认设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("warp-checkers");
            path.push("settings.json");
            path
        })
    }

    /// 从默认位置加载设置，失败时使用默认设置
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("无法获取配置目录，使用默认设置");
            return Self::default();
        };

        if !path.exists() {
            tracing::info!("设置文件不存在，使用默认设置");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                tracing::info!("已加载设置: {:?}", path);
                settings
            }
            Err(e) => {
                tracing::warn!("{}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 从指定文件加载设置
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// 保存设置到指定文件
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_error)?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }

    /// 检查设置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "search_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.multi_jump_chance) {
            return Err(ConfigError::Invalid {
                field: "multi_jump_chance",
                reason: format!("{} is outside [0, 1]", self.multi_jump_chance),
            });
        }
        if self.draw_threshold == 0 {
            return Err(ConfigError::Invalid {
                field: "draw_threshold",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// 对应的 AI 配置
    pub fn ai_config(&self) -> AiConfig {
        AiConfig {
            chain_mode: self.chain_mode,
            ..AiConfig::with_depth(self.search_depth)
        }
    }
}
