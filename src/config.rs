//! 配置管理模块
//!
//! 命令行工具的 TOML 配置文件读取与校验

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("配置解析错误: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("配置序列化错误: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("配置错误: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 有效的日志级别
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 主配置结构体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// 日志配置
    #[serde(default)]
    pub log: LogSection,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// 是否启用控制台输出
    pub enable_stdout: bool,
    /// 日志输出目录，不设置则不写日志文件
    pub log_dir: Option<PathBuf>,
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            enable_stdout: true,
            log_dir: None,
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    ///
    /// # Errors
    /// 读取失败、TOML 格式错误或校验不通过时返回错误。
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// 从字符串加载配置
    ///
    /// # Errors
    /// TOML 格式错误或校验不通过时返回错误。
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    ///
    /// # Errors
    /// 序列化或写入失败时返回错误。
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置的有效性
    ///
    /// # Errors
    /// 日志级别无效时返回 `ConfigError::Invalid`。
    pub fn validate(&self) -> ConfigResult<()> {
        let level = self.log.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "无效的日志级别: {}",
                self.log.level
            )));
        }
        Ok(())
    }
}
