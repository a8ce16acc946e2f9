//! 日志初始化和配置模块
//!
//! 这个模块提供了统一的日志初始化功能，使用 tracing 库。
//! 默认配置：info 级别，输出到标准错误；设置日志目录后额外按天滚动写入文件。

use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// 日志文件名前缀
const LOG_FILE_PREFIX: &str = "slowlog";

/// 日志配置结构体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: Level,
    /// 日志文件目录，`None` 表示不写文件
    pub log_dir: Option<PathBuf>,
    /// 是否输出到控制台（标准错误）
    pub enable_stdout: bool,
}

impl LogConfig {
    /// 创建新的日志配置，使用默认值
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置日志级别
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// 设置日志文件目录
    pub fn log_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// 设置是否输出到控制台
    pub fn enable_stdout(mut self, enable: bool) -> Self {
        self.enable_stdout = enable;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_dir: None,
            enable_stdout: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    #[error("日志配置错误: {0}")]
    Config(String),
}

/// 日志初始化结果
pub type LogResult<T> = Result<T, LogError>;

/// 把字符串形式的日志级别解析为 `Level`
///
/// # Errors
/// 无法识别的级别返回 `LogError::Config`。
pub fn parse_level(level: &str) -> LogResult<Level> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(LogError::Config(format!("无效的日志级别: {other}"))),
    }
}

/// 初始化日志系统
///
/// - `RUST_LOG` 环境变量优先于配置中的级别
/// - 控制台输出写到标准错误，不干扰命令的正常输出
/// - 设置了日志目录时按天滚动写入 `slowlog.YYYY-MM-DD`
///
/// 返回的 guard 需要持有到程序结束，否则文件日志可能丢失。全局订阅者已存在时
/// 不视为错误。
///
/// # Examples
///
/// ```no_run
/// use slowlog_filter::logging::{init_logging, LogConfig};
/// use tracing::Level;
///
/// let _guard = init_logging(LogConfig::new().level(Level::DEBUG)).unwrap();
/// ```
///
/// # Errors
/// 无法创建日志目录时返回 `LogError::Io`。
pub fn init_logging(config: LogConfig) -> LogResult<Option<WorkerGuard>> {
    // 创建环境过滤器，默认使用配置的级别
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    // 控制台输出层
    let console_layer = config.enable_stdout.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_timer(SystemTime)
            .with_target(true)
            .with_ansi(true)
            .boxed()
    });

    // 文件输出层 - 按天滚动
    let mut guard = None;
    let file_layer = match config.log_dir.as_ref() {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker_guard);
            Some(
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_timer(SystemTime)
                    .with_target(true)
                    .with_ansi(false) // 文件中不使用颜色
                    .boxed(),
            )
        }
        None => None,
    };

    let subscriber = Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer);

    // 尝试初始化，如果失败说明已经初始化过了
    if subscriber.try_init().is_ok() {
        tracing::debug!(level = %config.level, "日志系统初始化完成");
    }
    Ok(guard)
}

/// 使用默认配置初始化日志系统
///
/// # Errors
/// 同 `init_logging`。
pub fn init_default_logging() -> LogResult<Option<WorkerGuard>> {
    init_logging(LogConfig::default())
}
