//! MySQL 慢查询日志模块
//!
//! 提供慢查询日志记录的读取、按用户拆分与按用户统计功能

pub mod processor;
pub mod reader;
pub mod types;
pub mod utils;

// 重新导出核心类型和函数
pub use processor::{
    EntryReducer, SplitSummary, UserCounter, UserFilter, get_log_user_statistics,
    process_entries, split_log,
};
pub use reader::{EntryReader, ReaderState};
pub use types::{LogEntry, UserStatistics};
pub use utils::extract_user;
