//! # slowlog-filter
//!
//! MySQL 慢查询日志（slow query log）解析库。
//!
//! - 按用户拆分：把属于某个用户的记录原样写入新文件
//! - 按用户统计：统计每个用户的记录条数
//!
//! ```rust,no_run
//! use slowlog_filter::{get_log_user_statistics, split_log};
//!
//! let summary = split_log("/var/log/mysql/slow.log", "/tmp/foobar.log", "foo[bar]")?;
//! println!("写入 {} 条记录", summary.entries_written);
//!
//! let stats = get_log_user_statistics("/var/log/mysql/slow.log")?;
//! for (user, count) in stats.sorted() {
//!     println!("User \"{user}\": {count} entries");
//! }
//! # Ok::<(), slowlog_filter::SplitError>(())
//! ```

pub mod config;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod slowlog;

pub use error::{ErrorCode, Result, SplitError, error_code_to_string};
pub use slowlog::{
    EntryReader, LogEntry, SplitSummary, UserStatistics, get_log_user_statistics,
    split_log,
};
