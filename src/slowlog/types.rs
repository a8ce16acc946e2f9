//! 慢查询日志的数据结构

use serde::Serialize;
use std::collections::HashMap;

use crate::slowlog::utils;

/// 单条慢查询日志记录
///
/// 所有行都保留原始字节（包括行尾换行符），以便原样写出。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogEntry {
    /// `# Time:` 行
    pub time_line: Vec<u8>,
    /// `# User@Host:` 行
    pub user_host_line: Vec<u8>,
    /// `# Query_time:` 行
    pub stats_line: Vec<u8>,
    /// 查询语句的各行，至少一行
    pub query_lines: Vec<Vec<u8>>,
}

impl LogEntry {
    /// 从 `# User@Host:` 行中提取用户名，提取失败返回 `None`
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        utils::extract_user(&self.user_host_line)
    }

    /// 按原始顺序返回记录的所有行
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        [
            self.time_line.as_slice(),
            self.user_host_line.as_slice(),
            self.stats_line.as_slice(),
        ]
        .into_iter()
        .chain(self.query_lines.iter().map(Vec::as_slice))
    }
}

/// 按用户统计的记录条数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserStatistics {
    counts: HashMap<String, u64>,
}

impl UserStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为用户计数加一，未出现过的用户从 0 开始
    pub fn increment(&mut self, user: &str) {
        match self.counts.get_mut(user) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(user.to_owned(), 1);
            }
        }
    }

    /// 获取用户的记录条数，未出现过的用户返回 0
    #[must_use]
    pub fn get(&self, user: &str) -> u64 {
        self.counts.get(user).copied().unwrap_or(0)
    }

    /// 所有用户的记录总数
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// 不同用户的数量
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// 按用户名排序后的 `(用户名, 条数)` 列表
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut items: Vec<(&str, u64)> =
            self.counts.iter().map(|(user, count)| (user.as_str(), *count)).collect();
        items.sort_unstable_by(|a, b| a.0.cmp(b.0));
        items
    }
}
