//! EntryReader - 从按行读取的输入流中逐条读取慢查询日志记录
//!
//! 记录之间没有显式的结束符，只能通过下一条记录头部（`# ` 开头的行）的出现来判断
//! 上一条记录的查询语句何时结束。读取器为此维护一个单行回退缓冲区：读到下一条记录
//! 的头部时把这一行放回去，下次读取时优先返回。
//!
//! ```text
//! Start → HeaderValidated → {读取记录}* → Exhausted
//!   └──────────┴── 任意错误 ──→ Failed（关闭底层输入，不可恢复）
//! ```

use std::io::{self, BufRead};
use std::iter::FusedIterator;

use crate::error::{Result, SplitError};
use crate::slowlog::types::LogEntry;
use crate::slowlog::utils::{
    FILE_HEADER_PREFIXES, QUERY_TIME_PREFIX, TIME_PREFIX, USER_HOST_PREFIX,
    has_prefix, is_header_line,
};

/// 读取器所处的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// 尚未校验文件头
    Start,
    /// 文件头已校验，可以读取记录
    HeaderValidated,
    /// 输入已正常读完
    Exhausted,
    /// 发生过错误，底层输入已关闭
    Failed,
}

/// 慢查询日志记录读取器
///
/// 行以原始字节保存（包括行尾换行符），不要求输入可 `Seek`。
pub struct EntryReader<R: BufRead> {
    reader: Option<R>,
    pending: Option<Vec<u8>>,
    line_num: usize,
    state: ReaderState,
}

impl<R: BufRead> EntryReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            pending: None,
            line_num: 0,
            state: ReaderState::Start,
        }
    }

    /// 当前状态
    #[must_use]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// 最后一个已消费行的行号（从 1 开始，回退的行不计入）
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_num
    }

    /// 校验文件开头的三行
    ///
    /// 文件头只校验一次，重复调用直接返回成功。
    ///
    /// # Errors
    /// - `SplitError::Io` - 文件头不足三行或读取失败
    /// - `SplitError::NotSlowQueryLog` - 某一行前缀不符
    pub fn validate_header(&mut self) -> Result<()> {
        match self.state {
            ReaderState::Start => {}
            ReaderState::HeaderValidated | ReaderState::Exhausted => return Ok(()),
            ReaderState::Failed => return Err(Self::failed_error()),
        }

        match self.validate_header_inner() {
            Ok(()) => {
                self.state = ReaderState::HeaderValidated;
                #[cfg(feature = "logging")]
                tracing::debug!("慢查询日志文件头校验通过");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// 读取下一条记录
    ///
    /// 尚未校验文件头时先校验文件头。输入在记录开始处正常结束时返回 `Ok(None)`。
    ///
    /// # Errors
    /// - `SplitError::Io` - 读取失败，记录头部读取到一半时文件结束，或读取器已因先前的错误失效
    /// - `SplitError::NotSlowQueryLog` - 记录头部某一行前缀不符
    /// - `SplitError::NoQueryText` - 统计行之后直接是下一条记录的头部
    /// - `SplitError::UnexpectedEndOfFile` - 统计行之后没有任何查询语句便到达文件末尾
    pub fn read_entry(&mut self) -> Result<Option<LogEntry>> {
        match self.state {
            ReaderState::Start => self.validate_header()?,
            ReaderState::HeaderValidated => {}
            ReaderState::Exhausted => return Ok(None),
            ReaderState::Failed => return Err(Self::failed_error()),
        }

        match self.read_entry_inner() {
            Ok(Some(entry)) => {
                #[cfg(feature = "logging")]
                tracing::trace!(
                    line = self.line_num,
                    query_lines = entry.query_lines.len(),
                    "读取到一条记录"
                );
                Ok(Some(entry))
            }
            Ok(None) => {
                self.state = ReaderState::Exhausted;
                self.reader = None;
                #[cfg(feature = "logging")]
                tracing::debug!(lines = self.line_num, "慢查询日志读取完毕");
                Ok(None)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn validate_header_inner(&mut self) -> Result<()> {
        for prefix in FILE_HEADER_PREFIXES {
            let line = self.next_line()?.ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "文件头不完整")
            })?;
            if !has_prefix(&line, prefix) {
                return Err(SplitError::NotSlowQueryLog {
                    line: self.line_num,
                    expected: prefix,
                });
            }
        }
        Ok(())
    }

    fn read_entry_inner(&mut self) -> Result<Option<LogEntry>> {
        let Some(time_line) = self.next_line()? else {
            return Ok(None);
        };
        self.check_prefix(&time_line, TIME_PREFIX)?;

        let user_host_line = self.expect_header_line(USER_HOST_PREFIX)?;
        let stats_line = self.expect_header_line(QUERY_TIME_PREFIX)?;
        let query_lines = self.read_query_lines()?;

        Ok(Some(LogEntry { time_line, user_host_line, stats_line, query_lines }))
    }

    fn expect_header_line(&mut self, prefix: &'static str) -> Result<Vec<u8>> {
        let Some(line) = self.next_line()? else {
            let message = format!("记录头部不完整：第 {} 行缺少 `{prefix}`", self.line_num + 1);
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, message).into());
        };
        self.check_prefix(&line, prefix)?;
        Ok(line)
    }

    fn check_prefix(&self, line: &[u8], prefix: &'static str) -> Result<()> {
        if has_prefix(line, prefix) {
            Ok(())
        } else {
            Err(SplitError::NotSlowQueryLog { line: self.line_num, expected: prefix })
        }
    }

    /// 读取查询语句，直到遇到下一条记录的头部或文件结束
    fn read_query_lines(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut query_lines = Vec::new();
        loop {
            match self.next_line()? {
                None => {
                    if query_lines.is_empty() {
                        return Err(SplitError::UnexpectedEndOfFile {
                            line: self.line_num + 1,
                        });
                    }
                    break;
                }
                Some(line) if is_header_line(&line) => {
                    self.unread_line(line);
                    if query_lines.is_empty() {
                        return Err(SplitError::NoQueryText { line: self.line_num });
                    }
                    break;
                }
                Some(line) => query_lines.push(line),
            }
        }
        Ok(query_lines)
    }

    /// 读取一行（包括行尾换行符），优先返回回退缓冲区中的行
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        if let Some(line) = self.pending.take() {
            self.line_num += 1;
            return Ok(Some(line));
        }

        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let mut buf = Vec::new();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        self.line_num += 1;
        Ok(Some(buf))
    }

    /// 放回刚读到的一行；回退缓冲区只有一个位置
    fn unread_line(&mut self, line: Vec<u8>) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(line);
        self.line_num -= 1;
    }

    /// 进入 Failed 状态并关闭底层输入
    fn fail(&mut self, err: SplitError) -> SplitError {
        #[cfg(feature = "logging")]
        tracing::debug!(line = self.line_num, error = %err, "读取慢查询日志失败");
        self.state = ReaderState::Failed;
        self.reader = None;
        self.pending = None;
        err
    }

    fn failed_error() -> SplitError {
        SplitError::Io(io::Error::other("读取器已因先前的错误失效"))
    }
}

impl<R: BufRead> Iterator for EntryReader<R> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, ReaderState::Exhausted | ReaderState::Failed) {
            return None;
        }
        self.read_entry().transpose()
    }
}

impl<R: BufRead> FusedIterator for EntryReader<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "/usr/sbin/mysqld, Version: 5.5.24-log (MySQL Community Server (GPL)). started with:\n\
Tcp port: 3306  Unix socket: /var/run/mysqld/mysqld.sock\n\
Time                 Id Command    Argument\n";

    fn reader_for(body: &str) -> EntryReader<Cursor<Vec<u8>>> {
        EntryReader::new(Cursor::new(format!("{HEADER}{body}").into_bytes()))
    }

    #[test]
    fn test_pushback_keeps_next_header() {
        let mut reader = reader_for(
            "# Time: 1\n# User@Host: a @ h\n# Query_time: 1\nSELECT 1;\n\
# Time: 2\n# User@Host: b @ h\n# Query_time: 2\nSELECT 2;\n",
        );

        let first = reader.read_entry().unwrap().unwrap();
        assert_eq!(first.query_lines, vec![b"SELECT 1;\n".to_vec()]);
        // 第二条记录的 # Time: 行被放回，未计入行号
        assert_eq!(reader.line_number(), 7);

        let second = reader.read_entry().unwrap().unwrap();
        assert_eq!(second.time_line, b"# Time: 2\n");
        assert_eq!(second.user(), Some("b"));

        assert!(reader.read_entry().unwrap().is_none());
        assert_eq!(reader.state(), ReaderState::Exhausted);
    }

    #[test]
    fn test_state_transitions() {
        let mut reader = reader_for("# Time: 1\n# User@Host: a @ h\n# Query_time: 1\nSELECT 1;");
        assert_eq!(reader.state(), ReaderState::Start);
        reader.validate_header().unwrap();
        assert_eq!(reader.state(), ReaderState::HeaderValidated);
        // 重复校验不再读取
        reader.validate_header().unwrap();
        assert_eq!(reader.line_number(), 3);

        let entry = reader.read_entry().unwrap().unwrap();
        assert_eq!(entry.query_lines, vec![b"SELECT 1;".to_vec()]);
        assert!(reader.next().is_none());
        assert_eq!(reader.state(), ReaderState::Exhausted);
    }

    #[test]
    fn test_failed_reader_is_not_reusable() {
        let mut reader = reader_for("# Time: 1\n# Query_time: 1\nSELECT 1;\n");
        let err = reader.read_entry().unwrap_err();
        assert!(matches!(
            err,
            SplitError::NotSlowQueryLog { line: 5, expected: USER_HOST_PREFIX }
        ));
        assert_eq!(reader.state(), ReaderState::Failed);

        assert!(reader.read_entry().unwrap_err().is_io_error());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_no_query_text_reports_stats_line() {
        let mut reader = reader_for(
            "# Time: 1\n# User@Host: a @ h\n# Query_time: 1\n# Time: 2\n",
        );
        let err = reader.read_entry().unwrap_err();
        assert!(matches!(err, SplitError::NoQueryText { line: 6 }));
    }
}
