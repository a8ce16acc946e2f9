//! 日志处理：按用户拆分日志与按用户统计记录条数
//!
//! 两种模式共用同一个拉取循环 `process_entries`，区别只在于对每条记录执行的
//! `EntryReducer`。

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SplitError};
use crate::slowlog::reader::EntryReader;
use crate::slowlog::types::{LogEntry, UserStatistics};
use crate::slowlog::utils::trim_str;

/// 对逐条读取的记录进行归约
pub trait EntryReducer {
    type Output;

    /// 处理一条记录
    ///
    /// # Errors
    /// 返回错误时整个处理过程立即终止。
    fn reduce(&mut self, entry: &LogEntry) -> Result<()>;

    /// 所有记录处理完后得到结果
    ///
    /// # Errors
    /// 收尾操作（如刷新输出）失败时返回错误。
    fn finish(self) -> Result<Self::Output>;
}

/// 从读取器中逐条拉取记录并交给 `reducer`，直到输入读完或出错
///
/// 返回读取的记录条数与归约结果。
///
/// # Errors
/// 读取或归约过程中的第一个错误。
pub fn process_entries<R, P>(
    reader: &mut EntryReader<R>,
    mut reducer: P,
) -> Result<(usize, P::Output)>
where
    R: BufRead,
    P: EntryReducer,
{
    let mut entries = 0usize;
    while let Some(entry) = reader.read_entry()? {
        entries += 1;
        reducer.reduce(&entry)?;
    }
    Ok((entries, reducer.finish()?))
}

/// 将属于指定用户的记录原样写入输出
pub struct UserFilter<W: Write> {
    user: String,
    out: W,
    written: usize,
}

impl<W: Write> UserFilter<W> {
    /// 创建过滤器，用户名会去掉首尾空白
    pub fn new(user: &str, out: W) -> Self {
        Self {
            user: trim_str(user).to_owned(),
            out,
            written: 0,
        }
    }

    fn write_entry(&mut self, entry: &LogEntry) -> io::Result<()> {
        for line in entry.lines() {
            self.out.write_all(line)?;
        }
        Ok(())
    }
}

impl<W: Write> EntryReducer for UserFilter<W> {
    /// 写出的记录条数
    type Output = usize;

    fn reduce(&mut self, entry: &LogEntry) -> Result<()> {
        match entry.user() {
            Some(user) if user == self.user => {
                self.write_entry(entry)?;
                self.written += 1;
            }
            Some(_) => {}
            None => skip_entry_without_user(entry),
        }
        Ok(())
    }

    fn finish(mut self) -> Result<usize> {
        self.out.flush()?;
        Ok(self.written)
    }
}

/// 按用户统计记录条数
#[derive(Debug, Default)]
pub struct UserCounter {
    stats: UserStatistics,
}

impl UserCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryReducer for UserCounter {
    type Output = UserStatistics;

    fn reduce(&mut self, entry: &LogEntry) -> Result<()> {
        match entry.user() {
            Some(user) => self.stats.increment(user),
            None => skip_entry_without_user(entry),
        }
        Ok(())
    }

    fn finish(self) -> Result<UserStatistics> {
        Ok(self.stats)
    }
}

/// 用户名提取失败的记录既不参与过滤也不参与统计
#[cfg_attr(not(feature = "logging"), allow(unused_variables))]
fn skip_entry_without_user(entry: &LogEntry) {
    #[cfg(feature = "logging")]
    tracing::warn!(
        user_host = %String::from_utf8_lossy(&entry.user_host_line).trim_end(),
        "无法从 User@Host 行提取用户名，跳过该记录"
    );
}

/// `split_log` 的执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitSummary {
    /// 读取的记录条数
    pub entries_read: usize,
    /// 写入目标文件的记录条数
    pub entries_written: usize,
}

/// 从慢查询日志中提取指定用户的记录，写入新文件
///
/// 目标文件必须不存在；文件头校验通过后才会创建目标文件。处理中途出错时，
/// 目标文件保留已写入的内容。
///
/// # Errors
/// - `SplitError::SourceNotFound` / `SplitError::SourceNotAFile` - 源路径不可用
/// - `SplitError::DestinationExists` - 目标文件已存在
/// - 其余错误见 `EntryReader::read_entry`
pub fn split_log<P, Q>(source: P, destination: Q, user: &str) -> Result<SplitSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = source.as_ref();
    let destination = destination.as_ref();
    #[cfg(feature = "logging")]
    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        user = trim_str(user),
        "开始按用户拆分慢查询日志"
    );

    check_source(source)?;
    if destination.try_exists()? {
        return Err(SplitError::DestinationExists(destination.to_path_buf()));
    }

    let mut reader = open_reader(source)?;
    reader.validate_header()?;

    let out = create_destination(destination)?;
    let (entries_read, entries_written) =
        process_entries(&mut reader, UserFilter::new(user, BufWriter::new(out)))?;

    #[cfg(feature = "logging")]
    tracing::info!(entries_read, entries_written, "慢查询日志拆分完成");
    Ok(SplitSummary { entries_read, entries_written })
}

/// 统计慢查询日志中每个用户的记录条数
///
/// 出错时丢弃已统计的部分结果。
///
/// # Errors
/// - `SplitError::SourceNotFound` / `SplitError::SourceNotAFile` - 源路径不可用
/// - 其余错误见 `EntryReader::read_entry`
pub fn get_log_user_statistics<P: AsRef<Path>>(source: P) -> Result<UserStatistics> {
    let source = source.as_ref();
    #[cfg(feature = "logging")]
    tracing::debug!(source = %source.display(), "开始统计慢查询日志用户");

    check_source(source)?;
    let mut reader = open_reader(source)?;
    let (entries, stats) = process_entries(&mut reader, UserCounter::new())?;

    #[cfg(feature = "logging")]
    tracing::info!(entries, users = stats.len(), "慢查询日志用户统计完成");
    #[cfg(not(feature = "logging"))]
    let _ = entries;
    Ok(stats)
}

/// 源路径必须存在且为普通文件
fn check_source(source: &Path) -> Result<()> {
    let metadata = match fs::metadata(source) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SplitError::SourceNotFound(source.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() {
        return Err(SplitError::SourceNotAFile(source.to_path_buf()));
    }
    Ok(())
}

fn open_reader(source: &Path) -> Result<EntryReader<BufReader<File>>> {
    let file = File::open(source)?;
    Ok(EntryReader::new(BufReader::new(file)))
}

/// 以“仅新建”方式创建目标文件，文件已存在时返回 `DestinationExists`
fn create_destination(destination: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                SplitError::DestinationExists(destination.to_path_buf())
            } else {
                e.into()
            }
        })
}
