//! 错误类型定义
//!
//! 这个模块定义了慢查询日志处理过程中的全部错误类型，使用 thiserror 提供错误信息，
//! 并保留与数字错误码之间的一一对应关系（`ErrorCode`）。

use std::borrow::Cow;
use std::io;
use std::path::PathBuf;

/// 慢查询日志处理的结果类型
pub type Result<T> = std::result::Result<T, SplitError>;

/// 慢查询日志处理错误类型
///
/// 各变体互斥，每个变体对应一个 `ErrorCode`。
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// 源日志文件不存在
    #[error("日志文件不存在: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// 源路径存在但不是普通文件
    #[error("给定路径不是文件: {}", .0.display())]
    SourceNotAFile(PathBuf),

    /// 目标文件已存在（不覆盖已有文件）
    #[error("目标文件已存在: {}", .0.display())]
    DestinationExists(PathBuf),

    /// 读写、打开、关闭失败（正常的文件结束除外）
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    /// 固定前缀的行与预期不符
    #[error("不是慢查询日志 (行{line}): 期望以 `{expected}` 开头")]
    NotSlowQueryLog { line: usize, expected: &'static str },

    /// 统计行之后紧跟下一条记录的头部，没有查询语句
    #[error("统计信息后没有查询语句 (行{line})")]
    NoQueryText { line: usize },

    /// 统计行之后没有查询语句便到达文件末尾
    #[error("文件意外结束 (行{line})")]
    UnexpectedEndOfFile { line: usize },
}

impl SplitError {
    /// 返回错误对应的数字错误码
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::SourceNotFound(_) => ErrorCode::SourceNotFound,
            Self::SourceNotAFile(_) => ErrorCode::SourceNotAFile,
            Self::DestinationExists(_) => ErrorCode::DestinationExists,
            Self::Io(_) => ErrorCode::Io,
            Self::NotSlowQueryLog { .. } => ErrorCode::NotSlowQueryLog,
            Self::NoQueryText { .. } => ErrorCode::NoQueryText,
            Self::UnexpectedEndOfFile { .. } => ErrorCode::UnexpectedEndOfFile,
        }
    }

    /// 错误码的简短描述
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.code().description()
    }

    /// 检查是否为 IO 错误
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// 检查是否为源文件/目标文件的前置条件错误
    pub fn is_precondition_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound(_)
                | Self::SourceNotAFile(_)
                | Self::DestinationExists(_)
        )
    }

    /// 检查是否为日志格式错误
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::NotSlowQueryLog { .. }
                | Self::NoQueryText { .. }
                | Self::UnexpectedEndOfFile { .. }
        )
    }
}

/// 数字错误码
///
/// 数值与旧版脚本保持一致，`None` 表示成功。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    None = 0,
    SourceNotFound = 1,
    SourceNotAFile = 2,
    DestinationExists = 3,
    Io = 4,
    NotSlowQueryLog = 5,
    NoQueryText = 6,
    UnexpectedEndOfFile = 7,
}

impl ErrorCode {
    /// 所有已定义的错误码
    pub const ALL: [Self; 8] = [
        Self::None,
        Self::SourceNotFound,
        Self::SourceNotAFile,
        Self::DestinationExists,
        Self::Io,
        Self::NotSlowQueryLog,
        Self::NoQueryText,
        Self::UnexpectedEndOfFile,
    ];

    /// 错误码的数值
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// 由数值得到错误码，未定义的数值返回 `None`
    #[must_use]
    pub fn from_value(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|code| i64::from(code.value()) == value)
    }

    /// 错误码的简短描述
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "无错误。",
            Self::SourceNotFound => "日志文件不存在。",
            Self::SourceNotAFile => "给定路径不是文件。",
            Self::DestinationExists => "目标文件已存在。",
            Self::Io => "I/O 错误。",
            Self::NotSlowQueryLog => "文件似乎不是慢查询日志。",
            Self::NoQueryText => "统计信息之后没有查询语句。",
            Self::UnexpectedEndOfFile => "文件意外结束。",
        }
    }
}

impl From<&SplitError> for ErrorCode {
    fn from(err: &SplitError) -> Self {
        err.code()
    }
}

/// 将数字错误码转换为简短描述
///
/// 对任意输入都有结果：未定义的错误码返回包含该数值的“未知错误”描述。
///
/// # Examples
///
/// ```
/// use slowlog_filter::error::error_code_to_string;
///
/// assert_eq!(error_code_to_string(3), "目标文件已存在。");
/// assert!(error_code_to_string(42).contains("42"));
/// ```
pub fn error_code_to_string(code: i64) -> Cow<'static, str> {
    match ErrorCode::from_value(code) {
        Some(known) => Cow::Borrowed(known.description()),
        None => Cow::Owned(format!("未知错误代码 ({code})")),
    }
}
