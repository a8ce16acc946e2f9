//! 慢查询日志格式相关的常量与工具函数

use std::str;

/// 文件头第一行前缀
pub const VERSION_PREFIX: &str = "/usr/sbin/mysqld, Version";
/// 文件头第二行前缀
pub const TCP_PORT_PREFIX: &str = "Tcp port:";
/// 文件头第三行前缀
pub const FILE_TIME_PREFIX: &str = "Time ";

/// 文件头三行的前缀，按出现顺序排列
pub const FILE_HEADER_PREFIXES: [&str; 3] =
    [VERSION_PREFIX, TCP_PORT_PREFIX, FILE_TIME_PREFIX];

/// 记录时间行前缀
pub const TIME_PREFIX: &str = "# Time:";
/// 记录用户/主机行前缀
pub const USER_HOST_PREFIX: &str = "# User@Host:";
/// 记录统计行前缀
pub const QUERY_TIME_PREFIX: &str = "# Query_time:";

/// 头部标记：以此开头的行不是查询语句
pub const HEADER_MARKER: &str = "# ";

/// 判断一行是否以给定前缀开头（按字节比较）
#[inline]
#[must_use]
pub fn has_prefix(line: &[u8], prefix: &str) -> bool {
    line.starts_with(prefix.as_bytes())
}

/// 判断一行是否为下一条记录的头部
#[inline]
#[must_use]
pub fn is_header_line(line: &[u8]) -> bool {
    has_prefix(line, HEADER_MARKER)
}

/// 用户名两侧需要裁剪的字节：空格、`\t`、`\n`、`\r`、`\0` 与 `\x0B`
///
/// 与 `u8::is_ascii_whitespace` 不同，包含 `\0` 和 `\x0B`，不包含 `\x0C`。
#[inline]
#[must_use]
pub const fn is_trim_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\0' | b'\x0B')
}

/// 裁剪字节串两侧的 [`is_trim_byte`] 字节
#[must_use]
pub fn trim_bytes(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_trim_byte(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !is_trim_byte(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// 裁剪字符串两侧的 [`is_trim_byte`] 字符
#[must_use]
pub fn trim_str(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii() && is_trim_byte(c as u8))
}

/// 从 `# User@Host:` 行中提取用户名
///
/// 去掉前缀并裁剪首尾空白后按 `@` 拆分，恰好得到两段时返回第一段（再次裁剪）。
/// 前缀不符、段数不为二或用户名不是合法 UTF-8 时返回 `None`。
///
/// # Examples
///
/// ```
/// use slowlog_filter::slowlog::utils::extract_user;
///
/// assert_eq!(extract_user(b"# User@Host: foo[bar] @ localhost []\n"), Some("foo[bar]"));
/// assert_eq!(extract_user(b"# User@Host: no-at-sign\n"), None);
/// ```
#[must_use]
pub fn extract_user(user_host_line: &[u8]) -> Option<&str> {
    let rest = user_host_line.strip_prefix(USER_HOST_PREFIX.as_bytes())?;
    let rest = trim_bytes(rest);

    let mut parts = rest.split(|&b| b == b'@');
    let user = parts.next()?;
    // 恰好两段
    parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    str::from_utf8(trim_bytes(user)).ok()
}
