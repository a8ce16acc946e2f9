//! 集成测试公共模块

use std::fs;
use std::io::{self, BufRead, Read};
use std::path::PathBuf;
use tempfile::TempDir;

/// 标准慢查询日志文件头
#[allow(dead_code)]
pub const FILE_HEADER: &str = "/usr/sbin/mysqld, Version: 5.5.24-0ubuntu0.12.04.1-log ((Ubuntu)). started with:\n\
Tcp port: 3306  Unix socket: /var/run/mysqld/mysqld.sock\n\
Time                 Id Command    Argument\n";

/// 三个用户、五条记录的慢查询日志
#[allow(dead_code)]
pub const SAMPLE_SLOWLOG_CONTENT: &str = "/usr/sbin/mysqld, Version: 5.5.24-0ubuntu0.12.04.1-log ((Ubuntu)). started with:\n\
Tcp port: 3306  Unix socket: /var/run/mysqld/mysqld.sock\n\
Time                 Id Command    Argument\n\
# Time: 120614 10:15:44\n\
# User@Host: foo[bar] @ localhost []\n\
# Query_time: 2.160184  Lock_time: 0.000069 Rows_sent: 1  Rows_examined: 1460378\n\
SET timestamp=1339661744;\n\
SELECT COUNT(*) FROM orders;\n\
# Time: 120614 10:16:02\n\
# User@Host: root[root] @ localhost []\n\
# Query_time: 5.004215  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 0\n\
SET timestamp=1339661762;\n\
SELECT SLEEP(5);\n\
# Time: 120614 10:17:30\n\
# User@Host: foo[bar] @ web01 [10.0.0.7]\n\
# Query_time: 3.521000  Lock_time: 0.000101 Rows_sent: 20  Rows_examined: 980312\n\
use shop;\n\
SET timestamp=1339661850;\n\
SELECT o.id,\n\
o.total\n\
FROM orders o\n\
WHERE o.created > '2012-01-01';\n\
# Time: 120614 10:18:11\n\
# User@Host: backup[backup] @ localhost []\n\
# Query_time: 12.000001  Lock_time: 0.000000 Rows_sent: 0  Rows_examined: 0\n\
SET timestamp=1339661891;\n\
FLUSH TABLES WITH READ LOCK;\n\
# Time: 120614 10:19:45\n\
# User@Host: foo[bar] @ localhost []\n\
# Query_time: 2.000000  Lock_time: 0.000000 Rows_sent: 0  Rows_examined: 12\n\
SET timestamp=1339661985;\n\
DELETE FROM sessions WHERE expires < NOW();\n";

/// 构造一条记录的文本
#[allow(dead_code)]
pub fn entry(user_host: &str, query_lines: &[&str]) -> String {
    let mut s = format!(
        "# Time: 120614 10:15:44\n# User@Host: {user_host}\n# Query_time: 2.0  Lock_time: 0.0 Rows_sent: 1  Rows_examined: 1\n"
    );
    for line in query_lines {
        s.push_str(line);
        s.push('\n');
    }
    s
}

/// 在临时目录中创建测试用的日志文件
#[allow(dead_code)]
pub fn create_test_slowlog(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).expect("Failed to write test file");
    file_path
}

/// 先输出给定内容、随后读取失败的输入
#[allow(dead_code)]
pub struct FailingReader {
    data: io::Cursor<Vec<u8>>,
}

#[allow(dead_code)]
impl FailingReader {
    pub fn new(content: &str) -> Self {
        Self { data: io::Cursor::new(content.as_bytes().to_vec()) }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n == 0 {
            return Err(io::Error::other("device error"));
        }
        Ok(n)
    }
}

impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.data.position() as usize >= self.data.get_ref().len() {
            return Err(io::Error::other("device error"));
        }
        self.data.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.data.consume(amt);
    }
}
