//! 错误类型与错误码的单元测试

use slowlog_filter::error::{ErrorCode, SplitError, error_code_to_string};
use std::io;
use std::path::PathBuf;

#[test]
fn test_error_code_values() {
    let values: Vec<u8> = ErrorCode::ALL.iter().map(|code| code.value()).collect();
    assert_eq!(values, (0..=7).collect::<Vec<u8>>());
    assert_eq!(ErrorCode::None.value(), 0);
    assert_eq!(ErrorCode::UnexpectedEndOfFile.value(), 7);
}

#[test]
fn test_error_code_to_string_is_total() {
    for code in ErrorCode::ALL {
        let description = error_code_to_string(i64::from(code.value()));
        assert!(!description.is_empty());
        assert_eq!(description, code.description());
        assert!(!description.contains("未知错误"));
    }

    for unknown in [8, 42, -1, i64::MAX, i64::MIN] {
        let description = error_code_to_string(unknown);
        assert!(description.contains("未知错误"));
        assert!(description.contains(&unknown.to_string()));
    }
}

#[test]
fn test_descriptions_are_distinct() {
    let mut descriptions: Vec<_> = ErrorCode::ALL.iter().map(|c| c.description()).collect();
    descriptions.sort_unstable();
    descriptions.dedup();
    assert_eq!(descriptions.len(), ErrorCode::ALL.len());
}

#[test]
fn test_each_variant_maps_to_one_code() {
    let errors = vec![
        (SplitError::SourceNotFound(PathBuf::from("a")), ErrorCode::SourceNotFound),
        (SplitError::SourceNotAFile(PathBuf::from("a")), ErrorCode::SourceNotAFile),
        (SplitError::DestinationExists(PathBuf::from("a")), ErrorCode::DestinationExists),
        (SplitError::Io(io::Error::other("x")), ErrorCode::Io),
        (SplitError::NotSlowQueryLog { line: 1, expected: "Time " }, ErrorCode::NotSlowQueryLog),
        (SplitError::NoQueryText { line: 1 }, ErrorCode::NoQueryText),
        (SplitError::UnexpectedEndOfFile { line: 1 }, ErrorCode::UnexpectedEndOfFile),
    ];

    for (err, code) in &errors {
        assert_eq!(err.code(), *code);
        assert_ne!(err.code(), ErrorCode::None);
        assert_eq!(err.description(), code.description());
    }
}

#[test]
fn test_error_display_contains_path() {
    let err = SplitError::SourceNotFound(PathBuf::from("/var/log/mysql/slow.log"));
    let display = err.to_string();
    assert!(display.contains("日志文件不存在"));
    assert!(display.contains("/var/log/mysql/slow.log"));
}

#[test]
fn test_io_error_from() {
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
    let err: SplitError = io_err.into();
    assert!(err.is_io_error());
    assert!(!err.is_format_error());
    assert!(err.to_string().contains("access denied"));
}
