use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slowlog_filter::{
    SplitError, UserStatistics, config::Config, error_code_to_string,
    get_log_user_statistics, split_log,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// MySQL 慢查询日志工具：按用户拆分与统计
#[derive(Debug, Parser)]
#[command(name = "slowlog-cli", version, about)]
struct Cli {
    /// TOML 配置文件
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 日志文件目录，覆盖配置文件
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 把指定用户的记录写入新文件（目标文件必须不存在）
    Split {
        source: PathBuf,
        destination: PathBuf,
        user: String,
    },
    /// 统计每个用户的记录条数
    Stats {
        source: PathBuf,
        /// 以 JSON 输出（需要 `json` 特性）
        #[arg(long)]
        json: bool,
    },
    /// 显示错误码的含义
    Describe {
        #[arg(allow_negative_numbers = true)]
        code: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    #[cfg(feature = "logging")]
    let _guard = match init_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    #[cfg(not(feature = "logging"))]
    let _ = &config;

    let result = match cli.command {
        Command::Split { source, destination, user } => {
            split_log(&source, &destination, &user).map(|summary| {
                println!(
                    "完成：读取 {} 条记录，写入 {} 条记录到 {}",
                    summary.entries_read,
                    summary.entries_written,
                    destination.display()
                );
            })
        }
        Command::Stats { source, json } => match get_log_user_statistics(&source) {
            Ok(stats) => {
                if let Err(e) = print_statistics(&stats, json) {
                    eprintln!("{e:#}");
                    return ExitCode::FAILURE;
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        Command::Describe { code } => {
            println!("{}", error_code_to_string(code));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// 读取配置文件并应用命令行覆盖项
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config.as_ref() {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(level) = cli.log_level.as_ref() {
        config.log.level.clone_from(level);
    }
    if let Some(dir) = cli.log_dir.as_ref() {
        config.log.log_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "logging")]
fn init_logging(
    config: &Config,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use slowlog_filter::logging::{self, LogConfig};

    let mut log_config = LogConfig::new()
        .level(logging::parse_level(&config.log.level)?)
        .enable_stdout(config.log.enable_stdout);
    if let Some(dir) = config.log.log_dir.as_ref() {
        log_config = log_config.log_dir(dir);
    }
    Ok(logging::init_logging(log_config)?)
}

fn print_statistics(stats: &UserStatistics, json: bool) -> Result<()> {
    if json {
        return print_statistics_json(stats);
    }
    if stats.is_empty() {
        println!("日志中没有记录");
        return Ok(());
    }
    for (user, count) in stats.sorted() {
        println!("User \"{user}\": {count} entries");
    }
    Ok(())
}

#[cfg(feature = "json")]
fn print_statistics_json(stats: &UserStatistics) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

#[cfg(not(feature = "json"))]
fn print_statistics_json(_stats: &UserStatistics) -> Result<()> {
    anyhow::bail!("JSON 输出需要启用 `json` 特性")
}

/// 输出错误信息，以错误码作为退出码
fn report_error(err: &SplitError) -> ExitCode {
    let code = err.code();
    eprintln!("发生错误，错误码: {}", code.value());
    eprintln!("错误描述: {}", code.description());
    eprintln!("详细信息: {err}");
    ExitCode::from(code.value())
}
