use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn finalize(&self, duration: Duration) -> Result<()>;

    /// 记录消息，写入失败只输出到标准错误，不中断处理
    fn record(&self, message: &str) {
        if let Err(err) = self.log_message(message) {
            eprintln!("写入日志失败: {:#}", err);
        }
    }
}

/// 重命名日志记录器
///
/// 每条消息写入日志文件的一行并同步输出到控制台，写入后立即刷新，
/// 处理中途崩溃时日志文件仍然可用。
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    log_path: PathBuf,
    enabled: bool,
    echo_console: bool,
}

impl Logger {
    /// 创建新的日志记录器，日志文件位于程序同级目录
    pub fn new(enabled: bool, echo_console: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                log_file: Arc::new(Mutex::new(None)),
                log_path: PathBuf::new(),
                enabled: false,
                echo_console,
            });
        }

        Self::with_path(Self::default_log_path()?, echo_console)
    }

    /// 在指定路径创建日志文件
    pub fn with_path(log_path: PathBuf, echo_console: bool) -> Result<Self> {
        let now = Local::now();

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("无法创建日志文件: {}", log_path.display()))?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# NamespaceRename 重命名日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# --------------------------------------------")?;
        file_clone.flush()?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            log_path,
            enabled: true,
            echo_console,
        })
    }

    /// 日志文件默认路径: `<程序路径>.<yyyyMMdd-HHmmss>.log`
    pub fn default_log_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("无法获取程序路径")?;
        let timestamp = Local::now().format("%Y%m%d-%H%M%S");

        Ok(PathBuf::from(format!(
            "{}.{}.log",
            exe_path.display(),
            timestamp
        )))
    }

    /// 获取日志文件路径
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        let message = message.trim_end();

        if self.echo_console {
            println!("{}", message);
        }

        if !self.enabled {
            return Ok(());
        }

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "{}", message)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    fn finalize(&self, duration: Duration) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# --------------------------------------------")?;
                writeln!(file, "# 结束时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
                writeln!(file, "# 总用时: {:.3}秒", duration.as_secs_f64())?;
                file.flush()?;
            }
        }

        Ok(())
    }
}
