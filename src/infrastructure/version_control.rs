use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use super::file_system::FileSystem;

/// 外部命令的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// 进程退出码，被信号终止时为 None
    pub exit_code: Option<i32>,
    /// 捕获到的标准输出
    pub output: String,
}

impl CommandOutcome {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// 版本控制操作
///
/// 两个操作都是同步的：调用返回时外部进程已经退出。
/// 退出码通过 [`CommandOutcome`] 返回，由调用方决定是否检查。
pub trait VersionControlGateway {
    /// 签出文件，使其可编辑
    fn checkout(&self, path: &Path) -> Result<CommandOutcome>;
    /// 在版本控制中移动或重命名
    fn rename_path(&self, old_path: &Path, new_path: &Path) -> Result<CommandOutcome>;
}

/// 通过外部版本控制程序执行操作
///
/// 调用方式为 `<程序> checkout <路径>` 和 `<程序> rename <旧路径> <新路径>`。
#[derive(Debug, Clone)]
pub struct CommandGateway {
    executable: PathBuf,
}

impl CommandGateway {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn run(&self, args: &[&OsStr]) -> Result<CommandOutcome> {
        // 只捕获标准输出，标准错误直接输出到控制台
        let output = Command::new(&self.executable)
            .args(args)
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("无法启动版本控制程序: {}", self.executable.display()))?;

        Ok(CommandOutcome {
            exit_code: output.status.code(),
            output: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

impl VersionControlGateway for CommandGateway {
    fn checkout(&self, path: &Path) -> Result<CommandOutcome> {
        self.run(&[OsStr::new("checkout"), path.as_os_str()])
    }

    fn rename_path(&self, old_path: &Path, new_path: &Path) -> Result<CommandOutcome> {
        self.run(&[
            OsStr::new("rename"),
            old_path.as_os_str(),
            new_path.as_os_str(),
        ])
    }
}

/// 不使用版本控制，直接修改文件系统
#[derive(Debug, Clone, Default)]
pub struct FileSystemGateway<F: FileSystem> {
    file_system: F,
}

impl<F: FileSystem> FileSystemGateway<F> {
    pub fn new(file_system: F) -> Self {
        Self { file_system }
    }
}

impl<F: FileSystem> VersionControlGateway for FileSystemGateway<F> {
    fn checkout(&self, _path: &Path) -> Result<CommandOutcome> {
        Ok(CommandOutcome::succeeded(String::new()))
    }

    fn rename_path(&self, old_path: &Path, new_path: &Path) -> Result<CommandOutcome> {
        // 目标已存在时拒绝覆盖，与版本控制的 rename 行为一致
        if self.file_system.exists(new_path) {
            return Ok(CommandOutcome {
                exit_code: Some(1),
                output: format!("目标已存在，未重命名: {}", new_path.display()),
            });
        }

        self.file_system
            .rename(old_path, new_path)
            .with_context(|| {
                format!(
                    "无法重命名 {} 为 {}",
                    old_path.display(),
                    new_path.display()
                )
            })?;

        Ok(CommandOutcome::succeeded(format!(
            "{} -> {}",
            old_path.display(),
            new_path.display()
        )))
    }
}
