use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use super::error::RenameError;
use super::rename_rule::RenameRule;
use crate::infrastructure::{CommandOutcome, FileSystem, LoggerTrait, VersionControlGateway};

/// 排除规则
#[derive(Debug, Clone, Default)]
pub struct ExclusionSets {
    /// 按目录名精确匹配
    pub directories: HashSet<String>,
    /// 按扩展名精确匹配（包含前导点，区分大小写）
    pub file_extensions: HashSet<String>,
}

impl ExclusionSets {
    pub fn new(directories: Vec<String>, file_extensions: Vec<String>) -> Self {
        Self {
            directories: directories.into_iter().collect(),
            file_extensions: file_extensions.into_iter().collect(),
        }
    }

    pub fn is_directory_excluded(&self, name: &str) -> bool {
        self.directories.contains(name)
    }

    pub fn is_extension_excluded(&self, extension: &str) -> bool {
        self.file_extensions.contains(extension)
    }
}

/// 遍历统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub directories_visited: u64,
    pub directories_skipped: u64,
    pub files_visited: u64,
    pub files_skipped: u64,
    pub files_rewritten: u64,
    pub bytes_written: u64,
    pub files_renamed: u64,
    pub directories_renamed: u64,
    /// 返回非零退出码的版本控制命令数
    pub failed_commands: u64,
}

/// 自底向上遍历目录树并执行重命名
///
/// 每个目录先递归处理子目录，再处理其中的文件（先改写内容再重命名文件），
/// 最后才考虑重命名目录本身，因此父目录的路径在子节点处理期间始终有效。
pub struct TreeWalker<'a> {
    rule: &'a RenameRule,
    exclusions: &'a ExclusionSets,
    file_system: &'a dyn FileSystem,
    version_control: &'a dyn VersionControlGateway,
    logger: &'a dyn LoggerTrait,
    strict_exit_status: bool,
    summary: WalkSummary,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        rule: &'a RenameRule,
        exclusions: &'a ExclusionSets,
        file_system: &'a dyn FileSystem,
        version_control: &'a dyn VersionControlGateway,
        logger: &'a dyn LoggerTrait,
    ) -> Self {
        Self {
            rule,
            exclusions,
            file_system,
            version_control,
            logger,
            strict_exit_status: false,
            summary: WalkSummary::default(),
        }
    }

    /// 版本控制命令返回非零退出码时中止处理
    pub fn strict_exit_status(mut self, strict: bool) -> Self {
        self.strict_exit_status = strict;
        self
    }

    /// 从根目录开始处理
    pub fn run(mut self, root: &Path) -> Result<WalkSummary> {
        self.visit_directory(root)?;
        Ok(self.summary)
    }

    fn visit_directory(&mut self, directory: &Path) -> Result<()> {
        let name = bare_name(directory);

        if self.exclusions.is_directory_excluded(&name) {
            self.logger
                .record(&format!("跳过已排除的目录 {}", directory.display()));
            self.summary.directories_skipped += 1;
            return Ok(());
        }

        self.summary.directories_visited += 1;

        let children = self
            .file_system
            .list_dirs(directory)
            .with_context(|| format!("无法列出子目录: {}", directory.display()))?;

        // 先递归子目录，形成自底向上的处理顺序
        for child in &children {
            self.visit_directory(child)?;
        }

        let files = self
            .file_system
            .list_files(directory)
            .with_context(|| format!("无法列出文件: {}", directory.display()))?;

        for file in &files {
            self.visit_file(file)?;
        }

        if self.rule.is_match(&name) {
            self.logger
                .record(&format!("正在重命名目录 {}", directory.display()));
            if self.rename_entry(directory, &name)? {
                self.summary.directories_renamed += 1;
            }
        } else {
            self.logger
                .record(&format!("无需重命名 {}", directory.display()));
        }

        Ok(())
    }

    fn visit_file(&mut self, file: &Path) -> Result<()> {
        let name = bare_name(file);

        if self.exclusions.is_extension_excluded(file_extension(&name)) {
            self.logger.record(&format!(
                "跳过 {} (文件扩展名已排除)",
                file.display()
            ));
            self.summary.files_skipped += 1;
            return Ok(());
        }

        self.summary.files_visited += 1;

        let contents = self
            .file_system
            .read_to_string(file)
            .with_context(|| format!("无法读取文件: {}", file.display()))?;

        if self.rule.is_match(&contents) {
            let updated = self.rule.replace_all(&contents);

            // 写入前先签出，否则受控文件可能是只读的
            self.checkout(file)?;

            self.logger
                .record(&format!("正在更新文件内容 {}", file.display()));

            // 未纳入版本控制的文件可能仍是只读的
            self.file_system
                .clear_readonly(file)
                .with_context(|| format!("无法清除只读属性: {}", file.display()))?;
            self.file_system
                .write_string(file, &updated)
                .with_context(|| format!("无法写入文件: {}", file.display()))?;

            self.summary.files_rewritten += 1;
            self.summary.bytes_written += updated.len() as u64;
        } else {
            self.logger
                .record(&format!("文件内容无需修改 {}", file.display()));
        }

        if self.rule.is_match(&name) {
            self.logger
                .record(&format!("正在重命名文件 {}", file.display()));
            if self.rename_entry(file, &name)? {
                self.summary.files_renamed += 1;
            }
        } else {
            self.logger
                .record(&format!("无需重命名 {}", file.display()));
        }

        Ok(())
    }

    fn checkout(&mut self, file: &Path) -> Result<()> {
        self.logger
            .record(&format!("正在签出文件 {}", file.display()));

        let outcome = self.version_control.checkout(file)?;
        self.report(outcome, || format!("checkout \"{}\"", file.display()))?;
        Ok(())
    }

    /// 新名称在同一父目录下，返回命令是否成功
    fn rename_entry(&mut self, path: &Path, name: &str) -> Result<bool> {
        let parent = path
            .parent()
            .ok_or_else(|| RenameError::MissingParent(path.to_path_buf()))?;
        let new_name = self.rule.replace_all(name);
        let new_path = parent.join(&*new_name);

        let outcome = self.version_control.rename_path(path, &new_path)?;
        self.report(outcome, || {
            format!(
                "rename \"{}\" \"{}\"",
                path.display(),
                new_path.display()
            )
        })
    }

    fn report(&mut self, outcome: CommandOutcome, command: impl FnOnce() -> String) -> Result<bool> {
        // 空输出不单独记录一行
        if !outcome.output.trim().is_empty() {
            self.logger.record(&outcome.output);
        }

        if outcome.success() {
            return Ok(true);
        }

        self.summary.failed_commands += 1;
        let command = command();

        // 默认只记录失败，不中止处理
        self.logger.record(&format!(
            "版本控制命令返回非零退出码 {:?}: {}",
            outcome.exit_code, command
        ));

        if self.strict_exit_status {
            return Err(RenameError::CommandFailed {
                command,
                exit_code: outcome.exit_code,
            }
            .into());
        }

        Ok(false)
    }
}

/// 路径的最后一段名称
pub fn bare_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 文件扩展名，包含前导点；没有扩展名时为空字符串
pub fn file_extension(name: &str) -> &str {
    match name.rfind('.') {
        // 以点结尾的名称没有扩展名
        Some(index) if index + 1 < name.len() => &name[index..],
        _ => "",
    }
}
