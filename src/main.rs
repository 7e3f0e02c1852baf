use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use NamespaceRename::{
    Backend, CommandGateway, Config, FileSystemGateway, Logger, LoggerTrait, OsFileSystem,
    RenameRule, RenameSummary, TreeWalker, VersionControlGateway,
};

/// 在源码树中批量重命名命名空间标识
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 配置文件路径，默认使用程序同级目录下的 config.toml
    #[clap(long)]
    config: Option<PathBuf>,

    /// 要查找的标识
    #[clap(long)]
    find: Option<String>,

    /// 替换后的标识
    #[clap(long)]
    replace: Option<String>,

    /// 处理的根目录
    #[clap(long)]
    root: Option<PathBuf>,

    /// 版本控制程序路径
    #[clap(long)]
    vcs_path: Option<String>,

    /// 不使用版本控制，直接重命名文件和目录
    #[clap(long)]
    no_vcs: bool,

    /// 版本控制命令返回非零退出码时中止
    #[clap(long)]
    strict: bool,

    /// 不写入日志文件
    #[clap(long)]
    no_log: bool,
}

impl Args {
    /// 命令行参数覆盖配置文件
    fn apply(self, config: &mut Config) {
        if let Some(find) = self.find {
            config.rename.find_token = find;
        }
        if let Some(replace) = self.replace {
            config.rename.replace_token = replace;
        }
        if let Some(root) = self.root {
            config.rename.root_path = root.to_string_lossy().into_owned();
        }
        if let Some(vcs_path) = self.vcs_path {
            config.version_control.executable_path = vcs_path;
        }
        if self.no_vcs {
            config.version_control.backend = Backend::None;
        }
        if self.strict {
            config.version_control.strict_exit_status = true;
        }
        if self.no_log {
            config.logging.enabled = false;
        }
    }
}

fn main() -> Result<()> {
    let mut args = Args::parse();

    let config_path = match args.config.take() {
        Some(path) => path,
        None => Config::default_config_path()?,
    };
    let mut config = Config::load_or_create(&config_path)?;
    args.apply(&mut config);
    config.validate().context("配置无效")?;

    let logger = Logger::new(config.logging.enabled, config.logging.echo_console)?;

    let rule = RenameRule::build(&config.rename.find_token, &config.rename.replace_token)?;
    logger.record(rule.kind().description());

    let summary = RenameSummary::new();
    logger.record(&format!("处理开始于 {}", Local::now().format("%Y-%m-%d %H:%M:%S")));
    logger.record(&format!(
        "将 {} 替换为 {}",
        rule.find_token(),
        rule.replace_token()
    ));

    let file_system = OsFileSystem;
    let gateway: Box<dyn VersionControlGateway> = match config.version_control.backend {
        Backend::Command => {
            let gateway = CommandGateway::new(&config.version_control.executable_path);
            logger.record(&format!("版本控制程序: {}", gateway.executable().display()));
            Box::new(gateway)
        }
        Backend::None => {
            logger.record("未使用版本控制，直接重命名文件和目录");
            Box::new(FileSystemGateway::new(OsFileSystem))
        }
    };
    let exclusions = config.exclusion_sets();
    let root = config.root_path()?;

    let walk = TreeWalker::new(&rule, &exclusions, &file_system, &*gateway, &logger)
        .strict_exit_status(config.version_control.strict_exit_status)
        .run(&root)?;

    logger.record(&format!("处理完成于 {}", Local::now().format("%Y-%m-%d %H:%M:%S")));
    if logger.is_enabled() {
        logger.record(&format!("日志文件位于 {}", logger.log_path().display()));
    }

    summary.print(&walk)?;
    logger.finalize(summary.start_time.elapsed())?;

    Ok(())
}
