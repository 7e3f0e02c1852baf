// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{ExclusionSets, RenameError, RenameKind, RenameRule, TreeWalker, WalkSummary};
pub use application::{Backend, Config};
pub use infrastructure::{
    CommandGateway, CommandOutcome, FileSystem, FileSystemGateway, Logger, LoggerTrait,
    OsFileSystem, VersionControlGateway,
};
pub use presentation::RenameSummary;
