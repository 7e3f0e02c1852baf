use std::path::PathBuf;

use thiserror::Error;

/// 重命名过程中的领域错误
#[derive(Debug, Error)]
pub enum RenameError {
    /// 查找标识为空时无法构建规则
    #[error("查找标识不能为空")]
    EmptyFindToken,

    /// 无法编译匹配表达式
    #[error("无法编译匹配表达式: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// 需要重命名的节点没有父目录
    #[error("没有可用的父目录: {}", .0.display())]
    MissingParent(PathBuf),

    /// 严格模式下版本控制命令返回非零退出码
    #[error("版本控制命令执行失败 (退出码: {exit_code:?}): {command}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
    },
}
