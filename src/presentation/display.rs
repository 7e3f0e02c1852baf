use std::io::{self, Write};
use std::time::Instant;

use anyhow::Result;
use humansize::{format_size, BINARY};

use crate::domain::WalkSummary;

/// 格式化持续时间
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 重命名摘要
pub struct RenameSummary {
    pub start_time: Instant,
}

impl RenameSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// 摘要各行内容
    pub fn lines(&self, walk: &WalkSummary) -> Vec<String> {
        let mut lines = vec![
            format!("总用时: {}", format_duration(self.start_time.elapsed())),
            format!(
                "处理目录: {} (跳过 {})",
                walk.directories_visited, walk.directories_skipped
            ),
            format!("处理文件: {} (跳过 {})", walk.files_visited, walk.files_skipped),
            format!(
                "改写文件: {} (共 {})",
                walk.files_rewritten,
                format_size(walk.bytes_written, BINARY)
            ),
            format!("重命名文件: {}", walk.files_renamed),
            format!("重命名目录: {}", walk.directories_renamed),
        ];

        if walk.failed_commands > 0 {
            lines.push(format!("⚠️  版本控制命令失败: {}", walk.failed_commands));
        }

        lines
    }

    pub fn print(&self, walk: &WalkSummary) -> Result<()> {
        let mut stdout = io::stdout().lock();

        writeln!(stdout, "\n重命名摘要:")?;
        writeln!(stdout, "----------------------------")?;
        for line in self.lines(walk) {
            writeln!(stdout, "{}", line)?;
        }

        Ok(())
    }
}

impl Default for RenameSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.500s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }

    #[test]
    fn test_summary_lines() {
        let walk = WalkSummary {
            directories_visited: 4,
            directories_skipped: 1,
            files_visited: 10,
            files_skipped: 2,
            files_rewritten: 3,
            bytes_written: 2048,
            files_renamed: 1,
            directories_renamed: 2,
            failed_commands: 0,
        };

        let lines = RenameSummary::new().lines(&walk);
        assert!(lines.contains(&"处理目录: 4 (跳过 1)".to_string()));
        assert!(lines.contains(&"改写文件: 3 (共 2 KiB)".to_string()));
        assert!(lines.contains(&"重命名目录: 2".to_string()));
        assert!(lines.iter().all(|line| !line.contains("失败")));

        let failed = WalkSummary {
            failed_commands: 2,
            ..walk
        };
        assert!(RenameSummary::new()
            .lines(&failed)
            .iter()
            .any(|line| line.contains("版本控制命令失败: 2")));
    }
}
