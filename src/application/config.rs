use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::ExclusionSets;

/// 应用程序配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 重命名相关配置
    pub rename: RenameConfig,
    /// 版本控制相关配置
    pub version_control: VersionControlConfig,
    /// 排除规则配置
    pub exclude: ExcludeConfig,
    /// 日志相关配置
    pub logging: LoggingConfig,
}

/// 重命名配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// 要查找的标识
    pub find_token: String,
    /// 替换后的标识
    pub replace_token: String,
    /// 处理的根目录
    pub root_path: String,
}

/// 版本控制后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// 调用外部版本控制程序
    Command,
    /// 不使用版本控制，直接修改文件系统
    None,
}

/// 版本控制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionControlConfig {
    pub backend: Backend,
    /// 版本控制程序路径
    pub executable_path: String,
    /// 命令返回非零退出码时是否中止
    pub strict_exit_status: bool,
}

/// 排除规则配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    /// 不处理的目录名
    pub directories: Vec<String>,
    /// 不处理的文件扩展名（包含前导点）
    pub file_extensions: Vec<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 是否写入日志文件
    pub enabled: bool,
    /// 是否同时输出到控制台
    pub echo_console: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            find_token: "Product.Subproduct".to_string(),
            replace_token: "Company.Product.Subproduct".to_string(),
            root_path: ".".to_string(),
        }
    }
}

impl Default for VersionControlConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Command,
            executable_path:
                r"C:\Program Files\Microsoft Visual Studio 9.0\Common7\IDE\tf.exe".to_string(),
            strict_exit_status: false,
        }
    }
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            directories: vec![
                "bin".to_string(),
                "obj".to_string(),
                "TestResults".to_string(),
            ],
            file_extensions: vec![
                ".dll".to_string(),
                ".exe".to_string(),
                ".pdb".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            echo_console: true,
        }
    }
}

impl Config {
    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            println!("已创建默认配置文件: {}", config_path.display());
            Ok(config)
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)
            .context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径
    pub fn default_config_path() -> Result<PathBuf> {
        // 尝试获取程序所在目录
        let exe_path = std::env::current_exe()
            .context("无法获取程序路径")?;

        let exe_dir = exe_path.parent()
            .context("无法获取程序目录")?;

        Ok(exe_dir.join("config.toml"))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.rename.find_token.is_empty() {
            anyhow::bail!("find_token 不能为空");
        }

        if self.rename.find_token == self.rename.replace_token {
            anyhow::bail!("find_token 与 replace_token 不能相同");
        }

        if self.rename.root_path.trim().is_empty() {
            anyhow::bail!("root_path 不能为空");
        }

        if self.version_control.backend == Backend::Command
            && self.version_control.executable_path.trim().is_empty()
        {
            anyhow::bail!("使用 command 后端时 executable_path 不能为空");
        }

        Ok(())
    }

    /// 排除规则
    pub fn exclusion_sets(&self) -> ExclusionSets {
        ExclusionSets::new(
            self.exclude.directories.clone(),
            self.exclude.file_extensions.clone(),
        )
    }

    /// 根目录的绝对路径，相对路径基于当前工作目录
    pub fn root_path(&self) -> Result<PathBuf> {
        let root = PathBuf::from(&self.rename.root_path);
        if root.is_absolute() {
            return Ok(root);
        }

        let current_dir = std::env::current_dir()
            .context("无法获取当前工作目录")?;
        Ok(current_dir.join(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rename.find_token, "Product.Subproduct");
        assert_eq!(config.rename.replace_token, "Company.Product.Subproduct");
        assert_eq!(config.version_control.backend, Backend::Command);
        assert!(!config.version_control.strict_exit_status);
        assert!(config.exclude.directories.contains(&"TestResults".to_string()));
        assert!(config.exclude.file_extensions.contains(&".pdb".to_string()));
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.rename.find_token, deserialized.rename.find_token);
        assert_eq!(
            config.version_control.executable_path,
            deserialized.version_control.executable_path
        );
        assert_eq!(config.exclude.directories, deserialized.exclude.directories);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [rename]
            find_token = "A.B"
            replace_token = "X.A.B"

            [version_control]
            backend = "none"
            "#,
        )
        .unwrap();

        assert_eq!(config.rename.find_token, "A.B");
        assert_eq!(config.rename.root_path, ".");
        assert_eq!(config.version_control.backend, Backend::None);
        assert_eq!(config.exclude.directories.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        // 不存在时创建默认配置
        let created = Config::load_or_create(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(created.rename.replace_token, loaded.rename.replace_token);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[rename\nfind_token = ").unwrap();

        assert!(Config::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.rename.find_token = String::new();
        assert!(config.validate().is_err());

        config = Config::default();
        config.rename.replace_token = config.rename.find_token.clone();
        assert!(config.validate().is_err());

        config = Config::default();
        config.rename.root_path = "  ".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.version_control.executable_path = String::new();
        assert!(config.validate().is_err());
        config.version_control.backend = Backend::None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_exclusion_sets_and_root_path() {
        let mut config = Config::default();
        let exclusions = config.exclusion_sets();
        assert!(exclusions.is_directory_excluded("obj"));
        assert!(exclusions.is_extension_excluded(".exe"));

        assert!(config.root_path().unwrap().is_absolute());

        let temp_dir = tempdir().unwrap();
        config.rename.root_path = temp_dir.path().to_string_lossy().into_owned();
        assert_eq!(config.root_path().unwrap(), temp_dir.path());
    }
}
