use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 遍历和改写所需的文件系统操作
pub trait FileSystem {
    /// 列出目录下的直接子目录，顺序与文件系统枚举顺序一致
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
    /// 列出目录下的直接子文件
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
    /// 以 UTF-8 读取全部内容，无效字节按替换字符解码
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn write_string(&self, path: &Path, contents: &str) -> io::Result<()>;
    /// 清除只读属性，返回是否做了修改
    fn clear_readonly(&self, path: &Path) -> io::Result<bool>;
    /// 路径是否已存在（不跟随符号链接）
    fn exists(&self, path: &Path) -> bool;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).list_dirs(dir)
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).list_files(dir)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write_string(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write_string(path, contents)
    }

    fn clear_readonly(&self, path: &Path) -> io::Result<bool> {
        (**self).clear_readonly(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }
}

/// 操作系统文件系统
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    fn list_entries(dir: &Path, want_dirs: bool) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;

            // 不跟随符号链接
            let wanted = if want_dirs {
                file_type.is_dir()
            } else {
                file_type.is_file()
            };

            if wanted {
                entries.push(entry.path());
            }
        }

        Ok(entries)
    }
}

impl FileSystem for OsFileSystem {
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Self::list_entries(dir, true)
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Self::list_entries(dir, false)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;

        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    fn write_string(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    #[allow(clippy::permissions_set_readonly_false)]
    fn clear_readonly(&self, path: &Path) -> io::Result<bool> {
        let mut permissions = fs::metadata(path)?.permissions();

        if !permissions.readonly() {
            return Ok(false);
        }

        permissions.set_readonly(false);
        fs::set_permissions(path, permissions)?;

        Ok(true)
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_dirs_and_files() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("child")).unwrap();
        fs::write(temp_dir.path().join("file.txt"), "content").unwrap();

        let file_system = OsFileSystem;
        let dirs = file_system.list_dirs(temp_dir.path()).unwrap();
        let files = file_system.list_files(temp_dir.path()).unwrap();

        assert_eq!(dirs, vec![temp_dir.path().join("child")]);
        assert_eq!(files, vec![temp_dir.path().join("file.txt")]);
    }

    #[test]
    fn test_read_invalid_utf8_is_lossy() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("binary.bin");
        fs::write(&path, [b'o', b'k', 0xFF]).unwrap();

        let text = OsFileSystem.read_to_string(&path).unwrap();
        assert_eq!(text, "ok\u{FFFD}");
    }

    #[test]
    fn test_clear_readonly() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("locked.txt");
        fs::write(&path, "content").unwrap();

        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        let file_system = OsFileSystem;
        assert!(file_system.clear_readonly(&path).unwrap());
        assert!(!file_system.clear_readonly(&path).unwrap());

        file_system.write_string(&path, "updated").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
    }

    #[test]
    fn test_exists() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("present.txt");
        fs::write(&path, "content").unwrap();

        assert!(OsFileSystem.exists(&path));
        assert!(OsFileSystem.exists(temp_dir.path()));
        assert!(!OsFileSystem.exists(&temp_dir.path().join("absent.txt")));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let temp_dir = tempdir().unwrap();
        assert!(OsFileSystem.list_dirs(&temp_dir.path().join("missing")).is_err());
    }
}
