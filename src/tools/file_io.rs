//! 文件工具：FileWriter / FileReader
//!
//! SafeFs 绑定工作区根目录，读写路径都必须落在根下（禁止 ../ 与绝对路径逃逸）。
//! FileWriter 输入按第一个 '|' 切成 (filename, content)，整体覆盖写；
//! FileReader 读整个文件，空文件返回 "File is empty" 哨兵，不存在返回 not-found 观察。

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::tools::Tool;

/// 路径解析失败的两种形态：不存在（读侧可转哨兵）与逃逸（一律拒绝）
#[derive(Debug)]
enum ResolveError {
    NotFound,
    Escape,
    Invalid(String),
}

/// 沙箱文件系统：绑定根目录，所有路径必须解析到根下
#[derive(Debug, Clone)]
pub struct SafeFs {
    root: PathBuf,
}

impl SafeFs {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).ok();
        let root = root.canonicalize().unwrap_or(root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 读路径：目标必须存在且在根下
    fn resolve_read(&self, path: &str) -> Result<PathBuf, ResolveError> {
        let rel = Path::new(path.trim_start_matches("./"));
        if rel.as_os_str().is_empty() {
            return Err(ResolveError::Invalid("empty path".to_string()));
        }
        if rel.is_absolute() {
            return Err(ResolveError::Escape);
        }
        let full = self.root.join(rel);
        let canonical = full.canonicalize().map_err(|_| ResolveError::NotFound)?;
        if canonical.starts_with(&self.root) {
            Ok(canonical)
        } else {
            Err(ResolveError::Escape)
        }
    }

    /// 写路径：父目录必须存在且在根下，目标文件本身可以不存在
    fn resolve_write(&self, path: &str) -> Result<PathBuf, ResolveError> {
        let rel = Path::new(path.trim_start_matches("./"));
        if rel.as_os_str().is_empty() {
            return Err(ResolveError::Invalid("empty file name".to_string()));
        }
        if rel.is_absolute() {
            return Err(ResolveError::Escape);
        }
        let full = self.root.join(rel);
        let file_name = full
            .file_name()
            .ok_or_else(|| ResolveError::Invalid(format!("invalid file name '{}'", path)))?
            .to_os_string();
        let parent = full.parent().unwrap_or(&self.root);
        let parent = parent
            .canonicalize()
            .map_err(|_| ResolveError::Invalid(format!("directory not found for '{}'", path)))?;
        if parent.starts_with(&self.root) {
            Ok(parent.join(file_name))
        } else {
            Err(ResolveError::Escape)
        }
    }
}

/// FileWriter 工具：按 "filename|content" 覆盖写入
pub struct FileWriterTool {
    fs: SafeFs,
}

impl FileWriterTool {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { fs: SafeFs::new(root) }
    }
}

#[async_trait]
impl Tool for FileWriterTool {
    fn name(&self) -> &str {
        "FileWriter"
    }

    fn description(&self) -> &str {
        "Writes content to a file. Input format: 'filename.txt|content'"
    }

    async fn invoke(&self, input: &str) -> Result<String, String> {
        let (filename, content) = input
            .split_once('|')
            .ok_or_else(|| "input must be 'filename|content'".to_string())?;
        let filename = filename.trim();
        let resolved = match self.fs.resolve_write(filename) {
            Ok(p) => p,
            Err(ResolveError::Escape) => {
                return Err(format!("path '{}' escapes the workspace", filename));
            }
            Err(ResolveError::NotFound) | Err(ResolveError::Invalid(_)) => {
                return Err(format!("cannot write to '{}'", filename));
            }
        };
        tracing::info!(path = %resolved.display(), "file writer execute");
        std::fs::write(&resolved, content).map_err(|e| format!("writing file: {}", e))?;
        Ok(format!("Successfully wrote to {}", filename))
    }
}

/// FileReader 工具：读取文件全文
pub struct FileReaderTool {
    fs: SafeFs,
}

impl FileReaderTool {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { fs: SafeFs::new(root) }
    }
}

#[async_trait]
impl Tool for FileReaderTool {
    fn name(&self) -> &str {
        "FileReader"
    }

    fn description(&self) -> &str {
        "Reads content from a file. Input should be a filename."
    }

    async fn invoke(&self, input: &str) -> Result<String, String> {
        let filename = input.trim();
        let resolved = match self.fs.resolve_read(filename) {
            Ok(p) => p,
            // 不存在是正常观察结果，不是失败
            Err(ResolveError::NotFound) => {
                return Ok(format!("File '{}' not found", filename));
            }
            Err(ResolveError::Escape) => {
                return Err(format!("path '{}' escapes the workspace", filename));
            }
            Err(ResolveError::Invalid(msg)) => return Err(msg),
        };
        tracing::info!(path = %resolved.display(), "file reader execute");
        let content =
            std::fs::read_to_string(&resolved).map_err(|e| format!("reading file: {}", e))?;
        if content.is_empty() {
            Ok("File is empty".to_string())
        } else {
            Ok(content)
        }
    }
}
