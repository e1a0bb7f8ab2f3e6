use std::path::{Path, PathBuf};
use thiserror::Error;

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Language not found: {0}")]
    LanguageNotFound(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Root directory unavailable: {0:?}")]
    RootUnavailable(PathBuf),

    #[error("Invalid document {path:?}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("Unwritable targets: {}", .0.len())]
    Unwritable(Vec<(PathBuf, String)>),

    #[error("Partial commit: {} written, {} failed", .written.len(), .failed.len())]
    PartialCommit {
        written: Vec<PathBuf>,
        failed: Vec<(PathBuf, String)>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// 检查模块名或语言名是否可以安全地作为文件名使用
///
/// 不允许空名称、路径分隔符以及 `.`/`..`
pub fn is_valid_name(name: &str) -> bool {
    if name.trim().is_empty() || name == "." || name == ".." {
        return false;
    }

    !name.chars().any(|c| c == '/' || c == '\\' || c == '\0')
}

/// 校验名称，不合法时返回 InvalidName
pub(crate) fn ensure_valid_name(name: &str) -> Result<(), StoreError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<PathBuf, StoreError> {
    if !file_path.exists() {
        return Err(StoreError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在"
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S-%3f").to_string();
    let mut backup_path = file_path.with_extension(format!("{}.bak", timestamp));
    let mut counter = 1;
    while backup_path.exists() {
        backup_path = file_path.with_extension(format!("{}-{}.bak", timestamp, counter));
        counter += 1;
    }

    std::fs::copy(file_path, &backup_path)?;

    Ok(backup_path)
}
