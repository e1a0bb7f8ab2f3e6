/// 批量写入模块
///
/// 涉及多个语言文档的操作（添加/删除字符串、添加语言、添加模块）先把所有新内容
/// 暂存在内存中，校验全部目标路径可写之后再统一提交。
/// 校验失败时不会写入任何文件；提交阶段的失败会报告已写入和失败的文件。

use std::path::{Path, PathBuf};
use log::{debug, warn};

use crate::io::DocumentWriter;
use crate::utils::{create_backup, StoreError};

/// 单个待写入的文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    /// 目标文件路径
    pub path: PathBuf,
    /// 完整文件内容（原始字节）
    pub contents: Vec<u8>,
}

/// 暂存的文档写入集合
#[derive(Debug, Clone, Default)]
pub struct StagedWrites {
    writes: Vec<PendingWrite>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// 暂存一个写入，同一路径重复暂存时以最后一次为准
    pub fn stage(&mut self, path: PathBuf, contents: impl Into<Vec<u8>>) {
        let contents = contents.into();
        match self.writes.iter_mut().find(|w| w.path == path) {
            Some(existing) => existing.contents = contents,
            None => self.writes.push(PendingWrite { path, contents }),
        }
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// 按暂存顺序遍历待写入内容
    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite> {
        self.writes.iter()
    }

    /// 校验所有目标路径
    ///
    /// # 规则
    /// - 父目录必须存在且是目录
    /// - 目标若已存在，必须是普通文件且不是只读
    pub fn validate(&self) -> Result<(), StoreError> {
        let failed: Vec<(PathBuf, String)> = self
            .writes
            .iter()
            .filter_map(|w| check_writable(&w.path).err().map(|reason| (w.path.clone(), reason)))
            .collect();

        if failed.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Unwritable(failed))
        }
    }

    /// 校验并提交所有写入
    ///
    /// # 参数
    /// * `writer` - 文档写入器
    /// * `backup` - 覆盖已有文件前是否先创建备份
    ///
    /// # 返回
    /// 返回写入的文件数量
    pub fn commit(self, writer: &dyn DocumentWriter, backup: bool) -> Result<usize, StoreError> {
        self.validate()?;

        let mut written = Vec::new();
        let mut failed = Vec::new();

        for write in self.writes {
            match commit_one(writer, &write, backup) {
                Ok(()) => {
                    debug!("已写入: {:?}", write.path);
                    written.push(write.path);
                }
                Err(e) => {
                    warn!("写入失败 {:?}: {}", write.path, e);
                    failed.push((write.path, e.to_string()));
                }
            }
        }

        if failed.is_empty() {
            Ok(written.len())
        } else {
            Err(StoreError::PartialCommit { written, failed })
        }
    }
}

fn commit_one(writer: &dyn DocumentWriter, write: &PendingWrite, backup: bool) -> Result<(), StoreError> {
    if backup && write.path.is_file() {
        let backup_path = create_backup(&write.path)?;
        debug!("已创建备份: {:?}", backup_path);
    }

    writer.write(&write.path, &write.contents)
}

fn check_writable(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if parent.is_dir() => {}
        Some(parent) => return Err(format!("目录不存在: {:?}", parent)),
        None => return Err("无效的文件路径".to_string()),
    }

    if path.exists() {
        let metadata = std::fs::metadata(path).map_err(|e| e.to_string())?;
        if !metadata.is_file() {
            return Err("目标不是普通文件".to_string());
        }
        if metadata.permissions().readonly() {
            return Err("目标文件只读".to_string());
        }
    }

    Ok(())
}
