/// 语言文档 IO 实现
///
/// 提供基于文件系统的默认读写实现
use std::path::Path;
use super::traits::{DocumentReader, DocumentWriter};
use crate::utils::StoreError;

/// 默认的文档读取器（基于 std::fs）
#[derive(Debug, Clone, Default)]
pub struct DefaultDocumentReader;

impl DocumentReader for DefaultDocumentReader {
    fn read(&self, path: &Path) -> Result<Option<String>, StoreError> {
        if !path.is_file() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(path)?;
        // 去掉 UTF-8 BOM
        let text = match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };
        Ok(Some(text))
    }

    fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        if !path.is_file() {
            return Ok(None);
        }

        Ok(Some(std::fs::read(path)?))
    }
}

/// 默认的文档写入器（基于 std::fs）
#[derive(Debug, Clone, Default)]
pub struct DefaultDocumentWriter;

impl DocumentWriter for DefaultDocumentWriter {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        std::fs::write(path, contents)?;
        Ok(())
    }
}
