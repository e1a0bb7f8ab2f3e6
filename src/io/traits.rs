/// IO 抽象层 - trait 定义
///
/// 该模块定义了语言文档读写的抽象接口，支持依赖注入和测试 mock。

use std::path::Path;
use crate::utils::StoreError;

/// 语言文档读取 trait
///
/// # 职责
/// - 读取文档的原始文本
/// - 不负责解析，仅负责 IO
///
/// # 实现示例
/// ```rust,ignore
/// pub struct DefaultDocumentReader;
/// impl DocumentReader for DefaultDocumentReader {
///     fn read(&self, path: &Path) -> Result<Option<String>, StoreError> {
///         if !path.is_file() {
///             return Ok(None);
///         }
///         Ok(Some(std::fs::read_to_string(path)?))
///     }
/// }
/// ```
pub trait DocumentReader {
    /// 读取文档原始文本
    ///
    /// # 参数
    /// * `path` - 文件路径
    ///
    /// # 返回
    /// 文件不存在时返回 `None`（视为空文档，而不是错误）
    fn read(&self, path: &Path) -> Result<Option<String>, StoreError>;

    /// 读取文档的原始字节，不做任何解码
    ///
    /// 用于原样复制文档（例如从已有语言创建新语言）
    fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError>;
}

/// 语言文档写入 trait
///
/// # 职责
/// - 将序列化后的文本整体写入文件（覆盖写，不做增量修改）
/// - 不负责序列化，仅负责 IO
pub trait DocumentWriter {
    /// 写入文档文本
    ///
    /// # 参数
    /// * `path` - 目标文件路径
    /// * `contents` - 完整的文件内容
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError>;
}
