/// IO 抽象层模块
///
/// 该模块提供了语言文档读写的抽象接口，遵循依赖倒置原则。
/// 支持依赖注入、测试 mock 和替换 IO 实现（如内存 IO）。
///
/// # 架构设计
///
/// - **traits**: 定义 Reader/Writer trait 接口
/// - **fs_io**: 基于文件系统的默认实现
///
/// # 使用示例
///
/// ```rust,ignore
/// use lang_editor::io::{DefaultDocumentReader, DocumentReader};
///
/// let reader = DefaultDocumentReader;
/// let text = reader.read(Path::new("lang/core/en.yml"))?;
/// ```
pub mod traits;
pub mod fs_io;

// === 导出 trait 定义 ===
pub use traits::{DocumentReader, DocumentWriter};

// === 导出默认实现 ===
pub use fs_io::{DefaultDocumentReader, DefaultDocumentWriter};
