pub mod batch;
pub mod config;
pub mod document;
pub mod io;
pub mod store;
pub mod utils;

// 重新导出主要结构
pub use batch::{PendingWrite, StagedWrites};
pub use config::{validate_project_root, EditorConfig};
pub use document::{StringDocument, StringTable, TableEntry};
pub use store::StringStore;
pub use utils::{is_valid_name, StoreError};

// 常量定义
pub const DEFAULT_EXTENSION: &str = "yml";
