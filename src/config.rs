/// 配置模块
///
/// EditorConfig 通常从 `lang_editor.toml` 载入，文件不存在时使用默认值。
/// 同时提供项目根目录的校验逻辑。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "lang_editor.toml";

/// 编辑器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// 语言文档扩展名（不含点）
    pub extension: String,
    /// 项目根目录下存放模块的目录名
    pub lang_dir: String,
    /// 覆盖文档前是否创建备份
    pub backup: bool,
    /// 项目根目录下必须存在的条目
    pub required_files: Vec<String>,
    /// 需要进一步检查内容的子目录
    pub nested_dir: String,
    /// 子目录中必须存在的条目
    pub required_nested_files: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            extension: crate::DEFAULT_EXTENSION.to_string(),
            lang_dir: "lang".to_string(),
            backup: false,
            required_files: vec![
                "bot".to_string(),
                "run.py".to_string(),
                "config.yml.example".to_string(),
            ],
            nested_dir: "bot".to_string(),
            required_nested_files: vec![
                "bot.py".to_string(),
                "command.py".to_string(),
                "manager.py".to_string(),
                "events".to_string(),
                "libs".to_string(),
            ],
        }
    }
}

impl EditorConfig {
    /// 从指定路径读取配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("读取配置失败: {}", path.display()))?;
        let config: EditorConfig = toml::from_str(&raw)
            .with_context(|| format!("解析配置失败: {}", path.display()))?;
        Ok(config.normalize())
    }

    /// 从目录读取 `lang_editor.toml`，不存在时返回默认配置
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            Self::from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// 去掉扩展名前的点，例如 ".yaml" -> "yaml"
    fn normalize(mut self) -> Self {
        let trimmed = self.extension.trim().trim_start_matches('.').to_string();
        self.extension = if trimmed.is_empty() {
            Self::default().extension
        } else {
            trimmed
        };
        self
    }
}

/// 校验项目根目录
///
/// 统计根目录下名称属于 `required_files` 的条目，以及 `nested_dir` 子目录中
/// 名称属于 `required_nested_files` 的条目；总数等于两个列表长度之和才算有效。
/// `nested_dir` 本身不是目录时不计数。
pub fn validate_project_root(path: &Path, config: &EditorConfig) -> bool {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(_) => return false,
    };

    let mut validation_count = 0;

    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name().to_string_lossy().to_string();

        if name == config.nested_dir {
            let nested_path = entry.path();
            if !nested_path.is_dir() {
                continue;
            }

            validation_count += 1;
            if let Ok(nested) = fs::read_dir(&nested_path) {
                validation_count += nested
                    .filter_map(|e| e.ok())
                    .filter(|e| {
                        let nested_name = e.file_name().to_string_lossy().to_string();
                        config.required_nested_files.contains(&nested_name)
                    })
                    .count();
            }
        } else if config.required_files.contains(&name) {
            validation_count += 1;
        }
    }

    validation_count == config.required_files.len() + config.required_nested_files.len()
}
