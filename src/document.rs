/// 语言文档模块
///
/// 语言文档是单个 (模块, 语言) 对应的 YAML 文件，内容为扁平的 键 -> 值 映射。
/// StringDocument 是有序且键唯一的映射，保证序列化结果稳定。

use std::path::Path;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::utils::StoreError;

/// 字符串表条目（键 + 值）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// 字符串键
    pub key: String,
    /// 字符串值（未翻译时为空字符串）
    #[serde(default)]
    pub value: String,
}

impl TableEntry {
    /// 创建新的条目
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 对账后的字符串表，顺序与模块的键集合一致
pub type StringTable = Vec<TableEntry>;

/// 有序的语言文档
///
/// # 实现细节
/// - 条目按插入顺序存储
/// - 重复插入同一个键时保留原位置，仅替换值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringDocument {
    entries: Vec<TableEntry>,
}

impl StringDocument {
    /// 创建空文档
    pub fn new() -> Self {
        Self::default()
    }

    /// 从字符串表构建文档，重复的键以最后一次出现的值为准
    pub fn from_table(table: &[TableEntry]) -> Self {
        let mut document = Self::new();
        for entry in table {
            document.insert(entry.key.clone(), entry.value.clone());
        }
        document
    }

    /// 解析 YAML 文本
    ///
    /// 空文本、`null`、`{}` 和 `[]` 都视为空文档。
    ///
    /// # 参数
    /// * `text` - 文件内容
    /// * `path` - 文件路径（仅用于错误信息）
    pub fn parse(text: &str, path: &Path) -> Result<Self, StoreError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }

        let value: Value = serde_yaml::from_str(text)?;
        let mapping = match value {
            Value::Null => return Ok(Self::new()),
            Value::Mapping(mapping) => mapping,
            Value::Sequence(seq) if seq.is_empty() => return Ok(Self::new()),
            other => {
                return Err(StoreError::InvalidDocument {
                    path: path.to_path_buf(),
                    reason: format!("顶层必须是映射，实际为 {}", describe_value(&other)),
                })
            }
        };

        let mut document = Self::new();
        for (key, value) in mapping {
            document.insert(coerce_to_text(&key)?, coerce_to_text(&value)?);
        }

        Ok(document)
    }

    /// 序列化为 YAML 文本，空文档输出 `{}`
    pub fn to_yaml_string(&self) -> Result<String, StoreError> {
        let mut mapping = Mapping::new();
        for entry in &self.entries {
            mapping.insert(
                Value::String(entry.key.clone()),
                Value::String(entry.value.clone()),
            );
        }

        Ok(serde_yaml::to_string(&mapping)?)
    }

    /// 插入或替换一个值
    pub fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(TableEntry { key, value }),
        }
    }

    /// 获取键对应的值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// 删除键，返回被删除的值
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(index).value)
    }

    /// 检查键是否存在
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// 按顺序遍历所有键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// 按顺序遍历所有条目
    pub fn iter(&self) -> impl Iterator<Item = &TableEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 数字转文本，整数值的浮点数不带小数部分（`1.0` → `1`）
fn number_to_text(n: &serde_yaml::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// 将 YAML 标量转换为文本
///
/// null 视为空字符串，嵌套结构使用其 YAML 文本
fn coerce_to_text(value: &Value) -> Result<String, StoreError> {
    let text = match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_text(n),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => coerce_to_text(&tagged.value)?,
        Value::Sequence(_) | Value::Mapping(_) => serde_yaml::to_string(value)?.trim_end().to_string(),
    };
    Ok(text)
}

fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "布尔值",
        Value::Number(_) => "数字",
        Value::String(_) => "字符串",
        Value::Sequence(_) => "序列",
        Value::Mapping(_) => "映射",
        Value::Tagged(_) => "带标签的值",
    }
}
