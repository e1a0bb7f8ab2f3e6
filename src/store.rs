use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::batch::StagedWrites;
use crate::config::EditorConfig;
use crate::document::{StringDocument, StringTable, TableEntry};
use crate::io::{DefaultDocumentReader, DefaultDocumentWriter, DocumentReader, DocumentWriter};
use crate::utils::{ensure_valid_name, is_valid_name, StoreError};


/// 字符串仓库
///
/// 根目录下每个子目录是一个模块，模块目录中的 `<语言>.<扩展名>` 文件是该语言的文档。
/// 所有操作都显式传入模块和语言，每次调用都重新从磁盘读取，不做缓存。
///
/// # 使用示例
///
/// ```rust,ignore
/// use lang_editor::StringStore;
///
/// let store = StringStore::open("bot/lang")?;
/// for module in store.list_modules()? {
///     let table = store.get_table(&module, "en")?;
///     println!("{}: {} 个字符串", module, table.len());
/// }
///
/// store.add_string_key("core", "farewell")?;
/// ```
pub struct StringStore {
    root: PathBuf,
    extension: String,
    backup: bool,
    reader: Box<dyn DocumentReader>,
    writer: Box<dyn DocumentWriter>,
}

impl StringStore {
    /// 使用默认配置打开根目录
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::with_config(root, &EditorConfig::default())
    }

    /// 使用指定配置打开根目录，根目录必须已存在
    pub fn with_config(root: impl Into<PathBuf>, config: &EditorConfig) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::RootUnavailable(root));
        }

        Ok(Self {
            root,
            extension: config.extension.clone(),
            backup: config.backup,
            reader: Box::new(DefaultDocumentReader),
            writer: Box::new(DefaultDocumentWriter),
        })
    }

    /// 打开项目目录下的语言目录（`config.lang_dir`），不存在时自动创建
    ///
    /// 同名的非目录条目会导致 RootUnavailable，不会被删除
    pub fn open_project(project_root: &Path, config: &EditorConfig) -> Result<Self, StoreError> {
        if !project_root.is_dir() {
            return Err(StoreError::RootUnavailable(project_root.to_path_buf()));
        }

        let lang_path = project_root.join(&config.lang_dir);
        if lang_path.exists() && !lang_path.is_dir() {
            return Err(StoreError::RootUnavailable(lang_path));
        }

        if !lang_path.exists() {
            fs::create_dir(&lang_path)?;
            info!("已创建语言目录: {:?}", lang_path);
        }

        Self::with_config(lang_path, config)
    }

    /// 替换 IO 实现（用于测试或自定义存储）
    pub fn with_io(
        mut self,
        reader: Box<dyn DocumentReader>,
        writer: Box<dyn DocumentWriter>,
    ) -> Self {
        self.reader = reader;
        self.writer = writer;
        self
    }

    /// 根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 文档扩展名
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// 列出所有模块（按名称排序）
    pub fn list_modules(&self) -> Result<Vec<String>, StoreError> {
        let mut modules = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => modules.push(name),
                Err(name) => warn!("跳过非 UTF-8 模块名: {:?}", name),
            }
        }

        modules.sort();
        Ok(modules)
    }

    /// 列出所有语言（去重，按首次发现的顺序）
    pub fn list_languages(&self) -> Result<Vec<String>, StoreError> {
        let mut languages: Vec<String> = Vec::new();

        for module in self.list_modules()? {
            for (language, _) in self.document_files(&self.root.join(&module))? {
                if !languages.contains(&language) {
                    languages.push(language);
                }
            }
        }

        Ok(languages)
    }

    /// 列出模块中所有字符串键
    ///
    /// 读取模块的全部文档，按首次出现的顺序合并去重
    pub fn list_string_keys(&self, module: &str) -> Result<Vec<String>, StoreError> {
        let module_path = self.require_module(module)?;
        self.collect_keys(&module_path)
    }

    /// 获取 (模块, 语言) 的对账后字符串表
    ///
    /// 语言文档不存在时视为空文档，缺失的值用空字符串填充
    pub fn get_table(&self, module: &str, language: &str) -> Result<StringTable, StoreError> {
        let module_path = self.require_module(module)?;
        ensure_valid_name(language)?;
        let keys = self.collect_keys(&module_path)?;
        let document = self.load_document(&self.document_path(&module_path, language))?;

        Ok(reconcile(&keys, &document))
    }

    /// 用字符串表整体覆盖 (模块, 语言) 的文档
    ///
    /// 只影响这一个文档：表中没有的键会从该语言的文档中丢失。
    ///
    /// # 返回
    /// 模块不存在时返回 `Ok(false)`
    pub fn save_table(&self, module: &str, language: &str, table: &[TableEntry]) -> Result<bool, StoreError> {
        self.save_all_tables(module, &[(language.to_string(), table.to_vec())])
    }

    /// 一次性保存同一模块多个语言的字符串表
    ///
    /// 所有文档先暂存、统一校验后再写入
    pub fn save_all_tables(&self, module: &str, tables: &[(String, StringTable)]) -> Result<bool, StoreError> {
        let module_path = match self.module_path(module) {
            Some(path) => path,
            None => return Ok(false),
        };

        let mut staged = StagedWrites::new();
        for (language, table) in tables {
            ensure_valid_name(language)?;
            let document = StringDocument::from_table(table);
            staged.stage(self.document_path(&module_path, language), document.to_yaml_string()?);
        }

        let count = staged.commit(self.writer.as_ref(), self.backup)?;
        debug!("模块 {} 已保存 {} 个文档", module, count);
        Ok(true)
    }

    /// 修改单个字符串的值
    ///
    /// # 返回
    /// 模块不存在或键不在模块的键集合中时返回 `Ok(false)`
    pub fn set_value(&self, module: &str, language: &str, key: &str, value: &str) -> Result<bool, StoreError> {
        if self.module_path(module).is_none() {
            return Ok(false);
        }

        let mut table = self.get_table(module, language)?;
        match table.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value.to_string(),
            None => return Ok(false),
        }

        self.save_table(module, language, &table)
    }

    /// 为模块的所有语言添加一个空字符串
    ///
    /// # 返回
    /// 模块不存在或键已存在时返回 `Ok(false)`
    pub fn add_string_key(&self, module: &str, key: &str) -> Result<bool, StoreError> {
        let module_path = match self.module_path(module) {
            Some(path) => path,
            None => return Ok(false),
        };

        if key.is_empty() {
            return Err(StoreError::InvalidName(key.to_string()));
        }

        let keys = self.collect_keys(&module_path)?;
        if keys.iter().any(|k| k == key) {
            return Ok(false);
        }

        let staged = self.stage_for_all_languages(&module_path, &keys, |table| {
            table.push(TableEntry::new(key, ""));
        })?;
        staged.commit(self.writer.as_ref(), self.backup)?;

        info!("模块 {} 已添加字符串: {}", module, key);
        Ok(true)
    }

    /// 从模块的所有语言中删除一个字符串
    ///
    /// # 返回
    /// 模块不存在或键不存在时返回 `Ok(false)`
    pub fn delete_string_key(&self, module: &str, key: &str) -> Result<bool, StoreError> {
        let module_path = match self.module_path(module) {
            Some(path) => path,
            None => return Ok(false),
        };

        let keys = self.collect_keys(&module_path)?;
        if !keys.iter().any(|k| k == key) {
            return Ok(false);
        }

        let staged = self.stage_for_all_languages(&module_path, &keys, |table| {
            table.retain(|e| e.key != key);
        })?;
        staged.commit(self.writer.as_ref(), self.backup)?;

        info!("模块 {} 已删除字符串: {}", module, key);
        Ok(true)
    }

    /// 创建模块目录，并为每个已知语言创建空文档
    ///
    /// # 返回
    /// 模块已存在时返回 `Ok(false)`
    pub fn add_module(&self, name: &str) -> Result<bool, StoreError> {
        ensure_valid_name(name)?;

        if self.module_path(name).is_some() {
            return Ok(false);
        }

        let languages = self.list_languages()?;
        let module_path = self.root.join(name);
        fs::create_dir(&module_path)?;

        let empty = StringDocument::new().to_yaml_string()?;
        let mut staged = StagedWrites::new();
        for language in &languages {
            staged.stage(self.document_path(&module_path, language), empty.clone());
        }
        staged.commit(self.writer.as_ref(), self.backup)?;

        info!("已创建模块 {}（{} 个语言）", name, languages.len());
        Ok(true)
    }

    /// 为所有模块添加一个新语言
    ///
    /// 指定 `copy_from` 时，模块中存在该语言的文档则原样复制内容，否则写入空文档。
    ///
    /// # 返回
    /// 语言已存在时返回 `Ok(false)`；`copy_from` 不是已知语言时返回 LanguageNotFound
    pub fn add_language(&self, identifier: &str, copy_from: Option<&str>) -> Result<bool, StoreError> {
        ensure_valid_name(identifier)?;

        let languages = self.list_languages()?;
        if languages.iter().any(|l| l == identifier) {
            return Ok(false);
        }

        if let Some(source) = copy_from {
            if !languages.iter().any(|l| l == source) {
                return Err(StoreError::LanguageNotFound(source.to_string()));
            }
        }

        let empty = StringDocument::new().to_yaml_string()?;
        let mut staged = StagedWrites::new();

        for module in self.list_modules()? {
            let module_path = self.root.join(&module);
            let copied = match copy_from {
                Some(source) => self.reader.read_bytes(&self.document_path(&module_path, source))?,
                None => None,
            };

            staged.stage(
                self.document_path(&module_path, identifier),
                copied.unwrap_or_else(|| empty.clone().into_bytes()),
            );
        }

        let count = staged.commit(self.writer.as_ref(), self.backup)?;
        info!("已添加语言 {}（{} 个模块）", identifier, count);
        Ok(true)
    }

    /// 模块路径，模块不存在时返回 None
    fn module_path(&self, module: &str) -> Option<PathBuf> {
        if !is_valid_name(module) {
            return None;
        }

        let path = self.root.join(module);
        if path.is_dir() {
            Some(path)
        } else {
            None
        }
    }

    fn require_module(&self, module: &str) -> Result<PathBuf, StoreError> {
        self.module_path(module)
            .ok_or_else(|| StoreError::ModuleNotFound(module.to_string()))
    }

    fn document_path(&self, module_path: &Path, language: &str) -> PathBuf {
        module_path.join(format!("{}.{}", language, self.extension))
    }

    /// 模块目录中的所有语言文档（按文件名排序）
    fn document_files(&self, module_path: &Path) -> Result<Vec<(String, PathBuf)>, StoreError> {
        let suffix = format!(".{}", self.extension);
        let mut files = Vec::new();

        for entry in fs::read_dir(module_path)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let file_name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(name) => {
                    warn!("跳过非 UTF-8 文件名: {:?}", name);
                    continue;
                }
            };

            if let Some(language) = file_name.strip_suffix(&suffix) {
                if !language.is_empty() {
                    files.push((language.to_string(), path));
                }
            }
        }

        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files)
    }

    fn load_document(&self, path: &Path) -> Result<StringDocument, StoreError> {
        match self.reader.read(path)? {
            Some(text) => {
                debug!("读取文档: {:?}", path);
                StringDocument::parse(&text, path)
            }
            None => Ok(StringDocument::new()),
        }
    }

    /// 合并模块中所有文档的键
    fn collect_keys(&self, module_path: &Path) -> Result<Vec<String>, StoreError> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();

        for (_, path) in self.document_files(module_path)? {
            let document = self.load_document(&path)?;
            for key in document.keys() {
                if seen.insert(key.to_string()) {
                    keys.push(key.to_string());
                }
            }
        }

        Ok(keys)
    }

    /// 为每个已知语言生成修改后的文档并暂存
    fn stage_for_all_languages<F>(
        &self,
        module_path: &Path,
        keys: &[String],
        mut edit: F,
    ) -> Result<StagedWrites, StoreError>
    where
        F: FnMut(&mut StringTable),
    {
        let mut staged = StagedWrites::new();

        for language in self.list_languages()? {
            let path = self.document_path(module_path, &language);
            let mut table = reconcile(keys, &self.load_document(&path)?);
            edit(&mut table);
            staged.stage(path, StringDocument::from_table(&table).to_yaml_string()?);
        }

        Ok(staged)
    }
}

/// 按键集合的顺序生成字符串表，每个键只出现一次
fn reconcile(keys: &[String], document: &StringDocument) -> StringTable {
    let mut emitted = HashSet::new();
    let mut table = Vec::with_capacity(keys.len());

    for key in keys {
        if emitted.insert(key.as_str()) {
            table.push(TableEntry::new(key.clone(), document.get(key).unwrap_or_default()));
        }
    }

    table
}
