use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use lang_editor::{validate_project_root, EditorConfig, StringStore, StringTable};

#[derive(Parser)]
#[command(name = "lang_editor")]
#[command(about = "编辑按模块和语言组织的 YAML 翻译字符串文件")]
#[command(version)]
struct Cli {
    /// 语言目录（每个子目录是一个模块）；使用 --project 时为项目根目录
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// 将 --root 视为项目根目录，使用其下的语言目录（不存在时自动创建）
    #[arg(long)]
    project: bool,

    /// 配置文件路径（默认读取 <root>/lang_editor.toml）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 列出所有模块
    Modules,
    /// 列出所有语言
    Languages,
    /// 列出模块中的所有字符串键
    Keys { module: String },
    /// 以 JSON 输出 (模块, 语言) 的字符串表
    Show { module: String, language: String },
    /// 修改单个字符串的值
    Set {
        module: String,
        language: String,
        key: String,
        value: String,
    },
    /// 用 JSON 字符串表覆盖 (模块, 语言) 的文档
    Save {
        module: String,
        language: String,
        /// JSON 文件路径，省略时从标准输入读取
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// 为模块的所有语言添加字符串
    AddKey { module: String, key: String },
    /// 从模块的所有语言中删除字符串
    DeleteKey { module: String, key: String },
    /// 创建模块
    AddModule { name: String },
    /// 添加语言
    AddLanguage {
        language: String,
        /// 从已有语言复制内容
        #[arg(long)]
        copy_from: Option<String>,
    },
    /// 校验项目根目录
    CheckRoot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli);

    let config = load_config(&cli)?;

    if let Command::CheckRoot = cli.command {
        return handle_check_root(&cli, &config);
    }

    let store = open_store(&cli, &config)?;
    match &cli.command {
        Command::Modules => print_lines(&store.list_modules()?),
        Command::Languages => print_lines(&store.list_languages()?),
        Command::Keys { module } => print_lines(&store.list_string_keys(module)?),
        Command::Show { module, language } => handle_show(&store, module, language)?,
        Command::Set { module, language, key, value } => {
            if !store.set_value(module, language, key, value)? {
                bail!("模块或字符串不存在: {}/{}", module, key);
            }
            report(&cli, format!("已更新 {}/{}.{}", module, language, key));
        }
        Command::Save { module, language, input } => {
            handle_save(&cli, &store, module, language, input.as_deref())?
        }
        Command::AddKey { module, key } => {
            if !store.add_string_key(module, key)? {
                bail!("模块不存在或字符串已存在: {}/{}", module, key);
            }
            report(&cli, format!("已添加字符串 {}/{}", module, key));
        }
        Command::DeleteKey { module, key } => {
            if !store.delete_string_key(module, key)? {
                bail!("模块或字符串不存在: {}/{}", module, key);
            }
            report(&cli, format!("已删除字符串 {}/{}", module, key));
        }
        Command::AddModule { name } => {
            if !store.add_module(name)? {
                bail!("模块已存在: {}", name);
            }
            report(&cli, format!("已创建模块 {}", name));
        }
        Command::AddLanguage { language, copy_from } => {
            if !store.add_language(language, copy_from.as_deref())? {
                bail!("语言已存在: {}", language);
            }
            report(&cli, format!("已添加语言 {}", language));
        }
        Command::CheckRoot => unreachable!(),
    }

    Ok(())
}

/// 初始化日志，RUST_LOG 优先
fn init_logger(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// 加载配置
fn load_config(cli: &Cli) -> Result<EditorConfig> {
    match &cli.config {
        Some(path) => EditorConfig::from_file(path),
        None => EditorConfig::load(&cli.root),
    }
}

/// 打开字符串仓库
fn open_store(cli: &Cli, config: &EditorConfig) -> Result<StringStore> {
    let store = if cli.project {
        StringStore::open_project(&cli.root, config)
    } else {
        StringStore::with_config(cli.root.clone(), config)
    };

    store.with_context(|| format!("无法打开语言目录: {:?}", cli.root))
}

/// 处理根目录校验
fn handle_check_root(cli: &Cli, config: &EditorConfig) -> Result<()> {
    if !validate_project_root(&cli.root, config) {
        bail!("无效的项目目录: {:?}", cli.root);
    }

    report(cli, format!("项目目录有效: {:?}", cli.root));
    Ok(())
}

/// 输出字符串表
fn handle_show(store: &StringStore, module: &str, language: &str) -> Result<()> {
    let table = store.get_table(module, language)?;
    let json_output = serde_json::to_string_pretty(&table)
        .context("序列化JSON失败")?;
    println!("{}", json_output);
    Ok(())
}

/// 处理字符串表保存
fn handle_save(
    cli: &Cli,
    store: &StringStore,
    module: &str,
    language: &str,
    input: Option<&Path>,
) -> Result<()> {
    let json = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("读取字符串表文件失败: {:?}", path))?,
        None => {
            if !cli.quiet {
                eprintln!("等待从标准输入读取JSON数据... (Ctrl+D结束输入)");
            }
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("从标准输入读取失败")?;
            buffer
        }
    };

    let table: StringTable = serde_json::from_str(&json).context("解析字符串表JSON失败")?;
    if !store.save_table(module, language, &table)? {
        bail!("模块不存在: {}", module);
    }

    report(cli, format!("已保存 {} 个字符串到 {}/{}", table.len(), module, language));
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn report(cli: &Cli, message: String) {
    if !cli.quiet {
        println!("{}", message);
    }
}
