//! # 路径工具函数
//!
//! 提供与文件路径相关的工具函数，包括：
//! - 获取客户端配置目录路径（`~/.mo/CodeViewer/`）
//! - 提取文件扩展名
//! - 扩展名到语法高亮语言标签的静态映射

use std::path::{Path, PathBuf};

/// 扩展名 → 语言标签映射表
///
/// 仅供渲染层选择语法高亮，核心逻辑只负责把扩展名原样传递下去。
/// 新增语言时在此追加一行即可。
const LANGUAGE_TABLE: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("rs", "rust"),
    ("go", "go"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("rb", "ruby"),
    ("php", "php"),
    ("swift", "swift"),
    ("html", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("json", "json"),
    ("xml", "xml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("md", "markdown"),
    ("sh", "bash"),
    ("sql", "sql"),
    ("vue", "vue"),
];

/// 获取客户端配置目录的绝对路径
///
/// 配置独立存储在 `~/.mo/CodeViewer/` 下。
///
/// # 错误
/// 如果无法确定用户主目录，返回错误信息。
pub fn get_config_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "无法获取用户主目录".to_string())?;
    Ok(home.join(".mo").join("CodeViewer"))
}

/// 提取文件扩展名（不含点，保持原始大小写）
///
/// 同时接受 `/` 和 `\` 分隔的路径：后端可能运行在 Windows 上。
pub fn file_extension(path: &str) -> Option<String> {
    let file_name = path.rsplit(['/', '\\']).next()?;
    Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
}

/// 查询扩展名对应的语言标签（忽略大小写）
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    LANGUAGE_TABLE
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, language)| *language)
}
