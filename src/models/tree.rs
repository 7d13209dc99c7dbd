//! # 项目目录树数据模型
//!
//! 定义了目录列表接口返回的条目（`DirEntry`）和前端目录树中的节点（`TreeNode`）。
//!
//! 目录树是惰性展开的：目录节点在第一次展开时才请求子节点，
//! 之后子节点一直保留在内存中，折叠操作只改变可见性。

use serde::{Deserialize, Serialize};

/// 分析结果旁路文件的后缀
///
/// 后端把文件 `foo.rs` 的分析结果保存在同目录的 `foo.rs.ai` 中。
/// 这类文件由后端管理，不在目录树中显示。
pub const ANALYSIS_SIDECAR_SUFFIX: &str = ".ai";

/// 目录列表接口返回的单个条目
///
/// 对应后端 `/api/files` 的返回数组元素：
/// ```json
/// { "name": "main.rs", "path": "/repo/src/main.rs", "isDirectory": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
    /// 条目名称（不含父路径）
    pub name: String,

    /// 条目的完整路径，由后端拼接，客户端原样使用
    pub path: String,

    /// 是否为目录
    pub is_directory: bool,
}

impl DirEntry {
    /// 是否为分析结果旁路文件（`.ai` 后缀的普通文件）
    ///
    /// 只过滤文件，名称恰好以 `.ai` 结尾的目录仍然正常显示。
    pub fn is_analysis_sidecar(&self) -> bool {
        !self.is_directory && self.name.ends_with(ANALYSIS_SIDECAR_SUFFIX)
    }
}

/// 目录节点的子节点加载状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Children {
    /// 尚未加载（或上一次加载失败），下一次展开时会发起请求
    #[default]
    Unloaded,
    /// 目录列表请求进行中
    Loading,
    /// 已加载，之后不再请求
    Loaded(Vec<TreeNode>),
}

/// 目录树节点
///
/// 文件节点的 `children` 始终为 `Unloaded`，`expanded` 始终为 `false`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub children: Children,
    pub expanded: bool,
}

impl TreeNode {
    /// 由目录列表条目创建一个未展开、未加载的节点
    pub fn from_entry(entry: DirEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            is_directory: entry.is_directory,
            children: Children::Unloaded,
            expanded: false,
        }
    }

    /// 子节点是否已经加载完成
    pub fn is_loaded(&self) -> bool {
        matches!(self.children, Children::Loaded(_))
    }
}

/// 将目录列表转换为树节点
///
/// 过滤掉分析旁路文件，其余条目保持后端返回的顺序，不重新排序。
pub fn build_nodes(entries: Vec<DirEntry>) -> Vec<TreeNode> {
    entries
        .into_iter()
        .filter(|entry| !entry.is_analysis_sidecar())
        .map(TreeNode::from_entry)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_directory: bool) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            path: format!("/repo/{}", name),
            is_directory,
        }
    }

    #[test]
    fn test_build_nodes_skips_sidecar_files_and_keeps_order() {
        let nodes = build_nodes(vec![
            entry("z.txt", false),
            entry("a.txt.ai", false),
            entry("src", true),
            entry("b.txt", false),
        ]);
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["z.txt", "src", "b.txt"]);
    }

    #[test]
    fn test_directory_with_ai_suffix_is_kept() {
        let nodes = build_nodes(vec![entry("models.ai", true)]);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_directory);
    }

    #[test]
    fn test_dir_entry_uses_camel_case_wire_names() {
        let parsed: DirEntry =
            serde_json::from_str(r#"{"name":"a.txt","path":"/p/a.txt","isDirectory":false}"#)
                .unwrap();
        assert_eq!(parsed, entry_at("a.txt", "/p/a.txt"));
    }

    fn entry_at(name: &str, path: &str) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            path: path.to_string(),
            is_directory: false,
        }
    }
}
