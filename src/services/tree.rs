//! # 目录树浏览服务
//!
//! 维护惰性展开的项目目录树：
//! - 目录节点第一次展开时发起目录列表请求，成功后子节点永久缓存
//! - 折叠只改变可见性，不丢弃子节点，因此每个子目录在一棵树的生命周期内最多请求一次
//! - 请求失败时子节点回到未加载状态，下一次展开会重新请求
//!
//! ## 票据
//! 每次重建整棵树（加载新项目）时 `generation` 加一。
//! 目录列表请求携带发出时的 generation，响应到达时不一致即视为过期响应并丢弃。

use crate::error::ValidationError;
use crate::models::tree::{build_nodes, Children, DirEntry, TreeNode};
use crate::models::view::TreeRow;

/// 目录列表请求的票据：发出请求时的树版本号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeTicket(pub u64);

/// 需要运行时发出的子目录列表请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub path: String,
    pub ticket: TreeTicket,
}

/// 目录列表响应的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOutcome {
    /// 子节点已写入，`count` 为过滤后的子节点数量
    Applied { count: usize },
    /// 请求失败，节点回到未加载状态
    Failed,
    /// 过期响应（树已重建或节点不再等待该响应），已丢弃
    Stale,
}

/// 项目目录树
#[derive(Debug, Default)]
pub struct ProjectTree {
    /// 当前项目根路径；尚未加载任何项目时为 None
    root_path: Option<String>,
    /// 根目录下的节点
    roots: Vec<TreeNode>,
    /// 树版本号，每次重建加一
    generation: u64,
    /// 当前选中的文件路径
    selected: Option<String>,
}

impl ProjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用根目录列表重建整棵树
    ///
    /// 丢弃之前的所有节点、缓存和选中状态；仍在途中的旧子目录请求会因版本号变化而失效。
    pub fn reset(&mut self, root_path: impl Into<String>, entries: Vec<DirEntry>) {
        self.generation += 1;
        self.root_path = Some(root_path.into());
        self.roots = build_nodes(entries);
        self.selected = None;
    }

    pub fn root_path(&self) -> Option<&str> {
        self.root_path.as_deref()
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// 当前树版本对应的票据
    pub fn ticket(&self) -> TreeTicket {
        TreeTicket(self.generation)
    }

    /// 按路径查找节点
    pub fn node(&self, path: &str) -> Option<&TreeNode> {
        find(&self.roots, path)
    }

    /// 展开目录节点
    ///
    /// # 返回值
    /// - `Ok(Some(request))` - 子节点未加载，需要发出目录列表请求
    /// - `Ok(None)` - 子节点已加载或正在加载，只改变可见性
    ///
    /// # 错误
    /// 节点不存在或不是目录
    pub fn expand(&mut self, path: &str) -> Result<Option<ListRequest>, ValidationError> {
        let ticket = self.ticket();
        let node = self.directory_mut(path)?;
        node.expanded = true;

        if node.children == Children::Unloaded {
            node.children = Children::Loading;
            return Ok(Some(ListRequest {
                path: node.path.clone(),
                ticket,
            }));
        }
        Ok(None)
    }

    /// 折叠目录节点，保留已加载的子节点
    pub fn collapse(&mut self, path: &str) -> Result<(), ValidationError> {
        let node = self.directory_mut(path)?;
        node.expanded = false;
        Ok(())
    }

    /// 点击目录行：已展开则折叠，否则展开
    pub fn toggle(&mut self, path: &str) -> Result<Option<ListRequest>, ValidationError> {
        if self.directory_mut(path)?.expanded {
            self.collapse(path)?;
            Ok(None)
        } else {
            self.expand(path)
        }
    }

    /// 写入子目录列表响应
    ///
    /// 成功时按返回顺序写入子节点（过滤分析旁路文件）；
    /// 失败时节点回到未加载、折叠状态，用户再次展开即可重试。
    pub fn apply_listing<E>(
        &mut self,
        ticket: TreeTicket,
        path: &str,
        result: Result<Vec<DirEntry>, E>,
    ) -> ListingOutcome {
        if ticket != self.ticket() {
            return ListingOutcome::Stale;
        }
        let Some(node) = find_mut(&mut self.roots, path) else {
            return ListingOutcome::Stale;
        };
        if node.children != Children::Loading {
            return ListingOutcome::Stale;
        }

        match result {
            Ok(entries) => {
                let children = build_nodes(entries);
                let count = children.len();
                node.children = Children::Loaded(children);
                ListingOutcome::Applied { count }
            }
            Err(_) => {
                node.children = Children::Unloaded;
                node.expanded = false;
                ListingOutcome::Failed
            }
        }
    }

    /// 选中文件节点，替换之前的选中项
    ///
    /// # 返回值
    /// 被选中文件的路径，交给文件会话打开
    pub fn select_leaf(&mut self, path: &str) -> Result<String, ValidationError> {
        let node = find(&self.roots, path)
            .ok_or_else(|| ValidationError::new(format!("节点不存在: {}", path)))?;
        if node.is_directory {
            return Err(ValidationError::new(format!("不是文件: {}", path)));
        }
        let path = node.path.clone();
        self.selected = Some(path.clone());
        Ok(path)
    }

    /// 按显示顺序展开为可见行（折叠目录的子孙不出现）
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        self.push_rows(&self.roots, 0, &mut rows);
        rows
    }

    fn push_rows(&self, nodes: &[TreeNode], depth: usize, rows: &mut Vec<TreeRow>) {
        for node in nodes {
            rows.push(TreeRow {
                name: node.name.clone(),
                path: node.path.clone(),
                depth,
                is_directory: node.is_directory,
                expanded: node.expanded,
                loading: node.children == Children::Loading,
                selected: self.selected.as_deref() == Some(node.path.as_str()),
            });
            if node.expanded {
                if let Children::Loaded(children) = &node.children {
                    self.push_rows(children, depth + 1, rows);
                }
            }
        }
    }

    fn directory_mut(&mut self, path: &str) -> Result<&mut TreeNode, ValidationError> {
        let node = find_mut(&mut self.roots, path)
            .ok_or_else(|| ValidationError::new(format!("节点不存在: {}", path)))?;
        if !node.is_directory {
            return Err(ValidationError::new(format!("不是目录: {}", path)));
        }
        Ok(node)
    }
}

fn find<'a>(nodes: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    for node in nodes {
        if node.path == path {
            return Some(node);
        }
        if let Children::Loaded(children) = &node.children {
            if let Some(found) = find(children, path) {
                return Some(found);
            }
        }
    }
    None
}

fn find_mut<'a>(nodes: &'a mut [TreeNode], path: &str) -> Option<&'a mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.path == path {
            return Some(node);
        }
        if let Children::Loaded(children) = &mut node.children {
            if let Some(found) = find_mut(children, path) {
                return Some(found);
            }
        }
    }
    None
}
