//! # 显示层数据模型
//!
//! 前端渲染所需的完整界面快照。每处理完一个事件，运行时生成一次快照推送给前端，
//! 前端只做渲染（目录缩进、Markdown、语法高亮、通知样式），不再持有任何状态。

use serde::Serialize;

use crate::models::source::InputMode;
use crate::services::notifier::NotificationState;
use crate::services::session::LoadPhase;

/// 历史记录为空时显示的占位项
pub const EMPTY_HISTORY_LABEL: &str = "暂无历史记录";

/// 目录树中的一个可见行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRow {
    pub name: String,
    pub path: String,
    /// 缩进层级，根目录下的节点为 0
    pub depth: usize,
    pub is_directory: bool,
    pub expanded: bool,
    /// 子目录列表请求进行中
    pub loading: bool,
    pub selected: bool,
}

/// 当前文件面板
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    pub path: String,
    /// 文件扩展名（不含点），原样交给渲染层
    pub extension: Option<String>,
    /// 语法高亮语言标签；扩展名不在映射表中时为 None
    pub language: Option<String>,
    pub content: String,
    pub content_phase: LoadPhase,
    pub analysis_text: String,
    pub analysis_phase: LoadPhase,
    pub dirty: bool,
    pub ready: bool,
    pub analyzing: bool,
}

/// 历史记录下拉框
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub open: bool,
    pub entries: Vec<String>,
    /// 需要显示空列表占位项时为 Some
    pub empty_label: Option<String>,
}

/// 完整界面快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub mode: InputMode,
    pub placeholder: String,
    pub action_label: String,
    pub path_input: String,
    pub root_path: Option<String>,
    pub tree: Vec<TreeRow>,
    pub file: Option<FileView>,
    pub models: Vec<String>,
    pub selected_model: String,
    pub history: HistoryView,
    pub notification: NotificationState,
}
