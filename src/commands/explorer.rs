//! # 项目浏览 Tauri Commands
//!
//! - `set_input_mode` / `set_path_input` - 输入模式和输入框内容
//! - `load_project` - 加载本地目录或克隆远程仓库
//! - `toggle_node` / `expand_node` / `collapse_node` - 目录树展开折叠
//! - `select_file` - 打开文件
//! - `get_view` - 获取当前界面快照（前端首次加载时使用）

use tauri::State;

use crate::models::source::InputMode;
use crate::models::view::ViewSnapshot;
use crate::services::controller::AppEvent;
use crate::services::runtime::RuntimeHandle;

#[tauri::command]
pub async fn set_input_mode(mode: InputMode, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::SetInputMode(mode))
}

#[tauri::command]
pub async fn set_path_input(text: String, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::SetPathInput(text))
}

/// 加载项目
///
/// 使用输入框中的内容；本地模式直接列出目录，Git 模式先克隆。
/// 结果通过 `view-updated` 事件和通知返回，command 本身立即返回。
#[tauri::command]
pub async fn load_project(runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::Load)
}

/// 点击目录行：折叠状态展开，展开状态折叠
#[tauri::command]
pub async fn toggle_node(path: String, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::ToggleNode(path))
}

#[tauri::command]
pub async fn expand_node(path: String, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::ExpandNode(path))
}

#[tauri::command]
pub async fn collapse_node(path: String, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::CollapseNode(path))
}

#[tauri::command]
pub async fn select_file(path: String, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::SelectFile(path))
}

#[tauri::command]
pub async fn get_view(runtime: State<'_, RuntimeHandle>) -> Result<ViewSnapshot, String> {
    Ok(runtime.view())
}
