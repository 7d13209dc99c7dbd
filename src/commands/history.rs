//! # 历史记录 Tauri Commands
//!
//! 下拉框的打开、关闭、选择和删除。选中的条目会填入输入框，
//! 并写入系统剪贴板，写入失败会通过通知提示。

use tauri::State;

use crate::services::controller::AppEvent;
use crate::services::runtime::RuntimeHandle;

#[tauri::command]
pub async fn toggle_history(runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::ToggleHistory)
}

/// 点击下拉框外部
#[tauri::command]
pub async fn close_history(runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::CloseHistory)
}

#[tauri::command]
pub async fn select_history(entry: String, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::SelectHistory(entry))
}

#[tauri::command]
pub async fn delete_history(entry: String, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::DeleteHistory(entry))
}
