//! # 代码分析 Tauri Commands

use tauri::State;

use crate::services::analysis::{FocusArea, KeyChord};
use crate::services::controller::AppEvent;
use crate::services::runtime::RuntimeHandle;

#[tauri::command]
pub async fn select_model(model: String, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::SelectModel(model))
}

/// 对当前文件发起分析（使用当前选中的模型）
#[tauri::command]
pub async fn request_analysis(runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::RequestAnalysis)
}

#[tauri::command]
pub async fn edit_analysis(text: String, runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::EditAnalysis(text))
}

#[tauri::command]
pub async fn save_analysis(runtime: State<'_, RuntimeHandle>) -> Result<(), String> {
    runtime.dispatch(AppEvent::SaveAnalysis)
}

/// 转发按键
///
/// # 返回值
/// 按键是否被消费；为 true 时前端应阻止浏览器默认行为（如"另存为网页"）
#[tauri::command]
pub async fn key_pressed(
    chord: KeyChord,
    focus: FocusArea,
    runtime: State<'_, RuntimeHandle>,
) -> Result<bool, String> {
    runtime.key_pressed(chord, focus)
}
