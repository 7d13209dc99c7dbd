//! # 桌面渲染层
//!
//! - 界面快照以 `view-updated` 事件推送给 WebView
//! - 剪贴板直接写入系统剪贴板，写入结果同步返回给事件循环

use arboard::Clipboard;
use tauri::{AppHandle, Emitter};

use crate::models::view::ViewSnapshot;
use crate::services::runtime::Surface;

pub const VIEW_UPDATED_EVENT: &str = "view-updated";

pub struct TauriSurface {
    app: AppHandle,
}

impl TauriSurface {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl Surface for TauriSurface {
    fn render(&self, view: &ViewSnapshot) {
        if let Err(e) = self.app.emit(VIEW_UPDATED_EVENT, view) {
            log::warn!("推送界面快照失败: {}", e);
        }
    }

    fn write_clipboard(&self, text: &str) -> Result<(), String> {
        let mut clipboard = Clipboard::new().map_err(|e| format!("打开系统剪贴板失败: {}", e))?;
        clipboard
            .set_text(text)
            .map_err(|e| format!("写入剪贴板失败: {}", e))
    }
}
