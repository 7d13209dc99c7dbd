//! # 客户端配置 Tauri Commands
//!
//! - `read_client_config` - 读取 `~/.mo/CodeViewer/client-config.json`
//! - `save_client_config` - 保存配置，下次启动时生效
//!
//! 运行中的事件循环持有启动时读取的配置，保存不会影响当前会话。

use crate::models::settings::ClientConfig;
use crate::services::config;

/// 读取客户端配置
///
/// 配置文件不存在时返回默认配置；`CODE_VIEWER_API_URL` 环境变量会覆盖后端地址。
///
/// # 错误
/// 文件存在但无法读取或 JSON 解析失败时返回错误
#[tauri::command]
pub async fn read_client_config() -> Result<ClientConfig, String> {
    config::read_client_config().await
}

/// 保存客户端配置
///
/// # 错误
/// 目录创建失败、序列化失败或文件写入失败时返回错误
#[tauri::command]
pub async fn save_client_config(config: ClientConfig) -> Result<(), String> {
    if !config.has_model(&config.default_model) {
        return Err(format!("默认模型不在可选列表中: {}", config.default_model));
    }
    config::save_client_config(&config).await
}
