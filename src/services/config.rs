//! # 客户端配置读写
//!
//! 配置文件路径：`~/.mo/CodeViewer/client-config.json`
//!
//! - 文件不存在时返回默认配置
//! - 环境变量 `CODE_VIEWER_API_URL` 在读取后覆盖 `apiBaseUrl`（不会写回文件）
//! - 保存时目录不存在会自动递归创建

use std::path::{Path, PathBuf};

use crate::models::settings::ClientConfig;
use crate::utils::path;

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "client-config.json";

/// 覆盖后端地址的环境变量
pub const API_URL_ENV: &str = "CODE_VIEWER_API_URL";

/// 默认配置文件路径
pub fn config_file_path() -> Result<PathBuf, String> {
    Ok(path::get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// 读取客户端配置（含环境变量覆盖）
pub async fn read_client_config() -> Result<ClientConfig, String> {
    let config_path = config_file_path()?;
    let config = read_config_from(&config_path).await?;
    Ok(apply_env_override(config, std::env::var(API_URL_ENV).ok()))
}

/// 保存客户端配置到默认路径
pub async fn save_client_config(config: &ClientConfig) -> Result<(), String> {
    let config_path = config_file_path()?;
    save_config_to(&config_path, config).await
}

/// 从指定路径读取配置；文件不存在时返回默认配置
pub async fn read_config_from(config_path: &Path) -> Result<ClientConfig, String> {
    if !config_path.exists() {
        return Ok(ClientConfig::default());
    }

    let content = tokio::fs::read_to_string(config_path)
        .await
        .map_err(|e| format!("读取客户端配置文件失败: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("解析客户端配置文件失败: {}", e))
}

/// 将配置写入指定路径（带缩进格式化）
pub async fn save_config_to(config_path: &Path, config: &ClientConfig) -> Result<(), String> {
    if let Some(dir) = config_path.parent() {
        if !dir.exists() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| format!("创建配置目录失败: {}", e))?;
        }
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("序列化客户端配置失败: {}", e))?;

    tokio::fs::write(config_path, content)
        .await
        .map_err(|e| format!("写入客户端配置文件失败: {}", e))
}

/// 应用后端地址覆盖；空白值忽略
pub fn apply_env_override(mut config: ClientConfig, api_url: Option<String>) -> ClientConfig {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        log::info!("使用环境变量 {} 指定的后端地址: {}", API_URL_ENV, url);
        config.api_base_url = url.trim().to_string();
    }
    config
}
