//! # Code Viewer - 应用核心
//!
//! 浏览项目源码、查看与运行 AI 代码分析的客户端核心。
//!
//! ## 架构说明
//! 交互逻辑是一组纯状态机（`services::controller` 组合各组件），不依赖任何界面技术；
//! `services::runtime` 在 tokio 上执行状态机产生的副作用（后端请求、计时器、剪贴板）。
//! 桌面壳（cargo feature `desktop`）把 Tauri command 转换为事件，把快照推送给 WebView。
//! 核心逻辑放在 `lib.rs` 而非 `main.rs` 中，桌面端和移动端入口可以共享初始化代码。
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层，仅 `desktop`）
//! - `models/` - 数据模型（后端接口、目录树、配置、界面快照）
//! - `services/` - 状态机、HTTP 客户端、配置读写、事件循环
//! - `utils/` - 通用工具函数
//! - `error` - 错误类型

#[cfg(feature = "desktop")]
mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{BackendError, BackendResult, ValidationError};
pub use models::settings::ClientConfig;
pub use models::view::ViewSnapshot;
pub use services::backend::{Backend, HttpBackend};
pub use services::controller::{AppEvent, AppState, Effect};
pub use services::runtime::{AppRuntime, RuntimeHandle, Surface};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 1. 在 `setup` 钩子中按需注册调试专用插件（日志）
/// 2. 读取客户端配置，创建 HTTP 后端和 WebView 渲染层
/// 3. 启动事件循环，并把 `RuntimeHandle` 注册为 managed state
/// 4. 注册所有自定义 Tauri commands
///
/// # Panics
/// 如果 Tauri 应用启动失败（例如配置文件缺失或窗口创建失败），
/// 将通过 `.expect()` 触发 panic 并输出错误信息。
pub fn run() {
    use std::sync::Arc;

    use tauri::Manager;

    use commands::surface::TauriSurface;

    tauri::Builder::default()
        .setup(|app| {
            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            // 配置文件损坏时使用默认配置启动，用户仍可在设置中重新保存
            let config = tauri::async_runtime::block_on(services::config::read_client_config())
                .unwrap_or_else(|e| {
                    log::warn!("{}，使用默认配置", e);
                    services::config::apply_env_override(
                        ClientConfig::default(),
                        std::env::var(services::config::API_URL_ENV).ok(),
                    )
                });
            log::info!("后端地址: {}", config.base_url());

            let backend = HttpBackend::new(&config)?;
            let surface = TauriSurface::new(app.handle().clone());
            let (runtime, handle) = AppRuntime::new(config, Arc::new(backend), Arc::new(surface));
            tauri::async_runtime::spawn(runtime.run());
            app.manage(handle);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // 项目浏览
            commands::explorer::set_input_mode,
            commands::explorer::set_path_input,
            commands::explorer::load_project,
            commands::explorer::toggle_node,
            commands::explorer::expand_node,
            commands::explorer::collapse_node,
            commands::explorer::select_file,
            commands::explorer::get_view,
            // 代码分析
            commands::analysis::select_model,
            commands::analysis::request_analysis,
            commands::analysis::edit_analysis,
            commands::analysis::save_analysis,
            commands::analysis::key_pressed,
            // 历史记录
            commands::history::toggle_history,
            commands::history::close_history,
            commands::history::select_history,
            commands::history::delete_history,
            // 配置
            commands::settings::read_client_config,
            commands::settings::save_client_config,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
