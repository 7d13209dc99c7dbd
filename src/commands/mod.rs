//! # Tauri Command 处理模块
//!
//! 桌面壳的 IPC 接口层。command 只负责把前端操作转换为事件投递给运行时，
//! 状态变化通过 `view-updated` 事件推回前端。
//! - `explorer` - 输入模式、项目加载、目录树和文件选择
//! - `analysis` - 模型选择、代码分析、编辑与保存
//! - `history` - 历史记录下拉框
//! - `settings` - 客户端配置读写
//! - `surface` - 向 WebView 推送快照，写入系统剪贴板

pub mod analysis;
pub mod explorer;
pub mod history;
pub mod settings;
pub mod surface;
