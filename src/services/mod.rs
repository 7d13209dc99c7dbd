//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 Tauri command 层解耦：
//! - `tree` - 目录树：懒加载展开、折叠、选中
//! - `session` - 当前文件会话：内容、分析文本、未保存状态
//! - `analysis` - 分析流程：发起分析、编辑、保存、快捷键
//! - `history` - 历史记录下拉框
//! - `mode` - 输入模式与项目加载（本地 / 克隆）
//! - `notifier` - 单条通知与自动消失计时器
//! - `controller` - 组合以上组件的事件处理状态机
//! - `backend` - 后端接口 trait 与 HTTP 实现
//! - `config` - 客户端配置文件读写
//! - `runtime` - 事件循环：执行副作用并推送界面快照

pub mod analysis;
pub mod backend;
pub mod config;
pub mod controller;
pub mod history;
pub mod mode;
pub mod notifier;
pub mod runtime;
pub mod session;
pub mod tree;
