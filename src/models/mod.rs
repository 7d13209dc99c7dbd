//! # 数据模型模块
//!
//! 定义了与前端 TypeScript 类型、后端 JSON 一一对应的 Rust 数据结构：
//! - `api` - 后端接口的请求体和响应体
//! - `tree` - 目录条目和目录树节点
//! - `source` - 输入模式（本地目录 / Git 仓库）
//! - `settings` - 客户端配置
//! - `view` - 推送给前端的界面快照

pub mod api;
pub mod settings;
pub mod source;
pub mod tree;
pub mod view;
