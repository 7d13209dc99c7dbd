//! # 通用工具函数模块
//!
//! - `path` - 配置目录定位、文件扩展名与语言标签

pub mod path;
