//! # 输入模式与来源分类
//!
//! 用户输入的项目来源有两种：本地目录路径和 Git 仓库地址。
//! 同一个枚举既表示当前的输入模式，也表示一条历史记录的分类。

use serde::{Deserialize, Serialize};

/// 被识别为 Git 仓库地址的前缀
const GIT_PREFIXES: [&str; 3] = ["http://", "https://", "git://"];

/// 输入模式
///
/// 影响输入框占位文字、加载按钮文字、加载请求流程（Git 模式先克隆）
/// 以及历史记录下拉框的过滤条件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Local,
    Git,
}

impl InputMode {
    /// 对来源字符串分类：带 `http://`、`https://`、`git://` 前缀的为 Git，其余为本地路径
    pub fn classify(location: &str) -> Self {
        if GIT_PREFIXES.iter().any(|prefix| location.starts_with(prefix)) {
            InputMode::Git
        } else {
            InputMode::Local
        }
    }

    /// 该来源是否属于当前模式
    pub fn accepts(self, location: &str) -> bool {
        Self::classify(location) == self
    }

    /// 输入框占位文字
    pub fn placeholder(self) -> &'static str {
        match self {
            InputMode::Local => "请输入本地目录路径，例如：D:/projects/mycode",
            InputMode::Git => "请输入Git仓库地址，例如：https://github.com/username/repo",
        }
    }

    /// 加载按钮文字
    pub fn action_label(self) -> &'static str {
        match self {
            InputMode::Local => "加载项目",
            InputMode::Git => "克隆并加载",
        }
    }

    /// 输入为空时的提示
    pub fn missing_input_message(self) -> &'static str {
        match self {
            InputMode::Local => "请输入项目目录路径",
            InputMode::Git => "请输入Git仓库地址",
        }
    }
}
