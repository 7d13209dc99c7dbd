//! # 错误类型
//!
//! - `BackendError`：一次后端请求的失败（传输失败、非成功状态码、响应解码失败）
//! - `ValidationError`：本地校验失败，不会发出任何请求
//!
//! 过期响应（StaleResponse）和"分析不存在"（DegradedResult）都不是错误，
//! 前者由各组件的票据检查处理；后者指读取已保存分析时收到的任何非成功状态码
//! （`BackendError::is_status`），包括部分部署中包着 404 的 500，只有传输和解码失败才会报告。

use thiserror::Error;

/// 后端请求失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// 请求没有得到响应（连接失败、超时等）
    #[error("网络请求失败: {0}")]
    Transport(String),

    /// 后端返回了非成功状态码
    #[error("后端返回错误 {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    /// 响应体无法解析
    #[error("解析响应失败: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}

impl BackendError {
    /// 是否是后端明确给出的非成功响应（相对于网络层失败）
    pub fn is_status(&self) -> bool {
        matches!(self, BackendError::Status { .. })
    }

    /// 后端提供的失败原因
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::Status { detail, .. } => detail.as_deref().filter(|d| !d.trim().is_empty()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// 后端请求结果
pub type BackendResult<T> = Result<T, BackendError>;

/// 本地校验失败，携带直接展示给用户的提示文字
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}
