//! # 后端接口数据结构
//!
//! 客户端与后端之间的请求体和响应体。字段名与后端 JSON 保持一致。
//!
//! | 接口 | 请求 | 响应 |
//! |------|------|------|
//! | `GET /api/files` | `path`, `record` 查询参数 | `Vec<DirEntry>` |
//! | `GET /api/content` | `path` 查询参数 | `ContentPayload` |
//! | `GET /api/load_analysis` | `path` 查询参数 | `ContentPayload` |
//! | `POST /api/analyze` | `AnalyzeRequest` | `ContentPayload` |
//! | `POST /api/save_analysis` | `SaveAnalysisRequest` | `AckPayload` |
//! | `GET /api/history` | - | `HistoryPayload` |
//! | `POST /api/delete_history` | `DeleteHistoryRequest` | `AckPayload` |
//! | `POST /api/clone` | `CloneRequest` | `ClonePayload` |

use serde::{Deserialize, Serialize};

/// 只包含文本内容的响应（文件内容、已保存的分析、新生成的分析）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub content: String,
}

/// 代码分析请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// 待分析的源代码全文
    pub code: String,
    /// 模型名称（配置中的模型列表之一，如 "deepseek"）
    pub model: String,
    /// 客户端不处理流式响应，始终为 false
    pub stream: bool,
}

/// 保存分析结果请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAnalysisRequest {
    /// 源文件路径（后端负责推导旁路文件路径）
    pub path: String,
    /// 要保存的分析文本，原样写入
    pub content: String,
}

/// 通用确认响应
///
/// 后端通常返回 `{"message": "..."}`，客户端只关心状态码，字段可缺省。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckPayload {
    #[serde(default)]
    pub message: Option<String>,
}

/// 历史记录列表响应
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPayload {
    #[serde(default)]
    pub history: Vec<String>,
}

/// 删除历史记录请求（按字符串精确匹配）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteHistoryRequest {
    pub path: String,
}

/// 克隆远程仓库请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneRequest {
    pub url: String,
}

/// 克隆成功响应：仓库在后端机器上的本地路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonePayload {
    pub path: String,
}

/// 后端错误响应体
///
/// 后端以 `{"detail": "..."}` 描述失败原因，缺省或无法解析时为 `None`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub detail: Option<String>,
}
