//! # 客户端配置数据模型
//!
//! 定义了客户端配置（ClientConfig）的 Rust 结构体，
//! 存储在 `~/.mo/CodeViewer/client-config.json` 中。
//!
//! 对应前端 TypeScript 中的 `ClientConfig` 接口。

use serde::{Deserialize, Serialize};

/// 默认后端地址
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// 默认通知显示时长（毫秒）
pub const DEFAULT_NOTIFICATION_MS: u64 = 2000;

/// 客户端配置
///
/// 所有字段都有默认值，配置文件中缺失的字段会回退到默认值，
/// 因此旧版本的配置文件可以直接读取。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface ClientConfig {
///   apiBaseUrl: string;
///   defaultModel: string;
///   models: string[];
///   notificationMs: number;
///   recordHistory: boolean;
///   requestTimeoutSecs: number;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// 后端服务根地址，不带末尾斜杠（如 "http://localhost:8000"）
    pub api_base_url: String,

    /// 启动时选中的分析模型
    pub default_model: String,

    /// 可选的分析模型列表，名称由后端映射到具体模型
    pub models: Vec<String>,

    /// 通知自动消失的时长（毫秒）
    pub notification_ms: u64,

    /// 加载项目根目录时是否让后端记录到历史
    pub record_history: bool,

    /// 单个 HTTP 请求的超时时间（秒），分析请求可能较慢
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_model: "deepseek".to_string(),
            models: [
                "deepseek",
                "doubao",
                "wenxinspeed",
                "wenxin35",
                "glm4",
                "deepseekr1",
                "qwen",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            notification_ms: DEFAULT_NOTIFICATION_MS,
            record_history: true,
            request_timeout_secs: 120,
        }
    }
}

impl ClientConfig {
    /// 去掉末尾斜杠后的后端地址，便于拼接 `/api/...`
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// 模型名称是否在可选列表中
    pub fn has_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }
}
