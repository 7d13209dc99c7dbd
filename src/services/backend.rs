//! # 后端接口
//!
//! `Backend` trait 列出客户端依赖的全部后端操作，`HttpBackend` 是基于 reqwest 的实现。
//! 运行时只依赖 trait，测试中可以换成内存实现。
//!
//! 非成功状态码统一转换为 `BackendError::Status`，并尽量从 `{"detail": ...}` 响应体中
//! 取出后端给出的原因；是否把它当作错误由调用方决定（例如分析不存在不算错误）。

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{BackendError, BackendResult};
use crate::models::api::{
    AckPayload, AnalyzeRequest, ClonePayload, CloneRequest, ContentPayload, DeleteHistoryRequest,
    ErrorPayload, HistoryPayload, SaveAnalysisRequest,
};
use crate::models::settings::ClientConfig;
use crate::models::tree::DirEntry;

/// 客户端消费的后端操作
#[async_trait]
pub trait Backend: Send + Sync {
    /// 列出目录的直接子项；`record_history` 为 true 时后端把该路径记入历史
    async fn list_directory(&self, path: &str, record_history: bool) -> BackendResult<Vec<DirEntry>>;

    /// 读取文件内容
    async fn read_content(&self, path: &str) -> BackendResult<String>;

    /// 读取文件已保存的分析（不存在时返回非成功状态码）
    async fn load_analysis(&self, path: &str) -> BackendResult<String>;

    /// 运行一次代码分析
    async fn analyze(&self, request: &AnalyzeRequest) -> BackendResult<String>;

    async fn save_analysis(&self, request: &SaveAnalysisRequest) -> BackendResult<()>;

    async fn list_history(&self) -> BackendResult<Vec<String>>;

    async fn delete_history(&self, entry: &str) -> BackendResult<()>;

    /// 克隆远程仓库，返回后端本地路径
    async fn clone_source(&self, url: &str) -> BackendResult<String>;
}

/// 基于 HTTP 的后端实现
#[derive(Clone, Debug)]
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// 按配置创建客户端（后端地址与请求超时）
    pub fn new(config: &ClientConfig) -> BackendResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{}", self.base_url, name)
    }

    /// 发送请求并解析 JSON 响应体
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> BackendResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = parse_detail(&body);
            log::debug!("后端返回 {} ({} 字节)", status, body.len());
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// 从 FastAPI 风格的错误响应体中取出 `detail` 字符串
///
/// 响应体不是 JSON，或 `detail` 不是字符串（如参数校验错误的数组）时返回 None。
pub fn parse_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.detail)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_directory(&self, path: &str, record_history: bool) -> BackendResult<Vec<DirEntry>> {
        let record = if record_history { "true" } else { "false" };
        let request = self
            .http_client
            .get(self.endpoint("files"))
            .query(&[("path", path), ("record", record)]);
        self.send(request).await
    }

    async fn read_content(&self, path: &str) -> BackendResult<String> {
        let request = self.http_client.get(self.endpoint("content")).query(&[("path", path)]);
        let payload: ContentPayload = self.send(request).await?;
        Ok(payload.content)
    }

    async fn load_analysis(&self, path: &str) -> BackendResult<String> {
        let request = self
            .http_client
            .get(self.endpoint("load_analysis"))
            .query(&[("path", path)]);
        let payload: ContentPayload = self.send(request).await?;
        Ok(payload.content)
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> BackendResult<String> {
        let builder = self.http_client.post(self.endpoint("analyze")).json(request);
        let payload: ContentPayload = self.send(builder).await?;
        log::info!("分析完成 (模型 {}, {} 字节)", request.model, payload.content.len());
        Ok(payload.content)
    }

    async fn save_analysis(&self, request: &SaveAnalysisRequest) -> BackendResult<()> {
        let builder = self.http_client.post(self.endpoint("save_analysis")).json(request);
        let _: AckPayload = self.send(builder).await?;
        Ok(())
    }

    async fn list_history(&self) -> BackendResult<Vec<String>> {
        let payload: HistoryPayload = self.send(self.http_client.get(self.endpoint("history"))).await?;
        Ok(payload.history)
    }

    async fn delete_history(&self, entry: &str) -> BackendResult<()> {
        let body = DeleteHistoryRequest {
            path: entry.to_string(),
        };
        let builder = self.http_client.post(self.endpoint("delete_history")).json(&body);
        let _: AckPayload = self.send(builder).await?;
        Ok(())
    }

    async fn clone_source(&self, url: &str) -> BackendResult<String> {
        let body = CloneRequest { url: url.to_string() };
        let builder = self.http_client.post(self.endpoint("clone")).json(&body);
        let payload: ClonePayload = self.send(builder).await?;
        log::info!("仓库已克隆: {} -> {}", url, payload.path);
        Ok(payload.path)
    }
}
