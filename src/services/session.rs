//! # 文件会话服务
//!
//! 维护唯一的"当前文件"会话：路径、原始内容、分析文本，以及最后一次成功保存的分析文本。
//! `analysis_text != last_saved_analysis` 即为"有未保存修改"（dirty）。
//!
//! ## 打开流程
//! `open(path)` 整体替换会话（不合并任何旧状态），随后运行时并行发出两个请求：
//! - 文件内容：失败即打开失败，不显示内容
//! - 已保存的分析：非成功响应（含 404）视为"尚无分析"；网络失败会上报，但同样降级为空
//!
//! 两个请求都结束后会话才算就绪。
//!
//! ## 过期响应
//! 每次 `open` 票据加一，请求携带发出时的票据。再次 `open` 之后，
//! 旧请求的响应到达时票据不一致，直接丢弃，不会修改新会话。

use serde::Serialize;

use crate::error::BackendError;

/// 会话票据：`open` 时分配，单调递增
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SessionTicket(pub u64);

/// 单个加载请求的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadPhase {
    /// 没有打开任何文件
    #[default]
    Idle,
    Pending,
    Loaded,
    Failed,
}

/// 已保存分析的加载结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisLoad {
    /// 找到已保存的分析
    Found(String),
    /// 后端返回非成功响应（如 404），视为尚无分析
    Missing,
    /// 网络层失败，上报后降级为空分析
    Failed(String),
}

impl AnalysisLoad {
    /// 将后端结果归类：非成功状态码不是错误，只有传输/解码失败才算失败
    pub fn from_result(result: Result<String, BackendError>) -> Self {
        match result {
            Ok(content) => AnalysisLoad::Found(content),
            Err(err) if err.is_status() => AnalysisLoad::Missing,
            Err(err) => AnalysisLoad::Failed(err.to_string()),
        }
    }
}

/// 一个打开请求的响应被处理后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// 属于已被替换的会话，已丢弃
    Stale,
    /// 另一个请求尚未返回
    Pending,
    /// 两个请求都已结束，内容加载成功
    Ready {
        analysis_found: bool,
        analysis_failed: bool,
    },
    /// 文件内容加载失败
    ContentFailed,
    /// 分析加载遇到网络失败（已降级为空分析）
    AnalysisFailed,
}

/// 当前文件会话
#[derive(Debug, Default)]
pub struct FileSession {
    ticket: SessionTicket,
    path: Option<String>,
    raw_content: String,
    analysis_text: String,
    last_saved_analysis: String,
    content_phase: LoadPhase,
    analysis_phase: LoadPhase,
    analysis_found: bool,
    /// 分析运行序号，新的分析请求会让旧请求的结果失效
    run: u64,
    running: bool,
}

impl FileSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开文件：整体重置会话并分配新票据
    ///
    /// # 返回值
    /// 内容请求和分析请求都应携带的票据
    pub fn open(&mut self, path: impl Into<String>) -> SessionTicket {
        let ticket = SessionTicket(self.ticket.0 + 1);
        *self = FileSession {
            ticket,
            path: Some(path.into()),
            content_phase: LoadPhase::Pending,
            analysis_phase: LoadPhase::Pending,
            run: self.run,
            ..FileSession::default()
        };
        ticket
    }

    /// 写入文件内容响应
    pub fn apply_content(
        &mut self,
        ticket: SessionTicket,
        result: Result<String, BackendError>,
    ) -> OpenOutcome {
        if ticket != self.ticket || self.content_phase != LoadPhase::Pending {
            return OpenOutcome::Stale;
        }
        match result {
            Ok(content) => {
                self.raw_content = content;
                self.content_phase = LoadPhase::Loaded;
                self.readiness()
            }
            Err(_) => {
                self.raw_content.clear();
                self.content_phase = LoadPhase::Failed;
                OpenOutcome::ContentFailed
            }
        }
    }

    /// 写入已保存分析的加载结果
    ///
    /// 内容已加载失败时这次打开已经结束，分析结果按过期响应丢弃。
    pub fn apply_analysis(&mut self, ticket: SessionTicket, load: AnalysisLoad) -> OpenOutcome {
        if ticket != self.ticket
            || self.analysis_phase != LoadPhase::Pending
            || self.content_phase == LoadPhase::Failed
        {
            return OpenOutcome::Stale;
        }
        match load {
            AnalysisLoad::Found(content) => {
                self.analysis_text = content.clone();
                self.last_saved_analysis = content;
                self.analysis_found = true;
                self.analysis_phase = LoadPhase::Loaded;
                self.readiness()
            }
            AnalysisLoad::Missing => {
                self.analysis_text.clear();
                self.last_saved_analysis.clear();
                self.analysis_phase = LoadPhase::Loaded;
                self.readiness()
            }
            AnalysisLoad::Failed(_) => {
                self.analysis_text.clear();
                self.last_saved_analysis.clear();
                self.analysis_phase = LoadPhase::Failed;
                OpenOutcome::AnalysisFailed
            }
        }
    }

    fn readiness(&self) -> OpenOutcome {
        match (self.content_phase, self.analysis_phase) {
            (LoadPhase::Failed, _) => OpenOutcome::ContentFailed,
            (LoadPhase::Loaded, LoadPhase::Loaded | LoadPhase::Failed) => OpenOutcome::Ready {
                analysis_found: self.analysis_found,
                analysis_failed: self.analysis_phase == LoadPhase::Failed,
            },
            _ => OpenOutcome::Pending,
        }
    }

    pub fn ticket(&self) -> SessionTicket {
        self.ticket
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    pub fn analysis_text(&self) -> &str {
        &self.analysis_text
    }

    pub fn last_saved_analysis(&self) -> &str {
        &self.last_saved_analysis
    }

    pub fn content_phase(&self) -> LoadPhase {
        self.content_phase
    }

    pub fn analysis_phase(&self) -> LoadPhase {
        self.analysis_phase
    }

    /// 是否有文件处于打开状态（内容加载失败的文件不算打开）
    pub fn is_open(&self) -> bool {
        self.path.is_some() && self.content_phase != LoadPhase::Failed
    }

    /// 内容与分析两个请求是否都已结束且内容可用
    pub fn is_ready(&self) -> bool {
        matches!(self.readiness(), OpenOutcome::Ready { .. })
    }

    /// 当前分析文本与最后保存的文本不一致
    pub fn is_dirty(&self) -> bool {
        self.analysis_text != self.last_saved_analysis
    }

    /// 是否有分析请求在途
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ======== 供分析流程使用的修改方法 ========

    pub(crate) fn set_analysis_text(&mut self, text: impl Into<String>) {
        self.analysis_text = text.into();
    }

    /// 开始一次新的分析运行，返回运行序号
    pub(crate) fn begin_run(&mut self) -> u64 {
        self.run += 1;
        self.running = true;
        self.run
    }

    /// 结束运行；序号不是最新一次运行时返回 false
    pub(crate) fn finish_run(&mut self, run: u64) -> bool {
        if !self.running || run != self.run {
            return false;
        }
        self.running = false;
        true
    }

    /// 记录一次成功保存的内容
    pub(crate) fn mark_saved(&mut self, content: String) {
        self.last_saved_analysis = content;
    }
}
