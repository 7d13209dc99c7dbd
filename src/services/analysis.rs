//! # 代码分析流程
//!
//! 建立在文件会话之上的三个操作：
//! - `request_analysis` - 发起一次新的 AI 分析，结果只写入显示文本，需要手动保存
//! - `save` - 将当前显示的分析文本原样保存到后端
//! - `edit` - 用户直接编辑分析文本
//!
//! 分析完成后不自动保存，会话立即处于"未保存"状态。
//! `save` 总是发送完整的当前文本，重复调用是幂等的。

use serde::Deserialize;

use crate::error::{BackendError, ValidationError};
use crate::models::api::{AnalyzeRequest, SaveAnalysisRequest};
use crate::services::session::{FileSession, SessionTicket};

/// 分析进行中的占位文字
pub const ANALYSIS_PLACEHOLDER: &str = "正在分析代码...";

const NO_FILE_SELECTED: &str = "请先选择一个文件";
const FILE_STILL_LOADING: &str = "文件仍在加载中，请稍候";
const ANALYSIS_IN_PROGRESS: &str = "代码分析进行中，请稍候";
const NOTHING_TO_SAVE: &str = "没有可保存的分析内容";

/// 一次分析运行的票据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalysisTicket {
    pub session: SessionTicket,
    pub run: u64,
}

/// 需要运行时发出的分析请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeJob {
    pub ticket: AnalysisTicket,
    pub request: AnalyzeRequest,
}

/// 需要运行时发出的保存请求
///
/// 响应到达时用 `ticket` 判断是否过期，用 `request.content` 更新最后保存的文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveJob {
    pub ticket: SessionTicket,
    pub request: SaveAnalysisRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// 失败原因已写入分析文本
    Failed(String),
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
    Stale,
}

/// 发起代码分析
///
/// 前置条件：已打开文件、加载完成、内容非空，且没有分析在途。
/// 满足时把分析文本替换为占位文字，并返回要发送的请求。
pub fn request_analysis(session: &mut FileSession, model: &str) -> Result<AnalyzeJob, ValidationError> {
    if !session.is_open() {
        return Err(ValidationError::new(NO_FILE_SELECTED));
    }
    if !session.is_ready() {
        return Err(ValidationError::new(FILE_STILL_LOADING));
    }
    if session.raw_content().is_empty() {
        return Err(ValidationError::new(NO_FILE_SELECTED));
    }

    let run = session.begin_run();
    session.set_analysis_text(ANALYSIS_PLACEHOLDER);

    Ok(AnalyzeJob {
        ticket: AnalysisTicket {
            session: session.ticket(),
            run,
        },
        request: AnalyzeRequest {
            code: session.raw_content().to_string(),
            model: model.to_string(),
            stream: false,
        },
    })
}

/// 写入分析结果
///
/// 成功时覆盖显示文本，最后保存的文本不变（因此会话变为未保存）；
/// 失败时显示错误信息而不是清空，会话同样保持未保存。
pub fn apply_analysis_result(
    session: &mut FileSession,
    ticket: AnalysisTicket,
    result: Result<String, BackendError>,
) -> RunOutcome {
    if ticket.session != session.ticket() || !session.finish_run(ticket.run) {
        return RunOutcome::Stale;
    }
    match result {
        Ok(content) => {
            session.set_analysis_text(content);
            RunOutcome::Completed
        }
        Err(err) => {
            let message = format!("分析代码时出错: {}", err);
            session.set_analysis_text(message.clone());
            RunOutcome::Failed(message)
        }
    }
}

/// 保存当前显示的分析文本
///
/// 前置条件：已打开文件、没有分析在途、分析文本非空白。
pub fn save(session: &FileSession) -> Result<SaveJob, ValidationError> {
    let path = match session.path() {
        Some(path) if session.is_open() => path,
        _ => return Err(ValidationError::new(NO_FILE_SELECTED)),
    };
    if session.is_running() {
        return Err(ValidationError::new(ANALYSIS_IN_PROGRESS));
    }
    if session.analysis_text().trim().is_empty() {
        return Err(ValidationError::new(NOTHING_TO_SAVE));
    }

    Ok(SaveJob {
        ticket: session.ticket(),
        request: SaveAnalysisRequest {
            path: path.to_string(),
            content: session.analysis_text().to_string(),
        },
    })
}

/// 写入保存结果
///
/// 成功时最后保存的文本更新为本次发送的内容；如果发送之后用户又做了编辑，
/// 会话仍然是未保存状态。失败时不改变任何状态。
pub fn apply_save_result<E>(
    session: &mut FileSession,
    job: SaveJob,
    result: Result<(), E>,
) -> SaveOutcome {
    if job.ticket != session.ticket() {
        return SaveOutcome::Stale;
    }
    match result {
        Ok(()) => {
            session.mark_saved(job.request.content);
            SaveOutcome::Saved
        }
        Err(_) => SaveOutcome::Failed,
    }
}

/// 用户编辑分析文本
pub fn edit(session: &mut FileSession, text: impl Into<String>) -> Result<(), ValidationError> {
    if !session.is_open() {
        return Err(ValidationError::new(NO_FILE_SELECTED));
    }
    if !session.is_ready() {
        return Err(ValidationError::new(FILE_STILL_LOADING));
    }
    if session.is_running() {
        return Err(ValidationError::new(ANALYSIS_IN_PROGRESS));
    }
    session.set_analysis_text(text);
    Ok(())
}

// ============ 快捷键 ============

/// 键盘焦点所在区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusArea {
    /// 分析结果的显示/编辑区域
    Analysis,
    /// 其他任何位置
    Other,
}

/// 一次按键（修饰键 + 键名）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyChord {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    /// macOS 的 Command 键
    #[serde(default)]
    pub meta: bool,
}

/// 是否为保存快捷键（Ctrl/Cmd + S），且焦点位于分析区域
pub fn is_save_shortcut(chord: &KeyChord, focus: FocusArea) -> bool {
    focus == FocusArea::Analysis && (chord.ctrl || chord.meta) && chord.key.eq_ignore_ascii_case("s")
}
