//! # 界面控制器
//!
//! 把各组件组合成一个纯状态机：`handle_event(event) -> Vec<Effect>`。
//!
//! - 事件（`AppEvent`）包括用户操作和已结束的后端请求
//! - 副作用（`Effect`）列举运行时需要执行的后端请求、计时器和剪贴板写入
//!
//! 控制器不做任何 I/O，也不知道界面技术，因此整个交互流程可以脱离界面直接测试。
//! 每个异步边界的失败都在这里转换为恰好一次通知；过期响应只记录 debug 日志。

use std::time::Duration;

use crate::error::{BackendResult, ValidationError};
use crate::models::settings::ClientConfig;
use crate::models::source::InputMode;
use crate::models::tree::DirEntry;
use crate::models::view::{FileView, HistoryView, ViewSnapshot, EMPTY_HISTORY_LABEL};
use crate::services::analysis::{
    self, AnalysisTicket, AnalyzeJob, FocusArea, KeyChord, RunOutcome, SaveJob, SaveOutcome,
};
use crate::services::history::{DeleteOutcome, HistoryStore, HistoryTicket, RefreshOutcome};
use crate::services::mode::{CloneOutcome, LoadStep, LoadTicket, ModeController};
use crate::services::notifier::{DismissTicket, Notifier};
use crate::services::session::{AnalysisLoad, FileSession, OpenOutcome, SessionTicket};
use crate::services::tree::{ListRequest, ListingOutcome, ProjectTree, TreeTicket};
use crate::utils::path::{file_extension, language_for_extension};

/// 控制器接收的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    // ======== 用户操作 ========
    SetPathInput(String),
    SetInputMode(InputMode),
    /// 点击"加载项目"/"克隆并加载"
    Load,
    /// 点击目录行
    ToggleNode(String),
    ExpandNode(String),
    CollapseNode(String),
    /// 点击文件行
    SelectFile(String),
    SelectModel(String),
    RequestAnalysis,
    EditAnalysis(String),
    SaveAnalysis,
    KeyPressed { chord: KeyChord, focus: FocusArea },
    ToggleHistory,
    /// 点击历史下拉框外部
    CloseHistory,
    SelectHistory(String),
    DeleteHistory(String),

    // ======== 已结束的请求 ========
    CloneSettled {
        ticket: LoadTicket,
        result: BackendResult<String>,
    },
    RootListed {
        ticket: LoadTicket,
        path: String,
        result: BackendResult<Vec<DirEntry>>,
    },
    DirectoryListed {
        ticket: TreeTicket,
        path: String,
        result: BackendResult<Vec<DirEntry>>,
    },
    ContentLoaded {
        ticket: SessionTicket,
        result: BackendResult<String>,
    },
    AnalysisLoaded {
        ticket: SessionTicket,
        result: BackendResult<String>,
    },
    AnalysisFinished {
        ticket: AnalysisTicket,
        result: BackendResult<String>,
    },
    AnalysisSaved {
        job: SaveJob,
        result: BackendResult<()>,
    },
    HistoryListed {
        ticket: HistoryTicket,
        result: BackendResult<Vec<String>>,
    },
    HistoryDeleted {
        entry: String,
        result: BackendResult<()>,
    },
    ClipboardWritten(Result<(), String>),
    DismissElapsed(DismissTicket),
}

/// 运行时需要执行的副作用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CloneSource {
        ticket: LoadTicket,
        url: String,
    },
    ListRoot {
        ticket: LoadTicket,
        path: String,
        record_history: bool,
    },
    ListDirectory(ListRequest),
    ReadContent {
        ticket: SessionTicket,
        path: String,
    },
    LoadAnalysis {
        ticket: SessionTicket,
        path: String,
    },
    RunAnalysis(AnalyzeJob),
    SaveAnalysis(SaveJob),
    ListHistory(HistoryTicket),
    DeleteHistory {
        entry: String,
    },
    WriteClipboard(String),
    /// 取消尚未触发的通知消失计时器
    CancelDismiss(DismissTicket),
    /// 启动通知消失计时器
    ScheduleDismiss {
        ticket: DismissTicket,
        after: Duration,
    },
}

/// 应用全局状态
///
/// 当前输入模式、目录树、文件会话、历史下拉框和通知都只有一份，
/// 并且只由控制器在处理事件时修改。
#[derive(Debug)]
pub struct AppState {
    config: ClientConfig,
    mode: ModeController,
    tree: ProjectTree,
    session: FileSession,
    history: HistoryStore,
    notifier: Notifier,
    path_input: String,
    selected_model: String,
}

impl AppState {
    pub fn new(config: ClientConfig) -> Self {
        let selected_model = config.default_model.clone();
        Self {
            config,
            mode: ModeController::new(),
            tree: ProjectTree::new(),
            session: FileSession::new(),
            history: HistoryStore::new(),
            notifier: Notifier::new(),
            path_input: String::new(),
            selected_model,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn mode(&self) -> InputMode {
        self.mode.mode()
    }

    pub fn tree(&self) -> &ProjectTree {
        &self.tree
    }

    pub fn session(&self) -> &FileSession {
        &self.session
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn path_input(&self) -> &str {
        &self.path_input
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    /// 处理一个事件，返回需要执行的副作用（按顺序执行）
    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            AppEvent::SetPathInput(text) => self.path_input = text,
            AppEvent::SetInputMode(mode) => self.on_set_mode(mode, &mut effects),
            AppEvent::Load => self.on_load(&mut effects),
            AppEvent::ToggleNode(path) => {
                let result = self.tree.toggle(&path);
                self.on_expand_result(result, &mut effects);
            }
            AppEvent::ExpandNode(path) => {
                let result = self.tree.expand(&path);
                self.on_expand_result(result, &mut effects);
            }
            AppEvent::CollapseNode(path) => {
                // 未知路径只可能来自调用方的误用，记日志即可，不通知用户
                if let Err(err) = self.tree.collapse(&path) {
                    log::warn!("折叠目录失败: {}", err);
                }
            }
            AppEvent::SelectFile(path) => self.on_select_file(&path, &mut effects),
            AppEvent::SelectModel(model) => {
                if self.config.has_model(&model) {
                    self.selected_model = model;
                } else {
                    self.notify(format!("未知的模型: {}", model), true, &mut effects);
                }
            }
            AppEvent::RequestAnalysis => {
                match analysis::request_analysis(&mut self.session, &self.selected_model) {
                    Ok(job) => {
                        log::info!(
                            "请求代码分析: {} (模型 {})",
                            self.session.path().unwrap_or_default(),
                            job.request.model
                        );
                        effects.push(Effect::RunAnalysis(job));
                    }
                    Err(err) => self.reject(err, &mut effects),
                }
            }
            AppEvent::EditAnalysis(text) => {
                if let Err(err) = analysis::edit(&mut self.session, text) {
                    self.reject(err, &mut effects);
                }
            }
            AppEvent::SaveAnalysis => self.on_save(&mut effects),
            AppEvent::KeyPressed { chord, focus } => {
                if analysis::is_save_shortcut(&chord, focus) {
                    self.on_save(&mut effects);
                }
            }
            AppEvent::ToggleHistory => {
                if let Some(ticket) = self.history.toggle(self.mode.mode()) {
                    effects.push(Effect::ListHistory(ticket));
                }
            }
            AppEvent::CloseHistory => {
                self.history.close();
            }
            AppEvent::SelectHistory(entry) => {
                self.path_input = self.history.select(&entry);
                effects.push(Effect::WriteClipboard(entry));
            }
            AppEvent::DeleteHistory(entry) => effects.push(Effect::DeleteHistory { entry }),

            AppEvent::CloneSettled { ticket, result } => {
                self.on_clone_settled(ticket, result, &mut effects)
            }
            AppEvent::RootListed {
                ticket,
                path,
                result,
            } => self.on_root_listed(ticket, path, result, &mut effects),
            AppEvent::DirectoryListed {
                ticket,
                path,
                result,
            } => {
                if let Err(err) = &result {
                    log::warn!("加载子目录失败 {}: {}", path, err);
                }
                match self.tree.apply_listing(ticket, &path, result) {
                    ListingOutcome::Applied { count } => {
                        log::debug!("子目录已加载: {} ({} 项)", path, count);
                    }
                    ListingOutcome::Failed => self.notify("加载子目录失败", true, &mut effects),
                    ListingOutcome::Stale => log::debug!("丢弃过期的子目录响应: {}", path),
                }
            }
            AppEvent::ContentLoaded { ticket, result } => {
                if let Err(err) = &result {
                    log::warn!("加载文件内容失败: {}", err);
                }
                let outcome = self.session.apply_content(ticket, result);
                self.on_open_outcome(outcome, &mut effects);
            }
            AppEvent::AnalysisLoaded { ticket, result } => {
                let load = AnalysisLoad::from_result(result);
                if let AnalysisLoad::Failed(reason) = &load {
                    log::warn!("加载已保存的分析失败: {}", reason);
                }
                let outcome = self.session.apply_analysis(ticket, load);
                self.on_open_outcome(outcome, &mut effects);
            }
            AppEvent::AnalysisFinished { ticket, result } => {
                match analysis::apply_analysis_result(&mut self.session, ticket, result) {
                    RunOutcome::Completed => {
                        self.notify("代码分析完成，如需保存请点击保存按钮", false, &mut effects)
                    }
                    RunOutcome::Failed(reason) => {
                        log::warn!("{}", reason);
                        self.notify("代码分析失败", true, &mut effects);
                    }
                    RunOutcome::Stale => log::debug!("丢弃过期的分析结果"),
                }
            }
            AppEvent::AnalysisSaved { job, result } => {
                let path = job.request.path.clone();
                if let Err(err) = &result {
                    log::warn!("保存分析失败 {}: {}", path, err);
                }
                match analysis::apply_save_result(&mut self.session, job, result) {
                    SaveOutcome::Saved => {
                        log::info!("分析已保存: {}", path);
                        self.notify("分析保存成功", false, &mut effects);
                    }
                    SaveOutcome::Failed => self.notify("保存分析失败", true, &mut effects),
                    SaveOutcome::Stale => log::debug!("丢弃过期的保存响应: {}", path),
                }
            }
            AppEvent::HistoryListed { ticket, result } => {
                if let Err(err) = &result {
                    log::warn!("加载历史记录失败: {}", err);
                }
                match self.history.apply_refresh(ticket, result) {
                    RefreshOutcome::Applied { shown } => log::debug!("历史记录已刷新 ({} 项)", shown),
                    RefreshOutcome::Failed => self.notify("加载历史记录失败", true, &mut effects),
                    RefreshOutcome::Stale => log::debug!("丢弃过期的历史记录响应"),
                }
            }
            AppEvent::HistoryDeleted { entry, result } => {
                if let Err(err) = &result {
                    log::warn!("删除历史记录失败 {}: {}", entry, err);
                }
                match self.history.apply_delete(&entry, result) {
                    DeleteOutcome::Removed => self.notify("已删除历史记录", false, &mut effects),
                    DeleteOutcome::Failed => self.notify("删除历史记录失败", true, &mut effects),
                }
            }
            AppEvent::ClipboardWritten(result) => match result {
                Ok(()) => self.notify("已复制到剪贴板", false, &mut effects),
                Err(err) => {
                    log::warn!("写入剪贴板失败: {}", err);
                    self.notify("复制到剪贴板失败", true, &mut effects);
                }
            },
            AppEvent::DismissElapsed(ticket) => {
                self.notifier.dismiss(ticket);
            }
        }
        effects
    }

    fn on_set_mode(&mut self, mode: InputMode, effects: &mut Vec<Effect>) {
        if !self.mode.set_mode(mode) {
            return;
        }
        if let Some(ticket) = self.history.on_mode_changed(mode) {
            effects.push(Effect::ListHistory(ticket));
        }
    }

    fn on_load(&mut self, effects: &mut Vec<Effect>) {
        match self.mode.begin_load(&self.path_input, self.config.record_history) {
            Ok(step) => effects.push(load_step_effect(step)),
            Err(err) => self.reject(err, effects),
        }
    }

    fn on_clone_settled(
        &mut self,
        ticket: LoadTicket,
        result: BackendResult<String>,
        effects: &mut Vec<Effect>,
    ) {
        if let Err(err) = &result {
            log::warn!("克隆仓库失败: {}", err);
        }
        match self.mode.apply_clone(ticket, result) {
            CloneOutcome::Continue(step) => effects.push(load_step_effect(step)),
            CloneOutcome::Failed(message) => self.notify(message, true, effects),
            CloneOutcome::Stale => log::debug!("丢弃过期的克隆响应"),
        }
    }

    fn on_root_listed(
        &mut self,
        ticket: LoadTicket,
        path: String,
        result: BackendResult<Vec<DirEntry>>,
        effects: &mut Vec<Effect>,
    ) {
        if !self.mode.is_current(ticket) {
            log::debug!("丢弃过期的根目录响应: {}", path);
            return;
        }
        match result {
            Ok(entries) => {
                log::info!("项目已加载: {} ({} 项)", path, entries.len());
                self.tree.reset(path, entries);
                self.notify("项目加载成功", false, effects);
            }
            Err(err) => {
                log::warn!("加载项目失败 {}: {}", path, err);
                self.notify("加载项目失败，请检查路径后重试", true, effects);
            }
        }
    }

    /// 路径不存在或不是目录属于调用方（IPC）误用，只记日志不通知
    fn on_expand_result(
        &mut self,
        result: Result<Option<ListRequest>, ValidationError>,
        effects: &mut Vec<Effect>,
    ) {
        match result {
            Ok(Some(request)) => effects.push(Effect::ListDirectory(request)),
            Ok(None) => {}
            Err(err) => log::warn!("展开目录失败: {}", err),
        }
    }

    /// 打开一个文件；路径不在树中或不是文件时只记日志，那是调用方（IPC）误用而不是用户操作
    fn on_select_file(&mut self, path: &str, effects: &mut Vec<Effect>) {
        let path = match self.tree.select_leaf(path) {
            Ok(path) => path,
            Err(err) => {
                log::warn!("选择文件失败: {}", err);
                return;
            }
        };
        if self.session.is_dirty() {
            log::info!("切换文件，放弃未保存的分析: {}", self.session.path().unwrap_or_default());
        }
        let ticket = self.session.open(path.clone());
        effects.push(Effect::ReadContent {
            ticket,
            path: path.clone(),
        });
        effects.push(Effect::LoadAnalysis { ticket, path });
    }

    fn on_open_outcome(&mut self, outcome: OpenOutcome, effects: &mut Vec<Effect>) {
        match outcome {
            OpenOutcome::Stale => log::debug!("丢弃过期的文件响应"),
            OpenOutcome::Pending => {}
            OpenOutcome::Ready {
                analysis_found,
                analysis_failed,
            } => {
                // 分析加载失败时已经上报过错误，不再用成功通知覆盖它
                if analysis_failed {
                    return;
                }
                let message = if analysis_found {
                    "文件及分析加载完成"
                } else {
                    "文件加载完成"
                };
                self.notify(message, false, effects);
            }
            OpenOutcome::ContentFailed => self.notify("加载文件失败", true, effects),
            OpenOutcome::AnalysisFailed => self.notify("加载分析失败", true, effects),
        }
    }

    fn on_save(&mut self, effects: &mut Vec<Effect>) {
        match analysis::save(&self.session) {
            Ok(job) => effects.push(Effect::SaveAnalysis(job)),
            Err(err) => self.reject(err, effects),
        }
    }

    fn reject(&mut self, err: ValidationError, effects: &mut Vec<Effect>) {
        self.notify(err.message().to_string(), true, effects);
    }

    fn notify(&mut self, message: impl Into<String>, is_error: bool, effects: &mut Vec<Effect>) {
        let change = self.notifier.notify(message, is_error);
        if let Some(cancel) = change.cancel {
            effects.push(Effect::CancelDismiss(cancel));
        }
        effects.push(Effect::ScheduleDismiss {
            ticket: change.schedule,
            after: Duration::from_millis(self.config.notification_ms),
        });
    }

    /// 生成当前界面快照
    pub fn snapshot(&self) -> ViewSnapshot {
        let mode = self.mode.mode();
        let file = self.session.path().map(|path| {
            let extension = file_extension(path);
            let language = extension
                .as_deref()
                .and_then(language_for_extension)
                .map(str::to_string);
            FileView {
                path: path.to_string(),
                extension,
                language,
                content: self.session.raw_content().to_string(),
                content_phase: self.session.content_phase(),
                analysis_text: self.session.analysis_text().to_string(),
                analysis_phase: self.session.analysis_phase(),
                dirty: self.session.is_dirty(),
                ready: self.session.is_ready(),
                analyzing: self.session.is_running(),
            }
        });

        ViewSnapshot {
            mode,
            placeholder: mode.placeholder().to_string(),
            action_label: mode.action_label().to_string(),
            path_input: self.path_input.clone(),
            root_path: self.tree.root_path().map(str::to_string),
            tree: self.tree.visible_rows(),
            file,
            models: self.config.models.clone(),
            selected_model: self.selected_model.clone(),
            history: HistoryView {
                open: self.history.is_open(),
                entries: self.history.entries().to_vec(),
                empty_label: self
                    .history
                    .shows_empty_state()
                    .then(|| EMPTY_HISTORY_LABEL.to_string()),
            },
            notification: self.notifier.state().clone(),
        }
    }
}

fn load_step_effect(step: LoadStep) -> Effect {
    match step {
        LoadStep::Clone { ticket, url } => Effect::CloneSource { ticket, url },
        LoadStep::ListRoot {
            ticket,
            path,
            record_history,
        } => Effect::ListRoot {
            ticket,
            path,
            record_history,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::services::analysis::ANALYSIS_PLACEHOLDER;

    fn entry(name: &str, path: &str, is_directory: bool) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            path: path.to_string(),
            is_directory,
        }
    }

    fn not_found() -> BackendError {
        BackendError::Status {
            status: 404,
            detail: Some("Analysis file not found".to_string()),
        }
    }

    /// 加载本地项目并返回状态
    fn loaded(entries: Vec<DirEntry>) -> AppState {
        let mut state = AppState::new(ClientConfig::default());
        state.handle_event(AppEvent::SetPathInput("/repo".into()));
        let effects = state.handle_event(AppEvent::Load);
        let Some(Effect::ListRoot { ticket, path, .. }) = effects.into_iter().next() else {
            panic!("local load lists the root");
        };
        state.handle_event(AppEvent::RootListed {
            ticket,
            path,
            result: Ok(entries),
        });
        state
    }

    fn open_tickets(effects: &[Effect]) -> (SessionTicket, SessionTicket) {
        let content = effects.iter().find_map(|e| match e {
            Effect::ReadContent { ticket, .. } => Some(*ticket),
            _ => None,
        });
        let analysis = effects.iter().find_map(|e| match e {
            Effect::LoadAnalysis { ticket, .. } => Some(*ticket),
            _ => None,
        });
        (content.expect("content request"), analysis.expect("analysis request"))
    }

    fn message(state: &AppState) -> (&str, bool) {
        let notification = state.notifier().state();
        (notification.message.as_str(), notification.is_error)
    }

    #[test]
    fn test_end_to_end_analyze_and_save() {
        let mut state = loaded(vec![
            entry("a.txt", "/repo/a.txt", false),
            entry("b.ai", "/repo/b.ai", false),
        ]);
        let view = state.snapshot();
        assert_eq!(view.tree.len(), 1);
        assert_eq!(view.tree[0].name, "a.txt");
        assert_eq!(message(&state), ("项目加载成功", false));

        let effects = state.handle_event(AppEvent::SelectFile("/repo/a.txt".into()));
        let (content, analysis) = open_tickets(&effects);
        state.handle_event(AppEvent::ContentLoaded {
            ticket: content,
            result: Ok("hello".into()),
        });
        state.handle_event(AppEvent::AnalysisLoaded {
            ticket: analysis,
            result: Err(not_found()),
        });
        assert_eq!(message(&state), ("文件加载完成", false));
        let file = state.snapshot().file.expect("file is open");
        assert_eq!(file.analysis_text, "");
        assert!(!file.dirty);
        assert!(file.ready);
        assert_eq!(file.extension.as_deref(), Some("txt"));

        let effects = state.handle_event(AppEvent::RequestAnalysis);
        let [Effect::RunAnalysis(job)] = effects.as_slice() else {
            panic!("expected one analysis request, got {:?}", effects);
        };
        assert_eq!(job.request.code, "hello");
        assert_eq!(job.request.model, "deepseek");
        assert_eq!(state.session().analysis_text(), ANALYSIS_PLACEHOLDER);

        state.handle_event(AppEvent::AnalysisFinished {
            ticket: job.ticket,
            result: Ok("summary".into()),
        });
        let file = state.snapshot().file.unwrap();
        assert_eq!(file.analysis_text, "summary");
        assert!(file.dirty);

        let effects = state.handle_event(AppEvent::SaveAnalysis);
        let [Effect::SaveAnalysis(save)] = effects.as_slice() else {
            panic!("expected one save request, got {:?}", effects);
        };
        assert_eq!(save.request.content, "summary");
        assert_eq!(save.request.path, "/repo/a.txt");
        state.handle_event(AppEvent::AnalysisSaved {
            job: save.clone(),
            result: Ok(()),
        });
        assert!(!state.snapshot().file.unwrap().dirty);
        assert_eq!(message(&state), ("分析保存成功", false));
    }

    #[test]
    fn test_expand_collapse_expand_lists_once() {
        let mut state = loaded(vec![entry("src", "/repo/src", true)]);

        let first = state.handle_event(AppEvent::ToggleNode("/repo/src".into()));
        let [Effect::ListDirectory(request)] = first.as_slice() else {
            panic!("first expand lists the directory");
        };
        state.handle_event(AppEvent::DirectoryListed {
            ticket: request.ticket,
            path: request.path.clone(),
            result: Ok(vec![entry("lib.rs", "/repo/src/lib.rs", false)]),
        });
        assert_eq!(state.snapshot().tree.len(), 2);

        assert!(state.handle_event(AppEvent::ToggleNode("/repo/src".into())).is_empty());
        assert_eq!(state.snapshot().tree.len(), 1);
        assert!(state.handle_event(AppEvent::ExpandNode("/repo/src".into())).is_empty());
        assert_eq!(state.snapshot().tree.len(), 2);
    }

    #[test]
    fn test_failed_subdirectory_listing_notifies_and_allows_retry() {
        let mut state = loaded(vec![entry("src", "/repo/src", true)]);
        let effects = state.handle_event(AppEvent::ExpandNode("/repo/src".into()));
        let [Effect::ListDirectory(request)] = effects.as_slice() else {
            panic!("expected listing");
        };
        state.handle_event(AppEvent::DirectoryListed {
            ticket: request.ticket,
            path: request.path.clone(),
            result: Err(BackendError::Transport("refused".into())),
        });
        assert_eq!(message(&state), ("加载子目录失败", true));

        let retry = state.handle_event(AppEvent::ExpandNode("/repo/src".into()));
        assert!(matches!(retry.as_slice(), [Effect::ListDirectory(_)]));
    }

    #[test]
    fn test_responses_for_previous_file_do_not_touch_new_session() {
        let mut state = loaded(vec![
            entry("a.txt", "/repo/a.txt", false),
            entry("b.txt", "/repo/b.txt", false),
        ]);
        let (a_content, a_analysis) =
            open_tickets(&state.handle_event(AppEvent::SelectFile("/repo/a.txt".into())));
        let (b_content, b_analysis) =
            open_tickets(&state.handle_event(AppEvent::SelectFile("/repo/b.txt".into())));

        state.handle_event(AppEvent::ContentLoaded {
            ticket: b_content,
            result: Ok("B".into()),
        });
        state.handle_event(AppEvent::AnalysisLoaded {
            ticket: b_analysis,
            result: Ok("analysis of B".into()),
        });
        assert_eq!(message(&state), ("文件及分析加载完成", false));

        let late = state.handle_event(AppEvent::ContentLoaded {
            ticket: a_content,
            result: Ok("A".into()),
        });
        assert!(late.is_empty());
        state.handle_event(AppEvent::AnalysisLoaded {
            ticket: a_analysis,
            result: Ok("analysis of A".into()),
        });

        let file = state.snapshot().file.unwrap();
        assert_eq!(file.path, "/repo/b.txt");
        assert_eq!(file.content, "B");
        assert_eq!(file.analysis_text, "analysis of B");
        assert!(!file.dirty);
    }

    #[test]
    fn test_content_failure_reports_and_blocks_analysis() {
        let mut state = loaded(vec![entry("a.txt", "/repo/a.txt", false)]);
        let (content, _) = open_tickets(&state.handle_event(AppEvent::SelectFile("/repo/a.txt".into())));
        state.handle_event(AppEvent::ContentLoaded {
            ticket: content,
            result: Err(BackendError::Status {
                status: 500,
                detail: None,
            }),
        });
        assert_eq!(message(&state), ("加载文件失败", true));

        assert!(state.handle_event(AppEvent::RequestAnalysis).iter().all(|e| !matches!(e, Effect::RunAnalysis(_))));
        assert_eq!(message(&state), ("请先选择一个文件", true));
    }

    #[test]
    fn test_analysis_transport_failure_is_reported_once() {
        let mut state = loaded(vec![entry("a.txt", "/repo/a.txt", false)]);
        let (content, analysis) = open_tickets(&state.handle_event(AppEvent::SelectFile("/repo/a.txt".into())));
        state.handle_event(AppEvent::AnalysisLoaded {
            ticket: analysis,
            result: Err(BackendError::Transport("reset".into())),
        });
        assert_eq!(message(&state), ("加载分析失败", true));

        // 内容随后到达：会话就绪，但不再用成功通知覆盖错误
        let effects = state.handle_event(AppEvent::ContentLoaded {
            ticket: content,
            result: Ok("x".into()),
        });
        assert!(effects.is_empty());
        assert_eq!(message(&state), ("加载分析失败", true));
        assert!(state.session().is_ready());
    }

    /// 打开文件并让两个请求都成功返回
    fn open_ready(state: &mut AppState, path: &str, content: &str, analysis: &str) {
        let (content_ticket, analysis_ticket) =
            open_tickets(&state.handle_event(AppEvent::SelectFile(path.into())));
        state.handle_event(AppEvent::ContentLoaded {
            ticket: content_ticket,
            result: Ok(content.into()),
        });
        state.handle_event(AppEvent::AnalysisLoaded {
            ticket: analysis_ticket,
            result: Ok(analysis.into()),
        });
    }

    #[test]
    fn test_saved_analysis_arriving_after_content_failure_is_dropped() {
        let mut state = loaded(vec![entry("a.txt", "/repo/a.txt", false)]);
        let (content, analysis) = open_tickets(&state.handle_event(AppEvent::SelectFile("/repo/a.txt".into())));
        state.handle_event(AppEvent::ContentLoaded {
            ticket: content,
            result: Err(BackendError::Status {
                status: 500,
                detail: None,
            }),
        });
        let timer = state.notifier().pending_timer();

        let effects = state.handle_event(AppEvent::AnalysisLoaded {
            ticket: analysis,
            result: Ok("stored analysis".into()),
        });
        assert!(effects.is_empty());
        assert_eq!(message(&state), ("加载文件失败", true));
        assert_eq!(state.notifier().pending_timer(), timer);
        assert_eq!(state.session().analysis_text(), "");
        assert!(!state.session().is_dirty());
    }

    #[test]
    fn test_analysis_transport_failure_after_content_failure_is_not_reported() {
        let mut state = loaded(vec![entry("a.txt", "/repo/a.txt", false)]);
        let (content, analysis) = open_tickets(&state.handle_event(AppEvent::SelectFile("/repo/a.txt".into())));
        state.handle_event(AppEvent::ContentLoaded {
            ticket: content,
            result: Err(BackendError::Transport("reset".into())),
        });
        assert_eq!(message(&state), ("加载文件失败", true));

        let effects = state.handle_event(AppEvent::AnalysisLoaded {
            ticket: analysis,
            result: Err(BackendError::Transport("reset".into())),
        });
        assert!(effects.is_empty());
        assert_eq!(message(&state), ("加载文件失败", true));
    }

    #[test]
    fn test_save_response_for_previous_file_is_ignored() {
        let mut state = loaded(vec![
            entry("a.txt", "/repo/a.txt", false),
            entry("b.txt", "/repo/b.txt", false),
        ]);
        open_ready(&mut state, "/repo/a.txt", "A", "analysis of A");
        state.handle_event(AppEvent::EditAnalysis("edited A".into()));
        let effects = state.handle_event(AppEvent::SaveAnalysis);
        let [Effect::SaveAnalysis(save)] = effects.as_slice() else {
            panic!("expected one save request, got {:?}", effects);
        };
        let save = save.clone();

        open_ready(&mut state, "/repo/b.txt", "B", "analysis of B");
        state.handle_event(AppEvent::EditAnalysis("edited B".into()));
        let before = state.notifier().state().clone();
        let timer = state.notifier().pending_timer();

        let effects = state.handle_event(AppEvent::AnalysisSaved {
            job: save,
            result: Ok(()),
        });
        assert!(effects.is_empty());
        assert_eq!(state.notifier().state(), &before);
        assert_eq!(state.notifier().pending_timer(), timer);
        assert_eq!(state.session().path(), Some("/repo/b.txt"));
        assert_eq!(state.session().analysis_text(), "edited B");
        assert_eq!(state.session().last_saved_analysis(), "analysis of B");
        assert!(state.session().is_dirty());
    }

    #[test]
    fn test_analysis_result_for_previous_file_is_ignored() {
        let mut state = loaded(vec![
            entry("a.txt", "/repo/a.txt", false),
            entry("b.txt", "/repo/b.txt", false),
        ]);
        open_ready(&mut state, "/repo/a.txt", "A", "");
        let effects = state.handle_event(AppEvent::RequestAnalysis);
        let [Effect::RunAnalysis(job)] = effects.as_slice() else {
            panic!("expected one analysis request, got {:?}", effects);
        };
        let ticket = job.ticket;

        open_ready(&mut state, "/repo/b.txt", "B", "analysis of B");
        let before = state.notifier().state().clone();
        let timer = state.notifier().pending_timer();

        let effects = state.handle_event(AppEvent::AnalysisFinished {
            ticket,
            result: Ok("analysis of A".into()),
        });
        assert!(effects.is_empty());
        assert_eq!(state.notifier().state(), &before);
        assert_eq!(state.notifier().pending_timer(), timer);
        let file = state.snapshot().file.unwrap();
        assert_eq!(file.path, "/repo/b.txt");
        assert_eq!(file.analysis_text, "analysis of B");
        assert!(!file.dirty);
        assert!(!state.session().is_running());
    }

    #[test]
    fn test_empty_input_issues_no_request() {
        let mut state = AppState::new(ClientConfig::default());
        state.handle_event(AppEvent::SetPathInput("   ".into()));
        let effects = state.handle_event(AppEvent::Load);
        assert!(effects.iter().all(|e| matches!(e, Effect::ScheduleDismiss { .. })));
        assert_eq!(message(&state), ("请输入项目目录路径", true));
    }

    #[test]
    fn test_git_load_clones_then_lists_without_recording() {
        let mut state = AppState::new(ClientConfig::default());
        state.handle_event(AppEvent::SetInputMode(InputMode::Git));
        state.handle_event(AppEvent::SetPathInput("https://github.com/a/b".into()));
        assert_eq!(state.snapshot().action_label, "克隆并加载");

        let effects = state.handle_event(AppEvent::Load);
        let [Effect::CloneSource { ticket, url }] = effects.as_slice() else {
            panic!("git mode clones first");
        };
        assert_eq!(url, "https://github.com/a/b");

        let effects = state.handle_event(AppEvent::CloneSettled {
            ticket: *ticket,
            result: Ok("/tmp/clones/b".into()),
        });
        assert_eq!(
            effects,
            vec![Effect::ListRoot {
                ticket: *ticket,
                path: "/tmp/clones/b".into(),
                record_history: false,
            }]
        );
    }

    #[test]
    fn test_clone_failure_shows_backend_detail_and_keeps_tree() {
        let mut state = loaded(vec![entry("a.txt", "/repo/a.txt", false)]);
        state.handle_event(AppEvent::SetInputMode(InputMode::Git));
        state.handle_event(AppEvent::SetPathInput("https://github.com/a/missing".into()));
        let effects = state.handle_event(AppEvent::Load);
        let [Effect::CloneSource { ticket, .. }] = effects.as_slice() else {
            panic!("expected clone");
        };

        let effects = state.handle_event(AppEvent::CloneSettled {
            ticket: *ticket,
            result: Err(BackendError::Status {
                status: 500,
                detail: Some("Repository not found".into()),
            }),
        });
        assert!(!effects.iter().any(|e| matches!(e, Effect::ListRoot { .. })));
        assert_eq!(message(&state), ("Repository not found", true));
        assert_eq!(state.snapshot().root_path.as_deref(), Some("/repo"));
    }

    #[test]
    fn test_failed_root_listing_notifies() {
        let mut state = AppState::new(ClientConfig::default());
        state.handle_event(AppEvent::SetPathInput("/nope".into()));
        let Some(Effect::ListRoot {
            ticket,
            path,
            record_history,
        }) = state.handle_event(AppEvent::Load).into_iter().next()
        else {
            panic!("expected root listing");
        };
        assert!(record_history);
        state.handle_event(AppEvent::RootListed {
            ticket,
            path,
            result: Err(BackendError::Status {
                status: 404,
                detail: None,
            }),
        });
        assert_eq!(message(&state), ("加载项目失败，请检查路径后重试", true));
        assert!(state.snapshot().tree.is_empty());
    }

    #[test]
    fn test_second_notification_replaces_first_and_its_timer() {
        let mut state = AppState::new(ClientConfig::default());
        let first = state.handle_event(AppEvent::SaveAnalysis);
        let [Effect::ScheduleDismiss { ticket: first_ticket, after }] = first.as_slice() else {
            panic!("expected one timer, got {:?}", first);
        };
        assert_eq!(*after, Duration::from_millis(2000));

        let second = state.handle_event(AppEvent::Load);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0], Effect::CancelDismiss(*first_ticket));
        let Effect::ScheduleDismiss { ticket: second_ticket, .. } = second[1] else {
            panic!("expected a new timer");
        };
        assert_eq!(message(&state), ("请输入项目目录路径", true));

        // 旧计时器的到期事件不会隐藏新消息
        state.handle_event(AppEvent::DismissElapsed(*first_ticket));
        assert!(state.notifier().state().visible);
        state.handle_event(AppEvent::DismissElapsed(second_ticket));
        assert!(!state.notifier().state().visible);
    }

    #[test]
    fn test_history_select_fills_input_and_copies() {
        let mut state = AppState::new(ClientConfig::default());
        let effects = state.handle_event(AppEvent::ToggleHistory);
        let [Effect::ListHistory(ticket)] = effects.as_slice() else {
            panic!("opening refreshes history");
        };
        state.handle_event(AppEvent::HistoryListed {
            ticket: *ticket,
            result: Ok(vec!["https://x/y".into(), "/local/a".into(), "git://z".into()]),
        });
        assert_eq!(state.snapshot().history.entries, vec!["/local/a".to_string()]);

        let effects = state.handle_event(AppEvent::SelectHistory("/local/a".into()));
        assert_eq!(effects, vec![Effect::WriteClipboard("/local/a".into())]);
        assert_eq!(state.path_input(), "/local/a");
        assert!(!state.snapshot().history.open);

        state.handle_event(AppEvent::ClipboardWritten(Err("denied".into())));
        assert_eq!(message(&state), ("复制到剪贴板失败", true));
    }

    #[test]
    fn test_mode_switch_refreshes_open_history() {
        let mut state = AppState::new(ClientConfig::default());
        state.handle_event(AppEvent::ToggleHistory);
        let effects = state.handle_event(AppEvent::SetInputMode(InputMode::Git));
        let [Effect::ListHistory(ticket)] = effects.as_slice() else {
            panic!("open dropdown refreshes on mode change");
        };
        assert_eq!(ticket.mode, InputMode::Git);
        assert!(state.handle_event(AppEvent::SetInputMode(InputMode::Git)).is_empty());
    }

    #[test]
    fn test_history_delete_outcomes() {
        let mut state = AppState::new(ClientConfig::default());
        let effects = state.handle_event(AppEvent::ToggleHistory);
        let [Effect::ListHistory(ticket)] = effects.as_slice() else {
            panic!("expected refresh");
        };
        state.handle_event(AppEvent::HistoryListed {
            ticket: *ticket,
            result: Ok(vec!["/a".into()]),
        });

        let effects = state.handle_event(AppEvent::DeleteHistory("/a".into()));
        assert_eq!(effects, vec![Effect::DeleteHistory { entry: "/a".into() }]);
        state.handle_event(AppEvent::HistoryDeleted {
            entry: "/a".into(),
            result: Err(BackendError::Transport("down".into())),
        });
        assert_eq!(message(&state), ("删除历史记录失败", true));
        assert_eq!(state.history().entries().len(), 1);

        state.handle_event(AppEvent::HistoryDeleted {
            entry: "/a".into(),
            result: Ok(()),
        });
        let view = state.snapshot();
        assert!(view.history.entries.is_empty());
        assert_eq!(view.history.empty_label.as_deref(), Some(EMPTY_HISTORY_LABEL));
    }

    #[test]
    fn test_save_shortcut_only_with_focus_on_analysis() {
        let mut state = loaded(vec![entry("a.txt", "/repo/a.txt", false)]);
        let (content, analysis) = open_tickets(&state.handle_event(AppEvent::SelectFile("/repo/a.txt".into())));
        state.handle_event(AppEvent::ContentLoaded {
            ticket: content,
            result: Ok("x".into()),
        });
        state.handle_event(AppEvent::AnalysisLoaded {
            ticket: analysis,
            result: Ok("saved".into()),
        });
        state.handle_event(AppEvent::EditAnalysis("edited".into()));

        let chord = KeyChord {
            key: "s".into(),
            ctrl: true,
            meta: false,
        };
        let elsewhere = state.handle_event(AppEvent::KeyPressed {
            chord: chord.clone(),
            focus: FocusArea::Other,
        });
        assert!(elsewhere.is_empty());

        let effects = state.handle_event(AppEvent::KeyPressed {
            chord,
            focus: FocusArea::Analysis,
        });
        assert!(matches!(effects.as_slice(), [Effect::SaveAnalysis(job)] if job.request.content == "edited"));
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let mut state = AppState::new(ClientConfig::default());
        state.handle_event(AppEvent::SelectModel("glm4".into()));
        assert_eq!(state.selected_model(), "glm4");

        state.handle_event(AppEvent::SelectModel("gpt-x".into()));
        assert_eq!(state.selected_model(), "glm4");
        assert!(state.notifier().state().is_error);
    }
}
