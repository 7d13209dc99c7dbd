//! # 事件循环
//!
//! `AppRuntime` 持有唯一的 `AppState`，从 mpsc 队列中逐个取出事件交给控制器处理，
//! 再执行返回的副作用：
//! - 后端请求在独立任务中运行，结束后把结果作为新事件送回队列
//! - 通知消失计时器同一时刻最多一个，新计时器启动前先 abort 旧的
//! - 剪贴板写入交给 `Surface`，结果同样作为事件送回
//!
//! 每处理完一个事件，把最新快照推给 `Surface` 并发布到 watch 通道。
//! 队列保证状态只在一个逻辑线程上被修改；请求之间的先后竞争由控制器的票据检查处理。

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::models::settings::ClientConfig;
use crate::models::view::ViewSnapshot;
use crate::services::analysis::{self, FocusArea, KeyChord};
use crate::services::backend::Backend;
use crate::services::controller::{AppEvent, AppState, Effect};
use crate::services::notifier::DismissTicket;

/// 渲染层：接收界面快照，提供剪贴板
pub trait Surface: Send + Sync + 'static {
    fn render(&self, view: &ViewSnapshot);

    fn write_clipboard(&self, text: &str) -> Result<(), String>;
}

/// 运行时的外部句柄，可以随意克隆
#[derive(Clone, Debug)]
pub struct RuntimeHandle {
    events: mpsc::UnboundedSender<AppEvent>,
    view: watch::Receiver<ViewSnapshot>,
}

impl RuntimeHandle {
    /// 投递一个事件
    ///
    /// # 错误
    /// 事件循环已经退出时返回错误
    pub fn dispatch(&self, event: AppEvent) -> Result<(), String> {
        self.events
            .send(event)
            .map_err(|_| "事件循环已停止".to_string())
    }

    /// 投递一次按键，返回这次按键是否被消费（调用方据此阻止默认行为）
    pub fn key_pressed(&self, chord: KeyChord, focus: FocusArea) -> Result<bool, String> {
        let consumed = analysis::is_save_shortcut(&chord, focus);
        self.dispatch(AppEvent::KeyPressed { chord, focus })?;
        Ok(consumed)
    }

    /// 最新的界面快照
    pub fn view(&self) -> ViewSnapshot {
        self.view.borrow().clone()
    }

    /// 订阅快照变化
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.view.clone()
    }
}

pub struct AppRuntime {
    state: AppState,
    backend: Arc<dyn Backend>,
    surface: Arc<dyn Surface>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// 弱引用：所有句柄和在途请求都结束后，事件循环随之退出
    events_tx: mpsc::WeakUnboundedSender<AppEvent>,
    view_tx: watch::Sender<ViewSnapshot>,
    dismiss_timer: Option<(DismissTicket, JoinHandle<()>)>,
}

impl AppRuntime {
    pub fn new(
        config: ClientConfig,
        backend: Arc<dyn Backend>,
        surface: Arc<dyn Surface>,
    ) -> (Self, RuntimeHandle) {
        let state = AppState::new(config);
        let (events, events_rx) = mpsc::unbounded_channel();
        let (view_tx, view) = watch::channel(state.snapshot());

        let runtime = Self {
            state,
            backend,
            surface,
            events_rx,
            events_tx: events.downgrade(),
            view_tx,
            dismiss_timer: None,
        };
        (runtime, RuntimeHandle { events, view })
    }

    /// 运行事件循环，直到所有发送端都被释放
    pub async fn run(mut self) {
        self.publish();
        while let Some(event) = self.events_rx.recv().await {
            self.process(event);
        }
        if let Some((_, handle)) = self.dismiss_timer.take() {
            handle.abort();
        }
        log::debug!("事件循环已退出");
    }

    fn process(&mut self, event: AppEvent) {
        let effects = self.state.handle_event(event);
        for effect in effects {
            self.execute(effect);
        }
        self.publish();
    }

    fn publish(&self) {
        let view = self.state.snapshot();
        self.surface.render(&view);
        self.view_tx.send_replace(view);
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::CloneSource { ticket, url } => self.spawn_request(move |backend| async move {
                let result = backend.clone_source(&url).await;
                AppEvent::CloneSettled { ticket, result }
            }),
            Effect::ListRoot {
                ticket,
                path,
                record_history,
            } => self.spawn_request(move |backend| async move {
                let result = backend.list_directory(&path, record_history).await;
                AppEvent::RootListed {
                    ticket,
                    path,
                    result,
                }
            }),
            Effect::ListDirectory(request) => self.spawn_request(move |backend| async move {
                let result = backend.list_directory(&request.path, false).await;
                AppEvent::DirectoryListed {
                    ticket: request.ticket,
                    path: request.path,
                    result,
                }
            }),
            Effect::ReadContent { ticket, path } => self.spawn_request(move |backend| async move {
                let result = backend.read_content(&path).await;
                AppEvent::ContentLoaded { ticket, result }
            }),
            Effect::LoadAnalysis { ticket, path } => self.spawn_request(move |backend| async move {
                let result = backend.load_analysis(&path).await;
                AppEvent::AnalysisLoaded { ticket, result }
            }),
            Effect::RunAnalysis(job) => self.spawn_request(move |backend| async move {
                let result = backend.analyze(&job.request).await;
                AppEvent::AnalysisFinished {
                    ticket: job.ticket,
                    result,
                }
            }),
            Effect::SaveAnalysis(job) => self.spawn_request(move |backend| async move {
                let result = backend.save_analysis(&job.request).await;
                AppEvent::AnalysisSaved { job, result }
            }),
            Effect::ListHistory(ticket) => self.spawn_request(move |backend| async move {
                let result = backend.list_history().await;
                AppEvent::HistoryListed { ticket, result }
            }),
            Effect::DeleteHistory { entry } => self.spawn_request(move |backend| async move {
                let result = backend.delete_history(&entry).await;
                AppEvent::HistoryDeleted { entry, result }
            }),
            Effect::WriteClipboard(text) => {
                let result = self.surface.write_clipboard(&text);
                self.post(AppEvent::ClipboardWritten(result));
            }
            Effect::CancelDismiss(ticket) => {
                if let Some((current, handle)) = self.dismiss_timer.take() {
                    if current == ticket {
                        handle.abort();
                    } else {
                        self.dismiss_timer = Some((current, handle));
                    }
                }
            }
            Effect::ScheduleDismiss { ticket, after } => {
                if let Some((_, handle)) = self.dismiss_timer.take() {
                    handle.abort();
                }
                let Some(tx) = self.events_tx.upgrade() else {
                    return;
                };
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(AppEvent::DismissElapsed(ticket));
                });
                self.dismiss_timer = Some((ticket, handle));
            }
        }
    }

    /// 在独立任务中运行一个后端请求，结束后把结果事件送回队列
    fn spawn_request<F, Fut>(&self, request: F)
    where
        F: FnOnce(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = AppEvent> + Send + 'static,
    {
        let Some(tx) = self.events_tx.upgrade() else {
            return;
        };
        let pending = request(Arc::clone(&self.backend));
        tokio::spawn(async move {
            let event = pending.await;
            if tx.send(event).is_err() {
                log::debug!("事件循环已退出，丢弃请求结果");
            }
        });
    }

    fn post(&self, event: AppEvent) {
        if let Some(tx) = self.events_tx.upgrade() {
            let _ = tx.send(event);
        }
    }
}
