//! # 通知服务
//!
//! 一次只显示一条的状态/错误通知，固定时长后自动消失。
//!
//! ## 计时器合并
//! 每次 `notify` 都先取消上一个尚未触发的消失计时器，再登记新的计时器，
//! 因此任何时刻最多只有一个计时器存活。新通知直接覆盖旧通知，不排队。
//!
//! 本模块只维护状态和计时器票据，真正的定时由运行时（`runtime`）执行：
//! 运行时在计时结束时回送 `dismiss(ticket)`，票据不是当前票据时忽略。

use serde::Serialize;

/// 消失计时器票据，每次 `notify` 单调递增
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DismissTicket(pub u64);

/// 当前通知的显示状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationState {
    pub message: String,
    pub is_error: bool,
    pub visible: bool,
}

/// 一次 `notify` 对计时器的调整：先取消 `cancel`，再启动 `schedule`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerChange {
    pub cancel: Option<DismissTicket>,
    pub schedule: DismissTicket,
}

#[derive(Debug, Default)]
pub struct Notifier {
    state: NotificationState,
    pending: Option<DismissTicket>,
    next_ticket: u64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 显示一条通知（后调用者覆盖先调用者）
    ///
    /// # 返回值
    /// 需要运行时执行的计时器调整
    pub fn notify(&mut self, message: impl Into<String>, is_error: bool) -> TimerChange {
        let cancel = self.pending.take();

        self.next_ticket += 1;
        let schedule = DismissTicket(self.next_ticket);

        self.state = NotificationState {
            message: message.into(),
            is_error,
            visible: true,
        };
        self.pending = Some(schedule);

        TimerChange { cancel, schedule }
    }

    /// 计时器到期
    ///
    /// 只有当前票据能隐藏通知；已被取消的计时器即使晚到也不产生效果。
    ///
    /// # 返回值
    /// 通知是否因此被隐藏
    pub fn dismiss(&mut self, ticket: DismissTicket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        self.state.visible = false;
        true
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    /// 当前存活的计时器（最多一个）
    pub fn pending_timer(&self) -> Option<DismissTicket> {
        self.pending
    }
}
