//! # 历史记录下拉框
//!
//! 客户端只是后端历史记录的一个视图：
//! - 每次打开下拉框都重新拉取完整列表，按当前输入模式在本地过滤
//! - 显示的条目始终按当前模式过滤：切换模式时立即用最近一次拉取的列表重新过滤
//! - 删除成功后直接从已显示列表中移除，不重新拉取；删除失败则保持原样
//! - 不做去重，也不做乐观更新
//!
//! 刷新请求带票据，切换模式后的新刷新会让旧刷新的响应失效。

use crate::models::source::InputMode;

/// 历史记录刷新票据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryTicket {
    pub generation: u64,
    pub mode: InputMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { shown: usize },
    Failed,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    Failed,
}

#[derive(Debug, Default)]
pub struct HistoryStore {
    open: bool,
    mode: InputMode,
    /// 最近一次拉取的完整列表（未过滤）
    history: Vec<String>,
    /// 按 `mode` 过滤后待显示的条目
    entries: Vec<String>,
    /// 是否已经收到过当前刷新的结果
    loaded: bool,
    generation: u64,
}

/// 按模式过滤历史记录，保持原有顺序
pub fn filter_for_mode(history: Vec<String>, mode: InputMode) -> Vec<String> {
    history.into_iter().filter(|entry| mode.accepts(entry)).collect()
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// 是否应显示"暂无历史记录"占位项
    pub fn shows_empty_state(&self) -> bool {
        self.loaded && self.entries.is_empty()
    }

    /// 发起一次刷新
    pub fn refresh(&mut self, mode: InputMode) -> HistoryTicket {
        self.apply_mode(mode);
        self.generation += 1;
        HistoryTicket {
            generation: self.generation,
            mode,
        }
    }

    /// 写入刷新结果
    pub fn apply_refresh<E>(
        &mut self,
        ticket: HistoryTicket,
        result: Result<Vec<String>, E>,
    ) -> RefreshOutcome {
        if ticket.generation != self.generation {
            return RefreshOutcome::Stale;
        }
        match result {
            Ok(history) => {
                self.history = history;
                self.entries = filter_for_mode(self.history.clone(), self.mode);
                self.loaded = true;
                RefreshOutcome::Applied {
                    shown: self.entries.len(),
                }
            }
            Err(_) => RefreshOutcome::Failed,
        }
    }

    /// 切换下拉框；打开时返回需要发出的刷新
    pub fn toggle(&mut self, mode: InputMode) -> Option<HistoryTicket> {
        if self.open {
            self.close();
            None
        } else {
            self.open = true;
            Some(self.refresh(mode))
        }
    }

    /// 关闭下拉框（点击下拉框外部）；返回之前是否处于打开状态
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    /// 输入模式切换：立即按新模式重新过滤，下拉框打开时再发起刷新
    pub fn on_mode_changed(&mut self, mode: InputMode) -> Option<HistoryTicket> {
        self.apply_mode(mode);
        if self.open { Some(self.refresh(mode)) } else { None }
    }

    fn apply_mode(&mut self, mode: InputMode) {
        if self.mode != mode {
            self.mode = mode;
            self.entries = filter_for_mode(self.history.clone(), mode);
        }
    }

    /// 写入删除结果：成功时按字符串精确匹配移除
    pub fn apply_delete<E>(&mut self, entry: &str, result: Result<(), E>) -> DeleteOutcome {
        match result {
            Ok(()) => {
                self.history.retain(|e| e != entry);
                self.entries.retain(|e| e != entry);
                DeleteOutcome::Removed
            }
            Err(_) => DeleteOutcome::Failed,
        }
    }

    /// 选中一条历史记录：关闭下拉框，返回要填入输入框的文本
    pub fn select(&mut self, entry: &str) -> String {
        self.close();
        entry.to_string()
    }
}
