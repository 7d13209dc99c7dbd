//! # 输入模式控制
//!
//! 维护当前输入模式，并把"加载"动作拆解为请求步骤：
//! - 本地模式：直接列出根目录
//! - Git 模式：先克隆（URL → 后端本地路径），成功后再列出根目录；克隆失败不会列目录
//!
//! 两条路径最终汇合到同一个"列出根目录并重建目录树"的步骤。
//! 每次加载分配新票据，后发起的加载会让先发起的加载的响应失效。

use crate::error::{BackendError, ValidationError};
use crate::models::source::InputMode;

/// 克隆失败且后端未给出原因时的提示
pub const CLONE_FAILED: &str = "克隆仓库失败";

/// 加载票据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub u64);

/// 加载流程中需要运行时执行的下一步
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStep {
    /// 克隆远程仓库
    Clone { ticket: LoadTicket, url: String },
    /// 列出根目录；`record_history` 为 true 时让后端把路径记入历史
    ListRoot {
        ticket: LoadTicket,
        path: String,
        record_history: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    /// 克隆成功，继续列出根目录
    Continue(LoadStep),
    /// 克隆失败，附带展示给用户的原因
    Failed(String),
    Stale,
}

#[derive(Debug, Default)]
pub struct ModeController {
    mode: InputMode,
    generation: u64,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// 切换输入模式
    ///
    /// # 返回值
    /// 模式是否发生了变化
    pub fn set_mode(&mut self, mode: InputMode) -> bool {
        std::mem::replace(&mut self.mode, mode) != mode
    }

    /// 票据是否属于最近一次加载
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// 开始加载
    ///
    /// 本地模式下 `record_history` 决定是否记录历史；Git 模式列出的是后端的克隆目录，
    /// 不记录该路径（仓库地址由克隆接口负责记录）。
    ///
    /// # 错误
    /// 输入为空（去掉首尾空白后）时返回与模式对应的提示，不发出请求
    pub fn begin_load(&mut self, input: &str, record_history: bool) -> Result<LoadStep, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::new(self.mode.missing_input_message()));
        }

        self.generation += 1;
        let ticket = LoadTicket(self.generation);

        Ok(match self.mode {
            InputMode::Local => LoadStep::ListRoot {
                ticket,
                path: input.to_string(),
                record_history,
            },
            InputMode::Git => LoadStep::Clone {
                ticket,
                url: input.to_string(),
            },
        })
    }

    /// 处理克隆结果
    pub fn apply_clone(&self, ticket: LoadTicket, result: Result<String, BackendError>) -> CloneOutcome {
        if !self.is_current(ticket) {
            return CloneOutcome::Stale;
        }
        match result {
            Ok(path) => CloneOutcome::Continue(LoadStep::ListRoot {
                ticket,
                path,
                record_history: false,
            }),
            Err(err) => CloneOutcome::Failed(err.detail().unwrap_or(CLONE_FAILED).to_string()),
        }
    }
}
