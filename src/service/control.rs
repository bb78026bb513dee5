use crate::error::SearchError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// 搜索中止控制：取消标志 + 可选截止时间。
///
/// 在每个组合大小开始前以及枚举过程中定期检查。可跨线程共享，
/// 调用方在另一线程调用 [`SearchControl::cancel`] 即可中止。
#[derive(Debug, Default)]
pub struct SearchControl {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
}

impl SearchControl {
    /// 不限时，只能手动取消
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// 检查点
    pub fn checkpoint(&self) -> Result<(), SearchError> {
        if self.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(SearchError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
