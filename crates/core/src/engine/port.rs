use crate::engine::entity::CycleOutcome;
use std::time::Duration;

/// # Summary
/// 轮询周期之间的等待策略。
/// 轮询循环在每个周期结束后调用一次，据此决定空闲时长。
///
/// # Invariants
/// - 实现类必须保证线程安全 (`Send` + `Sync`)。
/// - 不得返回“停止”语义：循环永远继续，策略只决定等多久。
pub trait DelayPolicy: Send + Sync {
    /// # Summary
    /// 根据刚结束的周期结果计算下一次等待时长。
    ///
    /// # Arguments
    /// * `outcome` - 刚结束周期的结果。
    ///
    /// # Returns
    /// * 下一周期开始前的等待时长。
    fn next_delay(&mut self, outcome: &CycleOutcome) -> Duration;
}
