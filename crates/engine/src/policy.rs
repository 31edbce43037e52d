use quotecast_core::config::{BackoffKind, PollerConfig};
use quotecast_core::engine::entity::CycleOutcome;
use quotecast_core::engine::port::DelayPolicy;
use std::time::Duration;

/// # Summary
/// 固定间隔策略：无论周期成败都等待同样的时长。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    /// 不等待，测试时使用
    pub const ZERO: FixedDelay = FixedDelay(Duration::ZERO);
}

impl DelayPolicy for FixedDelay {
    fn next_delay(&mut self, _outcome: &CycleOutcome) -> Duration {
        self.0
    }
}

/// # Summary
/// 指数退避策略：连续失败时逐次放大等待时长，成功后复位。
///
/// # Invariants
/// - 返回值始终位于 `[initial, max]` 区间内。
/// - 只有回执成功的周期会复位；被拒绝的回执按失败计。
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    // 成功周期之后以及首次失败时的等待时长
    initial: Duration,
    // 等待时长上限
    max: Duration,
    // 每次连续失败的放大倍数
    multiplier: u32,
    // 下一次失败时使用的等待时长
    current: Duration,
}

impl ExponentialBackoff {
    /// # Summary
    /// 创建指数退避策略。
    ///
    /// # Arguments
    /// * `initial`: 初始间隔。
    /// * `max`: 间隔上限，小于 `initial` 时按 `initial` 处理。
    /// * `multiplier`: 放大倍数，至少为 1。
    pub fn new(initial: Duration, max: Duration, multiplier: u32) -> Self {
        Self {
            initial,
            max: max.max(initial),
            multiplier: multiplier.max(1),
            current: initial,
        }
    }
}

impl DelayPolicy for ExponentialBackoff {
    fn next_delay(&mut self, outcome: &CycleOutcome) -> Duration {
        if outcome.is_success() {
            self.current = self.initial;
            return self.initial;
        }

        let delay = self.current;
        self.current = self
            .current
            .checked_mul(self.multiplier)
            .map_or(self.max, |next| next.min(self.max));
        delay
    }
}

/// # Summary
/// 根据配置构建延迟策略。
///
/// # Logic
/// 1. `fixed` 使用 `delay_secs` 作为固定间隔。
/// 2. `exponential` 以 `delay_secs` 为初始值、`max_delay_secs` 为上限，每次翻倍。
pub fn from_config(config: &PollerConfig) -> Box<dyn DelayPolicy> {
    let delay = Duration::from_secs(config.delay_secs);
    match config.backoff {
        BackoffKind::Fixed => Box::new(FixedDelay(delay)),
        BackoffKind::Exponential => Box::new(ExponentialBackoff::new(
            delay,
            Duration::from_secs(config.max_delay_secs),
            2,
        )),
    }
}
