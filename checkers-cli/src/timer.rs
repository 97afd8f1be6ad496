//! 回合计时
//!
//! 每回合独立倒计时，超时由对局控制在两次输入之间检查。

use std::time::{Duration, Instant};

/// 回合计时器
#[derive(Debug, Clone)]
pub struct TurnClock {
    /// 每回合时长
    duration: Duration,
    /// 当前回合开始时间
    turn_start: Instant,
}

impl TurnClock {
    /// 创建计时器并立即开始计时
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration: Duration::from_millis(duration_ms),
            turn_start: Instant::now(),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    /// 重新开始本回合计时
    pub fn restart(&mut self) {
        self.restart_at(Instant::now());
    }

    pub fn restart_at(&mut self, now: Instant) {
        self.turn_start = now;
    }

    /// 本回合已用时间（毫秒）
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms_at(Instant::now())
    }

    pub fn elapsed_ms_at(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.turn_start).as_millis() as u64
    }

    /// 本回合剩余时间（毫秒）
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms_at(Instant::now())
    }

    pub fn remaining_ms_at(&self, now: Instant) -> u64 {
        self.duration_ms().saturating_sub(self.elapsed_ms_at(now))
    }

    /// 是否超时
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.remaining_ms_at(now) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_countdown() {
        let clock = TurnClock::new(5000);
        let start = clock.turn_start;

        assert_eq!(clock.remaining_ms_at(start), 5000);
        assert_eq!(clock.remaining_ms_at(start + Duration::from_millis(1200)), 3800);
        assert!(!clock.is_expired_at(start + Duration::from_millis(4999)));
        assert!(clock.is_expired_at(start + Duration::from_millis(5000)));
        assert_eq!(clock.remaining_ms_at(start + Duration::from_secs(60)), 0);
    }

    #[test]
    fn test_clock_restart() {
        let mut clock = TurnClock::new(5000);
        let start = clock.turn_start;

        let later = start + Duration::from_millis(4000);
        assert_eq!(clock.elapsed_ms_at(later), 4000);

        clock.restart_at(later);
        assert_eq!(clock.elapsed_ms_at(later), 0);
        assert_eq!(clock.remaining_ms_at(later + Duration::from_millis(1000)), 4000);
    }

    #[test]
    fn test_clock_zero_duration() {
        let clock = TurnClock::new(0);
        assert!(clock.is_expired());
    }

    #[test]
    fn test_clock_real_time() {
        let clock = TurnClock::new(10_000);

        // 等待足够长时间以确保时间变化可测量
        thread::sleep(Duration::from_millis(100));

        assert!(clock.elapsed_ms() >= 100);
        assert!(clock.remaining_ms() < 10_000);
        assert!(!clock.is_expired());
    }
}
