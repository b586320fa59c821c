use core::cell::RefCell;

use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp, Zoned};

use crate::types::GlobalMutex;

/// 挂钟时间来源
pub trait Clock: Send + Sync {
    fn now(&self) -> Zoned;
}

/// 系统时钟，使用本机时区
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// 手动推进的时钟，用于模拟回放和测试
pub struct ManualClock {
    now: GlobalMutex<RefCell<Timestamp>>,
    tz: TimeZone,
}

impl ManualClock {
    /// 以 UTC 创建
    pub fn new(start: Timestamp) -> Self {
        Self::with_time_zone(start, TimeZone::UTC)
    }

    pub fn with_time_zone(start: Timestamp, tz: TimeZone) -> Self {
        Self {
            now: GlobalMutex::new(RefCell::new(start)),
            tz,
        }
    }

    pub fn set(&self, at: Timestamp) {
        self.now.lock(|now| *now.borrow_mut() = at);
    }

    /// 向前推进，溢出时保持不变
    pub fn advance(&self, by: SignedDuration) {
        self.now.lock(|now| {
            let mut now = now.borrow_mut();
            if let Ok(next) = now.checked_add(by) {
                *now = next;
            }
        });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Zoned {
        let at = self.now.lock(|now| *now.borrow());
        at.to_zoned(self.tz.clone())
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Zoned {
        (**self).now()
    }
}
