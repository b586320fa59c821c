use core::time::Duration;

use jiff::civil::{Time, time};
use jiff::SignedDuration;

/// 调度核心的时间参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub weather_interval: Duration,
    pub transit_interval: Duration,
    pub heartbeat_interval: Duration,
    /// 写入任务的唤醒周期，同时也是两次硬件写入的最小间隔
    pub writer_interval: Duration,
    /// 非强制重绘的最小间隔
    pub min_redraw_interval: SignedDuration,
    /// 距上次全屏清除超过该时长后，在整点执行一次清屏
    pub clear_debounce: SignedDuration,
    /// 差异区域宽或高超过该值时放弃局部刷新
    pub partial_max_extent: u16,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            weather_interval: Duration::from_secs(300),
            transit_interval: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(1),
            writer_interval: Duration::from_secs(1),
            min_redraw_interval: SignedDuration::from_secs(1),
            clear_debounce: SignedDuration::from_secs(3500),
            partial_max_extent: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 825,
            height: 1200,
        }
    }
}

/// 通勤时段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommutePeriod {
    pub label: &'static str,
    pub start: Time,
    pub end: Time,
}

impl CommutePeriod {
    pub fn contains(&self, at: Time) -> bool {
        self.start <= at && at <= self.end
    }
}

pub fn default_commute_periods() -> [CommutePeriod; 2] {
    [
        CommutePeriod {
            label: "Morning Commute",
            start: time(7, 0, 0, 0),
            end: time(10, 0, 0, 0),
        },
        CommutePeriod {
            label: "Evening Commute",
            start: time(17, 0, 0, 0),
            end: time(19, 0, 0, 0),
        },
    ]
}
