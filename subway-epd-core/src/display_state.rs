use jiff::{SignedDuration, Timestamp, Zoned};
use subway_epd_common::{CoreConfig, TopTwo, TransitSnapshot, WeatherSnapshot};

/// 触发重绘的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawReason {
    /// 两路数据都就绪后的第一次重绘
    ColdStart,
    /// 前两趟列车发生显著变化
    Forced,
    /// 整点全屏清除，消除残影
    HourlyClear,
    /// 距上次重绘超过最小间隔
    Interval,
}

impl RedrawReason {
    pub fn clear(self) -> bool {
        matches!(self, RedrawReason::HourlyClear)
    }

    /// 清屏必须整屏写入，其余情况都允许局部刷新
    pub fn partial(self) -> bool {
        !self.clear()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 天气或列车数据尚未就绪
    NotReady,
    /// 事件被吸收，等待下一次心跳或强制事件
    Absorbed,
    Redraw(RedrawReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedrawPolicy {
    pub min_interval: SignedDuration,
    pub clear_debounce: SignedDuration,
}

impl From<&CoreConfig> for RedrawPolicy {
    fn from(config: &CoreConfig) -> Self {
        Self {
            min_interval: config.min_redraw_interval,
            clear_debounce: config.clear_debounce,
        }
    }
}

impl Default for RedrawPolicy {
    fn default() -> Self {
        Self::from(&CoreConfig::default())
    }
}

/// 显示状态
///
/// 由重绘调度器独占，生产者只能通过回调把数据交给调度器。时间戳为 `None` 表示从未发生。
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub weather: Option<WeatherSnapshot>,
    pub transit: Option<TransitSnapshot>,
    pub last_display_update: Option<Timestamp>,
    pub last_weather_change: Option<Timestamp>,
    pub last_display_clear: Option<Timestamp>,
    /// 上一次实际渲染时的前两趟列车，只在重绘完成后更新
    pub previous_top_two: TopTwo,
}

impl DisplayState {
    pub fn is_ready(&self) -> bool {
        self.weather.is_some() && self.transit.is_some()
    }

    /// 按固定优先级决定是否重绘：冷启动 > 强制 > 整点清屏 > 最小间隔
    pub fn decide(&self, force: bool, now: &Zoned, policy: &RedrawPolicy) -> Decision {
        if !self.is_ready() {
            return Decision::NotReady;
        }

        let Some(last_update) = self.last_display_update else {
            return Decision::Redraw(RedrawReason::ColdStart);
        };

        if force {
            return Decision::Redraw(RedrawReason::Forced);
        }

        let at = now.timestamp();
        let clear_due = self
            .last_display_clear
            .is_none_or(|cleared| at.duration_since(cleared) >= policy.clear_debounce);
        if clear_due && now.minute() == 0 {
            return Decision::Redraw(RedrawReason::HourlyClear);
        }

        if at.duration_since(last_update) >= policy.min_interval {
            return Decision::Redraw(RedrawReason::Interval);
        }

        Decision::Absorbed
    }

    /// 重绘成功后的记账
    pub fn record_redraw(&mut self, reason: RedrawReason, at: Timestamp, rendered: TopTwo) {
        self.last_display_update = Some(at);
        if reason.clear() {
            self.last_display_clear = Some(at);
        }
        self.previous_top_two = rendered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::tz::TimeZone;
    use subway_epd_common::TransitArrival;

    fn at(s: &str) -> Zoned {
        s.parse::<Timestamp>().unwrap().to_zoned(TimeZone::UTC)
    }

    fn ready_state() -> DisplayState {
        DisplayState {
            weather: Some(WeatherSnapshot::default()),
            transit: Some(TransitSnapshot::new(vec![TransitArrival::new(
                "A", "F", "08:05 AM", 5,
            )])),
            ..Default::default()
        }
    }

    #[test]
    fn gated_until_both_streams_arrive() {
        let policy = RedrawPolicy::default();
        let now = at("2024-05-01T08:10:00Z");

        let mut state = DisplayState::default();
        assert_eq!(state.decide(true, &now, &policy), Decision::NotReady);

        state.weather = Some(WeatherSnapshot::default());
        assert_eq!(state.decide(true, &now, &policy), Decision::NotReady);

        state.weather = None;
        state.transit = Some(TransitSnapshot::default());
        assert_eq!(state.decide(false, &now, &policy), Decision::NotReady);
    }

    #[test]
    fn cold_start_wins_regardless_of_force() {
        let policy = RedrawPolicy::default();
        let now = at("2024-05-01T08:10:00Z");
        let state = ready_state();
        assert_eq!(
            state.decide(false, &now, &policy),
            Decision::Redraw(RedrawReason::ColdStart)
        );
        assert_eq!(
            state.decide(true, &now, &policy),
            Decision::Redraw(RedrawReason::ColdStart)
        );
    }

    #[test]
    fn min_interval_absorbs_early_events() {
        let policy = RedrawPolicy::default();
        let mut state = ready_state();
        let t = at("2024-05-01T08:10:00Z");
        state.record_redraw(RedrawReason::ColdStart, t.timestamp(), TopTwo::default());
        state.last_display_clear = Some(t.timestamp());

        assert_eq!(state.decide(false, &t, &policy), Decision::Absorbed);
        assert_eq!(
            state.decide(false, &at("2024-05-01T08:10:00.999Z"), &policy),
            Decision::Absorbed
        );
        assert_eq!(
            state.decide(false, &at("2024-05-01T08:10:01Z"), &policy),
            Decision::Redraw(RedrawReason::Interval)
        );
        assert_eq!(
            state.decide(true, &t, &policy),
            Decision::Redraw(RedrawReason::Forced)
        );
    }

    #[test]
    fn hourly_clear_needs_debounce_and_top_of_hour() {
        let policy = RedrawPolicy::default();
        let mut state = ready_state();
        let cleared = at("2024-05-01T08:00:30Z").timestamp();
        state.last_display_clear = Some(cleared);
        state.last_display_update = Some(at("2024-05-01T08:59:50Z").timestamp());

        // 已过 3500 秒但不在整点
        assert_eq!(
            state.decide(false, &at("2024-05-01T08:59:55Z"), &policy),
            Decision::Redraw(RedrawReason::Interval)
        );
        // 整点但距上次清屏不足 3500 秒
        state.last_display_clear = Some(at("2024-05-01T08:05:00Z").timestamp());
        assert_eq!(
            state.decide(false, &at("2024-05-01T09:00:10Z"), &policy),
            Decision::Redraw(RedrawReason::Interval)
        );
        // 两个条件都满足
        state.last_display_clear = Some(cleared);
        assert_eq!(
            state.decide(false, &at("2024-05-01T09:00:10Z"), &policy),
            Decision::Redraw(RedrawReason::HourlyClear)
        );
    }

    #[test]
    fn force_short_circuits_the_hourly_clear() {
        let policy = RedrawPolicy::default();
        let mut state = ready_state();
        state.last_display_clear = Some(at("2024-05-01T07:00:00Z").timestamp());
        state.last_display_update = Some(at("2024-05-01T08:59:59Z").timestamp());
        assert_eq!(
            state.decide(true, &at("2024-05-01T09:00:00Z"), &policy),
            Decision::Redraw(RedrawReason::Forced)
        );
    }

    #[test]
    fn record_redraw_only_moves_clear_for_clear_redraws() {
        let mut state = ready_state();
        let t = at("2024-05-01T09:00:00Z").timestamp();
        let top = TopTwo::new(Some(TransitArrival::new("A", "F", "", 5)), None);

        state.record_redraw(RedrawReason::Forced, t, top.clone());
        assert_eq!(state.last_display_update, Some(t));
        assert_eq!(state.last_display_clear, None);
        assert_eq!(state.previous_top_two, top);

        state.record_redraw(RedrawReason::HourlyClear, t, TopTwo::default());
        assert_eq!(state.last_display_clear, Some(t));
    }
}
