//! 重绘调度器
//!
//! 由生产者回调和心跳驱动。每个事件处理函数在临界区内完成“读状态、决策、提交渲染、记账”，
//! 避免两个事件交错时都看到 `force == false` 而丢失更新。

use core::cell::RefCell;

use subway_epd_common::*;

use crate::change_detector::significant_change;
use crate::display_state::{Decision, DisplayState, RedrawPolicy, RedrawReason};
use crate::render_sink::RenderSink;

pub struct RedrawScheduler<C: Clock> {
    state: GlobalMutex<RefCell<DisplayState>>,
    sink: RenderSink,
    clock: C,
    policy: RedrawPolicy,
}

impl<C: Clock> RedrawScheduler<C> {
    pub fn new(sink: RenderSink, clock: C, config: &CoreConfig) -> Self {
        Self {
            state: GlobalMutex::new(RefCell::new(DisplayState::default())),
            sink,
            clock,
            policy: RedrawPolicy::from(config),
        }
    }

    /// 天气变化：重置清屏防抖计时，但不强制重绘
    pub fn on_weather(&self, snapshot: WeatherSnapshot) -> Option<RedrawReason> {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            let now = self.clock.now();
            state.weather = Some(snapshot);
            state.last_weather_change = Some(now.timestamp());
            state.last_display_clear = Some(now.timestamp());
            self.maybe_redraw(&mut state, false, &now)
        })
    }

    /// 列车变化：前两趟列车变化显著时强制重绘
    pub fn on_transit(&self, snapshot: TransitSnapshot) -> Option<RedrawReason> {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            let now = self.clock.now();
            let force = significant_change(&state.previous_top_two, &snapshot.top_two());
            state.transit = Some(snapshot);
            self.maybe_redraw(&mut state, force, &now)
        })
    }

    pub fn on_heartbeat(&self) -> Option<RedrawReason> {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            let now = self.clock.now();
            self.maybe_redraw(&mut state, false, &now)
        })
    }

    /// 当前显示状态的副本
    pub fn state(&self) -> DisplayState {
        self.state.lock(|state| state.borrow().clone())
    }

    pub fn has_pending_frame(&self) -> bool {
        self.sink.has_pending()
    }

    fn maybe_redraw(
        &self,
        state: &mut DisplayState,
        force: bool,
        now: &jiff::Zoned,
    ) -> Option<RedrawReason> {
        let reason = match state.decide(force, now, &self.policy) {
            Decision::Redraw(reason) => reason,
            Decision::NotReady => {
                trace!("Redraw gated, waiting for weather and transit");
                return None;
            }
            Decision::Absorbed => return None,
        };

        let (Some(weather), Some(transit)) = (&state.weather, &state.transit) else {
            return None;
        };

        match self
            .sink
            .submit(weather, transit, reason.partial(), reason.clear())
        {
            Ok(()) => {
                debug!("Redraw submitted: {:?}", reason);
                let rendered = transit.top_two();
                state.record_redraw(reason, now.timestamp(), rendered);
                Some(reason)
            }
            Err(e) => {
                error!("Failed to render frame: {:?}", e);
                None
            }
        }
    }
}
