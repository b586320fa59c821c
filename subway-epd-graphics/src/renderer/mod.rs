//! 渲染引擎模块
//! 负责将时间、列车、天气等信息渲染到位图

mod header;
mod layout;
mod segment;
mod text;
mod trains;
mod weather;

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use subway_epd_common::*;

pub use layout::Layout;
pub use segment::SegmentStyle;
pub use trains::TrainLine;

// 第二条线路显示的列车更少
const LINE_1_MAX_TRAINS: usize = 6;
const LINE_2_MAX_TRAINS: usize = 4;

/// 状态画面渲染器
pub struct StatusRenderer<C: Clock> {
    clock: C,
    display: DisplayConfig,
    layout: Layout,
    lines: [TrainLine; 2],
}

impl<C: Clock> StatusRenderer<C> {
    pub fn new(
        clock: C,
        display: DisplayConfig,
        line_1: impl Into<String>,
        line_2: impl Into<String>,
    ) -> Self {
        Self {
            clock,
            display,
            layout: Layout::new(display),
            lines: [
                TrainLine {
                    route: line_1.into(),
                    max_trains: LINE_1_MAX_TRAINS,
                },
                TrainLine {
                    route: line_2.into(),
                    max_trains: LINE_2_MAX_TRAINS,
                },
            ],
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn draw<D>(
        &self,
        target: &mut D,
        current: &CurrentConditions,
        weather: &WeatherSnapshot,
        transit: &TransitSnapshot,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let now = self.clock.now();

        self.layout.draw_sections(target)?;
        header::draw_header(target, &self.layout, &now)?;
        trains::draw_trains(target, &self.layout, &self.lines, transit)?;

        let bottom = weather::draw_current(target, &self.layout, current)?;
        weather::draw_daily(target, &self.layout, &weather.daily, bottom)?;
        weather::draw_commutes(
            target,
            &self.layout,
            &weather.commute,
            current,
            now.date(),
        )
    }
}

impl<C: Clock> Renderer for StatusRenderer<C> {
    fn render(
        &self,
        weather: &WeatherSnapshot,
        transit: &TransitSnapshot,
    ) -> Result<Bitmap, RenderError> {
        let current = weather
            .current
            .as_ref()
            .ok_or(RenderError::MissingField("current"))?;

        let mut bitmap = Bitmap::new(self.display.width, self.display.height);
        self.draw(&mut bitmap, current, weather, transit)
            .map_err(|e: Infallible| -> RenderError { match e {} })?;

        trace!("Rendered status frame with {} arrivals", transit.len());
        Ok(bitmap)
    }
}
