//! 布局模块
//! 根据屏幕尺寸划分顶部时间栏、列车区、底部通勤天气区和右侧天气栏

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use subway_epd_common::DisplayConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    /// 顶部时间栏高度（屏高的 1/9）
    pub header_height: i32,
    pub train_top: i32,
    /// 列车区高度（屏高的 2/3）
    pub train_height: i32,
    pub weather_top: i32,
    /// 右侧天气栏的起始横坐标，左侧为主区域
    pub lane_x: i32,
}

impl Layout {
    pub fn new(display: DisplayConfig) -> Self {
        let width = i32::from(display.width);
        let height = i32::from(display.height);
        let header_height = height / 9;
        let train_height = height * 2 / 3;
        Self {
            width,
            height,
            header_height,
            train_top: header_height,
            train_height,
            weather_top: header_height + train_height,
            lane_x: width - width / 3,
        }
    }

    pub fn main_width(&self) -> i32 {
        self.lane_x
    }

    pub fn weather_height(&self) -> i32 {
        self.height - self.weather_top
    }

    /// 绘制各区域之间的分割线
    pub fn draw_sections<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

        Line::new(
            Point::new(0, self.header_height),
            Point::new(self.width, self.header_height),
        )
        .into_styled(stroke)
        .draw(target)?;

        // 列车区与天气区之间的横线止于右侧天气栏
        Line::new(
            Point::new(0, self.weather_top),
            Point::new(self.lane_x, self.weather_top),
        )
        .into_styled(stroke)
        .draw(target)?;

        Line::new(
            Point::new(self.lane_x, self.header_height),
            Point::new(self.lane_x, self.height),
        )
        .into_styled(stroke)
        .draw(target)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_panel_sections() {
        let layout = Layout::new(DisplayConfig::default());
        assert_eq!(layout.header_height, 133);
        assert_eq!(layout.train_height, 800);
        assert_eq!(layout.weather_top, 933);
        assert_eq!(layout.lane_x, 550);
        assert_eq!(layout.weather_height(), 267);
    }
}
