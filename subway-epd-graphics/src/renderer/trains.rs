//! 列车区：每条线路一个圆形标志，右侧列出即将到站的列车

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use subway_epd_common::{TransitArrival, TransitSnapshot};

use super::layout::Layout;
use super::segment::{SegmentStyle, draw_number};
use super::text::{BODY_FONT, SMALL_FONT, draw_text, line_height};

const PADDING_X: i32 = 20;
const LOGO_X: i32 = 100;
const LOGO_DIAMETER: u32 = 160;
const ROW_HEIGHT: i32 = 72;
// 只显示 1 到 40 分钟内到站的列车
const MIN_MINUTES: u32 = 1;
const MAX_MINUTES: u32 = 40;

/// 一条线路及其最多显示的列车数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainLine {
    pub route: String,
    pub max_trains: usize,
}

/// 取出某条线路即将到站的列车
pub fn upcoming<'a>(transit: &'a TransitSnapshot, line: &TrainLine) -> Vec<&'a TransitArrival> {
    transit
        .arrivals()
        .iter()
        .filter(|arrival| arrival.route_id == line.route)
        .filter(|arrival| (MIN_MINUTES..=MAX_MINUTES).contains(&arrival.minutes_until_arrival))
        .take(line.max_trains)
        .collect()
}

pub fn draw_trains<D>(
    target: &mut D,
    layout: &Layout,
    lines: &[TrainLine],
    transit: &TransitSnapshot,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    if transit.is_empty() {
        return draw_no_trains(target, layout);
    }

    let quarter = layout.train_height / 4;
    let centers = [
        layout.train_top + quarter,
        layout.train_top + layout.train_height - quarter,
    ];

    for (line, center_y) in lines.iter().zip(centers) {
        draw_logo(target, &line.route, Point::new(LOGO_X, center_y))?;

        let trains = upcoming(transit, line);
        let first_row = center_y - trains.len() as i32 * ROW_HEIGHT / 2;
        for (i, arrival) in trains.into_iter().enumerate() {
            let y = first_row + i as i32 * ROW_HEIGHT;
            draw_arrival(target, arrival, Point::new(LOGO_X + LOGO_DIAMETER as i32 / 2 + 60, y))?;
        }
    }
    Ok(())
}

fn draw_logo<D>(target: &mut D, route: &str, center: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Circle::with_center(center, LOGO_DIAMETER)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;

    // 黑底白字
    let character_style = MonoTextStyle::new(BODY_FONT, BinaryColor::Off);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    Text::with_text_style(route, center, character_style, text_style).draw(target)?;
    Ok(())
}

/// 一行：大号分钟数、"min"、到站时刻
fn draw_arrival<D>(target: &mut D, arrival: &TransitArrival, origin: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = SegmentStyle::MINUTES;
    let digits = arrival.minutes_until_arrival.to_string().len();
    // 分钟数在两位宽的格子里右对齐
    let offset = style.width_of(2).saturating_sub(style.width_of(digits)) as i32;
    draw_number(
        target,
        arrival.minutes_until_arrival,
        origin + Point::new(offset, 0),
        &style,
    )?;

    let bottom = origin.y + style.digit_height as i32;
    let min_x = origin.x + style.width_of(2) as i32 + 8;
    draw_text(
        target,
        "min",
        Point::new(min_x, bottom - line_height(SMALL_FONT)),
        SMALL_FONT,
        Alignment::Left,
    )?;

    draw_text(
        target,
        &arrival.arrival_time.to_lowercase(),
        Point::new(min_x + 40, bottom - line_height(BODY_FONT)),
        BODY_FONT,
        Alignment::Left,
    )
}

fn draw_no_trains<D>(target: &mut D, layout: &Layout) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let x = PADDING_X;
    let y = layout.train_top + 20;
    draw_text(target, "No trains", Point::new(x, y), BODY_FONT, Alignment::Left)?;
    draw_text(
        target,
        "currently",
        Point::new(x, y + line_height(BODY_FONT)),
        BODY_FONT,
        Alignment::Left,
    )?;
    draw_text(
        target,
        "No upcoming trains found",
        Point::new(x, y + 100),
        SMALL_FONT,
        Alignment::Left,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> TransitSnapshot {
        TransitSnapshot::new(vec![
            TransitArrival::new("F1", "F", "08:00 AM", 0),
            TransitArrival::new("F2", "F", "08:05 AM", 5),
            TransitArrival::new("G1", "G", "08:07 AM", 7),
            TransitArrival::new("F3", "F", "08:12 AM", 12),
            TransitArrival::new("F4", "F", "08:50 AM", 50),
        ])
    }

    #[test]
    fn upcoming_filters_by_route_and_window() {
        let transit = snapshot();
        let f = TrainLine {
            route: "F".into(),
            max_trains: 6,
        };
        let ids: Vec<_> = upcoming(&transit, &f)
            .into_iter()
            .map(|a| a.train_id.as_str())
            .collect();
        assert_eq!(ids, ["F2", "F3"]);

        let g = TrainLine {
            route: "G".into(),
            max_trains: 0,
        };
        assert!(upcoming(&transit, &g).is_empty());
    }
}
