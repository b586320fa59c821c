//! 天气区域
//!
//! 右侧天气栏显示当前天气和逐日预报，主区域底部并排显示接下来的通勤时段预报。

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Alignment;
use jiff::civil::{Date, Time, time};
use subway_epd_common::{CommuteForecast, CurrentConditions, DailyForecast};

use super::layout::Layout;
use super::text::{BODY_FONT, SMALL_FONT, draw_text, line_height, text_width};

const MAX_DAILY: usize = 3;
const MAX_COMMUTES: usize = 2;
// 低于该概率的降水不显示
const PRECIP_THRESHOLD: u8 = 15;
const MARGIN: i32 = 20;

/// 按可用宽度截断文本
fn fit(text: &str, width: i32) -> String {
    let per_char = text_width("m", BODY_FONT).max(1);
    let max_chars = (width / per_char).max(0) as usize;
    text.chars().take(max_chars).collect()
}

/// 右侧天气栏，返回已用到的纵坐标
pub fn draw_current<D>(
    target: &mut D,
    layout: &Layout,
    current: &CurrentConditions,
) -> Result<i32, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let lane_width = layout.width - layout.lane_x;
    let x = layout.lane_x + lane_width / 2;
    let step = line_height(BODY_FONT);
    let mut y = layout.train_top + MARGIN;

    let lines = [
        "Current Weather".to_string(),
        format!("{}\u{b0}F", current.temp_f.round() as i32),
        fit(&current.condition.text, lane_width - MARGIN),
        format!("Wind {} mph", current.wind_mph.round() as i32),
        format!("Rain {}%", current.precip_chance),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(target, line, Point::new(x, y), BODY_FONT, Alignment::Center)?;
        y += step;
        // 标题下多空一行
        if i == 0 {
            y += step / 2;
        }
    }
    Ok(y)
}

pub fn draw_daily<D>(
    target: &mut D,
    layout: &Layout,
    daily: &[DailyForecast],
    top: i32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let lane_width = layout.width - layout.lane_x;
    let x = layout.lane_x + MARGIN / 2;
    let step = line_height(BODY_FONT);
    let mut y = top + step;

    for day in daily.iter().take(MAX_DAILY) {
        let mut summary = format!(
            "{} {}\u{b0}/{}\u{b0}",
            day.date.strftime("%a"),
            day.max_temp_f.round() as i32,
            day.min_temp_f.round() as i32
        );
        if day.chance_of_rain >= PRECIP_THRESHOLD {
            summary.push_str(&format!(" {}%", day.chance_of_rain));
        }
        draw_text(target, &summary, Point::new(x, y), BODY_FONT, Alignment::Left)?;
        draw_text(
            target,
            &fit(&day.condition.text, lane_width - MARGIN),
            Point::new(x, y + step),
            SMALL_FONT,
            Alignment::Left,
        )?;
        y += step * 2 + MARGIN / 2;
    }
    Ok(())
}

/// 通勤时段标题：不是今天的时段改为 "Tomorrow ..."
pub fn commute_label(commute: &CommuteForecast, today: Date) -> String {
    if commute.date <= today {
        return commute.label.clone();
    }
    if commute.start < time(12, 0, 0, 0) {
        "Tomorrow Morning".to_string()
    } else {
        "Tomorrow Evening".to_string()
    }
}

fn format_hour(at: Time) -> String {
    if at.minute() == 0 {
        at.strftime("%-I%P").to_string()
    } else {
        at.strftime("%-I:%M%P").to_string()
    }
}

/// 底部通勤区；没有通勤预报时退回显示当前天气
pub fn draw_commutes<D>(
    target: &mut D,
    layout: &Layout,
    commutes: &[CommuteForecast],
    current: &CurrentConditions,
    today: Date,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let y = layout.weather_top + MARGIN;
    let total = layout.main_width() - 2 * MARGIN;

    if commutes.is_empty() {
        let lines = [
            "Current Weather".to_string(),
            format!("{}\u{b0}F", current.temp_f.round() as i32),
            fit(&current.condition.text, total),
        ];
        return draw_block(target, &lines, Point::new(MARGIN, y));
    }

    let shown = &commutes[..commutes.len().min(MAX_COMMUTES)];
    let section_width = total / shown.len() as i32;
    for (i, commute) in shown.iter().enumerate() {
        let lines = [
            commute_label(commute, today),
            format!("{} - {}", format_hour(commute.start), format_hour(commute.end)),
            format!("{}\u{b0}F", commute.temperature_f),
            fit(&commute.condition.text, section_width - MARGIN),
            format!("Rain {}%", commute.precipitation_chance),
            format!("Wind {} mph", commute.wind_mph),
        ];
        draw_block(
            target,
            &lines,
            Point::new(MARGIN + i as i32 * section_width, y),
        )?;
    }
    Ok(())
}

fn draw_block<D>(target: &mut D, lines: &[String], origin: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let step = line_height(BODY_FONT);
    for (i, line) in lines.iter().enumerate() {
        let position = origin + Point::new(0, i as i32 * step);
        draw_text(target, line, position, BODY_FONT, Alignment::Left)?;
    }
    Ok(())
}
