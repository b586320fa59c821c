//! 时间栏：中线左侧为日期，右侧为时间

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::Alignment;
use jiff::Zoned;

use super::layout::Layout;
use super::text::{BODY_FONT, draw_text};

// 日期和时间到中线的距离
const MIDLINE_GAP: i32 = 30;
const MIDLINE_THICKNESS: u32 = 5;

pub fn draw_header<D>(target: &mut D, layout: &Layout, now: &Zoned) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let date = now.strftime("%a, %b %d").to_string();
    let time = now.strftime("%-I:%M:%S%P").to_string();

    let font_height = BODY_FONT.character_size.height as i32;
    let midline = layout.width / 2;
    let y = (layout.header_height - font_height) / 2;

    Line::new(Point::new(midline, y - 5), Point::new(midline, y + font_height + 5))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, MIDLINE_THICKNESS))
        .draw(target)?;

    draw_text(
        target,
        &date,
        Point::new(midline - MIDLINE_GAP, y),
        BODY_FONT,
        Alignment::Right,
    )?;
    // 时间左对齐，秒数变化时只有末尾几个字符的区域变化
    draw_text(
        target,
        &time,
        Point::new(midline + MIDLINE_GAP, y),
        BODY_FONT,
        Alignment::Left,
    )
}
