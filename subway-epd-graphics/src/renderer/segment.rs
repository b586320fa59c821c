//! 七段数码管数字，用于绘制大号的到站分钟数
//!
//! ```text
//!  a
//! f b
//!  g
//! e c
//!  d
//! ```

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

#[derive(Debug, Clone, Copy)]
pub struct SegmentStyle {
    pub digit_width: u32,
    pub digit_height: u32,
    pub thickness: u32,
    /// 数字之间的间距
    pub spacing: u32,
}

impl SegmentStyle {
    /// 到站分钟数使用的尺寸
    pub const MINUTES: SegmentStyle = SegmentStyle {
        digit_width: 32,
        digit_height: 56,
        thickness: 6,
        spacing: 8,
    };

    /// 绘制 `digits` 位数字所需的宽度
    pub fn width_of(&self, digits: usize) -> u32 {
        let digits = digits as u32;
        digits * self.digit_width + digits.saturating_sub(1) * self.spacing
    }
}

// a b c d e f g
fn segments_for_digit(digit: u8) -> [bool; 7] {
    match digit {
        0 => [true, true, true, true, true, true, false],
        1 => [false, true, true, false, false, false, false],
        2 => [true, true, false, true, true, false, true],
        3 => [true, true, true, true, false, false, true],
        4 => [false, true, true, false, false, true, true],
        5 => [true, false, true, true, false, true, true],
        6 => [true, false, true, true, true, true, true],
        7 => [true, true, true, false, false, false, false],
        8 => [true, true, true, true, true, true, true],
        9 => [true, true, true, true, false, true, true],
        _ => [false; 7],
    }
}

fn segment_rects(origin: Point, style: &SegmentStyle) -> [Rectangle; 7] {
    let w = style.digit_width;
    let h = style.digit_height;
    let t = style.thickness;
    let half = h / 2;
    let x = origin.x;
    let y = origin.y;
    let right = x + (w - t) as i32;
    let middle = y + (half - t / 2) as i32;
    let vertical = half.saturating_sub(t);

    [
        Rectangle::new(Point::new(x + t as i32, y), Size::new(w - 2 * t, t)),
        Rectangle::new(Point::new(right, y + t as i32), Size::new(t, vertical)),
        Rectangle::new(Point::new(right, y + half as i32), Size::new(t, vertical)),
        Rectangle::new(
            Point::new(x + t as i32, y + (h - t) as i32),
            Size::new(w - 2 * t, t),
        ),
        Rectangle::new(Point::new(x, y + half as i32), Size::new(t, vertical)),
        Rectangle::new(Point::new(x, y + t as i32), Size::new(t, vertical)),
        Rectangle::new(Point::new(x + t as i32, middle), Size::new(w - 2 * t, t)),
    ]
}

pub fn draw_digit<D>(
    target: &mut D,
    digit: u8,
    origin: Point,
    style: &SegmentStyle,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let fill = PrimitiveStyle::with_fill(BinaryColor::On);
    for (lit, rect) in segments_for_digit(digit)
        .into_iter()
        .zip(segment_rects(origin, style))
    {
        if lit {
            rect.into_styled(fill).draw(target)?;
        }
    }
    Ok(())
}

/// 绘制整数，返回占用的宽度
pub fn draw_number<D>(
    target: &mut D,
    value: u32,
    origin: Point,
    style: &SegmentStyle,
) -> Result<u32, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let digits = value.to_string();
    let step = (style.digit_width + style.spacing) as i32;
    for (i, c) in digits.bytes().enumerate() {
        let position = origin + Point::new(i as i32 * step, 0);
        draw_digit(target, c - b'0', position, style)?;
    }
    Ok(style.width_of(digits.len()))
}
