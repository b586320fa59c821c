//! 文本渲染模块

use embedded_graphics::mono_font::iso_8859_1::{FONT_6X13, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

/// 正文字体（带 `°` 等 Latin-1 字符）
pub const BODY_FONT: &MonoFont<'static> = &FONT_10X20;
pub const SMALL_FONT: &MonoFont<'static> = &FONT_6X13;

/// 以 `position` 为顶部基准绘制一行文本
pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    position: Point,
    font: &'static MonoFont<'static>,
    alignment: Alignment,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let character_style = MonoTextStyle::new(font, BinaryColor::On);
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(Baseline::Top)
        .build();
    Text::with_text_style(text, position, character_style, text_style).draw(target)?;
    Ok(())
}

/// 文本宽度（等宽字体）
pub fn text_width(text: &str, font: &MonoFont<'_>) -> i32 {
    let chars = text.chars().count() as u32;
    (chars * (font.character_size.width + font.character_spacing)) as i32
}

/// 行高
pub fn line_height(font: &MonoFont<'_>) -> i32 {
    font.character_size.height as i32 + 4
}
