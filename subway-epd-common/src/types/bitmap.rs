//! 帧缓冲区模块
//! 提供墨水屏的位图以及与上一帧的差异比较

use core::convert::Infallible;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};

/// 颜色枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn as_byte(self) -> u8 {
        match self {
            Color::Black => 0x00,
            Color::White => 0xFF,
        }
    }

    fn from_byte(byte: u8) -> Self {
        if byte == 0x00 { Color::Black } else { Color::White }
    }
}

impl From<BinaryColor> for Color {
    fn from(color: BinaryColor) -> Self {
        match color {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}

/// 矩形区域，`x + width`、`y + height` 为不包含的右/下边界，超出 `u16` 时截断到 `u16::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// 区域是否完整落在 `width x height` 的面板内
    pub fn fits_within(&self, width: u16, height: u16) -> bool {
        self.width > 0
            && self.height > 0
            && u32::from(self.x) + u32::from(self.width) <= u32::from(width)
            && u32::from(self.y) + u32::from(self.height) <= u32::from(height)
    }
}

/// 单色位图，每个像素占一个字节（0x00 黑，0xFF 白）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u16,
    height: u16,
    buffer: Vec<u8>,
}

impl Bitmap {
    /// 创建新的位图，默认白色
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            buffer: vec![Color::White.as_byte(); size],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Color> {
        self.index(x, y).map(|i| Color::from_byte(self.buffer[i]))
    }

    /// 设置像素，越界时忽略并返回 `false`
    pub fn set(&mut self, x: u16, y: u16, color: Color) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.buffer[i] = color.as_byte();
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.buffer.fill(color.as_byte());
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        for y in rect.y..rect.bottom().min(self.height) {
            for x in rect.x..rect.right().min(self.width) {
                self.set(x, y, color);
            }
        }
    }

    /// 计算与另一帧的差异包围盒
    ///
    /// 两帧完全相同时返回 `None`；尺寸不同则整幅视为变化。
    pub fn diff_box(&self, other: &Bitmap) -> Option<Rect> {
        if self.width != other.width || self.height != other.height {
            return Some(Rect::new(
                0,
                0,
                self.width.max(other.width),
                self.height.max(other.height),
            ));
        }

        let width = self.width as usize;
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;

        for (y, (old_row, new_row)) in self
            .buffer
            .chunks(width)
            .zip(other.buffer.chunks(width))
            .enumerate()
        {
            if old_row == new_row {
                continue;
            }
            let first = old_row.iter().zip(new_row).position(|(a, b)| a != b);
            let last = old_row.iter().zip(new_row).rposition(|(a, b)| a != b);
            if let (Some(first), Some(last)) = (first, last) {
                min_x = min_x.min(first);
                max_x = max_x.max(last);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }

        if min_x == usize::MAX {
            return None;
        }

        Some(Rect::new(
            min_x as u16,
            min_y as u16,
            (max_x - min_x + 1) as u16,
            (max_y - min_y + 1) as u16,
        ))
    }

    /// 截取区域，超出部分被裁掉
    pub fn crop(&self, rect: Rect) -> Bitmap {
        let right = rect.right().min(self.width);
        let bottom = rect.bottom().min(self.height);
        let mut out = Bitmap::new(right.saturating_sub(rect.x), bottom.saturating_sub(rect.y));
        for y in rect.y..bottom {
            for x in rect.x..right {
                if let Some(color) = self.get(x, y) {
                    out.set(x - rect.x, y - rect.y, color);
                }
            }
        }
        out
    }

    /// 把 `source` 中 `rect` 区域按原坐标复制到本位图
    pub fn paste(&mut self, source: &Bitmap, rect: Rect) {
        let right = rect.right().min(self.width).min(source.width);
        let bottom = rect.bottom().min(self.height).min(source.height);
        for y in rect.y..bottom {
            for x in rect.x..right {
                if let Some(color) = source.get(x, y) {
                    self.set(x, y, color);
                }
            }
        }
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width), u32::from(self.height))
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x > i32::from(u16::MAX) || point.y > i32::from(u16::MAX) {
                continue;
            }
            self.set(point.x as u16, point.y as u16, color.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bitmaps_have_no_diff() {
        let a = Bitmap::new(20, 10);
        assert_eq!(a.diff_box(&a.clone()), None);
    }

    #[test]
    fn diff_box_spans_all_changed_pixels() {
        let a = Bitmap::new(100, 100);
        let mut b = a.clone();
        b.set(10, 20, Color::Black);
        b.set(14, 31, Color::Black);
        b.set(12, 25, Color::Black);

        assert_eq!(a.diff_box(&b), Some(Rect::new(10, 20, 5, 12)));
    }

    #[test]
    fn single_pixel_diff_is_one_by_one() {
        let a = Bitmap::new(8, 8);
        let mut b = a.clone();
        b.set(7, 7, Color::Black);
        assert_eq!(a.diff_box(&b), Some(Rect::new(7, 7, 1, 1)));
    }

    #[test]
    fn different_sizes_diff_whole_panel() {
        let a = Bitmap::new(10, 10);
        let b = Bitmap::new(12, 8);
        assert_eq!(a.diff_box(&b), Some(Rect::new(0, 0, 12, 10)));
    }

    #[test]
    fn crop_and_paste_move_a_region() {
        let mut source = Bitmap::new(10, 10);
        source.fill_rect(Rect::new(2, 2, 3, 3), Color::Black);

        let cropped = source.crop(Rect::new(2, 2, 3, 3));
        assert_eq!((cropped.width(), cropped.height()), (3, 3));
        assert!(cropped.buffer().iter().all(|&b| b == Color::Black.as_byte()));

        let mut target = Bitmap::new(10, 10);
        target.paste(&source, Rect::new(0, 0, 4, 4));
        assert_eq!(target.get(3, 3), Some(Color::Black));
        assert_eq!(target.get(4, 4), Some(Color::White));
    }

    #[test]
    fn rect_edges_saturate_near_u16_max() {
        let wide = Rect::new(65530, 0, 20, 1);
        assert_eq!(wide.right(), u16::MAX);
        assert_eq!(Rect::new(0, u16::MAX, 1, u16::MAX).bottom(), u16::MAX);
        assert!(!wide.fits_within(u16::MAX, 1));

        let mut bitmap = Bitmap::new(4, 4);
        bitmap.fill_rect(wide, Color::Black);
        bitmap.fill_rect(Rect::new(2, 2, u16::MAX, u16::MAX), Color::Black);
        assert_eq!(bitmap.get(3, 3), Some(Color::Black));
        assert_eq!(bitmap.get(1, 1), Some(Color::White));

        let cropped = bitmap.crop(Rect::new(2, 2, u16::MAX, u16::MAX));
        assert_eq!((cropped.width(), cropped.height()), (2, 2));

        let mut target = Bitmap::new(4, 4);
        target.paste(&bitmap, Rect::new(3, 3, u16::MAX, u16::MAX));
        assert_eq!(target.get(3, 3), Some(Color::Black));
        assert_eq!(target.get(2, 2), Some(Color::White));
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut bitmap = Bitmap::new(4, 4);
        assert!(!bitmap.set(4, 0, Color::Black));
        assert_eq!(bitmap.get(0, 4), None);
    }
}
