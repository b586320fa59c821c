use crate::types::Bitmap;

/// 一帧待写入墨水屏的画面
///
/// 只由写入任务消费一次。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bitmap: Bitmap,
    partial: bool,
    clear: bool,
}

impl Frame {
    pub fn new(bitmap: Bitmap, partial: bool, clear: bool) -> Self {
        Self {
            bitmap,
            partial,
            clear,
        }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn partial(&self) -> bool {
        self.partial
    }

    pub fn clear(&self) -> bool {
        self.clear
    }

    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }
}
