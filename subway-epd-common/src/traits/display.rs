use crate::types::{Bitmap, HardwareError, Rect, RenderError, TransitSnapshot, WeatherSnapshot};

/// 电子墨水屏驱动trait
///
/// 定义墨水屏设备的写入接口。写入是阻塞的，只能由写入任务调用。
pub trait EpdDisplay: Send {
    /// 整屏写入
    ///
    /// `clear` 为真时先做一次硬件清屏以消除残影。
    fn write_full(&mut self, bitmap: &Bitmap, clear: bool) -> Result<(), HardwareError>;

    /// 只刷新 `region` 区域
    fn write_partial(&mut self, bitmap: &Bitmap, region: Rect) -> Result<(), HardwareError>;
}

/// 把天气和列车数据渲染成位图
pub trait Renderer: Send + Sync {
    fn render(
        &self,
        weather: &WeatherSnapshot,
        transit: &TransitSnapshot,
    ) -> Result<Bitmap, RenderError>;
}
