//! 渲染输出
//!
//! `RenderSink` 把最新的天气/列车数据渲染成帧并放入单槽邮箱，未写出的旧帧直接被覆盖；
//! `DisplayWriter` 按固定节拍取出槽中的帧写入墨水屏，保证每个周期最多一次硬件写入。

use core::cell::RefCell;
use core::time::Duration;
use std::sync::Arc;

use subway_epd_common::*;

/// 单帧邮箱
pub struct FrameSlot {
    frame: GlobalMutex<RefCell<Option<Frame>>>,
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSlot {
    pub const fn new() -> Self {
        Self {
            frame: GlobalMutex::new(RefCell::new(None)),
        }
    }

    /// 放入新帧，返回是否覆盖了尚未写出的旧帧
    pub fn put(&self, frame: Frame) -> bool {
        self.frame.lock(|slot| slot.borrow_mut().replace(frame).is_some())
    }

    pub fn take(&self) -> Option<Frame> {
        self.frame.lock(|slot| slot.borrow_mut().take())
    }

    pub fn is_occupied(&self) -> bool {
        self.frame.lock(|slot| slot.borrow().is_some())
    }
}

pub struct RenderSink {
    renderer: Arc<dyn Renderer>,
    slot: Arc<FrameSlot>,
}

impl RenderSink {
    /// 创建渲染输出以及与之配对的写入器
    pub fn new(
        renderer: Arc<dyn Renderer>,
        display: Box<dyn EpdDisplay>,
        config: &CoreConfig,
    ) -> (Self, DisplayWriter) {
        let slot = Arc::new(FrameSlot::new());
        let writer = DisplayWriter::new(
            slot.clone(),
            display,
            config.partial_max_extent,
            config.writer_interval,
        );
        (Self { renderer, slot }, writer)
    }

    /// 渲染并提交一帧
    ///
    /// 渲染失败时不会改动邮箱，屏幕上保持上一帧。
    pub fn submit(
        &self,
        weather: &WeatherSnapshot,
        transit: &TransitSnapshot,
        partial: bool,
        clear: bool,
    ) -> Result<(), RenderError> {
        let bitmap = self.renderer.render(weather, transit)?;
        if self.slot.put(Frame::new(bitmap, partial, clear)) {
            debug!("Pending frame superseded before it was written");
        }
        Ok(())
    }

    pub fn has_pending(&self) -> bool {
        self.slot.is_occupied()
    }
}

/// 一次写入的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Full { clear: bool },
    Partial(Rect),
}

/// 墨水屏写入器，独占显示设备和上一次成功写出的位图
pub struct DisplayWriter {
    slot: Arc<FrameSlot>,
    display: Box<dyn EpdDisplay>,
    previous: Option<Bitmap>,
    max_extent: u16,
    interval: Duration,
}

impl DisplayWriter {
    fn new(
        slot: Arc<FrameSlot>,
        display: Box<dyn EpdDisplay>,
        max_extent: u16,
        interval: Duration,
    ) -> Self {
        Self {
            slot,
            display,
            previous: None,
            max_extent,
            interval,
        }
    }

    pub fn previous(&self) -> Option<&Bitmap> {
        self.previous.as_ref()
    }

    /// 取出待写帧并写入，邮箱为空或写入失败时返回 `None`
    pub fn drain_once(&mut self) -> Option<WriteOutcome> {
        let frame = self.slot.take()?;
        match self.write_frame(frame) {
            Ok(outcome) => {
                match outcome {
                    WriteOutcome::Full { clear } => info!("Display full write (clear: {})", clear),
                    WriteOutcome::Partial(region) => info!("Display partial write {:?}", region),
                }
                Some(outcome)
            }
            Err(e) => {
                error!("Display write failed: {:?}", e);
                None
            }
        }
    }

    /// 把一帧写入硬件
    ///
    /// 只有差异区域不超过上限的局部帧才做局部刷新，其余（包括与上一帧相同的帧）都整屏写入；
    /// 只有写入成功才更新上一帧缓存。
    pub fn write_frame(&mut self, frame: Frame) -> Result<WriteOutcome, HardwareError> {
        let diff = self
            .previous
            .as_ref()
            .and_then(|previous| previous.diff_box(frame.bitmap()));

        let outcome = match diff {
            Some(region)
                if region.width <= self.max_extent
                    && region.height <= self.max_extent
                    && frame.partial() =>
            {
                self.display.write_partial(frame.bitmap(), region)?;
                WriteOutcome::Partial(region)
            }
            _ => {
                self.display.write_full(frame.bitmap(), frame.clear())?;
                WriteOutcome::Full {
                    clear: frame.clear(),
                }
            }
        };

        self.previous = Some(frame.into_bitmap());
        Ok(outcome)
    }

    /// 写入循环，收到停止信号后把最后一帧写完再退出
    ///
    /// 硬件写入是阻塞的，放到阻塞线程池执行，不占用异步工作线程。
    pub async fn run(self, stop: Arc<StopSignal>) {
        let interval = self.interval;
        info!("Display writer started, interval {:?}", interval);

        let mut writer = self;
        loop {
            let stopped = tokio::select! {
                _ = stop.wait() => true,
                _ = tokio::time::sleep(interval) => false,
            };
            writer = match writer.drain_blocking().await {
                Some(writer) => writer,
                None => return,
            };
            if stopped {
                break;
            }
        }
        info!("Display writer stopped");
    }

    async fn drain_blocking(mut self) -> Option<Self> {
        let task = tokio::task::spawn_blocking(move || {
            self.drain_once();
            self
        });
        match task.await {
            Ok(writer) => Some(writer),
            Err(e) => {
                error!("Display writer aborted: {:?}", e);
                None
            }
        }
    }
}
