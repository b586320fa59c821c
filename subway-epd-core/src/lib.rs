//! 地铁墨水屏看板调度核心
//!
//! 两个独立轮询的数据生产者、重绘调度器以及单槽合并的墨水屏写入器。

pub mod change_detector;
pub mod context;
pub mod display_state;
pub mod producer;
pub mod render_sink;
pub mod scheduler;
pub mod task;

pub use change_detector::significant_change;
pub use context::AppContext;
pub use display_state::{Decision, DisplayState, RedrawPolicy, RedrawReason};
pub use producer::{
    Observer, ObserverList, PollOutcome, Producer, TransitProducer, WeatherProducer, observer,
};
pub use render_sink::{DisplayWriter, FrameSlot, RenderSink, WriteOutcome};
pub use scheduler::RedrawScheduler;
pub use task::TaskHandle;
