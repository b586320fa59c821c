//! 状态画面渲染
//! 把时间、列车和天气绘制成墨水屏位图

pub mod renderer;

pub use renderer::{Layout, StatusRenderer};
