use thiserror::Error;

/// 数据源拉取失败（网络或解析问题，均视为暂时性错误）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("malformed payload: {0}")]
    Parse(String),

    #[error("failed to read source: {0}")]
    Io(String),

    #[error("source unavailable")]
    Unavailable,
}

/// 渲染失败：数据缺少渲染所需的字段
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("missing field required by renderer: {0}")]
    MissingField(&'static str),

    #[error("drawing failed: {0}")]
    Draw(String),
}

/// 墨水屏写入失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HardwareError {
    #[error("display not initialized")]
    NotInitialized,

    #[error("region {0:?} outside of panel")]
    InvalidRegion(crate::types::Rect),

    #[error("bitmap is {actual_width}x{actual_height}, panel is {width}x{height}")]
    SizeMismatch {
        width: u16,
        height: u16,
        actual_width: u16,
        actual_height: u16,
    },

    #[error("display I/O failed: {0}")]
    Io(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SystemError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("observer failed: {0}")]
    Observer(String),

    #[error("background task failed: {0}")]
    Task(String),
}

pub type SystemResult<T> = core::result::Result<T, SystemError>;
