use async_trait::async_trait;

use crate::types::{FetchError, TransitSnapshot, WeatherSnapshot};

/// 外部数据源（天气接口、地铁实时数据等）
///
/// 超时由具体实现负责，调度核心不做额外包装。
#[async_trait]
pub trait DataSource<T>: Send + Sync {
    async fn fetch(&self) -> Result<T, FetchError>;
}

/// 可由生产者缓存并广播的数据快照
pub trait Snapshot: Clone + Send + Sync + 'static {
    /// 与上一次广播的值比较，决定是否通知订阅者
    fn should_notify(&self, cached: Option<&Self>) -> bool;
}

impl Snapshot for WeatherSnapshot {
    fn should_notify(&self, cached: Option<&Self>) -> bool {
        cached != Some(self)
    }
}

impl Snapshot for TransitSnapshot {
    /// 只关心前两趟列车，以及列表在空/非空之间的切换
    fn should_notify(&self, cached: Option<&Self>) -> bool {
        let Some(cached) = cached else {
            return true;
        };
        if cached.is_empty() != self.is_empty() {
            return true;
        }
        cached.top_two() != self.top_two()
    }
}
