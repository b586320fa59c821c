use core::cell::RefCell;
use std::sync::Arc;

use subway_epd_common::*;

pub type Observer<T> = Arc<dyn Fn(&T) -> SystemResult<()> + Send + Sync>;

/// 把闭包包装成订阅者
pub fn observer<T, F>(f: F) -> Observer<T>
where
    F: Fn(&T) -> SystemResult<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 订阅者列表
///
/// 调用顺序不做保证。某个订阅者返回错误只记录日志，不影响其余订阅者。
pub struct ObserverList<T> {
    observers: GlobalMutex<RefCell<Vec<Observer<T>>>>,
}

impl<T> Default for ObserverList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObserverList<T> {
    pub const fn new() -> Self {
        Self {
            observers: GlobalMutex::new(RefCell::new(Vec::new())),
        }
    }

    pub fn subscribe(&self, observer: Observer<T>) {
        self.observers.lock(|observers| observers.borrow_mut().push(observer));
    }

    /// 通知所有订阅者，返回失败的个数
    pub fn notify(&self, value: &T) -> usize {
        // 先复制列表再调用，订阅者可以在回调中继续订阅
        let observers = self.observers.lock(|observers| observers.borrow().clone());
        let mut failures = 0;
        for observer in &observers {
            if let Err(e) = observer(value) {
                warn!("Observer failed: {:?}", e);
                failures += 1;
            }
        }
        failures
    }

    pub fn len(&self) -> usize {
        self.observers.lock(|observers| observers.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
