//! 数据生产者
//!
//! 每个生产者按固定周期从外部数据源拉取数据，缓存最新值，并在值发生需要关注的变化时通知订阅者。
//! 拉取失败只记录日志：轮询继续，缓存保留。

pub mod observers;

use core::cell::RefCell;
use core::time::Duration;
use std::sync::Arc;

use subway_epd_common::*;

pub use self::observers::{Observer, ObserverList, observer};
use crate::task::TaskHandle;

/// 单次轮询的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Notified,
    Unchanged,
    Failed,
}

pub struct Producer<T: Snapshot> {
    name: &'static str,
    source: Box<dyn DataSource<T>>,
    cache: GlobalMutex<RefCell<Option<T>>>,
    observers: ObserverList<T>,
    task: GlobalMutex<RefCell<Option<TaskHandle>>>,
}

pub type WeatherProducer = Producer<WeatherSnapshot>;
pub type TransitProducer = Producer<TransitSnapshot>;

impl<T: Snapshot> Producer<T> {
    pub fn new(name: &'static str, source: Box<dyn DataSource<T>>) -> Self {
        Self {
            name,
            source,
            cache: GlobalMutex::new(RefCell::new(None)),
            observers: ObserverList::new(),
            task: GlobalMutex::new(RefCell::new(None)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 注册订阅者
    ///
    /// 已经拉取过数据时，新订阅者会立即收到一次当前缓存值。
    pub fn subscribe(&self, observer: Observer<T>) {
        // 在缓存锁内完成，避免补发的旧值晚于新一轮通知到达
        self.cache.lock(|cache| {
            self.observers.subscribe(observer.clone());
            let cached = cache.borrow().clone();
            if let Some(value) = cached {
                debug!("{} catch-up for late subscriber", self.name);
                if let Err(e) = observer(&value) {
                    warn!("Observer of {} failed on catch-up: {:?}", self.name, e);
                }
            }
        });
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// 最近一次成功拉取的数据
    pub fn latest(&self) -> Option<T> {
        self.cache.lock(|cache| cache.borrow().clone())
    }

    pub async fn poll_once(&self) -> PollOutcome {
        let value = match self.source.fetch().await {
            Ok(value) => value,
            Err(e) => {
                warn!("{} fetch failed: {:?}", self.name, e);
                return PollOutcome::Failed;
            }
        };

        self.cache.lock(|cache| {
            let notify = value.should_notify(cache.borrow().as_ref());
            *cache.borrow_mut() = Some(value);
            if !notify {
                trace!("{} unchanged", self.name);
                return PollOutcome::Unchanged;
            }

            if let Some(value) = cache.borrow().as_ref() {
                let failures = self.observers.notify(value);
                debug!(
                    "{} updated, {} observers notified, {} failed",
                    self.name,
                    self.observers.len(),
                    failures
                );
            }
            PollOutcome::Notified
        })
    }

    /// 启动后台轮询，已在运行时只记录警告并返回 `false`
    pub fn start(self: &Arc<Self>, interval: Duration) -> bool {
        self.task.lock(|task| {
            let mut task = task.borrow_mut();
            if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
                warn!("{} producer already running", self.name);
                return false;
            }

            let producer = Arc::clone(self);
            *task = Some(TaskHandle::spawn(self.name, move |stop| {
                producer.run(interval, stop)
            }));
            true
        })
    }

    /// 停止后台轮询并等待任务退出
    pub async fn stop(&self) {
        let Some(handle) = self.task.lock(|task| task.borrow_mut().take()) else {
            debug!("{} producer not running", self.name);
            return;
        };
        if let Err(e) = handle.shutdown().await {
            error!("Failed to stop {} producer: {:?}", self.name, e);
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.lock(|task| {
            task.borrow()
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
        })
    }

    async fn run(self: Arc<Self>, interval: Duration, stop: Arc<StopSignal>) {
        info!("{} producer started, polling every {:?}", self.name, interval);
        loop {
            self.poll_once().await;
            tokio::select! {
                _ = stop.wait() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        info!("{} producer stopped", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedSource<T> {
        script: Mutex<VecDeque<Result<T, FetchError>>>,
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl<T: Send + 'static> DataSource<T> for ScriptedSource<T> {
        async fn fetch(&self) -> Result<T, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(FetchError::Unavailable))
        }
    }

    fn producer<T: Snapshot>(
        script: Vec<Result<T, FetchError>>,
    ) -> (Arc<Producer<T>>, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource {
            script: Mutex::new(script.into()),
            fetches: fetches.clone(),
        };
        (Arc::new(Producer::new("test", Box::new(source))), fetches)
    }

    fn recorder<T: Clone + Send + 'static>() -> (Observer<T>, Arc<Mutex<Vec<T>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let recorder = observer(move |value: &T| {
            sink.lock().unwrap().push(value.clone());
            Ok(())
        });
        (recorder, seen)
    }

    fn trains(list: &[(&str, u32)]) -> TransitSnapshot {
        TransitSnapshot::new(
            list.iter()
                .map(|(id, m)| TransitArrival::new(*id, "F", "", *m))
                .collect(),
        )
    }

    #[tokio::test]
    async fn notifies_only_on_relevant_change() {
        let (producer, _) = producer(vec![
            Ok(trains(&[("A", 5), ("B", 12)])),
            Ok(trains(&[("A", 5), ("B", 12), ("C", 20)])),
            Ok(trains(&[("A", 4), ("B", 12)])),
            Ok(trains(&[])),
            Ok(trains(&[])),
        ]);
        let (observer, seen) = recorder();
        producer.subscribe(observer);

        assert_eq!(producer.poll_once().await, PollOutcome::Notified);
        assert_eq!(producer.poll_once().await, PollOutcome::Unchanged);
        assert_eq!(producer.poll_once().await, PollOutcome::Notified);
        assert_eq!(producer.poll_once().await, PollOutcome::Notified);
        assert_eq!(producer.poll_once().await, PollOutcome::Unchanged);
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_cached_value() {
        let weather = WeatherSnapshot::default();
        let (producer, _) = producer(vec![
            Ok(weather.clone()),
            Err(FetchError::Network("timeout".into())),
        ]);

        assert_eq!(producer.poll_once().await, PollOutcome::Notified);
        assert_eq!(producer.poll_once().await, PollOutcome::Failed);
        assert_eq!(producer.latest(), Some(weather));
    }

    #[tokio::test]
    async fn late_subscriber_gets_catch_up() {
        let (producer, _) = producer(vec![Ok(trains(&[("A", 5)]))]);

        let (early, early_seen) = recorder();
        producer.subscribe(early);
        assert!(early_seen.lock().unwrap().is_empty());

        producer.poll_once().await;

        let (late, late_seen) = recorder();
        producer.subscribe(late);
        assert_eq!(*late_seen.lock().unwrap(), vec![trains(&[("A", 5)])]);
        assert_eq!(early_seen.lock().unwrap().len(), 1);
        assert_eq!(producer.observer_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_loop_runs_until_stopped() {
        let (producer, fetches) = producer::<WeatherSnapshot>(vec![
            Err(FetchError::Unavailable),
            Ok(WeatherSnapshot::default()),
        ]);

        assert!(producer.start(Duration::from_secs(5)));
        assert!(!producer.start(Duration::from_secs(5)));
        assert!(producer.is_running());

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
        assert_eq!(producer.latest(), Some(WeatherSnapshot::default()));

        producer.stop().await;
        assert!(!producer.is_running());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stop_without_start_is_a_no_op() {
        let (producer, _) = producer::<WeatherSnapshot>(vec![]);
        producer.stop().await;
        assert!(!producer.is_running());
    }
}
