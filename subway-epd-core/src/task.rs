use core::future::Future;
use std::sync::Arc;

use subway_epd_common::*;
use tokio::task::JoinHandle;

/// 可取消、可等待的后台任务句柄
///
/// 每个任务持有自己的停止信号，`shutdown` 发出信号后等待任务真正退出。
pub struct TaskHandle {
    name: &'static str,
    stop: Arc<StopSignal>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub fn spawn<F, Fut>(name: &'static str, task: F) -> Self
    where
        F: FnOnce(Arc<StopSignal>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let stop = Arc::new(StopSignal::new());
        let join = tokio::spawn(task(stop.clone()));
        debug!("Task {} spawned", name);
        Self { name, stop, join }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub async fn shutdown(self) -> SystemResult<()> {
        self.stop.signal(());
        self.join.await.map_err(|e| {
            error!("Task {} ended abnormally: {:?}", self.name, e);
            SystemError::Task(format!("{}: {}", self.name, e))
        })?;
        debug!("Task {} joined", self.name);
        Ok(())
    }
}
