use std::sync::Arc;

use subway_epd_common::*;

use crate::producer::{TransitProducer, WeatherProducer, observer};
use crate::render_sink::{DisplayWriter, RenderSink};
use crate::scheduler::RedrawScheduler;
use crate::task::TaskHandle;

/// 应用上下文
///
/// 由程序入口显式构造并持有，负责把两个生产者、重绘调度器和写入任务连接起来。
pub struct AppContext<C: Clock + 'static> {
    config: CoreConfig,
    weather: Arc<WeatherProducer>,
    transit: Arc<TransitProducer>,
    scheduler: Arc<RedrawScheduler<C>>,
    writer: Option<DisplayWriter>,
    writer_task: Option<TaskHandle>,
    heartbeat_task: Option<TaskHandle>,
}

impl<C: Clock + 'static> AppContext<C> {
    pub fn new(
        config: CoreConfig,
        weather_source: Box<dyn DataSource<WeatherSnapshot>>,
        transit_source: Box<dyn DataSource<TransitSnapshot>>,
        renderer: Arc<dyn Renderer>,
        display: Box<dyn EpdDisplay>,
        clock: C,
    ) -> Self {
        let (sink, writer) = RenderSink::new(renderer, display, &config);
        let scheduler = Arc::new(RedrawScheduler::new(sink, clock, &config));

        let weather = Arc::new(WeatherProducer::new("weather", weather_source));
        let transit = Arc::new(TransitProducer::new("transit", transit_source));

        let on_weather = scheduler.clone();
        weather.subscribe(observer(move |snapshot: &WeatherSnapshot| {
            on_weather.on_weather(snapshot.clone());
            Ok(())
        }));
        let on_transit = scheduler.clone();
        transit.subscribe(observer(move |snapshot: &TransitSnapshot| {
            on_transit.on_transit(snapshot.clone());
            Ok(())
        }));

        Self {
            config,
            weather,
            transit,
            scheduler,
            writer: Some(writer),
            writer_task: None,
            heartbeat_task: None,
        }
    }

    pub fn scheduler(&self) -> &Arc<RedrawScheduler<C>> {
        &self.scheduler
    }

    pub fn weather(&self) -> &Arc<WeatherProducer> {
        &self.weather
    }

    pub fn transit(&self) -> &Arc<TransitProducer> {
        &self.transit
    }

    /// 启动写入任务、心跳和两个生产者
    ///
    /// 写入器只能被启动一次，重复调用只记录警告。
    pub fn start(&mut self) -> bool {
        let Some(writer) = self.writer.take() else {
            warn!("Application context already started");
            return false;
        };

        self.writer_task = Some(TaskHandle::spawn("display-writer", move |stop| {
            writer.run(stop)
        }));

        let scheduler = self.scheduler.clone();
        let interval = self.config.heartbeat_interval;
        self.heartbeat_task = Some(TaskHandle::spawn("heartbeat", move |stop| async move {
            loop {
                tokio::select! {
                    _ = stop.wait() => break,
                    _ = tokio::time::sleep(interval) => {
                        scheduler.on_heartbeat();
                    }
                }
            }
        }));

        self.weather.start(self.config.weather_interval);
        self.transit.start(self.config.transit_interval);
        info!("Application context started");
        true
    }

    /// 按固定顺序停止：列车、天气、心跳，最后让写入任务写完剩余的帧
    pub async fn stop(&mut self) {
        self.transit.stop().await;
        self.weather.stop().await;

        for task in [self.heartbeat_task.take(), self.writer_task.take()]
            .into_iter()
            .flatten()
        {
            let name = task.name();
            if let Err(e) = task.shutdown().await {
                error!("Failed to stop {}: {:?}", name, e);
            }
        }
        info!("Application context stopped");
    }
}
