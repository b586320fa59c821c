mod config;
mod drivers;

use std::sync::Arc;

use subway_epd_common::*;
use subway_epd_core::AppContext;
use subway_epd_graphics::StatusRenderer;

use config::{AppConfig, init_logger};
use drivers::{JsonFileSource, PbmDisplay, SimulatedTransit, SimulatedWeather};

async fn run(config: AppConfig) -> SystemResult<()> {
    let clock = Arc::new(SystemClock);

    let renderer = Arc::new(StatusRenderer::new(
        clock.clone(),
        config.display,
        config.train_line_1.clone(),
        config.train_line_2.clone(),
    ));
    let display = PbmDisplay::new(&config.output_dir, config.display)?;
    info!("Display image at {}", display.path().display());

    let weather: Box<dyn DataSource<WeatherSnapshot>> = match &config.weather_file {
        Some(path) => {
            info!("Reading weather from {}", path.display());
            Box::new(JsonFileSource::new(path.clone()))
        }
        None => Box::new(SimulatedWeather::new(
            clock.clone(),
            config.weather_lat,
            config.weather_lon,
        )),
    };
    let transit: Box<dyn DataSource<TransitSnapshot>> = match &config.transit_file {
        Some(path) => {
            info!("Reading transit from {}", path.display());
            Box::new(JsonFileSource::new(path.clone()))
        }
        None => Box::new(SimulatedTransit::new(
            clock.clone(),
            config.station_id.clone(),
            config.train_line_1.clone(),
            config.train_line_2.clone(),
        )),
    };

    let mut app = AppContext::new(
        config.core.clone(),
        weather,
        transit,
        renderer,
        Box::new(display),
        clock,
    );
    app.start();
    info!(
        "Showing lines {} and {} at station {}, press Ctrl-C to exit",
        config.train_line_1, config.train_line_2, config.station_id
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {:?}", e);
    }
    info!("Shutting down");
    app.stop().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    // 没有 .env 文件时直接使用进程环境
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logger(false, false);
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    init_logger(config.quiet, config.debug);

    if let Err(e) = run(config).await {
        error!("Simulator error: {:?}", e);
        std::process::exit(1);
    }
}
