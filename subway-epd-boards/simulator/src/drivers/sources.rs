//! 模拟器数据源
//!
//! 没有网络时用确定性的模拟数据驱动画面；设置了 `WEATHER_FILE` / `TRANSIT_FILE`
//! 时改为每次轮询重新读取 JSON 文件。

use core::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use jiff::civil::Date;
use jiff::{SignedDuration, Zoned};
use serde::de::DeserializeOwned;
use subway_epd_common::*;

// 只生成未来 45 分钟内的列车
const LOOKAHEAD_MINUTES: i32 = 45;
const DAILY_DAYS: usize = 3;
const COMMUTES: usize = 2;

/// 一条模拟线路：按固定间隔发车，`offset` 为相对整点的分钟偏移
#[derive(Debug, Clone)]
struct SimulatedLine {
    route: String,
    headway: i32,
    offset: i32,
}

pub struct SimulatedTransit<C: Clock> {
    clock: C,
    station: String,
    lines: [SimulatedLine; 2],
}

impl<C: Clock> SimulatedTransit<C> {
    pub fn new(
        clock: C,
        station: impl Into<String>,
        line_1: impl Into<String>,
        line_2: impl Into<String>,
    ) -> Self {
        Self {
            clock,
            station: station.into(),
            lines: [
                SimulatedLine {
                    route: line_1.into(),
                    headway: 6,
                    offset: 2,
                },
                SimulatedLine {
                    route: line_2.into(),
                    headway: 9,
                    offset: 4,
                },
            ],
        }
    }

    fn arrivals(&self, now: &Zoned) -> Vec<TransitArrival> {
        let minute_of_day = i32::from(now.hour()) * 60 + i32::from(now.minute());
        let mut arrivals = Vec::new();

        for line in &self.lines {
            for ahead in 1..=LOOKAHEAD_MINUTES {
                if (minute_of_day + ahead - line.offset).rem_euclid(line.headway) != 0 {
                    continue;
                }
                let Ok(at) = now
                    .timestamp()
                    .checked_add(SignedDuration::from_mins(i64::from(ahead)))
                else {
                    continue;
                };
                let at = at.to_zoned(now.time_zone().clone());
                arrivals.push(TransitArrival::new(
                    format!("{}-{}-{}", self.station, line.route, at.strftime("%H%M")),
                    line.route.clone(),
                    at.strftime("%I:%M %p").to_string(),
                    ahead as u32,
                ));
            }
        }
        arrivals
    }
}

#[async_trait]
impl<C: Clock> DataSource<TransitSnapshot> for SimulatedTransit<C> {
    async fn fetch(&self) -> Result<TransitSnapshot, FetchError> {
        let snapshot = TransitSnapshot::new(self.arrivals(&self.clock.now()));
        debug!(
            "Simulated {} arrivals at station {}",
            snapshot.len(),
            self.station
        );
        Ok(snapshot)
    }
}

// (描述, 天气代码, 降水概率)
const CONDITIONS: [(&str, u16, u8); 4] = [
    ("Clear", 1000, 0),
    ("Partly cloudy", 1003, 10),
    ("Overcast", 1006, 20),
    ("Light rain", 1183, 70),
];

fn condition(index: usize) -> (Condition, u8) {
    let (text, code, precip) = CONDITIONS[index % CONDITIONS.len()];
    (
        Condition {
            text: text.to_string(),
            code,
        },
        precip,
    )
}

/// 按一天中的小时生成的模拟天气
pub struct SimulatedWeather<C: Clock> {
    clock: C,
    lat: f64,
    lon: f64,
}

impl<C: Clock> SimulatedWeather<C> {
    pub fn new(clock: C, lat: f64, lon: f64) -> Self {
        Self { clock, lat, lon }
    }

    /// 15 点最暖，往前后每小时降 1 度，最多降 12 度；纬度越高越冷
    fn temperature_at(&self, hour: i8) -> f32 {
        let base = 78.0 - (self.lat.abs() as f32 - 25.0).max(0.0) * 0.9;
        let from_peak = (i32::from(hour) - 15).abs().min(12);
        base - from_peak as f32
    }

    fn snapshot(&self, now: &Zoned) -> WeatherSnapshot {
        let today = now.date();
        let hour = now.hour();
        let (current_condition, precip_chance) = condition(hour as usize / 6);

        let current = CurrentConditions {
            temp_f: self.temperature_at(hour),
            condition: current_condition,
            wind_mph: 4.0 + f32::from(hour % 5),
            precip_chance,
            is_day: (6..18).contains(&hour),
        };

        let daily = core::iter::successors(Some(today), |day| day.tomorrow().ok())
            .take(DAILY_DAYS)
            .enumerate()
            .map(|(i, date)| {
                let (condition, chance_of_rain) = condition(i + 1);
                DailyForecast {
                    date,
                    max_temp_f: self.temperature_at(15) - i as f32,
                    min_temp_f: self.temperature_at(3) - i as f32,
                    chance_of_rain,
                    condition,
                }
            })
            .collect();

        WeatherSnapshot {
            current: Some(current),
            daily,
            commute: self.commutes(now, today),
        }
    }

    /// 今天尚未结束的通勤时段，之后是明天的
    fn commutes(&self, now: &Zoned, today: Date) -> Vec<CommuteForecast> {
        let periods = default_commute_periods();
        let days = core::iter::successors(Some(today), |day| day.tomorrow().ok()).take(2);

        let mut commutes = Vec::new();
        for date in days {
            for period in &periods {
                if date == today && now.time() > period.end {
                    continue;
                }
                let hour = period.start.hour() + 1;
                let (condition, precipitation_chance) = condition(hour as usize / 6);
                commutes.push(CommuteForecast {
                    label: period.label.to_string(),
                    date,
                    start: period.start,
                    end: period.end,
                    temperature_f: self.temperature_at(hour).round() as i16,
                    condition,
                    precipitation_chance,
                    wind_mph: 6,
                });
            }
        }
        commutes.truncate(COMMUTES);
        commutes
    }
}

#[async_trait]
impl<C: Clock> DataSource<WeatherSnapshot> for SimulatedWeather<C> {
    async fn fetch(&self) -> Result<WeatherSnapshot, FetchError> {
        trace!("Simulating weather for ({}, {})", self.lat, self.lon);
        Ok(self.snapshot(&self.clock.now()))
    }
}

/// 每次拉取都重新读取的 JSON 文件数据源
pub struct JsonFileSource<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileSource<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T> DataSource<T> for JsonFileSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self) -> Result<T, FetchError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&raw).map_err(|e| FetchError::Parse(e.to_string()))
    }
}
