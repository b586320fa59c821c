use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};

/// 天气快照
///
/// 每次拉取成功后整体替换，不做局部修改。相等性为结构相等。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
    #[serde(default)]
    pub commute: Vec<CommuteForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub code: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_f: f32,
    pub condition: Condition,
    pub wind_mph: f32,
    pub precip_chance: u8,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: Date,
    pub max_temp_f: f32,
    pub min_temp_f: f32,
    pub chance_of_rain: u8,
    pub condition: Condition,
}

/// 通勤时段预报
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommuteForecast {
    pub label: String,
    pub date: Date,
    pub start: Time,
    pub end: Time,
    pub temperature_f: i16,
    pub condition: Condition,
    pub precipitation_chance: u8,
    pub wind_mph: u16,
}
