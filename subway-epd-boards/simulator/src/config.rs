use core::str::FromStr;
use core::time::Duration;
use std::path::PathBuf;

use subway_epd_common::*;

// 默认纽约坐标
const DEFAULT_LAT: f64 = 40.7128;
const DEFAULT_LON: f64 = -74.0060;
const DEFAULT_OUTPUT_DIR: &str = "debug_output";

/// 模拟器配置，来自环境变量（启动时先加载 `.env`）
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub station_id: String,
    pub train_line_1: String,
    pub train_line_2: String,
    pub debug: bool,
    pub quiet: bool,
    pub weather_lat: f64,
    pub weather_lon: f64,
    pub output_dir: PathBuf,
    /// 设置后从 JSON 文件读取天气，否则使用模拟数据
    pub weather_file: Option<PathBuf>,
    pub transit_file: Option<PathBuf>,
    pub core: CoreConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let mut core = CoreConfig::default();
        if let Some(secs) = parse_opt::<u64>(get("WEATHER_INTERVAL_SECS"), "WEATHER_INTERVAL_SECS")? {
            core.weather_interval = positive_secs("WEATHER_INTERVAL_SECS", secs)?;
        }
        if let Some(secs) = parse_opt::<u64>(get("TRANSIT_INTERVAL_SECS"), "TRANSIT_INTERVAL_SECS")? {
            core.transit_interval = positive_secs("TRANSIT_INTERVAL_SECS", secs)?;
        }

        let defaults = DisplayConfig::default();
        let display = DisplayConfig {
            width: parse_opt(get("DISPLAY_WIDTH"), "DISPLAY_WIDTH")?.unwrap_or(defaults.width),
            height: parse_opt(get("DISPLAY_HEIGHT"), "DISPLAY_HEIGHT")?.unwrap_or(defaults.height),
        };

        Ok(Self {
            station_id: required("STATION_ID")?,
            train_line_1: required("TRAIN_LINE_1")?,
            train_line_2: required("TRAIN_LINE_2")?,
            debug: flag(get("DEBUG")),
            quiet: flag(get("QUIET_MODE")),
            weather_lat: parse_opt(get("WEATHER_LAT"), "WEATHER_LAT")?.unwrap_or(DEFAULT_LAT),
            weather_lon: parse_opt(get("WEATHER_LON"), "WEATHER_LON")?.unwrap_or(DEFAULT_LON),
            output_dir: get("OUTPUT_DIR")
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string())
                .into(),
            weather_file: get("WEATHER_FILE").map(PathBuf::from),
            transit_file: get("TRANSIT_FILE").map(PathBuf::from),
            core,
            display,
        })
    }
}

fn parse_opt<T: FromStr>(value: Option<String>, key: &'static str) -> Result<Option<T>, ConfigError> {
    value
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value: raw })
        })
        .transpose()
}

fn positive_secs(key: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: secs.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn flag(value: Option<String>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
}

/// 初始化日志
///
/// `RUST_LOG` 优先；否则安静模式只输出警告，调试模式下本项目的模块输出 trace。
pub fn init_logger(quiet: bool, debug: bool) {
    let filter = if quiet {
        "warn"
    } else if debug {
        "info,subway_epd_core=trace,subway_epd_graphics=trace,subway_epd_simulator=trace"
    } else {
        "info,subway_epd_core=debug,subway_epd_graphics=debug,subway_epd_simulator=debug"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("STATION_ID", "F21"),
        ("TRAIN_LINE_1", "F"),
        ("TRAIN_LINE_2", "G"),
    ];

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.station_id, "F21");
        assert_eq!(config.train_line_2, "G");
        assert!(!config.debug && !config.quiet);
        assert_eq!(config.weather_lat, DEFAULT_LAT);
        assert_eq!(config.output_dir, PathBuf::from("debug_output"));
        assert_eq!(config.weather_file, None);
        assert_eq!(config.core, CoreConfig::default());
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn missing_or_blank_required_key_is_reported() {
        let err = AppConfig::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TRAIN_LINE_2"));

        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("STATION_ID", "  ");
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("STATION_ID"));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("QUIET_MODE", "TRUE"),
            ("DEBUG", "1"),
            ("WEATHER_LAT", "34.05"),
            ("TRANSIT_INTERVAL_SECS", "10"),
            ("DISPLAY_WIDTH", "400"),
            ("TRANSIT_FILE", "fixtures/transit.json"),
        ]);
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.quiet && config.debug);
        assert_eq!(config.weather_lat, 34.05);
        assert_eq!(config.core.transit_interval, Duration::from_secs(10));
        assert_eq!(config.display.width, 400);
        assert_eq!(config.display.height, 1200);
        assert_eq!(config.transit_file, Some(PathBuf::from("fixtures/transit.json")));
    }

    #[test]
    fn unparsable_values_are_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("WEATHER_INTERVAL_SECS", "soon"));
        assert_eq!(
            AppConfig::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Invalid {
                key: "WEATHER_INTERVAL_SECS",
                value: "soon".into()
            }
        );

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("TRANSIT_INTERVAL_SECS", "0"));
        assert!(AppConfig::from_lookup(lookup(&pairs)).is_err());
    }
}
