// src/common/config.rs
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::common::error::{AppError, Result};

/// 默认配置文件名（相对工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "epd_panel.json";
/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "EPD_PANEL_CONFIG";
/// 覆盖天气 API key 的环境变量
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// 固定版面参数
pub struct LayoutConfig;

impl LayoutConfig {
    pub const CANVAS_WIDTH: u32 = 600;
    pub const CANVAS_HEIGHT: u32 = 448;

    pub const QUARTER_WIDTH: f32 = Self::CANVAS_WIDTH as f32 * 0.25;
    pub const QUARTER_HEIGHT: f32 = Self::CANVAS_HEIGHT as f32 * 0.25;
    pub const HALF_WIDTH: f32 = Self::CANVAS_WIDTH as f32 / 2.0;

    // 日历页字体大小
    pub const SYMBOL_FONT_SIZE: u32 = 100;
    pub const TEXT_FONT_SIZE: u32 = 60;

    /// 天气图标裁剪尺寸
    pub const WEATHER_ICON_CROP: u32 = 100;
    /// 月相图标数量
    pub const MOON_ICON_COUNT: usize = 12;

    // 网络表格
    pub const TABLE_ROW_HEIGHT: i32 = 45;
    pub const TABLE_COLUMN_WIDTH: i32 = 300;
    pub const TABLE_CELL_MARGIN: i32 = 5;
    pub const TABLE_FONT_SIZE: u32 = 25;
}

/// 应用配置根结构
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub buttons: ButtonConfig,
    pub display: DisplayConfig,
    pub paths: PathConfig,
    pub weather: WeatherConfig,
    pub network: NetworkConfig,
}

/// 按键配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// BCM 编号，按面板从上到下排列
    pub pins: [u8; 4],
    /// 防抖时间（毫秒）
    pub debounce_ms: u64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            pins: [5, 6, 16, 24],
            debounce_ms: 250,
        }
    }
}

/// 墨水屏配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub saturation: f32,
    pub width: u32,
    pub height: u32,
    pub spi_device: String,
    pub busy_pin: u64,
    pub dc_pin: u64,
    pub rst_pin: u64,
    /// 模拟器输出文件
    pub simulator_output: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            saturation: 0.5,
            width: LayoutConfig::CANVAS_WIDTH,
            height: LayoutConfig::CANVAS_HEIGHT,
            spi_device: "/dev/spidev0.0".to_string(),
            busy_pin: 17,
            dc_pin: 22,
            rst_pin: 27,
            simulator_output: PathBuf::from("frame.png"),
        }
    }
}

/// 本地资源路径
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub image_dir: PathBuf,
    pub moon_icon_dir: PathBuf,
    pub text_font: PathBuf,
    pub symbol_font: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("images/"),
            moon_icon_dir: PathBuf::from("moon_icons/"),
            text_font: PathBuf::from("NotoSans-VariableFont_wdth,wght.ttf"),
            symbol_font: PathBuf::from("Astronomicon.ttf"),
        }
    }
}

/// 天气 API 配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub endpoint: String,
    /// `{icon}` 会被替换为图标代码
    pub icon_url_template: String,
    pub lat: f64,
    pub lon: f64,
    pub units: String,
    pub exclude: String,
    pub api_key: String,
    pub timezone: String,
    /// 为 null 时不设置超时
    pub request_timeout_secs: Option<u64>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openweathermap.org/data/3.0/onecall".to_string(),
            icon_url_template: "https://openweathermap.org/img/wn/{icon}@4x.png".to_string(),
            lat: 39.84,
            lon: -86.14,
            units: "imperial".to_string(),
            exclude: "minutely,alerts".to_string(),
            api_key: String::new(),
            timezone: "America/Indiana/Indianapolis".to_string(),
            request_timeout_secs: Some(30),
        }
    }
}

/// 局域网扫描配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub subnet: String,
    pub nmap_binary: PathBuf,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            subnet: "192.168.1.0/24".to_string(),
            nmap_binary: PathBuf::from("nmap"),
        }
    }
}

impl AppConfig {
    /// 按 命令行参数 > 环境变量 > 默认文件名 的顺序确定配置路径并加载
    pub fn load(cli_path: Option<PathBuf>) -> Result<Self> {
        let explicit = cli_path.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    info!("No config file found, using defaults");
                    Self::default()
                }
            }
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.weather.api_key = key;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::from_json(&text).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> core::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.display.saturation) {
            return Err(AppError::ConfigError(format!(
                "saturation {} outside [0, 1]",
                self.display.saturation
            )));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(AppError::ConfigError("display size must be non-zero".into()));
        }
        if self.weather.api_key.is_empty() {
            warn!("Weather API key is empty, calendar requests will be rejected");
        }
        Ok(())
    }
}
