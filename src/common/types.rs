// src/common/types.rs

use embassy_time::Instant;

/// 一次天气请求的结果，不做缓存
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// 天气图标代码，如 "01d"
    pub icon: String,
    /// 当前温度，保留 API 返回的数值形式（整数或小数）
    pub temp: serde_json::Number,
    /// 日出时间（UTC 秒）
    pub sunrise: i64,
    /// 日落时间（UTC 秒）
    pub sunset: i64,
    /// 当日月相，0 为新月
    pub moon_phase: f64,
}

/// 扫描到的主机
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    /// 主机名第一段，无法解析时为空
    pub short_name: String,
    pub ip: String,
}

impl HostEntry {
    pub fn new(hostname: &str, ip: impl Into<String>) -> Self {
        Self {
            short_name: short_hostname(hostname).to_string(),
            ip: ip.into(),
        }
    }
}

/// 取主机名第一个 '.' 之前的部分
pub fn short_hostname(hostname: &str) -> &str {
    hostname.split('.').next().unwrap_or("")
}

/// 一次按键中断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPress {
    pub pin: u8,
    pub at: Instant,
}

/// 按键绑定的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Calendar,
    NetworkTable,
    NextImage,
}

impl ButtonAction {
    /// 按面板位置（0 起，自上而下）绑定动作
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(ButtonAction::Calendar),
            1 => Some(ButtonAction::NetworkTable),
            2 | 3 => Some(ButtonAction::NextImage),
            _ => None,
        }
    }
}
