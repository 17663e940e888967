// src/common/mod.rs

/// 公共模块定义
///
/// 本模块定义了面板程序的公共类型、配置和错误处理
pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LayoutConfig};
pub use error::{AppError, Result};
pub use types::{ButtonAction, ButtonPress, HostEntry, WeatherSnapshot};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

/// 按键事件通道容量
///
/// 渲染期间积压的按键会在渲染结束后被丢弃，容量只需容纳一次连按
pub const BUTTON_CHANNEL_CAP: usize = 8;

/// 全局通道类型别名
///
/// 中断回调运行在 GPIO 库自己的线程上，因此使用 CriticalSectionRawMutex
pub type GlobalChannel<T> = Channel<CriticalSectionRawMutex, T, BUTTON_CHANNEL_CAP>;
pub type GlobalSender<'a, T> = Sender<'a, CriticalSectionRawMutex, T, BUTTON_CHANNEL_CAP>;
pub type GlobalReceiver<'a, T> = Receiver<'a, CriticalSectionRawMutex, T, BUTTON_CHANNEL_CAP>;

pub type ButtonChannel = GlobalChannel<ButtonPress>;
pub type ButtonSender = GlobalSender<'static, ButtonPress>;
pub type ButtonReceiver = GlobalReceiver<'static, ButtonPress>;
