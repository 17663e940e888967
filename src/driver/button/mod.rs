// src/driver/button/mod.rs
//! 按键驱动模块
//!
//! 四个上拉输入，下降沿触发；中断回调经防抖后把 [`ButtonPress`] 送入全局通道

use embassy_time::{Duration, Instant};

use crate::common::error::Result;
use crate::common::{ButtonPress, ButtonSender};

#[cfg(feature = "rpi")]
mod linux;

#[cfg(feature = "simulator")]
mod simulator;

#[cfg(feature = "rpi")]
pub use linux::LinuxButtonDriver;

#[cfg(feature = "simulator")]
pub use simulator::SimulatorButtonDriver;

/// 按键驱动trait
pub trait ButtonDriver {
    /// 开始监听，之后的按键经 `sender` 送出
    fn start(&mut self, sender: ButtonSender) -> Result<()>;
}

/// 单个输入的防抖器
///
/// 距上一次被接受的事件不超过 `window` 的事件被丢弃（恰好等于也丢弃）；被丢弃的事件不刷新计时起点
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn accept(&mut self, at: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            match at.checked_duration_since(last) {
                Some(elapsed) if elapsed > self.window => {}
                _ => return false,
            }
        }
        self.last_accepted = Some(at);
        true
    }
}

/// 防抖后投递；通道满时丢弃并返回 false
pub(crate) fn forward_press(
    debouncer: &mut Debouncer,
    sender: &ButtonSender,
    pin: u8,
    at: Instant,
) -> bool {
    if !debouncer.accept(at) {
        log::trace!("Bounce on pin {} ignored", pin);
        return false;
    }
    match sender.try_send(ButtonPress { pin, at }) {
        Ok(()) => {
            log::debug!("Button press on pin {}", pin);
            true
        }
        Err(_) => {
            log::warn!("Button channel full, press on pin {} dropped", pin);
            false
        }
    }
}
