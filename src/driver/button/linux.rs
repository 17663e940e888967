// src/driver/button/linux.rs
use embassy_time::Instant;
use log::{error, info};
use rppal::gpio::{Event, Gpio, InputPin, Trigger};

use super::{ButtonDriver, Debouncer, forward_press};
use crate::common::ButtonSender;
use crate::common::config::ButtonConfig;
use crate::common::error::{AppError, Result};

/// 树莓派 GPIO 按键驱动
///
/// 中断回调运行在 rppal 的中断线程上；InputPin 被释放时中断随之注销，
/// 因此驱动必须存活到程序结束
pub struct LinuxButtonDriver {
    config: ButtonConfig,
    pins: Vec<InputPin>,
}

impl LinuxButtonDriver {
    pub fn new(config: &ButtonConfig) -> Result<Self> {
        info!("Initializing GPIO buttons on pins {:?}", config.pins);
        Ok(Self {
            config: config.clone(),
            pins: Vec::with_capacity(config.pins.len()),
        })
    }
}

impl ButtonDriver for LinuxButtonDriver {
    fn start(&mut self, sender: ButtonSender) -> Result<()> {
        let gpio = Gpio::new().map_err(|e| AppError::GpioError(e.to_string()))?;

        for &pin in &self.config.pins {
            let mut input = gpio
                .get(pin)
                .map_err(|e| AppError::GpioError(format!("pin {}: {}", pin, e)))?
                .into_input_pullup();

            let mut debouncer = Debouncer::from_millis(self.config.debounce_ms);
            input
                .set_async_interrupt(Trigger::FallingEdge, None, move |_event: Event| {
                    forward_press(&mut debouncer, &sender, pin, Instant::now());
                })
                .map_err(|e| {
                    error!("Failed to register interrupt on pin {}: {}", pin, e);
                    AppError::GpioError(format!("pin {}: {}", pin, e))
                })?;

            self.pins.push(input);
        }

        info!("Listening on {} buttons", self.pins.len());
        Ok(())
    }
}
