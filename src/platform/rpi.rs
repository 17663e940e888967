// src/platform/rpi.rs
use crate::common::config::AppConfig;
use crate::common::error::Result;
use crate::driver::button::LinuxButtonDriver;
use crate::driver::display::LinuxEpdDriver;
use crate::platform::common::Platform;

/// 树莓派 + 5.65 寸七色屏
pub struct RpiPlatform {
    config: AppConfig,
}

impl Platform for RpiPlatform {
    type Display = LinuxEpdDriver;
    type Buttons = LinuxButtonDriver;

    fn init(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
        })
    }

    fn create_display_driver(&mut self) -> Result<LinuxEpdDriver> {
        LinuxEpdDriver::new(&self.config.display)
    }

    fn create_button_driver(&mut self) -> Result<LinuxButtonDriver> {
        LinuxButtonDriver::new(&self.config.buttons)
    }

    fn init_logging() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Initialized env_logger for Raspberry Pi");
    }
}
