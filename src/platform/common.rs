// src/platform/common.rs
use crate::common::config::AppConfig;
use crate::common::error::Result;
use crate::driver::button::ButtonDriver;
use crate::driver::display::DisplayDriver;

/// 硬件平台：负责日志初始化和驱动构造
pub trait Platform: Sized {
    type Display: DisplayDriver;
    type Buttons: ButtonDriver;

    fn init(config: &AppConfig) -> Result<Self>;

    fn init_logging();

    fn create_display_driver(&mut self) -> Result<Self::Display>;

    fn create_button_driver(&mut self) -> Result<Self::Buttons>;
}

#[cfg(all(feature = "rpi", not(feature = "simulator")))]
pub type DefaultPlatform = super::rpi::RpiPlatform;

#[cfg(feature = "simulator")]
pub type DefaultPlatform = super::simulator::SimulatorPlatform;
