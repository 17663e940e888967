// src/platform/simulator.rs
use crate::common::config::AppConfig;
use crate::common::error::Result;
use crate::driver::button::SimulatorButtonDriver;
use crate::driver::display::SimulatorEpdDriver;
use crate::platform::common::Platform;

/// 桌面模拟：标准输入代替按键，PNG 文件代替屏幕
pub struct SimulatorPlatform {
    config: AppConfig,
}

impl Platform for SimulatorPlatform {
    type Display = SimulatorEpdDriver;
    type Buttons = SimulatorButtonDriver;

    fn init(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
        })
    }

    fn create_display_driver(&mut self) -> Result<SimulatorEpdDriver> {
        SimulatorEpdDriver::new(&self.config.display)
    }

    fn create_button_driver(&mut self) -> Result<SimulatorButtonDriver> {
        SimulatorButtonDriver::new(&self.config.buttons)
    }

    fn init_logging() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
        log::info!("Initialized env_logger for simulator");
    }
}
