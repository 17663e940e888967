// src/main.rs

//! 墨水屏按键面板主入口

#[cfg(not(any(feature = "rpi", feature = "simulator")))]
compile_error!("enable either the `rpi` or the `simulator` feature");

use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};
use static_cell::StaticCell;

use epd_panel::common::error::Result;
use epd_panel::common::{AppConfig, ButtonChannel};
use epd_panel::driver::button::ButtonDriver;
use epd_panel::platform::{DefaultPlatform, Platform};
use epd_panel::render::FreetypeLoader;
use epd_panel::service::{NmapScanner, OneCallClient};
use epd_panel::tasks::{AppContext, dispatch_task};

static BUTTON_CHANNEL: StaticCell<ButtonChannel> = StaticCell::new();

#[tokio::main]
async fn main() -> ExitCode {
    DefaultPlatform::init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::load(std::env::args_os().nth(1).map(PathBuf::from))?;
    info!(
        "Buttons {:?}, images from {}, scanning {}",
        config.buttons.pins,
        config.paths.image_dir.display(),
        config.network.subnet
    );

    let mut platform = DefaultPlatform::init(&config)?;
    let display = platform.create_display_driver()?;

    let ctx = AppContext::new(
        &config,
        OneCallClient::new(config.weather.clone())?,
        NmapScanner::new(&config.network),
        FreetypeLoader,
        display,
    )?;

    let channel: &'static ButtonChannel = BUTTON_CHANNEL.init(ButtonChannel::new());
    // 按键驱动持有中断注册，必须活到进程结束
    let mut buttons = platform.create_button_driver()?;
    buttons.start(channel.sender())?;

    match dispatch_task(ctx, channel.receiver()).await? {}
}
