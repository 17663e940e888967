// src/tasks/dispatch_task.rs
use core::convert::Infallible;
use std::time::Instant;

use image::RgbaImage;
use log::{debug, info, warn};

use crate::common::config::AppConfig;
use crate::common::error::Result;
use crate::common::{ButtonAction, ButtonPress, GlobalReceiver};
use crate::driver::display::DisplayDriver;
use crate::render::{CalendarGenerator, FontLoader, NetworkTableGenerator};
use crate::service::{HostScanner, ImageCycle, WeatherSource};

/// 应用上下文：启动时构造一次，之后由按键分发循环独占
pub struct AppContext<W, S, L, D> {
    pub calendar: CalendarGenerator<W, L>,
    pub network: NetworkTableGenerator<S, L>,
    pub images: ImageCycle,
    pub display: D,
    pins: [u8; 4],
    saturation: f32,
}

impl<W, S, L, D> AppContext<W, S, L, D>
where
    W: WeatherSource,
    S: HostScanner,
    L: FontLoader + Clone,
    D: DisplayDriver,
{
    /// 构造上下文；图片目录在此读取一次
    pub fn new(config: &AppConfig, weather: W, scanner: S, fonts: L, display: D) -> Result<Self> {
        let images = ImageCycle::scan(&config.paths.image_dir)?;
        Self::with_images(config, weather, scanner, fonts, display, images)
    }

    pub fn with_images(
        config: &AppConfig,
        weather: W,
        scanner: S,
        fonts: L,
        display: D,
        images: ImageCycle,
    ) -> Result<Self> {
        Ok(Self {
            calendar: CalendarGenerator::new(weather, fonts.clone(), config)?,
            network: NetworkTableGenerator::new(scanner, fonts, config),
            images,
            display,
            pins: config.buttons.pins,
            saturation: config.display.saturation,
        })
    }

    /// 引脚对应的动作，未配置的引脚返回 None
    pub fn action_for_pin(&self, pin: u8) -> Option<ButtonAction> {
        let position = self.pins.iter().position(|&p| p == pin)?;
        ButtonAction::for_position(position)
    }

    pub async fn render(&mut self, action: ButtonAction) -> Result<RgbaImage> {
        match action {
            ButtonAction::Calendar => Ok(self.calendar.render().await?.image),
            ButtonAction::NetworkTable => self.network.render().await,
            ButtonAction::NextImage => self.images.next_image(),
        }
    }

    /// 生成画面并刷新到屏幕；生成失败时屏幕保持不变
    pub async fn handle_press(&mut self, press: ButtonPress) -> Result<Option<ButtonAction>> {
        let Some(action) = self.action_for_pin(press.pin) else {
            warn!("Press on unbound pin {} ignored", press.pin);
            return Ok(None);
        };

        info!("Pin {} -> {:?}", press.pin, action);
        let started = Instant::now();
        let image = self.render(action).await?;
        self.display.set_image(&image, self.saturation)?;
        self.display.show()?;
        info!("{:?} shown in {:?}", action, started.elapsed());
        Ok(Some(action))
    }
}

/// 等待并处理一个按键；渲染期间到达的按键留在通道里，下一轮依次处理
pub async fn dispatch_once<W, S, L, D>(
    ctx: &mut AppContext<W, S, L, D>,
    receiver: &GlobalReceiver<'_, ButtonPress>,
) -> Result<Option<ButtonAction>>
where
    W: WeatherSource,
    S: HostScanner,
    L: FontLoader + Clone,
    D: DisplayDriver,
{
    let press = receiver.receive().await;
    debug!("Press on pin {} at {}ms", press.pin, press.at.as_millis());
    ctx.handle_press(press).await
}

/// 按键分发主循环，只在出错时返回
pub async fn dispatch_task<W, S, L, D>(
    mut ctx: AppContext<W, S, L, D>,
    receiver: GlobalReceiver<'_, ButtonPress>,
) -> Result<Infallible>
where
    W: WeatherSource,
    S: HostScanner,
    L: FontLoader + Clone,
    D: DisplayDriver,
{
    info!("Dispatch task started, waiting for buttons");
    loop {
        dispatch_once(&mut ctx, &receiver).await?;
    }
}
