// src/driver/display/linux.rs
use embedded_graphics::prelude::*;
use epd_waveshare::color::OctColor;
use epd_waveshare::epd5in65f::{Display5in65f, Epd5in65f, HEIGHT, WIDTH};
use epd_waveshare::prelude::WaveshareDisplay;
use image::RgbaImage;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{Delay, SpidevDevice, SysfsPin};
use log::{debug, error, info};

use super::DisplayDriver;
use super::palette::{PanelColor, PanelFrame};
use crate::common::config::DisplayConfig;
use crate::common::error::{AppError, Result};

const SPI_SPEED_HZ: u32 = 3_000_000;

type SpiType = SpidevDevice;

pub struct LinuxEpdDriver {
    spi: SpiType,
    epd: Epd5in65f<SpiType, SysfsPin, SysfsPin, SysfsPin, Delay>,
    display: Display5in65f,
}

impl LinuxEpdDriver {
    pub fn new(config: &DisplayConfig) -> Result<Self> {
        info!("Initializing Linux EPD driver on {}", config.spi_device);

        if (config.width, config.height) != (WIDTH, HEIGHT) {
            error!(
                "Configured size {}x{} does not match the 5.65\" panel ({}x{})",
                config.width, config.height, WIDTH, HEIGHT
            );
            return Err(AppError::DisplayInit);
        }

        // 初始化 GPIO 引脚
        let epd_busy = init_gpio(config.busy_pin, Direction::In)?;
        let epd_dc = init_gpio(config.dc_pin, Direction::Out)?;
        let epd_rst = init_gpio(config.rst_pin, Direction::Out)?;

        let mut spi = SpidevDevice::open(&config.spi_device).map_err(|e| {
            error!("Failed to open {}: {:?}", config.spi_device, e);
            AppError::DisplayInit
        })?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(SPI_SPEED_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).map_err(|_| AppError::DisplayInit)?;

        let mut epd = Epd5in65f::new(&mut spi, epd_busy, epd_dc, epd_rst, &mut Delay, None)
            .map_err(|_| AppError::DisplayInit)?;
        epd.sleep(&mut spi, &mut Delay)
            .map_err(|_| AppError::DisplayInit)?;

        info!("EPD display initialized successfully");
        Ok(Self {
            spi,
            epd,
            display: Display5in65f::default(),
        })
    }
}

fn oct_color(color: PanelColor) -> OctColor {
    match color {
        PanelColor::Black => OctColor::Black,
        PanelColor::White => OctColor::White,
        PanelColor::Green => OctColor::Green,
        PanelColor::Blue => OctColor::Blue,
        PanelColor::Red => OctColor::Red,
        PanelColor::Yellow => OctColor::Yellow,
        PanelColor::Orange => OctColor::Orange,
    }
}

impl DisplayDriver for LinuxEpdDriver {
    fn set_image(&mut self, image: &RgbaImage, saturation: f32) -> Result<()> {
        let frame = PanelFrame::from_image(image, WIDTH, HEIGHT, saturation);
        let width = frame.width as usize;
        let pixels = frame.pixels.iter().enumerate().map(|(i, &index)| {
            Pixel(
                Point::new((i % width) as i32, (i / width) as i32),
                oct_color(PanelColor::from_index(index)),
            )
        });
        self.display
            .draw_iter(pixels)
            .map_err(|_| AppError::DisplayUpdateFailed)?;
        debug!("EPD frame buffer updated");
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.epd
            .wake_up(&mut self.spi, &mut Delay)
            .map_err(|_| AppError::DisplayInit)?;

        self.epd
            .update_and_display_frame(&mut self.spi, self.display.buffer(), &mut Delay)
            .map_err(|e| {
                error!("Failed to display frame: {:?}", e);
                AppError::DisplayUpdateFailed
            })?;

        self.epd
            .sleep(&mut self.spi, &mut Delay)
            .map_err(|_| AppError::DisplayUpdateFailed)?;
        debug!("EPD refreshed and entered sleep mode");
        Ok(())
    }
}

/// GPIO 初始化辅助函数
fn init_gpio(pin: u64, direction: Direction) -> Result<SysfsPin> {
    let gpio = SysfsPin::new(pin);
    gpio.export().map_err(|_| AppError::DisplayInit)?;

    // 等待 GPIO 导出完成
    let mut attempts = 0;
    while !gpio.is_exported() {
        std::thread::sleep(std::time::Duration::from_millis(10));
        attempts += 1;
        if attempts > 100 {
            return Err(AppError::DisplayInit);
        }
    }

    gpio.set_direction(direction)
        .map_err(|_| AppError::DisplayInit)?;

    if direction == Direction::Out {
        gpio.set_value(1).map_err(|_| AppError::DisplayInit)?;
    }

    Ok(gpio)
}
