// src/driver/display/simulator.rs
use std::path::PathBuf;

use image::RgbaImage;
use log::{debug, info};

use super::DisplayDriver;
use super::palette::{PanelFrame, PanelPalette};
use crate::common::config::DisplayConfig;
use crate::common::error::{AppError, Result};

/// 模拟器驱动：把量化后的画面保存为 PNG
pub struct SimulatorEpdDriver {
    width: u32,
    height: u32,
    output: PathBuf,
    pending: Option<(PanelFrame, f32)>,
    refresh_count: u32,
}

impl SimulatorEpdDriver {
    pub fn new(config: &DisplayConfig) -> Result<Self> {
        info!(
            "Initializing Simulator EPD driver, frames go to {}",
            config.simulator_output.display()
        );
        Ok(Self {
            width: config.width,
            height: config.height,
            output: config.simulator_output.clone(),
            pending: None,
            refresh_count: 0,
        })
    }

    pub fn refresh_count(&self) -> u32 {
        self.refresh_count
    }
}

impl DisplayDriver for SimulatorEpdDriver {
    fn set_image(&mut self, image: &RgbaImage, saturation: f32) -> Result<()> {
        let frame = PanelFrame::from_image(image, self.width, self.height, saturation);
        self.pending = Some((frame, saturation));
        debug!("Simulator frame buffer updated");
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let Some((frame, saturation)) = &self.pending else {
            debug!("No frame set, nothing to show");
            return Ok(());
        };
        frame
            .to_rgba(&PanelPalette::new(*saturation))
            .save(&self.output)
            .map_err(|e| {
                log::error!("Failed to write {}: {}", self.output.display(), e);
                AppError::DisplayUpdateFailed
            })?;
        self.refresh_count += 1;
        info!(
            "Simulator refresh #{} written to {}",
            self.refresh_count,
            self.output.display()
        );
        Ok(())
    }
}
