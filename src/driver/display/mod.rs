// src/driver/display/mod.rs

/// 电子墨水屏驱动模块
///
/// 本模块定义了七色墨水屏驱动的通用接口和平台特定实现
/// 支持树莓派和模拟器两种平台的显示驱动
use image::RgbaImage;

use crate::common::error::Result;

pub mod palette;

#[cfg(feature = "simulator")]
mod simulator;

#[cfg(feature = "rpi")]
mod linux;

#[cfg(feature = "simulator")]
pub use simulator::SimulatorEpdDriver;

#[cfg(feature = "rpi")]
pub use linux::LinuxEpdDriver;

/// 电子墨水屏驱动trait
///
/// 与面板交互分两步：先写入画面，再整屏刷新
pub trait DisplayDriver {
    /// 写入待显示的画面
    ///
    /// # 参数
    /// - `image`: 整屏位图，尺寸不符时缩放到面板尺寸
    /// - `saturation`: 调色板饱和度，0 为理想色，1 为实测色
    fn set_image(&mut self, image: &RgbaImage, saturation: f32) -> Result<()>;

    /// 把已写入的画面刷新到面板
    ///
    /// 七色面板整屏刷新需要数十秒，期间阻塞调用方
    fn show(&mut self) -> Result<()>;
}
