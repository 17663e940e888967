// src/service/mod.rs

//! 服务模块 - 行星时计算、天气、局域网扫描和图片轮播

pub mod astro;
pub mod scan_service;
pub mod slideshow;
pub mod weather_service;

pub use scan_service::{HostScanner, NmapScanner};
pub use slideshow::ImageCycle;
pub use weather_service::{OneCallClient, WeatherSource};
