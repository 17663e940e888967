// src/render/mod.rs

//! 页面生成：把服务层数据绘制成整屏位图

pub mod calendar_page;
pub mod image_renderer;
pub mod network_page;
pub mod text_renderer;

pub use calendar_page::{CalendarData, CalendarGenerator, CalendarPage};
pub use network_page::NetworkTableGenerator;
pub use text_renderer::{FontLoader, FreetypeLoader, TextFace};
