// src/render/network_page.rs

//! 局域网主机表：两列（短主机名、IP），每台主机一行

use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use log::info;

use crate::common::config::{AppConfig, LayoutConfig};
use crate::common::error::Result;
use crate::common::types::HostEntry;
use crate::render::text_renderer::{FontLoader, TextFace};
use crate::service::scan_service::HostScanner;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// 表格几何参数
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub origin_x: i32,
    pub origin_y: i32,
    pub row_height: i32,
    pub column_width: i32,
    pub margin: i32,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            row_height: LayoutConfig::TABLE_ROW_HEIGHT,
            column_width: LayoutConfig::TABLE_COLUMN_WIDTH,
            margin: LayoutConfig::TABLE_CELL_MARGIN,
        }
    }
}

impl TableLayout {
    /// 第 row 行第 column 列文字的绘制原点
    pub fn cell_text_origin(&self, row: usize, column: usize) -> (i32, i32) {
        (
            self.origin_x + column as i32 * self.column_width + self.margin,
            self.origin_y + row as i32 * self.row_height + self.margin,
        )
    }
}

/// 逐行绘制；不裁剪不分页，超出画布的行由绘制函数忽略越界像素
pub fn draw_table<F: TextFace>(
    face: &mut F,
    canvas: &mut RgbaImage,
    layout: &TableLayout,
    rows: &[[&str; 2]],
) -> Result<()> {
    for (i, row) in rows.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            let (x, y) = layout.cell_text_origin(i, j);
            face.draw_text(canvas, x, y, cell, INK)?;
        }
    }
    Ok(())
}

/// 主机表页生成器
pub struct NetworkTableGenerator<S, L> {
    scanner: S,
    fonts: L,
    font: PathBuf,
}

impl<S: HostScanner, L: FontLoader> NetworkTableGenerator<S, L> {
    pub fn new(scanner: S, fonts: L, config: &AppConfig) -> Self {
        Self {
            scanner,
            fonts,
            font: config.paths.text_font.clone(),
        }
    }

    pub async fn render(&self) -> Result<RgbaImage> {
        let hosts = self.scanner.scan().await?;
        let image = self.compose(&hosts)?;
        info!("Network table rendered with {} rows", hosts.len());
        Ok(image)
    }

    pub fn compose(&self, hosts: &[HostEntry]) -> Result<RgbaImage> {
        let mut canvas = RgbaImage::from_pixel(
            LayoutConfig::CANVAS_WIDTH,
            LayoutConfig::CANVAS_HEIGHT,
            PAPER,
        );
        let mut face = self.fonts.load(&self.font, LayoutConfig::TABLE_FONT_SIZE)?;
        let rows: Vec<[&str; 2]> = hosts
            .iter()
            .map(|h| [h.short_name.as_str(), h.ip.as_str()])
            .collect();
        draw_table(&mut face, &mut canvas, &TableLayout::default(), &rows)?;
        Ok(canvas)
    }
}
