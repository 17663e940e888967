// src/render/text_renderer.rs

//! 文本渲染模块
//!
//! 字体光栅化交给 FreeType；版面代码只依赖 [`TextFace`]，
//! 以便在测试中替换为记录调用的实现。

use std::path::Path;

use freetype::Library;
use freetype::face::LoadFlag;
use image::{Rgba, RgbaImage};

use crate::common::error::{AppError, Result};

/// 文本包围盒，坐标相对绘制原点（左上角为行首上沿）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// 矩形区域 (x1, y1) - (x2, y2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// 由左上角和尺寸构造
    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

/// 居中偏移：((W - w) / 2, (H - h) / 2)，相对矩形左上角
pub fn center_offset(rect: &Rect, text: &TextBox) -> (f32, f32) {
    (
        (rect.width() - text.width() as f32) / 2.0,
        (rect.height() - text.height() as f32) / 2.0,
    )
}

/// 文本在矩形中居中时的绘制原点
pub fn center_origin(rect: &Rect, text: &TextBox) -> (f32, f32) {
    let (dx, dy) = center_offset(rect, text);
    (rect.x1 + dx, rect.y1 + dy)
}

/// 已加载并设置好字号的字体
pub trait TextFace {
    /// 在原点 (0, 0) 处渲染 text 时的包围盒
    fn text_bbox(&mut self, text: &str) -> Result<TextBox>;

    /// 以 (x, y) 为原点绘制文本
    fn draw_text(
        &mut self,
        canvas: &mut RgbaImage,
        x: i32,
        y: i32,
        text: &str,
        color: Rgba<u8>,
    ) -> Result<()>;
}

/// 按路径和字号加载字体
pub trait FontLoader {
    type Face: TextFace;

    fn load(&self, path: &Path, size: u32) -> Result<Self::Face>;
}

/// 按 `text` 自身的包围盒在矩形中居中绘制，返回绘制原点
pub fn draw_centered<F: TextFace>(
    face: &mut F,
    canvas: &mut RgbaImage,
    rect: &Rect,
    text: &str,
    color: Rgba<u8>,
) -> Result<(i32, i32)> {
    let bbox = face.text_bbox(text)?;
    let (x, y) = center_origin(rect, &bbox);
    let origin = (x.floor() as i32, y.floor() as i32);
    face.draw_text(canvas, origin.0, origin.1, text, color)?;
    Ok(origin)
}

/// FreeType 字体加载器
#[derive(Debug, Clone, Copy, Default)]
pub struct FreetypeLoader;

impl FontLoader for FreetypeLoader {
    type Face = FreetypeFace;

    fn load(&self, path: &Path, size: u32) -> Result<FreetypeFace> {
        FreetypeFace::open(path, size)
    }
}

/// 单个字形的渲染位置
struct PlacedGlyph {
    left: i32,
    top: i32,
    width: i32,
    rows: i32,
    pitch: i32,
    coverage: Vec<u8>,
}

pub struct FreetypeFace {
    // face 必须先于 library 释放
    face: freetype::Face,
    _library: Library,
    ascender: i32,
}

impl FreetypeFace {
    pub fn open(path: &Path, size: u32) -> Result<Self> {
        let library =
            Library::init().map_err(|e| AppError::FontError(format!("freetype init: {}", e)))?;
        let face = library.new_face(path, 0).map_err(|e| {
            AppError::FontError(format!("load font '{}': {}", path.display(), e))
        })?;
        face.set_pixel_sizes(0, size)
            .map_err(|e| AppError::FontError(format!("set size {}: {}", size, e)))?;

        let ascender = face
            .size_metrics()
            .map(|m| (m.ascender >> 6) as i32)
            .unwrap_or(size as i32);

        Ok(Self {
            face,
            _library: library,
            ascender,
        })
    }

    /// 逐字排版，y 方向以行首上沿为 0
    fn layout(&mut self, text: &str) -> Result<Vec<PlacedGlyph>> {
        let mut pen_x = 0i32;
        let mut glyphs = Vec::with_capacity(text.len());

        for c in text.chars() {
            self.face
                .load_char(c as usize, LoadFlag::RENDER)
                .map_err(|e| AppError::FontError(format!("render '{}': {}", c, e)))?;
            let glyph = self.face.glyph();
            let bitmap = glyph.bitmap();

            glyphs.push(PlacedGlyph {
                left: pen_x + glyph.bitmap_left(),
                top: self.ascender - glyph.bitmap_top(),
                width: bitmap.width(),
                rows: bitmap.rows(),
                pitch: bitmap.pitch(),
                coverage: bitmap.buffer().to_vec(),
            });
            pen_x += (glyph.advance().x >> 6) as i32;
        }

        Ok(glyphs)
    }
}

impl TextFace for FreetypeFace {
    fn text_bbox(&mut self, text: &str) -> Result<TextBox> {
        let glyphs = self.layout(text)?;
        let mut inked = glyphs.iter().filter(|g| g.width > 0 && g.rows > 0);

        let Some(first) = inked.next() else {
            return Ok(TextBox::default());
        };
        let mut bbox = TextBox {
            left: first.left,
            top: first.top,
            right: first.left + first.width,
            bottom: first.top + first.rows,
        };
        for g in inked {
            bbox.left = bbox.left.min(g.left);
            bbox.top = bbox.top.min(g.top);
            bbox.right = bbox.right.max(g.left + g.width);
            bbox.bottom = bbox.bottom.max(g.top + g.rows);
        }
        Ok(bbox)
    }

    fn draw_text(
        &mut self,
        canvas: &mut RgbaImage,
        x: i32,
        y: i32,
        text: &str,
        color: Rgba<u8>,
    ) -> Result<()> {
        for g in self.layout(text)? {
            for row in 0..g.rows {
                for col in 0..g.width {
                    let index = (row * g.pitch.abs() + col) as usize;
                    let Some(&alpha) = g.coverage.get(index) else {
                        continue;
                    };
                    blend_pixel(canvas, x + g.left + col, y + g.top + row, color, alpha);
                }
            }
        }
        Ok(())
    }
}

/// 按覆盖率把颜色混合到画布上，越界像素直接忽略
pub fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: u8) {
    if coverage == 0 || x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32
    {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let a = coverage as u32;
    for i in 0..3 {
        dst.0[i] = ((color.0[i] as u32 * a + dst.0[i] as u32 * (255 - a)) / 255) as u8;
    }
    dst.0[3] = dst.0[3].max(coverage);
}
