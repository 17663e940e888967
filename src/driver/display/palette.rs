// src/driver/display/palette.rs

//! 七色墨水屏调色板
//!
//! 面板的实际颜色介于“理想色”与“实测色”之间，饱和度参数在两者间线性插值；
//! 整屏图像再由 `imageops::dither` 做误差扩散量化到七种颜色。

use image::buffer::ConvertBuffer;
use image::imageops::{self, ColorMap, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use log::debug;

/// 面板颜色索引，顺序与控制器的颜色编码一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PanelColor {
    Black = 0,
    White = 1,
    Green = 2,
    Blue = 3,
    Red = 4,
    Yellow = 5,
    Orange = 6,
}

impl PanelColor {
    pub const ALL: [PanelColor; 7] = [
        PanelColor::Black,
        PanelColor::White,
        PanelColor::Green,
        PanelColor::Blue,
        PanelColor::Red,
        PanelColor::Yellow,
        PanelColor::Orange,
    ];

    pub fn from_index(index: u8) -> Self {
        Self::ALL[index as usize % Self::ALL.len()]
    }
}

// 第八项为“清屏”色，不参与量化
const DESATURATED: [[u8; 3]; 8] = [
    [0, 0, 0],
    [255, 255, 255],
    [0, 255, 0],
    [0, 0, 255],
    [255, 0, 0],
    [255, 255, 0],
    [255, 140, 0],
    [255, 255, 255],
];

const SATURATED: [[u8; 3]; 8] = [
    [57, 48, 57],
    [255, 255, 255],
    [58, 91, 70],
    [61, 59, 94],
    [156, 72, 75],
    [208, 190, 71],
    [177, 106, 73],
    [255, 255, 255],
];

/// 按饱和度混合出七色调色板
pub fn blend_palette(saturation: f32) -> [[u8; 3]; 7] {
    let s = saturation.clamp(0.0, 1.0);
    let mut palette = [[0u8; 3]; 7];
    for (i, entry) in palette.iter_mut().enumerate() {
        for c in 0..3 {
            let value = SATURATED[i][c] as f32 * s + DESATURATED[i][c] as f32 * (1.0 - s);
            entry[c] = value as u8;
        }
    }
    palette
}

/// 混合后的七色调色板，供 `imageops::dither` 量化使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelPalette {
    colors: [[u8; 3]; 7],
}

impl PanelPalette {
    pub fn new(saturation: f32) -> Self {
        Self {
            colors: blend_palette(saturation),
        }
    }

    pub fn colors(&self) -> &[[u8; 3]; 7] {
        &self.colors
    }
}

impl ColorMap for PanelPalette {
    type Color = Rgb<u8>;

    /// 欧氏距离最近的颜色索引
    fn index_of(&self, color: &Rgb<u8>) -> usize {
        let mut best = 0;
        let mut best_distance = i32::MAX;
        for (i, entry) in self.colors.iter().enumerate() {
            let distance: i32 = color
                .0
                .iter()
                .zip(entry)
                .map(|(&a, &b)| {
                    let d = a as i32 - b as i32;
                    d * d
                })
                .sum();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }

    fn lookup(&self, index: usize) -> Option<Rgb<u8>> {
        self.colors.get(index).map(|&c| Rgb(c))
    }

    fn has_lookup(&self) -> bool {
        true
    }

    fn map_color(&self, color: &mut Rgb<u8>) {
        *color = Rgb(self.colors[self.index_of(color)]);
    }
}

/// 量化后的整屏画面，每像素一个颜色索引
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PanelFrame {
    /// 缩放到面板尺寸后抖动量化；透明度被忽略
    pub fn from_image(image: &RgbaImage, width: u32, height: u32, saturation: f32) -> Self {
        let palette = PanelPalette::new(saturation);
        let mut rgb: RgbImage = if image.dimensions() == (width, height) {
            image.convert()
        } else {
            debug!(
                "Resizing {}x{} image to panel size {}x{}",
                image.width(),
                image.height(),
                width,
                height
            );
            imageops::resize(image, width, height, FilterType::Triangle).convert()
        };

        // imageops::dither 要求至少 2x2
        if width >= 2 && height >= 2 {
            imageops::dither(&mut rgb, &palette);
        }
        let indices = imageops::index_colors(&rgb, &palette);

        Self {
            width,
            height,
            pixels: indices.into_raw(),
        }
    }

    pub fn color_at(&self, x: u32, y: u32) -> PanelColor {
        PanelColor::from_index(self.pixels[(y * self.width + x) as usize])
    }

    /// 以调色板颜色还原为 RGBA，供模拟器保存
    pub fn to_rgba(&self, palette: &PanelPalette) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [r, g, b] = palette.colors()[self.color_at(x, y) as usize];
            image::Rgba([r, g, b, 255])
        })
    }
}
