// src/render/image_renderer.rs

//! 位图粘贴与裁剪

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Luma, RgbaImage, imageops};

use crate::common::error::{AppError, Result};

/// 以 mask 为透明度把 src 粘贴到 canvas 的 (x, y)
///
/// mask 为 255 的像素完全覆盖，0 保持原样，中间值线性混合。
pub fn paste_with_mask(canvas: &mut RgbaImage, src: &RgbaImage, mask: &GrayImage, x: i64, y: i64) {
    for (sx, sy, pixel) in src.enumerate_pixels() {
        let tx = x + sx as i64;
        let ty = y + sy as i64;
        if tx < 0 || ty < 0 || tx >= canvas.width() as i64 || ty >= canvas.height() as i64 {
            continue;
        }
        let Luma([alpha]) = mask.get_pixel_checked(sx, sy).copied().unwrap_or(Luma([0]));
        if alpha == 0 {
            continue;
        }
        let dst = canvas.get_pixel_mut(tx as u32, ty as u32);
        let a = alpha as u32;
        for i in 0..4 {
            dst.0[i] = ((pixel.0[i] as u32 * a + dst.0[i] as u32 * (255 - a)) / 255) as u8;
        }
    }
}

/// 提取单个通道作为蒙版
pub fn channel_mask(image: &RgbaImage, channel: usize) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y).0[channel.min(3)]])
    })
}

/// 裁剪中心 width x height 区域，超出原图的部分为透明像素
///
/// 结果总是 width x height，小图标因此仍居中。
pub fn crop_center(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let left = (image.width() as i64 - width as i64) / 2;
    let top = (image.height() as i64 - height as i64) / 2;
    let mut cropped = RgbaImage::new(width, height);
    imageops::replace(&mut cropped, image, -left, -top);
    cropped
}

/// 月相图标及其蒙版
pub struct MaskedIcon {
    pub image: RgbaImage,
    pub mask: GrayImage,
}

/// 月相图标路径：`<dir>/<index>.png`
pub fn moon_icon_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{}.png", index))
}

/// 读取月相图标，以图像的第二个通道作为蒙版
///
/// 灰度+透明图标的第二通道是透明度；RGB(A) 图标的第二通道是绿色。
pub fn load_moon_icon(dir: &Path, index: usize) -> Result<MaskedIcon> {
    let path = moon_icon_path(dir, index);
    let decoded = image::open(&path).map_err(|source| AppError::ImageDecode {
        path: path.clone(),
        source,
    })?;

    let mask = match &decoded {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageLumaA8(_) => channel_mask(&decoded.to_rgba8(), 3),
        other => channel_mask(&other.to_rgba8(), 1),
    };

    Ok(MaskedIcon {
        image: decoded.to_rgba8(),
        mask,
    })
}
