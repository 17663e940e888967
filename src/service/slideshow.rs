// src/service/slideshow.rs
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::info;

use crate::common::error::{AppError, Result};

/// 图片目录的循环序列
///
/// 目录列表在启动时读取一次，之后新增或删除的文件要重启后才会生效。
#[derive(Debug, Clone)]
pub struct ImageCycle {
    dir: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
}

impl ImageCycle {
    /// 读取目录下的普通文件，按文件名排序
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| AppError::io(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::io(dir, e))?;
            let file_type = entry.file_type().map_err(|e| AppError::io(entry.path(), e))?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        info!("Image cycle: {} files in {}", files.len(), dir.display());
        Ok(Self::from_files(dir, files))
    }

    pub fn from_files(dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 前进一步，末尾之后回到第一个
    pub fn advance(&mut self) -> Result<&Path> {
        if self.files.is_empty() {
            return Err(AppError::EmptyImageDir(self.dir.clone()));
        }
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.files.len();
        Ok(&self.files[index])
    }

    /// 回到序列起点
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// 取下一个文件并解码
    pub fn next_image(&mut self) -> Result<RgbaImage> {
        let path = self.advance()?.to_path_buf();
        info!("Loading slideshow image {}", path.display());
        load_image(&path)
    }
}

/// 解码图片文件为 RGBA
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| AppError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}
