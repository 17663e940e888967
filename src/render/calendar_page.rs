// src/render/calendar_page.rs

//! 日历页：天气 + 简化行星时
//!
//! 版面按四分之一宽高划分：
//! - 第二行：左格天气图标，右格月相图标
//! - 第三行：日主星与时主星符号
//! - 右半边：温度、日期、日出、日落四行文字

use std::path::PathBuf;
use std::time::Instant;

use image::{Rgba, RgbaImage};
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp, Zoned};
use log::{debug, info};

use crate::common::config::{AppConfig, LayoutConfig};
use crate::common::error::Result;
use crate::common::types::WeatherSnapshot;
use crate::render::image_renderer::{channel_mask, crop_center, load_moon_icon, paste_with_mask};
use crate::render::text_renderer::{FontLoader, Rect, TextFace, draw_centered};
use crate::service::astro::{self, DISPLAYED_HOUR_RULER, Planet};
use crate::service::weather_service::WeatherSource;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// 文本行相对所在格子的上移量
const DATE_ROW_LIFT: f32 = 15.0;
const SUN_ROW_LIFT: f32 = 25.0;
/// 文本列左移量
const TEXT_COLUMN_SHIFT: f32 = 25.0;

/// 从天气快照和当前时间推算出的版面数据
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarData {
    pub temperature: String,
    pub date: String,
    pub sunrise: String,
    pub sunset: String,
    pub day_ruler: Planet,
    pub hour_ruler: Planet,
    pub hour_length: SignedDuration,
    pub moon_index: usize,
    pub icon: String,
}

impl CalendarData {
    /// `now` 决定日期与日主星；日出日落转换到 `tz`
    pub fn build(snapshot: &WeatherSnapshot, now: &Zoned, tz: &TimeZone) -> Result<Self> {
        let sunrise = Timestamp::from_second(snapshot.sunrise)?.to_zoned(tz.clone());
        let sunset = Timestamp::from_second(snapshot.sunset)?.to_zoned(tz.clone());
        let weekday = now.weekday().to_monday_zero_offset() as u8;

        Ok(Self {
            temperature: format!("{}°", snapshot.temp),
            date: now.strftime("%y/%m/%d").to_string(),
            sunrise: sunrise.strftime("%H:%M").to_string(),
            sunset: sunset.strftime("%H:%M").to_string(),
            day_ruler: astro::day_ruler(weekday),
            hour_ruler: DISPLAYED_HOUR_RULER,
            hour_length: astro::planetary_hour_length(sunrise.timestamp(), sunset.timestamp()),
            moon_index: astro::moon_icon_index(snapshot.moon_phase),
            icon: snapshot.icon.clone(),
        })
    }
}

/// 生成结果：位图和用于生成它的数据
pub struct CalendarPage {
    pub image: RgbaImage,
    pub data: CalendarData,
}

/// 日历页各元素的位置
pub struct CalendarLayout;

impl CalendarLayout {
    const QW: f32 = LayoutConfig::QUARTER_WIDTH;
    const QH: f32 = LayoutConfig::QUARTER_HEIGHT;
    const HW: f32 = LayoutConfig::HALF_WIDTH;

    pub fn weather_cell() -> Rect {
        Rect::from_origin(0.0, Self::QH, Self::QW, Self::QH)
    }

    /// 月相图标左上角
    pub fn moon_origin() -> (i64, i64) {
        (Self::QW as i64, Self::QH as i64)
    }

    /// 天气图标左上角：在天气格内居中
    pub fn weather_icon_origin() -> (i64, i64) {
        let crop = LayoutConfig::WEATHER_ICON_CROP as f32;
        let cell = Self::weather_cell();
        (
            (cell.x1 + ((Self::QW - crop) / 2.0).floor()) as i64,
            (cell.y1 + ((Self::QH - crop) / 2.0).floor()) as i64,
        )
    }

    pub fn day_ruler_cell() -> Rect {
        Rect::from_origin(0.0, Self::QH * 2.0, Self::QW, Self::QH)
    }

    pub fn hour_ruler_cell() -> Rect {
        Rect::from_origin(Self::QW, Self::QH * 2.0, Self::QW, Self::QH)
    }

    fn text_cell(y: f32) -> Rect {
        Rect::from_origin(Self::HW - TEXT_COLUMN_SHIFT, y, Self::HW, Self::QH)
    }

    pub fn temperature_cell() -> Rect {
        Self::text_cell(0.0)
    }

    pub fn date_cell() -> Rect {
        Self::text_cell(Self::QH - DATE_ROW_LIFT)
    }

    pub fn sunrise_cell() -> Rect {
        Self::text_cell(Self::QH * 2.0 - SUN_ROW_LIFT)
    }

    pub fn sunset_cell() -> Rect {
        Self::text_cell(Self::QH * 3.0 - SUN_ROW_LIFT)
    }
}

/// 日历页生成器
pub struct CalendarGenerator<W, L> {
    weather: W,
    fonts: L,
    timezone: TimeZone,
    moon_icon_dir: PathBuf,
    text_font: PathBuf,
    symbol_font: PathBuf,
}

impl<W: WeatherSource, L: FontLoader> CalendarGenerator<W, L> {
    pub fn new(weather: W, fonts: L, config: &AppConfig) -> Result<Self> {
        let timezone = TimeZone::get(&config.weather.timezone)?;
        Ok(Self {
            weather,
            fonts,
            timezone,
            moon_icon_dir: config.paths.moon_icon_dir.clone(),
            text_font: config.paths.text_font.clone(),
            symbol_font: config.paths.symbol_font.clone(),
        })
    }

    /// 以当前时间生成
    pub async fn render(&self) -> Result<CalendarPage> {
        let now = Zoned::now().with_time_zone(self.timezone.clone());
        self.render_at(&now).await
    }

    /// 以指定时间生成；每次调用都重新请求天气和图标
    pub async fn render_at(&self, now: &Zoned) -> Result<CalendarPage> {
        let started = Instant::now();

        let snapshot = self.weather.fetch_snapshot().await?;
        let data = CalendarData::build(&snapshot, now, &self.timezone)?;
        debug!(
            "Calendar data: day ruler {}, planetary hour {}s, moon icon {}",
            data.day_ruler.name,
            data.hour_length.as_secs(),
            data.moon_index
        );

        let weather_icon = self.weather.fetch_icon(&data.icon).await?;
        let image = self.compose(&data, &weather_icon)?;

        info!("Calendar rendered in {:?}", started.elapsed());
        Ok(CalendarPage { image, data })
    }

    /// 把版面数据绘制到空白画布上
    pub fn compose(&self, data: &CalendarData, weather_icon: &RgbaImage) -> Result<RgbaImage> {
        let mut canvas = RgbaImage::from_pixel(
            LayoutConfig::CANVAS_WIDTH,
            LayoutConfig::CANVAS_HEIGHT,
            PAPER,
        );

        let moon = load_moon_icon(&self.moon_icon_dir, data.moon_index)?;
        let (mx, my) = CalendarLayout::moon_origin();
        paste_with_mask(&mut canvas, &moon.image, &moon.mask, mx, my);

        let crop = LayoutConfig::WEATHER_ICON_CROP;
        let icon = crop_center(weather_icon, crop, crop);
        let icon_mask = channel_mask(&icon, 3);
        let (wx, wy) = CalendarLayout::weather_icon_origin();
        paste_with_mask(&mut canvas, &icon, &icon_mask, wx, wy);

        let mut symbols = self
            .fonts
            .load(&self.symbol_font, LayoutConfig::SYMBOL_FONT_SIZE)?;
        let rulers = [
            (CalendarLayout::day_ruler_cell(), data.day_ruler.letter),
            (CalendarLayout::hour_ruler_cell(), data.hour_ruler.letter),
        ];
        for (cell, letter) in rulers {
            draw_glyph(&mut symbols, &mut canvas, &cell, letter)?;
        }

        let mut text = self
            .fonts
            .load(&self.text_font, LayoutConfig::TEXT_FONT_SIZE)?;
        let rows = [
            (CalendarLayout::temperature_cell(), &data.temperature),
            (CalendarLayout::date_cell(), &data.date),
            (CalendarLayout::sunrise_cell(), &data.sunrise),
            (CalendarLayout::sunset_cell(), &data.sunset),
        ];
        for (cell, value) in rows {
            draw_glyph(&mut text, &mut canvas, &cell, value)?;
        }

        Ok(canvas)
    }
}

fn draw_glyph<F: TextFace>(
    face: &mut F,
    canvas: &mut RgbaImage,
    cell: &Rect,
    text: &str,
) -> Result<()> {
    draw_centered(face, canvas, cell, text, INK)?;
    Ok(())
}
