// tests/dispatcher.rs
//! 按键分发端到端测试：天气、扫描、字体和屏幕都用替身

use std::path::Path;

use embassy_time::Instant;
use image::{GrayAlphaImage, LumaA, Rgba, RgbaImage};

use epd_panel::common::error::{AppError, Result};
use epd_panel::common::{
    AppConfig, ButtonAction, ButtonChannel, ButtonPress, HostEntry, WeatherSnapshot,
};
use epd_panel::driver::display::DisplayDriver;
use epd_panel::render::text_renderer::{FontLoader, TextBox, TextFace};
use epd_panel::service::{HostScanner, WeatherSource};
use epd_panel::tasks::{AppContext, dispatch_once, dispatch_task};

struct FakeWeather;

impl WeatherSource for FakeWeather {
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot> {
        Ok(WeatherSnapshot {
            icon: "10n".to_string(),
            temp: serde_json::Number::from(41),
            sunrise: 1_792_151_100,
            sunset: 1_792_191_300,
            moon_phase: 0.97,
        })
    }

    async fn fetch_icon(&self, _icon: &str) -> Result<RgbaImage> {
        Ok(RgbaImage::from_pixel(200, 200, Rgba([0, 0, 255, 255])))
    }
}

struct FakeScanner {
    fail: bool,
}

impl HostScanner for FakeScanner {
    async fn scan(&self) -> Result<Vec<HostEntry>> {
        if self.fail {
            return Err(AppError::ScanFailed("exit status: 1".into()));
        }
        Ok(vec![
            HostEntry::new("router", "192.168.1.1"),
            HostEntry::new("laptop", "192.168.1.42"),
        ])
    }
}

/// 不画任何东西的字体
#[derive(Clone, Copy)]
struct BlankFonts;

struct BlankFace;

impl TextFace for BlankFace {
    fn text_bbox(&mut self, text: &str) -> Result<TextBox> {
        Ok(TextBox {
            left: 0,
            top: 0,
            right: 12 * text.len() as i32,
            bottom: 24,
        })
    }

    fn draw_text(&mut self, _: &mut RgbaImage, _: i32, _: i32, _: &str, _: Rgba<u8>) -> Result<()> {
        Ok(())
    }
}

impl FontLoader for BlankFonts {
    type Face = BlankFace;

    fn load(&self, _path: &Path, _size: u32) -> Result<BlankFace> {
        Ok(BlankFace)
    }
}

#[derive(Default)]
struct RecordingDisplay {
    pending: Option<(RgbaImage, f32)>,
    shown: Vec<(RgbaImage, f32)>,
}

impl DisplayDriver for RecordingDisplay {
    fn set_image(&mut self, image: &RgbaImage, saturation: f32) -> Result<()> {
        self.pending = Some((image.clone(), saturation));
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        if let Some(frame) = self.pending.take() {
            self.shown.push(frame);
        }
        Ok(())
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    config: AppConfig,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    let moons = dir.path().join("moon_icons");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::create_dir_all(&moons).unwrap();

    RgbaImage::from_pixel(600, 448, Rgba([255, 0, 0, 255]))
        .save(images.join("a.png"))
        .unwrap();
    RgbaImage::from_pixel(600, 448, Rgba([0, 255, 0, 255]))
        .save(images.join("b.png"))
        .unwrap();
    for i in 0..12 {
        GrayAlphaImage::from_pixel(150, 112, LumaA([0, 255]))
            .save(moons.join(format!("{}.png", i)))
            .unwrap();
    }

    let mut config = AppConfig::default();
    config.paths.image_dir = images;
    config.paths.moon_icon_dir = moons;
    Fixture { dir, config }
}

type TestContext = AppContext<FakeWeather, FakeScanner, BlankFonts, RecordingDisplay>;

fn context(config: &AppConfig, scan_fails: bool) -> TestContext {
    AppContext::new(
        config,
        FakeWeather,
        FakeScanner { fail: scan_fails },
        BlankFonts,
        RecordingDisplay::default(),
    )
    .unwrap()
}

fn press(pin: u8) -> ButtonPress {
    press_at(pin, 0)
}

fn press_at(pin: u8, millis: u64) -> ButtonPress {
    ButtonPress {
        pin,
        at: Instant::from_millis(millis),
    }
}

#[tokio::test]
async fn each_button_renders_its_page() {
    let fx = fixture();
    let mut ctx = context(&fx.config, false);
    let channel = ButtonChannel::new();
    let receiver = channel.receiver();

    let expected = [
        (5, ButtonAction::Calendar),
        (6, ButtonAction::NetworkTable),
        (16, ButtonAction::NextImage),
        (24, ButtonAction::NextImage),
    ];
    for (pin, action) in expected {
        channel.try_send(press(pin)).unwrap();
        assert_eq!(dispatch_once(&mut ctx, &receiver).await.unwrap(), Some(action));
    }

    let shown = &ctx.display.shown;
    assert_eq!(shown.len(), 4);
    assert!(shown.iter().all(|(image, s)| image.dimensions() == (600, 448) && *s == 0.5));
    // 第三、四个按键共享同一个循环
    assert_eq!(shown[2].0.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(shown[3].0.get_pixel(0, 0).0, [0, 255, 0, 255]);
}

#[tokio::test]
async fn image_cycle_wraps_around() {
    let fx = fixture();
    let mut ctx = context(&fx.config, false);
    let channel = ButtonChannel::new();
    let receiver = channel.receiver();

    for _ in 0..3 {
        channel.try_send(press(16)).unwrap();
        dispatch_once(&mut ctx, &receiver).await.unwrap();
    }
    let first: Vec<_> = ctx.display.shown.iter().map(|(i, _)| i.get_pixel(0, 0).0).collect();
    assert_eq!(first, [[255, 0, 0, 255], [0, 255, 0, 255], [255, 0, 0, 255]]);
}

#[tokio::test]
async fn presses_queued_during_render_are_served_in_order() {
    let fx = fixture();
    let mut ctx = context(&fx.config, false);
    let channel = ButtonChannel::new();
    let receiver = channel.receiver();

    channel.try_send(press_at(16, 0)).unwrap();
    channel.try_send(press_at(24, 1000)).unwrap();
    channel.try_send(press_at(6, 1200)).unwrap();

    assert_eq!(
        dispatch_once(&mut ctx, &receiver).await.unwrap(),
        Some(ButtonAction::NextImage)
    );
    assert_eq!(ctx.display.shown.len(), 1);
    assert_eq!(channel.len(), 2);

    assert_eq!(
        dispatch_once(&mut ctx, &receiver).await.unwrap(),
        Some(ButtonAction::NextImage)
    );
    assert_eq!(
        dispatch_once(&mut ctx, &receiver).await.unwrap(),
        Some(ButtonAction::NetworkTable)
    );
    assert!(channel.is_empty());

    let shown = &ctx.display.shown;
    assert_eq!(shown.len(), 3);
    assert_eq!(shown[0].0.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(shown[1].0.get_pixel(0, 0).0, [0, 255, 0, 255]);
}

#[tokio::test]
async fn unbound_pin_is_ignored() {
    let fx = fixture();
    let mut ctx = context(&fx.config, false);
    let channel = ButtonChannel::new();
    let receiver = channel.receiver();

    channel.try_send(press(13)).unwrap();
    assert_eq!(dispatch_once(&mut ctx, &receiver).await.unwrap(), None);
    assert!(ctx.display.shown.is_empty());
}

#[tokio::test]
async fn generator_failure_ends_the_loop() {
    let fx = fixture();
    let ctx = context(&fx.config, true);
    let channel = ButtonChannel::new();

    channel.try_send(press(6)).unwrap();
    let result = dispatch_task(ctx, channel.receiver()).await;
    assert!(matches!(result, Err(AppError::ScanFailed(_))));
}

#[tokio::test]
async fn empty_image_directory_fails_on_press_not_startup() {
    let fx = fixture();
    let empty = fx.dir.path().join("empty");
    std::fs::create_dir_all(&empty).unwrap();
    let mut config = fx.config.clone();
    config.paths.image_dir = empty;

    let mut ctx = context(&config, false);
    assert!(ctx.images.is_empty());
    let result = ctx.render(ButtonAction::NextImage).await;
    assert!(matches!(result, Err(AppError::EmptyImageDir(_))));
}
