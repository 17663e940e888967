// src/service/weather_service.rs
use std::time::Duration;

use image::RgbaImage;
use log::{debug, error};
use serde::Deserialize;

use crate::common::config::WeatherConfig;
use crate::common::error::{AppError, Result};
use crate::common::types::WeatherSnapshot;

/// 天气数据来源
///
/// 每次调用都重新请求，不做缓存或重试
pub trait WeatherSource {
    /// 获取当前天气快照
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot>;

    /// 按图标代码下载天气图标，转换为 RGBA
    async fn fetch_icon(&self, icon: &str) -> Result<RgbaImage>;
}

// One Call API 响应中用到的字段
// https://openweathermap.org/api/one-call-3
#[derive(Debug, Deserialize)]
pub struct OneCallResponse {
    pub current: Option<CurrentBlock>,
    #[serde(default)]
    pub daily: Vec<DailyBlock>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentBlock {
    pub temp: Option<serde_json::Number>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ConditionBlock {
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailyBlock {
    pub moon_phase: Option<f64>,
}

impl OneCallResponse {
    /// 提取快照所需字段，缺任何一个都视为错误
    pub fn into_snapshot(self) -> Result<WeatherSnapshot> {
        let current = self.current.ok_or(AppError::WeatherPayload("current"))?;
        let icon = current
            .weather
            .into_iter()
            .next()
            .and_then(|w| w.icon)
            .ok_or(AppError::WeatherPayload("current.weather[0].icon"))?;
        let temp = current.temp.ok_or(AppError::WeatherPayload("current.temp"))?;
        let sunrise = current
            .sunrise
            .ok_or(AppError::WeatherPayload("current.sunrise"))?;
        let sunset = current
            .sunset
            .ok_or(AppError::WeatherPayload("current.sunset"))?;
        let moon_phase = self
            .daily
            .first()
            .and_then(|d| d.moon_phase)
            .ok_or(AppError::WeatherPayload("daily[0].moon_phase"))?;

        Ok(WeatherSnapshot {
            icon,
            temp,
            sunrise,
            sunset,
            moon_phase,
        })
    }
}

/// 解析 One Call JSON 正文
pub fn parse_one_call(body: &str) -> Result<WeatherSnapshot> {
    let response: OneCallResponse = serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse weather payload: {}", e);
        AppError::WeatherPayload("body")
    })?;
    response.into_snapshot()
}

/// 展开图标 URL 模板
pub fn icon_url(template: &str, icon: &str) -> String {
    template.replace("{icon}", icon)
}

/// OpenWeatherMap One Call 客户端
pub struct OneCallClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl OneCallClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    fn query(&self) -> [(&'static str, String); 5] {
        [
            ("lat", self.config.lat.to_string()),
            ("lon", self.config.lon.to_string()),
            ("exclude", self.config.exclude.clone()),
            ("units", self.config.units.clone()),
            ("appid", self.config.api_key.clone()),
        ]
    }

    async fn get_ok(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            error!("Error: {}", status.as_u16());
            return Err(AppError::WeatherStatus(status.as_u16()));
        }
        Ok(response)
    }
}

impl WeatherSource for OneCallClient {
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot> {
        debug!(
            "Fetching weather for {}, {}",
            self.config.lat, self.config.lon
        );
        let request = self.client.get(&self.config.endpoint).query(&self.query());
        let body = self.get_ok(request).await?.text().await?;
        parse_one_call(&body)
    }

    async fn fetch_icon(&self, icon: &str) -> Result<RgbaImage> {
        let url = icon_url(&self.config.icon_url_template, icon);
        debug!("Fetching weather icon {}", url);
        let bytes = self.get_ok(self.client.get(&url)).await?.bytes().await?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "lat": 39.84, "lon": -86.14,
        "current": {
            "dt": 1700000000, "sunrise": 1699963200, "sunset": 1700000000,
            "temp": 72.5,
            "weather": [{"id": 800, "main": "Clear", "icon": "01d"}]
        },
        "daily": [{"moon_phase": 0.5}, {"moon_phase": 0.53}]
    }"#;

    #[test]
    fn parses_fields_used_by_calendar() {
        let snapshot = parse_one_call(SAMPLE).unwrap();
        assert_eq!(snapshot.icon, "01d");
        assert_eq!(snapshot.temp.to_string(), "72.5");
        assert_eq!(snapshot.sunrise, 1699963200);
        assert_eq!(snapshot.sunset, 1700000000);
        assert_eq!(snapshot.moon_phase, 0.5);
    }

    #[test]
    fn integer_temperature_keeps_integer_form() {
        let body = SAMPLE.replace("72.5", "72");
        assert_eq!(parse_one_call(&body).unwrap().temp.to_string(), "72");
    }

    #[test]
    fn missing_daily_block_is_reported() {
        let body = r#"{"current": {"temp": 1, "sunrise": 1, "sunset": 2,
                       "weather": [{"icon": "10n"}]}}"#;
        assert!(matches!(
            parse_one_call(body),
            Err(AppError::WeatherPayload("daily[0].moon_phase"))
        ));
    }

    #[test]
    fn error_body_without_current_is_rejected() {
        let body = r#"{"cod": 401, "message": "Invalid API key"}"#;
        assert!(matches!(
            parse_one_call(body),
            Err(AppError::WeatherPayload("current"))
        ));
    }

    #[test]
    fn icon_url_substitutes_code() {
        let config = WeatherConfig::default();
        assert_eq!(
            icon_url(&config.icon_url_template, "01d"),
            "https://openweathermap.org/img/wn/01d@4x.png"
        );
    }

    #[test]
    fn query_carries_fixed_parameters() {
        let mut config = WeatherConfig::default();
        config.api_key = "key".to_string();
        let client = OneCallClient::new(config).unwrap();
        let query = client.query();
        assert_eq!(query[0], ("lat", "39.84".to_string()));
        assert_eq!(query[1], ("lon", "-86.14".to_string()));
        assert_eq!(query[2], ("exclude", "minutely,alerts".to_string()));
        assert_eq!(query[3], ("units", "imperial".to_string()));
        assert_eq!(query[4], ("appid", "key".to_string()));
    }

    mod http {
        use super::*;
        use std::net::SocketAddr;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::{TcpListener, TcpStream};

        async fn read_request(stream: &mut TcpStream) {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
        }

        /// 本地 HTTP 服务，对每个请求回同一个响应
        async fn serve(status: &'static str, body: &'static [u8]) -> SocketAddr {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                while let Ok((mut stream, _)) = listener.accept().await {
                    read_request(&mut stream).await;
                    let head = format!(
                        "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                        status,
                        body.len()
                    );
                    let _ = stream.write_all(head.as_bytes()).await;
                    let _ = stream.write_all(body).await;
                    let _ = stream.shutdown().await;
                }
            });
            addr
        }

        /// 接受连接后不作应答
        async fn serve_silently() -> SocketAddr {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                let mut held = Vec::new();
                while let Ok((mut stream, _)) = listener.accept().await {
                    read_request(&mut stream).await;
                    held.push(stream);
                }
            });
            addr
        }

        fn client_for(addr: SocketAddr, timeout_secs: Option<u64>) -> OneCallClient {
            let config = WeatherConfig {
                endpoint: format!("http://{}/data/3.0/onecall", addr),
                icon_url_template: format!("http://{}/img/wn/{{icon}}@4x.png", addr),
                request_timeout_secs: timeout_secs,
                ..WeatherConfig::default()
            };
            OneCallClient::new(config).unwrap()
        }

        #[tokio::test]
        async fn non_ok_status_is_an_error() {
            let addr = serve("401 Unauthorized", br#"{"cod":401}"#).await;
            let client = client_for(addr, Some(5));

            assert!(matches!(
                client.fetch_snapshot().await,
                Err(AppError::WeatherStatus(401))
            ));
            assert!(matches!(
                client.fetch_icon("01d").await,
                Err(AppError::WeatherStatus(401))
            ));
        }

        #[tokio::test]
        async fn ok_status_yields_snapshot() {
            let addr = serve("200 OK", SAMPLE.as_bytes()).await;
            let client = client_for(addr, Some(5));

            let snapshot = client.fetch_snapshot().await.unwrap();
            assert_eq!(snapshot.icon, "01d");
            assert_eq!(snapshot.moon_phase, 0.5);
        }

        #[tokio::test]
        async fn silent_server_hits_configured_timeout() {
            let addr = serve_silently().await;
            let client = client_for(addr, Some(1));

            assert!(matches!(
                client.fetch_snapshot().await,
                Err(AppError::NetworkRequestFailed(e)) if e.is_timeout()
            ));
        }
    }
}
