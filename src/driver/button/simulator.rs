// src/driver/button/simulator.rs
use embassy_time::Instant;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{ButtonDriver, Debouncer, forward_press};
use crate::common::ButtonSender;
use crate::common::config::ButtonConfig;
use crate::common::error::Result;

/// 模拟器按键：从标准输入读取 1-4，表示按下对应位置的按键
pub struct SimulatorButtonDriver {
    config: ButtonConfig,
}

impl SimulatorButtonDriver {
    pub fn new(config: &ButtonConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
        })
    }
}

/// 解析一行输入为按键位置（0 起）：1-4 表示位置，其余数字按引脚号查找
pub fn parse_position(line: &str, pins: &[u8; 4]) -> Option<usize> {
    let n = line.trim().parse::<usize>().ok()?;
    match n {
        1..=4 => Some(n - 1),
        _ => pins.iter().position(|&pin| pin as usize == n),
    }
}

impl ButtonDriver for SimulatorButtonDriver {
    fn start(&mut self, sender: ButtonSender) -> Result<()> {
        let pins = self.config.pins;
        let debounce_ms = self.config.debounce_ms;
        info!("Simulator buttons: type 1-4 or a pin number {:?} and press Enter", pins);

        tokio::spawn(async move {
            let mut debouncers: Vec<Debouncer> =
                pins.iter().map(|_| Debouncer::from_millis(debounce_ms)).collect();
            let mut lines = BufReader::new(tokio::io::stdin()).lines();

            while let Ok(Some(line)) = lines.next_line().await {
                let Some(position) = parse_position(&line, &pins) else {
                    warn!("Ignoring input {:?}, expected 1-4 or a button pin", line.trim());
                    continue;
                };
                forward_press(&mut debouncers[position], &sender, pins[position], Instant::now());
            }
            info!("Simulator input closed");
        });
        Ok(())
    }
}
