// src/service/scan_service.rs
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

use log::{debug, info};
use tokio::process::Command;

use crate::common::config::NetworkConfig;
use crate::common::error::{AppError, Result};
use crate::common::types::HostEntry;

/// 局域网主机发现
pub trait HostScanner {
    /// Ping 扫描（不扫端口），返回在线主机
    async fn scan(&self) -> Result<Vec<HostEntry>>;
}

/// 调用 nmap 做 ping 扫描
pub struct NmapScanner {
    binary: PathBuf,
    subnet: String,
}

impl NmapScanner {
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            binary: config.nmap_binary.clone(),
            subnet: config.subnet.clone(),
        }
    }

    fn args(&self) -> [&str; 4] {
        ["-sn", "-oG", "-", self.subnet.as_str()]
    }
}

impl HostScanner for NmapScanner {
    async fn scan(&self) -> Result<Vec<HostEntry>> {
        info!("Scanning {}", self.subnet);
        let output = Command::new(&self.binary)
            .args(self.args())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AppError::ScanFailed(format!("{}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            return Err(AppError::ScanFailed(format!(
                "nmap exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let hosts = parse_grepable(&String::from_utf8_lossy(&output.stdout));
        info!("Scan found {} hosts", hosts.len());
        Ok(hosts)
    }
}

/// 解析 nmap `-oG` 输出
///
/// 只保留 `Status: Up` 的主机；按 IP 字符串排序并去重。
pub fn parse_grepable(output: &str) -> Vec<HostEntry> {
    let mut hosts = BTreeMap::new();

    for line in output.lines() {
        let Some(rest) = line.strip_prefix("Host: ") else {
            continue;
        };
        if !rest.contains("Status: Up") {
            continue;
        }
        let Some(ip) = rest.split_whitespace().next() else {
            continue;
        };
        let hostname = rest
            .split_once('(')
            .and_then(|(_, tail)| tail.split_once(')'))
            .map(|(name, _)| name)
            .unwrap_or("");
        debug!("Host up: {} ({})", ip, hostname);
        hosts
            .entry(ip.to_string())
            .or_insert_with(|| HostEntry::new(hostname, ip));
    }

    hosts.into_values().collect()
}
