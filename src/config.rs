use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

use crate::error::ConfigError;
use crate::sync::ScanPolicy;

pub const DEFAULT_URL: &str = "https://temporeal.radaresdeportugal.pt/";
pub const DEFAULT_DB_PATH: &str = "radaresPT.db";

/// 取得日時を解釈するタイムゾーン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampZone {
    /// 実行環境のローカルタイムゾーン
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl TimestampZone {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// `local` / `utc` / `±HH:MM` を解釈する
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => return Some(Self::Local),
            "utc" | "z" => return Some(Self::utc()),
            _ => {}
        }

        let value = value.trim();
        let (sign, rest) = match value.as_bytes().first()? {
            b'+' => (1, &value[1..]),
            b'-' => (-1, &value[1..]),
            _ => return None,
        };
        let (hours, minutes) = rest.split_once(':')?;
        if hours.len() != 2 || minutes.len() != 2 {
            return None;
        }
        let hours: i32 = hours.parse().ok()?;
        let minutes: i32 = minutes.parse().ok()?;
        if minutes >= 60 {
            return None;
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(Self::Fixed)
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub url: String,
    pub db_path: PathBuf,
    pub headless: bool,
    pub timeout: Duration,
    pub timezone: TimestampZone,
    pub scan_policy: ScanPolicy,
    pub chrome_executable: Option<PathBuf>,
    pub snapshot_dir: Option<PathBuf>,
    pub debug: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            headless: true,
            timeout: Duration::from_secs(60),
            timezone: TimestampZone::Local,
            scan_policy: ScanPolicy::ShortCircuit,
            chrome_executable: None,
            snapshot_dir: None,
            debug: false,
        }
    }
}

impl SyncConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Default::default()
        }
    }

    /// 環境変数から設定を読み込む（未設定の項目はデフォルト値）
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("RADARES_URL") {
            config.url = url;
        }
        if let Some(path) = lookup("RADARES_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(value) = lookup("RADARES_HEADLESS") {
            config.headless = parse_bool("RADARES_HEADLESS", &value)?;
        }
        if let Some(value) = lookup("RADARES_DEBUG") {
            config.debug = parse_bool("RADARES_DEBUG", &value)?;
        }
        if let Some(value) = lookup("RADARES_TIMEOUT_SECS") {
            let secs = value.trim().parse::<u64>().map_err(|e| ConfigError {
                key: "RADARES_TIMEOUT_SECS",
                value: value.clone(),
                reason: e.to_string(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(value) = lookup("RADARES_TIMEZONE") {
            config.timezone = TimestampZone::parse(&value).ok_or_else(|| ConfigError {
                key: "RADARES_TIMEZONE",
                value: value.clone(),
                reason: "expected local, utc or ±HH:MM".to_string(),
            })?;
        }
        if let Some(value) = lookup("RADARES_SCAN_POLICY") {
            config.scan_policy = ScanPolicy::parse(&value).ok_or_else(|| ConfigError {
                key: "RADARES_SCAN_POLICY",
                value: value.clone(),
                reason: "expected short-circuit or full-scan".to_string(),
            })?;
        }
        if let Some(path) = lookup("RADARES_SNAPSHOT_DIR") {
            config.snapshot_dir = Some(PathBuf::from(path));
        }
        config.chrome_executable = lookup("CHROME_PATH")
            .or_else(|| lookup("CHROMIUM_PATH"))
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timezone(mut self, timezone: TimestampZone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_scan_policy(mut self, scan_policy: ScanPolicy) -> Self {
        self.scan_policy = scan_policy;
        self
    }

    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            key,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
