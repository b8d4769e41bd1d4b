use std::str::FromStr;

use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub recipient: String,
    #[serde(default = "default_load_threshold")]
    pub load_threshold: u32,
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default = "default_alert_cooldown_secs")]
    pub alert_cooldown_secs: u64,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    #[serde(default)]
    pub logs: LogPaths,
    #[serde(default)]
    pub daily_report: DailyReport,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogPaths {
    #[serde(default = "default_alert_log")]
    pub alert_log: String,
    #[serde(default = "default_web_access_log")]
    pub web_access_log: String,
    #[serde(default = "default_web_error_log")]
    pub web_error_log: String,
    #[serde(default = "default_auth_log")]
    pub auth_log: String,
    #[serde(default)]
    pub slow_query_log: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyReport {
    #[serde(default = "default_daily_report_enabled")]
    pub enabled: bool,
    #[serde(default = "default_daily_report_time")]
    pub time_utc: String,
}

/// Daily report fire time, minute granularity, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTime {
    pub hour: u8,
    pub minute: u8,
}

impl FromStr for ReportTime {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = value
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got {:?}", value))?;
        let hour: u8 = hour
            .parse()
            .map_err(|_| format!("invalid hour in {:?}", value))?;
        let minute: u8 = minute
            .parse()
            .map_err(|_| format!("invalid minute in {:?}", value))?;
        if hour > 23 {
            return Err(format!("hour must be between 0 and 23, got {}", hour));
        }
        if minute > 59 {
            return Err(format!("minute must be between 0 and 59, got {}", minute));
        }
        Ok(Self { hour, minute })
    }
}

impl DailyReport {
    pub fn time(&self) -> Result<ReportTime, String> {
        self.time_utc.parse()
    }
}
