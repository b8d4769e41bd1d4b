use super::schema::{DailyReport, LogPaths};

pub(super) fn default_load_threshold() -> u32 {
    15
}

pub(super) fn default_check_interval_secs() -> u64 {
    60
}

pub(super) fn default_alert_cooldown_secs() -> u64 {
    300
}

pub(super) fn default_command_timeout_secs() -> u64 {
    30
}

pub(super) fn default_alert_log() -> String {
    "/var/log/loadwarden/alerts.log".to_string()
}

pub(super) fn default_web_access_log() -> String {
    "/var/log/nginx/access.log".to_string()
}

pub(super) fn default_web_error_log() -> String {
    "/var/log/nginx/error.log".to_string()
}

pub(super) fn default_auth_log() -> String {
    "/var/log/auth.log".to_string()
}

pub(super) fn default_daily_report_enabled() -> bool {
    true
}

pub(super) fn default_daily_report_time() -> String {
    "16:00".to_string()
}

impl Default for LogPaths {
    fn default() -> Self {
        Self {
            alert_log: default_alert_log(),
            web_access_log: default_web_access_log(),
            web_error_log: default_web_error_log(),
            auth_log: default_auth_log(),
            slow_query_log: None,
        }
    }
}

impl Default for DailyReport {
    fn default() -> Self {
        Self {
            enabled: default_daily_report_enabled(),
            time_utc: default_daily_report_time(),
        }
    }
}
