use thiserror::Error;

use super::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recipient.trim().is_empty() {
            return Err(ConfigError::Validation(
                "recipient must not be empty".to_string(),
            ));
        }
        if self.load_threshold == 0 {
            return Err(ConfigError::Validation(
                "load_threshold must be greater than 0".to_string(),
            ));
        }
        if self.check_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "check_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "command_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.logs.alert_log.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logs.alert_log must not be empty".to_string(),
            ));
        }
        self.daily_report
            .time()
            .map_err(|message| ConfigError::Validation(format!("daily_report.time_utc: {}", message)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ReportTime;

    use super::*;

    fn base_config() -> Config {
        toml::from_str(r#"recipient = "ops@example.com""#).expect("minimal config parses")
    }

    #[test]
    fn minimal_config_is_valid() {
        let config = base_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.load_threshold, 15);
        assert_eq!(config.alert_cooldown_secs, 300);
    }

    #[test]
    fn empty_recipient_is_rejected() {
        let mut config = base_config();
        config.recipient = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = base_config();
        config.check_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn report_time_parses_and_bounds_are_checked() {
        assert_eq!(
            "16:00".parse::<ReportTime>().expect("valid time"),
            ReportTime { hour: 16, minute: 0 }
        );
        assert!("24:00".parse::<ReportTime>().is_err());
        assert!("12:60".parse::<ReportTime>().is_err());
        assert!("noon".parse::<ReportTime>().is_err());

        let mut config = base_config();
        config.daily_report.time_utc = "99:99".to_string();
        assert!(config.validate().is_err());
    }
}
