mod alert_log;
mod capabilities;
mod config;
mod diagnostics;
mod dispatch;
mod mailer;
mod monitor;
mod report;
mod system;

use tracing_subscriber::EnvFilter;

use crate::alert_log::AlertLog;
use crate::capabilities::Capabilities;
use crate::config::{load_config, Config};
use crate::dispatch::AlertDispatcher;
use crate::mailer::CommandMailer;
use crate::monitor::{run_monitor_loop, SysinfoLoadProvider};

const CONFIG_PATH: &str = "config.toml";

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

fn log_capability_warnings(capabilities: &Capabilities) {
    if !capabilities.is_systemd {
        log::warn!(
            "capability_degraded feature=service_detection reason=systemctl_or_systemd_unavailable"
        );
    }

    if !capabilities.has_ss {
        log::warn!("capability_degraded feature=connections reason=ss_unavailable");
    }

    if !capabilities.has_ps {
        log::warn!("capability_degraded feature=processes reason=ps_unavailable");
    }

    if !capabilities.has_tail {
        log::warn!("capability_degraded feature=log_excerpts reason=tail_unavailable");
    }

    if !capabilities.has_curl {
        log::warn!("capability_degraded feature=web_status reason=curl_unavailable");
    }

    if !capabilities.has_uptime {
        log::warn!("capability_degraded feature=uptime reason=uptime_unavailable");
    }

    if !capabilities.has_mysqladmin {
        log::warn!("capability_degraded feature=database reason=mysqladmin_unavailable");
    }

    if !capabilities.has_mail {
        log::warn!("capability_degraded feature=mail_delivery reason=mail_unavailable");
    }
}

#[tokio::main]
async fn main() {
    init_json_logging();

    let config: Config = match load_config(CONFIG_PATH) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    // validated by load_config, so this cannot fail past startup
    let report_time = match config.daily_report.time() {
        Ok(report_time) => report_time,
        Err(error) => {
            log::error!("Configuration error: daily_report.time_utc: {}", error);
            return;
        }
    };

    log::info!(
        "loadwarden is starting... threshold={} interval_secs={} cooldown_secs={}",
        config.load_threshold,
        config.check_interval_secs,
        config.alert_cooldown_secs
    );

    let capabilities = Capabilities::detect();
    log_capability_warnings(&capabilities);

    let mailer = CommandMailer::new(config.command_timeout_secs, capabilities.has_mail);
    let alert_log = AlertLog::new(&config.logs.alert_log);
    let dispatcher = AlertDispatcher::new(mailer, alert_log, config.recipient.clone());
    let mut provider = SysinfoLoadProvider::new();

    run_monitor_loop(
        &config,
        &capabilities,
        report_time,
        &mut provider,
        &dispatcher,
    )
    .await;
}
