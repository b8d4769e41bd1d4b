use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::time::{sleep, Duration};

use crate::capabilities::Capabilities;
use crate::config::{Config, ReportTime};
use crate::diagnostics;
use crate::dispatch::AlertDispatcher;
use crate::mailer::Mailer;
use crate::report;

use super::provider::LoadProvider;
use super::state::MonitorState;

/// Runs until the process is killed. One sequential task: collections and
/// dispatches are awaited inline, so a slow external command delays the next
/// poll (bounded by the per-command timeout).
pub async fn run_monitor_loop<P: LoadProvider, M: Mailer>(
    config: &Config,
    capabilities: &Capabilities,
    report_time: ReportTime,
    provider: &mut P,
    dispatcher: &AlertDispatcher<M>,
) {
    let mut state = MonitorState::new();
    let mut previous_tick: Option<DateTime<Utc>> = None;

    loop {
        let now_wall = Utc::now();

        if let Some(previous) = previous_tick {
            let elapsed_secs = now_wall.signed_duration_since(previous).num_seconds().max(0);
            let threshold_secs = (config.check_interval_secs * 2) as i64;
            if elapsed_secs > threshold_secs {
                log::warn!(
                    "monitor_loop_delayed elapsed_secs={} threshold_secs={}",
                    elapsed_secs,
                    threshold_secs
                );
            }
        }
        previous_tick = Some(now_wall);

        tick(
            config,
            capabilities,
            report_time,
            &mut state,
            provider,
            dispatcher,
            Instant::now(),
            now_wall,
        )
        .await;

        sleep(Duration::from_secs(config.check_interval_secs)).await;
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn tick<P: LoadProvider, M: Mailer>(
    config: &Config,
    capabilities: &Capabilities,
    report_time: ReportTime,
    state: &mut MonitorState,
    provider: &mut P,
    dispatcher: &AlertDispatcher<M>,
    now: Instant,
    now_wall: DateTime<Utc>,
) {
    match provider.load_one_minute().await {
        Ok(load) => {
            tracing::info!(
                target: "monitor",
                module = "monitor",
                load_one = load,
                threshold = config.load_threshold,
                over = load.max(0.0) as u64 >= config.load_threshold as u64,
                "monitor_load"
            );

            if state.should_alert(
                load,
                config.load_threshold,
                config.alert_cooldown_secs,
                now,
            ) {
                let subject = format!("High load average: {}", load.max(0.0) as u64);
                let diagnostics = diagnostics::collect_diagnostics(config, capabilities).await;
                let body = format!(
                    "Load average (1m): {:.2}\nThreshold: {}\n\n{}",
                    load, config.load_threshold, diagnostics
                );
                dispatcher.dispatch(&subject, &body, now_wall).await;
                state.mark_alerted(now);
            }
        }
        Err(error) => {
            log::warn!("load provider error: {}", error);
        }
    }

    if config.daily_report.enabled && state.should_send_report(now_wall, report_time) {
        let (subject, body) =
            report::build_daily_report(config, capabilities, now_wall.date_naive()).await;
        dispatcher.dispatch(&subject, &body, now_wall).await;
        state.mark_report_sent(now_wall.date_naive());
        state.mark_alerted(now);
    }
}
