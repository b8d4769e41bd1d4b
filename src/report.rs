use chrono::NaiveDate;
use sysinfo::{System, SystemExt};

use crate::alert_log::AlertLog;
use crate::capabilities::Capabilities;
use crate::config::Config;
use crate::diagnostics::{render, top_counts, Section};
use crate::system::run_cmd;

const TOP_PROCESS_LINES: usize = 15;
const AUTH_KEEP_LINES: usize = 20;

/// Assembles the daily bundle and a hostname-qualified subject. Every section
/// is best-effort, same rules as the spike diagnostics.
pub async fn build_daily_report(
    config: &Config,
    capabilities: &Capabilities,
    today: NaiveDate,
) -> (String, String) {
    let timeout = config.command_timeout_secs;
    let mut sections = Vec::new();

    if capabilities.has_uptime {
        if let Ok(output) = run_cmd("uptime", &[], timeout).await {
            if output.status == 0 {
                sections.push(Section::new("Uptime", output.stdout));
            }
        }
    }

    if capabilities.has_tail {
        if let Ok(output) =
            run_cmd("tail", &["-n", "5000", &config.logs.web_access_log], timeout).await
        {
            if output.status == 0 {
                sections.push(Section::new(
                    "Traffic by status code (last 5000 lines)",
                    status_histogram(&output.stdout),
                ));
            }
        }
    }

    let alerts = AlertLog::new(&config.logs.alert_log).entries_for_date(today);
    if !alerts.is_empty() {
        sections.push(Section::new("Today's alerts", alerts.join("\n")));
    }

    if capabilities.has_ps {
        if let Ok(output) = run_cmd("ps", &["aux", "--sort=-pcpu"], timeout).await {
            if output.status == 0 {
                let top = output
                    .stdout
                    .lines()
                    .take(TOP_PROCESS_LINES)
                    .collect::<Vec<_>>()
                    .join("\n");
                sections.push(Section::new("Top processes by CPU", top));
            }
        }
    }

    if capabilities.has_tail {
        if let Ok(output) = run_cmd("tail", &["-n", "200", &config.logs.auth_log], timeout).await
        {
            if output.status == 0 {
                let body = auth_failures(&output.stdout);
                if !body.is_empty() {
                    sections.push(Section::new("Authentication failures (recent)", body));
                }
            }
        }
    }

    let hostname = System::new()
        .host_name()
        .unwrap_or_else(|| "unknown".to_string());

    (
        format!("Daily server report - {}", hostname),
        render(&sections),
    )
}

/// Combined-format access log: the HTTP status is the 9th whitespace field.
pub(crate) fn status_histogram(raw: &str) -> String {
    let statuses = raw
        .lines()
        .filter_map(|line| line.split_whitespace().nth(8));
    top_counts(statuses, 10)
}

pub(crate) fn auth_failures(raw: &str) -> String {
    let matching: Vec<&str> = raw
        .lines()
        .filter(|line| line.to_lowercase().contains("fail"))
        .collect();
    let start = matching.len().saturating_sub(AUTH_KEEP_LINES);
    matching[start..].join("\n")
}
