use crate::capabilities::Capabilities;
use crate::system::run_cmd;

use super::Section;

const TAIL_LINES: &str = "200";
const KEEP_LINES: usize = 50;
const MARKERS: [&str; 3] = ["error", "timeout", "fail"];

pub(crate) async fn error_log_excerpt(
    error_log: &str,
    capabilities: &Capabilities,
    timeout_secs: u64,
) -> Option<Section> {
    if !capabilities.has_tail {
        return None;
    }

    let output = run_cmd("tail", &["-n", TAIL_LINES, error_log], timeout_secs)
        .await
        .ok()?;
    if output.status != 0 {
        return None;
    }

    let body = filter_error_lines(&output.stdout);
    if body.is_empty() {
        return None;
    }
    Some(Section::new("Web server error log (recent errors)", body))
}

/// Keeps the most recent lines mentioning an error, timeout, or failure.
pub(crate) fn filter_error_lines(raw: &str) -> String {
    let matching: Vec<&str> = raw
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .collect();

    let start = matching.len().saturating_sub(KEEP_LINES);
    matching[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_error_timeout_and_failure_lines() {
        let raw = "\
2024/03/09 10:00:00 [notice] worker started
2024/03/09 10:00:01 [error] upstream timed out
2024/03/09 10:00:02 [warn] Upstream TIMEOUT while reading
2024/03/09 10:00:03 [crit] connect() FAILED
2024/03/09 10:00:04 [info] reload
";
        let filtered = filter_error_lines(raw);
        assert_eq!(filtered.lines().count(), 3);
        assert!(!filtered.contains("notice"));
        assert!(!filtered.contains("reload"));
    }

    #[test]
    fn keeps_at_most_the_last_fifty_matches() {
        let raw = (0..80)
            .map(|i| format!("line {} error", i))
            .collect::<Vec<_>>()
            .join("\n");
        let filtered = filter_error_lines(&raw);
        assert_eq!(filtered.lines().count(), 50);
        assert!(filtered.starts_with("line 30 error"));
        assert!(filtered.ends_with("line 79 error"));
    }
}
