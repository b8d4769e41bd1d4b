use crate::capabilities::Capabilities;
use crate::system::run_cmd;

use super::Section;

const POOL_LIMIT_KEYS: [&str; 3] = ["pm.max_children", "pm.start_servers", "pm.max_spare_servers"];
const TOP_CONSUMERS: usize = 5;

/// One section per PHP-FPM version found running, discovered from the list of
/// running service units so stopped-but-installed versions and unrelated
/// services never appear.
pub(crate) async fn php_fpm_sections(
    capabilities: &Capabilities,
    timeout_secs: u64,
) -> Vec<Section> {
    if !capabilities.is_systemd {
        return Vec::new();
    }

    let units = match run_cmd(
        "systemctl",
        &[
            "list-units",
            "--type=service",
            "--state=running",
            "--no-legend",
            "--plain",
        ],
        timeout_secs,
    )
    .await
    {
        Ok(output) if output.status == 0 => output.stdout,
        _ => return Vec::new(),
    };

    let versions = running_fpm_versions(&units);
    if versions.is_empty() {
        return Vec::new();
    }

    let ps_output = if capabilities.has_ps {
        run_cmd("ps", &["-eo", "pid,rss,args", "--no-headers"], timeout_secs)
            .await
            .ok()
            .filter(|output| output.status == 0)
            .map(|output| output.stdout)
    } else {
        None
    };

    let mut sections = Vec::new();
    for version in versions {
        let mut body = String::new();

        if let Some(ps) = ps_output.as_deref() {
            let processes = fpm_process_lines(ps, &version);
            if !processes.is_empty() {
                body.push_str(&format!("Processes: {}\n", processes.len()));
                body.push_str("Top memory consumers (RSS kB):\n");
                body.push_str(&top_memory_consumers(&processes));
                body.push('\n');
            }
        }

        if let Some(limits) = pool_limits(&version).await {
            body.push_str("Pool limits:\n");
            body.push_str(&limits);
            body.push('\n');
        }

        if !body.trim().is_empty() {
            sections.push(Section::new(format!("PHP-FPM {}", version), body));
        }
    }

    sections
}

/// Picks versions out of running unit names shaped like `php8.1-fpm.service`.
pub(crate) fn running_fpm_versions(unit_list: &str) -> Vec<String> {
    let mut versions = Vec::new();
    for line in unit_list.lines() {
        let Some(unit) = line.split_whitespace().next() else {
            continue;
        };
        let Some(name) = unit.strip_suffix(".service") else {
            continue;
        };
        let Some(rest) = name.strip_prefix("php") else {
            continue;
        };
        let Some(version) = rest.strip_suffix("-fpm") else {
            continue;
        };
        if !version.is_empty() && !versions.iter().any(|known| known == version) {
            versions.push(version.to_string());
        }
    }
    versions
}

fn fpm_process_lines<'a>(ps_output: &'a str, version: &str) -> Vec<&'a str> {
    ps_output
        .lines()
        .filter(|line| line.contains("php-fpm") && line.contains(version))
        .collect()
}

/// `ps -eo pid,rss,args` lines sorted by the RSS column, largest first.
pub(crate) fn top_memory_consumers(lines: &[&str]) -> String {
    let mut by_rss: Vec<(u64, &str)> = lines
        .iter()
        .map(|line| {
            let rss = line
                .split_whitespace()
                .nth(1)
                .and_then(|field| field.parse().ok())
                .unwrap_or(0);
            (rss, *line)
        })
        .collect();
    by_rss.sort_by(|a, b| b.0.cmp(&a.0));
    by_rss.truncate(TOP_CONSUMERS);

    by_rss
        .into_iter()
        .map(|(_, line)| line.trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

async fn pool_limits(version: &str) -> Option<String> {
    let path = format!("/etc/php/{}/fpm/pool.d/www.conf", version);
    let contents = tokio::fs::read_to_string(&path).await.ok()?;
    let limits = pool_limits_from(&contents);
    if limits.is_empty() {
        None
    } else {
        Some(limits)
    }
}

pub(crate) fn pool_limits_from(contents: &str) -> String {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| {
            POOL_LIMIT_KEYS
                .iter()
                .any(|key| line.starts_with(key))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_come_only_from_running_fpm_units() {
        let units = "\
php8.1-fpm.service    loaded active running The PHP 8.1 FastCGI Process Manager
php8.3-fpm.service    loaded active running The PHP 8.3 FastCGI Process Manager
nginx.service         loaded active running A high performance web server
phpsessionclean.service loaded active running Clean php session files
";
        assert_eq!(running_fpm_versions(units), vec!["8.1", "8.3"]);
    }

    #[test]
    fn duplicate_units_yield_one_version() {
        let units = "php8.1-fpm.service x\nphp8.1-fpm.service y\n";
        assert_eq!(running_fpm_versions(units), vec!["8.1"]);
    }

    #[test]
    fn memory_consumers_sorted_by_rss() {
        let lines = vec![
            "  101  2048 php-fpm: pool www",
            "  102 81920 php-fpm: pool www",
            "  103  4096 php-fpm: pool www",
        ];
        let top = top_memory_consumers(&lines);
        let first = top.lines().next().expect("top line");
        assert!(first.starts_with("102"));
    }

    #[test]
    fn pool_limits_extracts_only_worker_settings() {
        let conf = "\
; pool config
[www]
user = www-data
pm = dynamic
pm.max_children = 40
pm.start_servers = 8
pm.max_spare_servers = 16
pm.min_spare_servers = 4
";
        let limits = pool_limits_from(conf);
        assert!(limits.contains("pm.max_children = 40"));
        assert!(limits.contains("pm.start_servers = 8"));
        assert!(limits.contains("pm.max_spare_servers = 16"));
        assert!(!limits.contains("min_spare"));
        assert!(!limits.contains("user"));
    }
}
