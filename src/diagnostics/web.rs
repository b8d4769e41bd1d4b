use crate::capabilities::Capabilities;
use crate::system::run_cmd;

use super::{top_counts, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WebServer {
    Nginx,
    Apache,
    Unknown,
}

impl WebServer {
    pub(crate) fn label(self) -> &'static str {
        match self {
            WebServer::Nginx => "nginx (active)",
            WebServer::Apache => "apache2 (active)",
            WebServer::Unknown => "unknown (no active web server unit detected)",
        }
    }
}

pub(crate) async fn detect(capabilities: &Capabilities, timeout_secs: u64) -> WebServer {
    if !capabilities.is_systemd {
        return WebServer::Unknown;
    }
    if unit_is_active("nginx", timeout_secs).await {
        WebServer::Nginx
    } else if unit_is_active("apache2", timeout_secs).await {
        WebServer::Apache
    } else {
        WebServer::Unknown
    }
}

pub(crate) async fn unit_is_active(unit: &str, timeout_secs: u64) -> bool {
    run_cmd("systemctl", &["is-active", "--quiet", unit], timeout_secs)
        .await
        .map(|output| output.status == 0)
        .unwrap_or(false)
}

pub(crate) async fn connection_summary(
    capabilities: &Capabilities,
    timeout_secs: u64,
) -> Option<Section> {
    if !capabilities.has_ss {
        return None;
    }

    let output = run_cmd("ss", &["-Htn", "state", "established"], timeout_secs)
        .await
        .ok()?;
    if output.status != 0 {
        return None;
    }

    let body = summarize_connections(&output.stdout);
    if body.is_empty() {
        return None;
    }
    Some(Section::new("Established connections by peer", body))
}

/// `ss -Htn state established` lines: Recv-Q Send-Q Local Peer. Groups by
/// peer address with the port stripped.
pub(crate) fn summarize_connections(raw: &str) -> String {
    let peers = raw.lines().filter_map(|line| {
        let peer = line.split_whitespace().nth(3)?;
        Some(peer.rsplit_once(':').map(|(host, _port)| host).unwrap_or(peer))
    });
    top_counts(peers, 15)
}

pub(crate) async fn top_request_paths(
    access_log: &str,
    capabilities: &Capabilities,
    timeout_secs: u64,
) -> Option<Section> {
    if !capabilities.has_tail {
        return None;
    }

    let output = run_cmd("tail", &["-n", "5000", access_log], timeout_secs)
        .await
        .ok()?;
    if output.status != 0 {
        return None;
    }

    let body = count_request_paths(&output.stdout);
    if body.is_empty() {
        return None;
    }
    Some(Section::new("Most requested paths (last 5000 lines)", body))
}

/// Combined-format access log: the request path is the 7th whitespace field.
pub(crate) fn count_request_paths(raw: &str) -> String {
    let paths = raw
        .lines()
        .filter_map(|line| line.split_whitespace().nth(6));
    top_counts(paths, 10)
}

pub(crate) async fn status_section(
    server: WebServer,
    capabilities: &Capabilities,
    timeout_secs: u64,
) -> Option<Section> {
    if !capabilities.has_curl {
        return None;
    }

    let (title, url) = match server {
        WebServer::Nginx => ("nginx status", "http://127.0.0.1/nginx_status"),
        WebServer::Apache => ("Apache status", "http://127.0.0.1/server-status?auto"),
        WebServer::Unknown => return None,
    };

    let output = run_cmd("curl", &["-s", "--max-time", "5", url], timeout_secs)
        .await
        .ok()?;
    if output.status != 0 || output.stdout.trim().is_empty() {
        return None;
    }
    Some(Section::new(title, output.stdout))
}
