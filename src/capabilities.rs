use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone)]
pub struct Capabilities {
    pub is_systemd: bool,
    pub has_ss: bool,
    pub has_ps: bool,
    pub has_tail: bool,
    pub has_curl: bool,
    pub has_uptime: bool,
    pub has_mysqladmin: bool,
    pub has_mail: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        let has_systemctl = command_exists("systemctl");

        Self {
            is_systemd: has_systemctl && Path::new("/run/systemd/system").exists(),
            has_ss: command_exists("ss"),
            has_ps: command_exists("ps"),
            has_tail: command_exists("tail"),
            has_curl: command_exists("curl"),
            has_uptime: command_exists("uptime"),
            has_mysqladmin: command_exists("mysqladmin"),
            has_mail: command_exists("mail"),
        }
    }

    #[cfg(test)]
    pub(crate) fn none() -> Self {
        Self {
            is_systemd: false,
            has_ss: false,
            has_ps: false,
            has_tail: false,
            has_curl: false,
            has_uptime: false,
            has_mysqladmin: false,
            has_mail: false,
        }
    }
}

fn command_exists(command: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {} >/dev/null 2>&1", command))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
