use crate::capabilities::Capabilities;
use crate::config::Config;
use crate::system::run_cmd;

use super::web::unit_is_active;
use super::Section;

const DATABASE_UNITS: [&str; 2] = ["mysql", "mariadb"];

/// Collected only when a database unit is actually active; everything here is
/// skippable without failing the bundle.
pub(crate) async fn database_sections(
    config: &Config,
    capabilities: &Capabilities,
    timeout_secs: u64,
) -> Vec<Section> {
    if !capabilities.is_systemd {
        return Vec::new();
    }

    let mut active_unit = None;
    for unit in DATABASE_UNITS {
        if unit_is_active(unit, timeout_secs).await {
            active_unit = Some(unit);
            break;
        }
    }
    let Some(unit) = active_unit else {
        return Vec::new();
    };

    let mut sections = Vec::new();

    if capabilities.has_mysqladmin {
        if let Ok(output) = run_cmd("mysqladmin", &["status"], timeout_secs).await {
            if output.status == 0 {
                sections.push(Section::new(format!("{} status", unit), output.stdout));
            }
        }
        if let Ok(output) = run_cmd("mysqladmin", &["processlist"], timeout_secs).await {
            if output.status == 0 {
                sections.push(Section::new(format!("{} processlist", unit), output.stdout));
            }
        }
    }

    if capabilities.has_tail {
        if let Some(path) = &config.logs.slow_query_log {
            if let Ok(output) = run_cmd("tail", &["-n", "20", path], timeout_secs).await {
                if output.status == 0 {
                    sections.push(Section::new("Slow query log (tail)", output.stdout));
                }
            }
        }
    }

    sections
}
