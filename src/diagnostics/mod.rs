mod database;
mod logs;
mod php_fpm;
mod web;

use std::collections::HashMap;

use crate::capabilities::Capabilities;
use crate::config::Config;

/// One named chunk of diagnostic text. Sections with empty bodies are
/// dropped at render time, which is how failed sub-collectors degrade.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

pub fn render(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        let body = section.body.trim();
        if body.is_empty() {
            continue;
        }
        out.push_str("== ");
        out.push_str(&section.title);
        out.push_str(" ==\n");
        out.push_str(body);
        out.push_str("\n\n");
    }

    if out.is_empty() {
        "No diagnostic sections were collected.".to_string()
    } else {
        out.trim_end().to_string()
    }
}

/// Best-effort snapshot: every sub-collector runs independently and a failed
/// or empty one just leaves its section out.
pub async fn collect_diagnostics(config: &Config, capabilities: &Capabilities) -> String {
    let timeout = config.command_timeout_secs;
    let mut sections = Vec::new();

    let server = web::detect(capabilities, timeout).await;
    sections.push(Section::new("Web server", server.label()));

    if let Some(section) = web::connection_summary(capabilities, timeout).await {
        sections.push(section);
    }
    if let Some(section) =
        web::top_request_paths(&config.logs.web_access_log, capabilities, timeout).await
    {
        sections.push(section);
    }
    if let Some(section) = web::status_section(server, capabilities, timeout).await {
        sections.push(section);
    }

    sections.extend(php_fpm::php_fpm_sections(capabilities, timeout).await);
    sections.extend(database::database_sections(config, capabilities, timeout).await);

    if let Some(section) =
        logs::error_log_excerpt(&config.logs.web_error_log, capabilities, timeout).await
    {
        sections.push(section);
    }

    render(&sections)
}

/// Counts occurrences of each value and formats the `limit` most frequent as
/// `"<count> <value>"` lines, most frequent first.
pub(crate) fn top_counts<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(value, count)| format!("{:>7} {}", count, value))
        .collect::<Vec<_>>()
        .join("\n")
}
