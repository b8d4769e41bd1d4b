use thiserror::Error;

use crate::system::{run_cmd_with_stdin, CommandError};

#[derive(Debug, Error)]
pub enum MailError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("mail command exited with status {status}: {stderr}")]
    Delivery { status: i32, stderr: String },
    #[error("mail utility not found on this host")]
    Unavailable,
}

pub trait Mailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Sends through the local `mail` utility with the body on stdin. Delivery
/// beyond the local MTA handoff is not observable here.
pub struct CommandMailer {
    timeout_secs: u64,
    mail_available: bool,
}

impl CommandMailer {
    pub fn new(timeout_secs: u64, mail_available: bool) -> Self {
        Self {
            timeout_secs,
            mail_available,
        }
    }
}

impl Mailer for CommandMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if !self.mail_available {
            return Err(MailError::Unavailable);
        }

        let output =
            run_cmd_with_stdin("mail", &["-s", subject, recipient], body, self.timeout_secs)
                .await?;

        if output.status != 0 {
            return Err(MailError::Delivery {
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_without_mail_utility_is_refused_not_attempted() {
        let mailer = CommandMailer::new(5, false);
        let result = mailer.send("ops@example.com", "subject", "body").await;
        assert!(matches!(result, Err(MailError::Unavailable)));
    }
}
