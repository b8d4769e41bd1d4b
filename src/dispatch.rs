use chrono::{DateTime, Utc};

use crate::alert_log::AlertLog;
use crate::mailer::Mailer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    MailFailed,
}

/// Single side-effecting sink for every outgoing message. Prefixes the
/// subject, hands the mail to the transport, and appends the alert-log line.
/// Neither failure aborts the other; both are surfaced in the logs and the
/// returned outcome.
pub struct AlertDispatcher<M: Mailer> {
    mailer: M,
    alert_log: AlertLog,
    recipient: String,
}

impl<M: Mailer> AlertDispatcher<M> {
    pub fn new(mailer: M, alert_log: AlertLog, recipient: String) -> Self {
        Self {
            mailer,
            alert_log,
            recipient,
        }
    }

    pub async fn dispatch(
        &self,
        subject: &str,
        body: &str,
        now: DateTime<Utc>,
    ) -> DispatchOutcome {
        let full_subject = format!("URGENT: {}", subject);

        let outcome = match self.mailer.send(&self.recipient, &full_subject, body).await {
            Ok(()) => {
                log::info!("alert_dispatched recipient={} subject={:?}", self.recipient, subject);
                DispatchOutcome::Delivered
            }
            Err(error) => {
                log::error!(
                    "alert_mail_failed recipient={} subject={:?} error={}",
                    self.recipient,
                    subject,
                    error
                );
                DispatchOutcome::MailFailed
            }
        };

        if let Err(error) = self.alert_log.append(now, subject) {
            log::warn!("alert_log_append_failed error={}", error);
        }

        outcome
    }
}
