use async_trait::async_trait;
use tracing::instrument;

use crate::error::AppResult;
use crate::models::{PersonalInfo, QuoteId};
use crate::telemetry::NOTIFICATIONS_SENT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound transactional email.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &Email) -> AppResult<()>;
}

/// Writes the message to the log instead of delivering it. Always succeeds.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    #[instrument(name = "notification.send", skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: &Email) -> AppResult<()> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            "Sending email"
        );

        NOTIFICATIONS_SENT.add(1, &[]);

        Ok(())
    }
}

pub const QUOTE_READY_SUBJECT: &str = "Your Solar Quote Analysis is Ready";

pub fn results_url(app_url: &str, quote_id: &QuoteId) -> String {
    format!("{app_url}/quote/results?id={quote_id}")
}

pub fn quote_ready_email(personal_info: &PersonalInfo, quote_id: &QuoteId, app_url: &str) -> Email {
    let link = results_url(app_url, quote_id);

    Email {
        to: personal_info.email.clone(),
        subject: QUOTE_READY_SUBJECT.to_string(),
        body: format!(
            r#"<h1>Hello {first_name},</h1>
<p>Your solar quote analysis is now ready to view.</p>
<p>Click the button below to see your personalized solar energy recommendations:</p>
<a href="{link}" style="display: inline-block; background-color: #16a34a; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; margin-top: 16px;">View Your Analysis</a>
<p>Thank you for using our service!</p>"#,
            first_name = personal_info.first_name,
        ),
    }
}
